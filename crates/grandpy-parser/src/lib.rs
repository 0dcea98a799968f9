//! GrandPy Parser - Understanding the user's message
//!
//! Turns a raw chat message into the question sent to the geocoder, and a
//! wiki article into a short story:
//! - [`normalizer`]: lowercase, accent folding, apostrophes, stop words
//! - [`question`]: question candidates and keyword-stem scoring
//! - [`section`]: heading-delimited article sections

pub mod normalizer;
pub mod question;
pub mod section;

pub use normalizer::{NormalizeStep, Normalizer};
pub use question::{looks_like_question, question_spans, QuestionExtractor};
pub use section::{first_section, get_section, segments, Section};

use grandpy_core::Resources;

/// Normalizer and question extractor built from the same resources
pub struct Parser {
    normalizer: Normalizer,
    extractor: QuestionExtractor,
}

impl Parser {
    pub fn new(normalizer: Normalizer, extractor: QuestionExtractor) -> Self {
        Self {
            normalizer,
            extractor,
        }
    }

    /// Build from loaded resources
    pub fn from_resources(resources: &Resources) -> Self {
        Self::new(
            Normalizer::new(resources.stop_words.clone()),
            QuestionExtractor::new(resources.keywords.as_deref()),
        )
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn extractor(&self) -> &QuestionExtractor {
        &self.extractor
    }

    /// Normalize a raw message and pick the question to geocode
    pub fn parse_question(&self, message: &str) -> String {
        let normalized = self.normalizer.normalize(message);
        tracing::debug!(normalized = %normalized, "Message normalized");
        self.extractor.extract(&normalized)
    }
}

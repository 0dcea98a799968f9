//! Question extraction
//!
//! Candidate questions are scanned lazily from normalized text, then the
//! candidate sharing the most stems with the address-intent keywords is kept.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

use crate::normalizer::{fold_accents, lowercase};

/// Letters, light punctuation and whitespace up to a question mark.
/// Anchoring at the start of the text or after a sentence break is done by
/// [`QuestionSpans`].
static QUESTION_BODY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[A-Za-z,;'"\s\-]+\?"#).expect("question pattern is valid"));

/// Same shape the chat form accepts, accented letters included
static QUESTION_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[A-Za-z,;'"\séà-ç]+\?"#).expect("question shape pattern is valid"));

fn is_sentence_break(byte: u8) -> bool {
    matches!(byte, b'.' | b'?' | b'!' | b',')
}

/// Whether the raw text contains anything shaped like a question
pub fn looks_like_question(text: &str) -> bool {
    QUESTION_SHAPE.is_match(text)
}

/// Iterator over the question-like spans of a text, trimmed, left to right
/// and non-overlapping.
#[derive(Debug, Clone)]
pub struct QuestionSpans<'a> {
    text: &'a str,
    cursor: usize,
}

/// Scan `text` for question candidates
pub fn question_spans(text: &str) -> QuestionSpans<'_> {
    QuestionSpans { text, cursor: 0 }
}

impl<'a> Iterator for QuestionSpans<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let bytes = self.text.as_bytes();

        while self.cursor < bytes.len() {
            let start = self.cursor;

            // Every cursor position is either 0 or just past a sentence break,
            // so `start` is always a char boundary here.
            if let Some(m) = QUESTION_BODY.find(&self.text[start..]) {
                self.cursor = start + m.end();
                return Some(self.text[start..self.cursor].trim());
            }

            self.cursor = match bytes[start..].iter().position(|b| is_sentence_break(*b)) {
                Some(offset) => start + offset + 1,
                None => bytes.len(),
            };
        }

        None
    }
}

/// Picks the question most likely to be about a location
pub struct QuestionExtractor {
    stemmer: Stemmer,
    /// Stems of the detection keywords; `None` when the list is unavailable
    keyword_stems: Option<HashSet<String>>,
}

impl QuestionExtractor {
    /// Create an extractor from the detection keyword list.
    ///
    /// Keywords are lowercased and accent-folded like the normalized text
    /// they are scored against.
    pub fn new(keywords: Option<&[String]>) -> Self {
        let stemmer = Stemmer::create(Algorithm::French);
        let keyword_stems = keywords.map(|words| {
            words
                .iter()
                .map(|word| {
                    let folded = fold_accents(&lowercase(word));
                    stemmer.stem(&folded).into_owned()
                })
                .collect()
        });

        Self {
            stemmer,
            keyword_stems,
        }
    }

    pub fn has_keywords(&self) -> bool {
        self.keyword_stems.is_some()
    }

    /// Number of words in `sentence` whose stem is a keyword stem
    pub fn score(&self, sentence: &str) -> usize {
        let Some(keyword_stems) = &self.keyword_stems else {
            return 0;
        };

        sentence
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .filter(|word| {
                let folded = fold_accents(&lowercase(word));
                let stem = self.stemmer.stem(&folded);
                keyword_stems.contains(stem.as_ref())
            })
            .count()
    }

    /// Best candidate: the highest score wins, the earliest one on ties.
    ///
    /// Returns an empty string for an empty list or when no keyword list is
    /// loaded.
    pub fn pick_question<S: AsRef<str>>(&self, candidates: &[S]) -> String {
        if !self.has_keywords() {
            tracing::warn!("No detection keywords loaded, cannot pick a question");
            return String::new();
        }

        let mut best: Option<(&str, usize)> = None;
        for candidate in candidates {
            let candidate = candidate.as_ref();
            let score = self.score(candidate);
            tracing::trace!(candidate, score, "Scored question candidate");

            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((candidate, score)),
            }
        }

        best.map(|(sentence, _)| sentence.to_string())
            .unwrap_or_default()
    }

    /// Scan `text` and pick the best question in it
    pub fn extract(&self, text: &str) -> String {
        let candidates: Vec<&str> = question_spans(text).collect();
        tracing::debug!("Found {} question candidates", candidates.len());
        self.pick_question(&candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> QuestionExtractor {
        let keywords: Vec<String> = ["trouver", "situer", "acceder", "position", "aller"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        QuestionExtractor::new(Some(&keywords))
    }

    #[test]
    fn test_spans_from_start_and_after_breaks() {
        let spans: Vec<&str> =
            question_spans("bonjour. ou est la tour eiffel? et le louvre, tu connais?").collect();

        assert_eq!(spans, vec!["ou est la tour eiffel?", "et le louvre, tu connais?"]);
    }

    #[test]
    fn test_spans_skip_non_question_sentences() {
        let spans: Vec<&str> = question_spans("salut grandpy ! ou se trouve le musee ?").collect();
        assert_eq!(spans, vec!["ou se trouve le musee ?"]);
    }

    #[test]
    fn test_spans_require_anchor() {
        // Digits break the run and there is no sentence break before the rest
        let spans: Vec<&str> = question_spans("rue 42 de la paix ?").collect();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_spans_empty_text() {
        assert_eq!(question_spans("").count(), 0);
        assert_eq!(question_spans("pas de question ici").count(), 0);
    }

    #[test]
    fn test_spans_non_ascii_does_not_panic() {
        let spans: Vec<&str> = question_spans("€€ ! ou est le musee ? 日本").collect();
        assert_eq!(spans, vec!["ou est le musee ?"]);
    }

    #[test]
    fn test_pick_question_by_keyword_overlap() {
        let candidates = [
            "donne moi l'adresse de",
            "je me trouve et je veux acceder depuis ma position",
        ];

        assert_eq!(
            extractor().pick_question(&candidates),
            "je me trouve et je veux acceder depuis ma position"
        );
    }

    #[test]
    fn test_pick_question_ties_keep_first() {
        let candidates = ["ou se trouve la gare ?", "ou se trouve le port ?"];
        assert_eq!(extractor().pick_question(&candidates), "ou se trouve la gare ?");
    }

    #[test]
    fn test_pick_question_zero_overlap_keeps_first() {
        let candidates = ["quel temps fait il ?", "tu aimes le jazz ?"];
        assert_eq!(extractor().pick_question(&candidates), "quel temps fait il ?");
    }

    #[test]
    fn test_pick_question_best_score_tracks_improvements() {
        let candidates = [
            "ou se trouve la gare ?",
            "je me trouve, comment acceder a ma position ?",
            "tu peux te situer et trouver la gare ?",
        ];
        assert_eq!(
            extractor().pick_question(&candidates),
            "je me trouve, comment acceder a ma position ?"
        );
    }

    #[test]
    fn test_accented_keywords_match_folded_text() {
        let keywords = vec!["accéder".to_string(), "itinéraire".to_string()];
        let extractor = QuestionExtractor::new(Some(&keywords));

        assert_eq!(
            extractor.score("comment acceder au musee, quel itineraire ?"),
            2
        );
        assert_eq!(extractor.score("quel itinéraire ?"), 1);
    }

    #[test]
    fn test_pick_question_empty() {
        let candidates: [&str; 0] = [];
        assert_eq!(extractor().pick_question(&candidates), "");
    }

    #[test]
    fn test_pick_question_without_keywords() {
        let extractor = QuestionExtractor::new(None);
        assert!(!extractor.has_keywords());
        assert_eq!(extractor.pick_question(&["ou se trouve la gare ?"]), "");
    }

    #[test]
    fn test_score_counts_every_matching_word() {
        let extractor = extractor();
        assert_eq!(extractor.score("trouver, se trouver et se situer"), 3);
        assert_eq!(extractor.score("bonjour"), 0);
    }

    #[test]
    fn test_extract() {
        let text = "grandpy ! tu vas bien ? ou se situe le musee du louvre ?";
        assert_eq!(extractor().extract(text), "ou se situe le musee du louvre ?");
    }

    #[test]
    fn test_looks_like_question() {
        assert!(looks_like_question("Où est la tour Eiffel ?"));
        assert!(!looks_like_question("La tour Eiffel."));
        assert!(!looks_like_question("?"));
    }
}

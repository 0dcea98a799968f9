//! GrandPy Bot - From a chat message to a located story
//!
//! The pipeline runs strictly in sequence:
//! 1. Normalize the message and pick the question
//! 2. Resolve the place through the geocoding backend
//! 3. Find the nearest article and fetch its extract
//! 4. Turn the [`Outcome`] into a [`ResponsePayload`]
//!
//! No-match cases are not errors: they become the error payload. Only a
//! request that cannot be built makes [`GrandPy::handle_user_query`] fail.

pub mod messages;

use grandpy_core::{
    MessageStore, PlaceLookup, ResponsePayload, Resources, Result, WikiLookup,
};
use grandpy_parser::{get_section, Parser};
use rand::Rng;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

// ============================================================================
// Outcome
// ============================================================================

/// How far the pipeline got
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Place resolved and an article was found nearby
    Found {
        latitude: f64,
        longitude: f64,
        formatted_address: String,
        page_id: u64,
        extract: Option<String>,
        url: Option<String>,
    },

    /// Geocoding failed or returned no coordinates
    PlaceNotFound { status: String },

    /// Place resolved but no article around it
    ArticleNotFound { latitude: f64, longitude: f64 },
}

impl Outcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// Build the payload sent back to the user
    pub fn into_payload<R: Rng + ?Sized>(
        self,
        store: &MessageStore,
        rng: &mut R,
    ) -> ResponsePayload {
        match self {
            Self::Found {
                latitude,
                longitude,
                formatted_address,
                extract,
                url,
                ..
            } => {
                let story = extract.as_deref().map(get_section).unwrap_or_default();
                ResponsePayload::success(
                    latitude,
                    longitude,
                    url,
                    messages::address_message(store, &formatted_address, rng),
                    story,
                )
            }
            Self::PlaceNotFound { .. } | Self::ArticleNotFound { .. } => {
                ResponsePayload::error(messages::error_message(store, rng))
            }
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// The GrandPy pipeline
pub struct GrandPy {
    /// Message normalizer and question extractor
    parser: Parser,

    /// Geocoding backend
    place: Arc<dyn PlaceLookup>,

    /// Encyclopedia backend
    wiki: Arc<dyn WikiLookup>,

    /// Canned answers
    messages: Arc<MessageStore>,
}

impl GrandPy {
    /// Create a new pipeline
    pub fn new(
        parser: Parser,
        place: Arc<dyn PlaceLookup>,
        wiki: Arc<dyn WikiLookup>,
        messages: MessageStore,
    ) -> Self {
        Self {
            parser,
            place,
            wiki,
            messages: Arc::new(messages),
        }
    }

    /// Create from loaded resources
    pub fn from_resources(
        resources: Resources,
        place: Arc<dyn PlaceLookup>,
        wiki: Arc<dyn WikiLookup>,
    ) -> Self {
        let parser = Parser::from_resources(&resources);
        Self::new(parser, place, wiki, resources.messages)
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    /// Answer a raw user message
    pub async fn handle_user_query(&self, raw_text: &str) -> Result<ResponsePayload> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("query", %request_id);

        async move {
            let start_time = Instant::now();
            tracing::info!("Query started");

            let question = self.parser.parse_question(raw_text);
            tracing::debug!(question = %question, "Question extracted");

            let outcome = self.resolve(&question).await?;
            let payload = outcome.into_payload(&self.messages, &mut rand::thread_rng());

            tracing::info!(
                status = %payload.status,
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Query finished"
            );
            Ok(payload)
        }
        .instrument(span)
        .await
    }

    /// Run the lookups for an already extracted question
    pub async fn resolve(&self, question: &str) -> Result<Outcome> {
        let place = self.place.find_place(question).await?;
        tracing::debug!(backend = self.place.name(), status = %place.status, "Place looked up");

        let Some((latitude, longitude)) = place.coordinates() else {
            tracing::info!(status = %place.status, "Place not found");
            return Ok(Outcome::PlaceNotFound {
                status: place.status,
            });
        };

        let Some(page_id) = self.wiki.geosearch(latitude, longitude).await? else {
            tracing::info!(latitude, longitude, "No article nearby");
            return Ok(Outcome::ArticleNotFound {
                latitude,
                longitude,
            });
        };
        tracing::debug!(backend = self.wiki.name(), page_id, "Article found");

        let article = self.wiki.extract(page_id).await?;
        tracing::debug!(
            has_extract = article.extract.is_some(),
            has_url = article.url.is_some(),
            "Extract fetched"
        );

        Ok(Outcome::Found {
            latitude,
            longitude,
            formatted_address: place.formatted_address.unwrap_or_default(),
            page_id,
            extract: article.extract,
            url: article.url,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

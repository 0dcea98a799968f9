//! GrandPy Core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout GrandPy:
//! - Lookup results (place, article) and the response payload
//! - Common error types
//! - Collaborator traits for the geocoding and wiki backends
//! - Configuration management
//! - Static resource loading

pub mod config;
pub mod resources;

pub use config::{
    AppConfig, ConfigError, GoogleConfig, HttpConfig, LoggingConfig, ResourceConfig, ServerConfig,
    WikiConfig,
};
pub use resources::{MessageStore, Resources};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Status value the geocoding backend reports on success
pub const STATUS_OK: &str = "OK";

/// Status value reported for any failed resolution
pub const STATUS_NOT_OK: &str = "NOT OK";

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for GrandPy operations
#[derive(Error, Debug)]
pub enum GrandpyError {
    /// An outbound request could not even be built. Not recoverable.
    #[error("Request construction failed: {0}")]
    Request(String),

    #[error("Resource {path} unavailable: {message}")]
    Resource { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GrandpyError>;

// ============================================================================
// Lookup Results
// ============================================================================

/// Result of a place lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    /// Upstream status ("OK" on success)
    pub status: String,

    /// Latitude of the first match
    pub latitude: Option<f64>,

    /// Longitude of the first match
    pub longitude: Option<f64>,

    /// Human-readable address of the first match
    pub formatted_address: Option<String>,
}

impl PlaceResult {
    /// A successful match
    pub fn found(latitude: f64, longitude: f64, formatted_address: impl Into<String>) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            formatted_address: Some(formatted_address.into()),
        }
    }

    /// No usable data (upstream failure or empty answer)
    pub fn unavailable() -> Self {
        Self::with_status(STATUS_NOT_OK)
    }

    /// A result carrying only an upstream status such as `ZERO_RESULTS`
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            latitude: None,
            longitude: None,
            formatted_address: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Coordinates, when the lookup succeeded and returned both of them
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        if !self.is_ok() {
            return None;
        }
        Some((self.latitude?, self.longitude?))
    }
}

/// Result of a wiki article lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleResult {
    /// Page identifier; `None` means no related article
    pub page_id: Option<u64>,

    /// Plain-text body of the article
    pub extract: Option<String>,

    /// Canonical URL of the article
    pub url: Option<String>,
}

impl ArticleResult {
    pub fn not_found() -> Self {
        Self::default()
    }
}

// ============================================================================
// Response Payload
// ============================================================================

/// Final answer sent back to the user. Serializes to a flat object where
/// unused fields are `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub status: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub url: Option<String>,
    pub message_for_address: Option<String>,
    pub message_for_story: Option<String>,
    pub message_for_error: Option<String>,
}

impl ResponsePayload {
    /// Payload for a resolved place with a related article
    pub fn success(
        latitude: f64,
        longitude: f64,
        url: Option<String>,
        message_for_address: String,
        message_for_story: String,
    ) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            url,
            message_for_address: Some(message_for_address),
            message_for_story: Some(message_for_story),
            message_for_error: None,
        }
    }

    /// Payload for any failed resolution
    pub fn error(message_for_error: String) -> Self {
        Self {
            status: STATUS_NOT_OK.to_string(),
            latitude: None,
            longitude: None,
            url: None,
            message_for_address: None,
            message_for_story: None,
            message_for_error: Some(message_for_error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Geocoding backend.
///
/// Transient failures (timeouts, bad status codes, undecodable bodies) are
/// reported as [`PlaceResult::unavailable`]; only unrecoverable errors are
/// returned as `Err`.
#[async_trait::async_trait]
pub trait PlaceLookup: Send + Sync {
    /// Resolve a free-text place description
    async fn find_place(&self, query: &str) -> Result<PlaceResult>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Encyclopedia backend, same error contract as [`PlaceLookup`]
#[async_trait::async_trait]
pub trait WikiLookup: Send + Sync {
    /// Page id of the nearest article around the given coordinates
    async fn geosearch(&self, latitude: f64, longitude: f64) -> Result<Option<u64>>;

    /// Plain-text extract and canonical URL of a page
    async fn extract(&self, page_id: u64) -> Result<ArticleResult>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

// ============================================================================
// Tests
// ============================================================================

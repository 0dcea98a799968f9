//! GrandPy Clients - HTTP adapters for the external APIs
//!
//! Provides the Google Geocoding client ([`GoogleGeocoder`]) and the
//! MediaWiki client ([`MediaWikiClient`]) behind the core lookup traits.
//!
//! Upstream trouble (timeouts, redirect loops, refused connections, non-200
//! answers, unexpected bodies) is logged and reported as "no data"; only a
//! request that cannot be built is returned as an error.

pub mod google;
pub mod wiki;

pub use google::GoogleGeocoder;
pub use wiki::MediaWikiClient;

use grandpy_core::{GrandpyError, HttpConfig, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Build the HTTP client shared by both adapters
pub fn build_http_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| GrandpyError::Request(format!("Failed to build HTTP client: {e}")))
}

/// GET `url` with `params` and decode a JSON body.
///
/// `Ok(None)` means the upstream gave nothing usable.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    params: &[(&str, String)],
    api: &str,
) -> Result<Option<T>> {
    let response = match client.get(url).query(params).send().await {
        Ok(response) => response,
        Err(e) if e.is_builder() => {
            tracing::error!(api, "Bad request: {e}");
            return Err(GrandpyError::Request(format!("{api}: {e}")));
        }
        Err(e) if e.is_timeout() => {
            tracing::error!(api, "Timeout error: {e}");
            return Ok(None);
        }
        Err(e) if e.is_redirect() => {
            tracing::error!(api, "Bad url: {e}");
            return Ok(None);
        }
        Err(e) => {
            tracing::error!(api, "Request failed: {e}");
            return Ok(None);
        }
    };

    if response.status() != StatusCode::OK {
        tracing::warn!(api, status = %response.status(), "Unexpected status code");
        return Ok(None);
    }

    match response.json::<T>().await {
        Ok(body) => Ok(Some(body)),
        Err(e) => {
            tracing::error!(api, "Failed to parse response: {e}");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&HttpConfig::default()).is_ok());
    }
}

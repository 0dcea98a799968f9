//! Google Geocoding API client

use async_trait::async_trait;
use grandpy_core::{
    AppConfig, ConfigError, GoogleConfig, PlaceLookup, PlaceResult, Result, STATUS_NOT_OK,
};
use reqwest::Client;
use serde::Deserialize;

use crate::{build_http_client, get_json};

/// Geocoding client
pub struct GoogleGeocoder {
    client: Client,
    url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: Option<String>,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

impl GeocodeResponse {
    fn into_place(self) -> PlaceResult {
        let status = if self.status.is_empty() {
            STATUS_NOT_OK.to_string()
        } else {
            self.status
        };

        let Some(first) = self.results.into_iter().next() else {
            return PlaceResult::with_status(status);
        };

        let location = first.geometry.map(|g| g.location);
        PlaceResult {
            status,
            latitude: location.as_ref().map(|l| l.lat),
            longitude: location.as_ref().map(|l| l.lng),
            formatted_address: first.formatted_address,
        }
    }
}

impl GoogleGeocoder {
    /// Create a new geocoding client
    pub fn new(client: Client, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    /// Create from config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = build_http_client(&config.http)?;
        Self::with_client(client, &config.google)
    }

    /// Create from the Google section, reusing an existing HTTP client
    pub fn with_client(client: Client, config: &GoogleConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingRequired("GOOGLE_API_KEY".to_string()))?;

        Ok(Self::new(client, config.url.clone(), api_key.clone()))
    }
}

#[async_trait]
impl PlaceLookup for GoogleGeocoder {
    async fn find_place(&self, query: &str) -> Result<PlaceResult> {
        let params = [("address", query.to_string()), ("key", self.api_key.clone())];

        let place = get_json::<GeocodeResponse>(&self.client, &self.url, &params, self.name())
            .await?
            .map(GeocodeResponse::into_place)
            .unwrap_or_else(PlaceResult::unavailable);

        tracing::debug!(status = %place.status, "Geocoding finished");
        Ok(place)
    }

    fn name(&self) -> &str {
        "google-geocoding"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grandpy_core::GrandpyError;

    #[test]
    fn test_into_place_first_result() {
        let response: GeocodeResponse = serde_json::from_str(
            r#"{
                "results": [
                    {
                        "address_components": [{"long_name": "Paris"}],
                        "formatted_address": "7 Cité Paradis, 75010 Paris, France",
                        "geometry": {"location": {"lat": 48.8748465, "lng": 2.3504873}}
                    },
                    {
                        "formatted_address": "Somewhere else",
                        "geometry": {"location": {"lat": 0.0, "lng": 0.0}}
                    }
                ],
                "status": "OK"
            }"#,
        )
        .unwrap();

        let place = response.into_place();
        assert!(place.is_ok());
        assert_eq!(place.latitude, Some(48.8748465));
        assert_eq!(place.longitude, Some(2.3504873));
        assert_eq!(
            place.formatted_address.as_deref(),
            Some("7 Cité Paradis, 75010 Paris, France")
        );
    }

    #[test]
    fn test_into_place_zero_results() {
        let response: GeocodeResponse =
            serde_json::from_str(r#"{"results": [], "status": "ZERO_RESULTS"}"#).unwrap();

        let place = response.into_place();
        assert_eq!(place.status, "ZERO_RESULTS");
        assert_eq!(place.coordinates(), None);
    }

    #[test]
    fn test_into_place_missing_status() {
        let response: GeocodeResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert_eq!(response.into_place().status, STATUS_NOT_OK);
    }

    #[test]
    fn test_from_config_requires_key() {
        let result = GoogleGeocoder::from_config(&AppConfig::default());
        assert!(matches!(result, Err(GrandpyError::Config(_))));
    }
}

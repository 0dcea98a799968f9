//! MediaWiki API client (geosearch and plain-text extracts)

use async_trait::async_trait;
use grandpy_core::{AppConfig, ArticleResult, Result, WikiConfig, WikiLookup};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::{build_http_client, get_json};

/// MediaWiki client
pub struct MediaWikiClient {
    client: Client,
    url: String,
    search_radius_m: u32,
    search_limit: u32,
}

#[derive(Debug, Deserialize)]
struct GeoSearchResponse {
    query: Option<GeoSearchQuery>,
}

#[derive(Debug, Deserialize)]
struct GeoSearchQuery {
    #[serde(default)]
    geosearch: Vec<GeoSearchHit>,
}

#[derive(Debug, Deserialize)]
struct GeoSearchHit {
    pageid: u64,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: HashMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    extract: Option<String>,
    fullurl: Option<String>,
}

impl MediaWikiClient {
    /// Create a new MediaWiki client
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        let defaults = WikiConfig::default();
        Self {
            client,
            url: url.into(),
            search_radius_m: defaults.search_radius_m,
            search_limit: defaults.search_limit,
        }
    }

    /// Create from config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = build_http_client(&config.http)?;
        Ok(Self::with_client(client, &config.wiki))
    }

    /// Create from the wiki section, reusing an existing HTTP client
    pub fn with_client(client: Client, config: &WikiConfig) -> Self {
        Self::new(client, config.url.clone())
            .with_search_radius(config.search_radius_m, config.search_limit)
    }

    /// Set geosearch radius (meters) and hit limit
    pub fn with_search_radius(mut self, radius_m: u32, limit: u32) -> Self {
        self.search_radius_m = radius_m;
        self.search_limit = limit;
        self
    }
}

#[async_trait]
impl WikiLookup for MediaWikiClient {
    async fn geosearch(&self, latitude: f64, longitude: f64) -> Result<Option<u64>> {
        let params = [
            ("action", "query".to_string()),
            ("format", "json".to_string()),
            ("list", "geosearch".to_string()),
            ("gscoord", format!("{latitude}|{longitude}")),
            ("gsradius", self.search_radius_m.to_string()),
            ("gslimit", self.search_limit.to_string()),
        ];

        let page_id = get_json::<GeoSearchResponse>(&self.client, &self.url, &params, self.name())
            .await?
            .and_then(|response| response.query)
            .and_then(|query| query.geosearch.into_iter().next())
            .map(|hit| hit.pageid);

        if page_id.is_none() {
            tracing::info!(latitude, longitude, "No article near coordinates");
        }
        Ok(page_id)
    }

    async fn extract(&self, page_id: u64) -> Result<ArticleResult> {
        let params = [
            ("action", "query".to_string()),
            ("format", "json".to_string()),
            ("prop", "extracts|info".to_string()),
            ("inprop", "url".to_string()),
            ("pageids", page_id.to_string()),
            ("explaintext", "True".to_string()),
        ];

        let page = get_json::<ExtractResponse>(&self.client, &self.url, &params, self.name())
            .await?
            .and_then(|response| response.query)
            .and_then(|mut query| query.pages.remove(&page_id.to_string()));

        let Some(page) = page else {
            tracing::warn!(page_id, "Can't get extract");
            return Ok(ArticleResult {
                page_id: Some(page_id),
                ..Default::default()
            });
        };

        Ok(ArticleResult {
            page_id: Some(page_id),
            extract: page.extract,
            url: page.fullurl,
        })
    }

    fn name(&self) -> &str {
        "mediawiki"
    }
}

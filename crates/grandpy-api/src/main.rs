//! GrandPy API Server
//!
//! Configuration comes from `GRANDPY_CONFIG` (a TOML file) when set, with
//! environment variables taking precedence.

use grandpy_api::{create_router, init_tracing, state::AppState};
use grandpy_bot::GrandPy;
use grandpy_clients::{build_http_client, GoogleGeocoder, MediaWikiClient};
use grandpy_core::{AppConfig, Resources};
use std::sync::Arc;

fn load_config() -> anyhow::Result<AppConfig> {
    let config = match std::env::var("GRANDPY_CONFIG") {
        Ok(path) => AppConfig::from_file(path)?.with_env_override()?,
        Err(_) => AppConfig::from_env()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_tracing(&config.logging);
    config.validate()?;

    // Static resources are read once and shared by every request
    let resources = Resources::load(&config.resources);

    let http = build_http_client(&config.http)?;
    let place = Arc::new(GoogleGeocoder::with_client(http.clone(), &config.google)?);
    let wiki = Arc::new(MediaWikiClient::with_client(http, &config.wiki));
    let bot = GrandPy::from_resources(resources, place, wiki);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, bot));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("GrandPy API Server starting on http://{}", addr);
    tracing::info!("OpenAPI document at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

//! GrandPy API - HTTP server
//!
//! Exposes the question pipeline to the chat page (`POST /form`) and to JSON
//! clients (`POST /api/v1/query`), plus health, metrics and OpenAPI routes.

pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use grandpy_core::{LoggingConfig, ServerConfig};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

/// OpenAPI document
#[derive(OpenApi)]
#[openapi(
    info(title = "GrandPy API", description = "Ask GrandPy where a place is and hear its story"),
    paths(
        handlers::health::health_check,
        handlers::health::metrics,
        handlers::query::form_handler,
        handlers::query::query_handler,
    ),
    components(schemas(
        handlers::query::QueryRequest,
        handlers::query::QueryResponse,
        handlers::health::HealthResponse,
        handlers::health::MetricsResponse,
        error::ApiError,
    )),
    tags(
        (name = "query", description = "Questions to GrandPy"),
        (name = "health", description = "Liveness and counters")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server);

    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/form", post(handlers::form_handler))
        .route("/api/v1/query", post(handlers::query_handler))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// CORS layer from the server section; `None` when disabled.
///
/// An empty origin list or `*` allows any origin.
pub fn cors_layer(config: &ServerConfig) -> Option<CorsLayer> {
    if !config.cors_enabled {
        return None;
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if config.cors_origins.is_empty() || config.cors_origins.iter().any(|o| o == "*") {
        return Some(layer.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    Some(layer.allow_origin(AllowOrigin::list(origins)))
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the config.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=debug", config.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    if config.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_disabled() {
        let config = ServerConfig {
            cors_enabled: false,
            ..Default::default()
        };
        assert!(cors_layer(&config).is_none());
    }

    #[test]
    fn test_cors_with_origins() {
        let config = ServerConfig {
            cors_origins: vec!["http://localhost:3000".to_string(), "bad\norigin".to_string()],
            ..Default::default()
        };
        assert!(cors_layer(&config).is_some());
    }

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/form"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/query"));
        assert!(paths.iter().any(|p| p.as_str() == "/health"));
    }
}

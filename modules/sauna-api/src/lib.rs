pub mod admin;
pub mod rest;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::warn;

use sauna_store::SaunaStore;

pub struct AppState {
    pub store: Arc<dyn SaunaStore>,
    pub request_timeout: Duration,
    /// Public site root, used to build detail links.
    pub app_url: String,
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn build_router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // REST API
        .route("/api/saunas", get(rest::api_saunas))
        .route("/api/saunas/map", get(rest::api_sauna_map))
        .route("/api/saunas/{id}", get(rest::api_sauna_detail))
        .route("/api/saunas/slug/{slug}", get(rest::api_sauna_by_slug))
        .route("/api/submissions", post(rest::submit::api_submit))
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::core::storage::config::DEFAULT_URL_PREFIX;
use crate::handlers::{api, audio, emotions, generate};
use crate::state::AppState;
use std::sync::Arc;

/// Route serving stored audio for a given `AUDIO_URL_PREFIX`.
///
/// Absolute prefixes (`https://cdn.example.com/audio`) point at external
/// storage; the local copy stays reachable under the default prefix.
pub fn audio_route(url_prefix: &str) -> String {
    let prefix = url_prefix.trim().trim_matches('/');
    if prefix.contains("://") {
        format!("/{DEFAULT_URL_PREFIX}/{{file_name}}")
    } else if prefix.is_empty() {
        "/{file_name}".to_string()
    } else {
        format!("/{prefix}/{{file_name}}")
    }
}

/// Create the API router with audio served under the default prefix
pub fn create_api_router() -> Router<Arc<AppState>> {
    create_api_router_with_audio_prefix(DEFAULT_URL_PREFIX)
}

/// Create the API router, serving audio where `audio_path` values point
///
/// CORS, rate limiting and security headers are applied in main.rs.
pub fn create_api_router_with_audio_prefix(url_prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health_check))
        .route("/generate", post(generate::generate_handler))
        .route("/emotions", get(emotions::list_emotions))
        .route(&audio_route(url_prefix), get(audio::serve_audio))
        .layer(TraceLayer::new_for_http())
}

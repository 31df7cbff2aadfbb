//! Router configuration for the web server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Discovery
        .route("/api/v1/search-media", post(handlers::search_media))
        // Source catalogue
        .route("/api/v1/known-sources", get(handlers::list_known_sources))
        .route("/api/v1/new-sources", get(handlers::list_new_sources))
        .route("/api/v1/verify-source/:id", post(handlers::verify_source))
        .route("/api/v1/promote-source/:id", post(handlers::promote_source))
        .route("/api/v1/sync-sources", post(handlers::sync_sources))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

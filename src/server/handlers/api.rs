//! API endpoint handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::super::AppState;

/// Health check endpoint for container orchestration.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let known = state.repo.count_known().await;
    let pending = state.repo.count_new().await;
    let stages = state.discovery.status().await;

    match (known, pending) {
        (Ok(known), Ok(pending)) => Json(serde_json::json!({
            "status": "ok",
            "known_sources": known,
            "new_sources": pending,
            "analyzer": stages.analyzer,
            "browser": stages.browser,
        }))
        .into_response(),
        (Err(e), _) | (_, Err(e)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "error", "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// JSON error body with the given status.
pub(super) fn error_response(status: StatusCode, message: impl std::fmt::Display) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": message.to_string() })),
    )
        .into_response()
}

//! Discovery endpoint.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::super::AppState;
use super::api::error_response;

/// Upper bound on results per request.
const MAX_RESULTS_LIMIT: usize = 100;

/// Parameters for a media search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub max_results: Option<usize>,
    #[serde(default)]
    pub dry_run: bool,
}

/// Run discovery and store the results as new sources unless `dry_run` is set.
pub async fn search_media(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let query = params.query.trim();
    if query.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "query must not be empty");
    }
    let max_results = params.max_results.map(|n| n.min(MAX_RESULTS_LIMIT));

    match state.discovery.search(query, max_results, params.dry_run).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

//! Known/new source handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::super::AppState;
use super::api::error_response;
use crate::repository::{PromoteOutcome, SourceSink};

/// Filter for the new-source listing.
#[derive(Debug, Deserialize)]
pub struct NewSourceParams {
    pub verified: Option<bool>,
}

/// List known sources.
pub async fn list_known_sources(State(state): State<AppState>) -> impl IntoResponse {
    match state.repo.list_known().await {
        Ok(sources) => Json(sources).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// List new sources, optionally filtered by verification state.
pub async fn list_new_sources(
    State(state): State<AppState>,
    Query(params): Query<NewSourceParams>,
) -> impl IntoResponse {
    match state.repo.list_new().await {
        Ok(sources) => {
            let sources: Vec<_> = sources
                .into_iter()
                .filter(|s| {
                    params
                        .verified
                        .map_or(true, |v| s.verification.is_verified == v)
                })
                .collect();
            Json(sources).into_response()
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// Mark a new source as verified.
pub async fn verify_source(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    match state.repo.verify(id).await {
        Ok(Some(source)) => Json(source).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, format!("new source {} not found", id)),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// Promote a verified new source into known sources.
pub async fn promote_source(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.repo.promote(id).await {
        Ok(outcome @ PromoteOutcome::Promoted(_)) => Json(outcome).into_response(),
        Ok(PromoteOutcome::NotVerified) => error_response(
            StatusCode::CONFLICT,
            format!("new source {} is not verified", id),
        ),
        Ok(PromoteOutcome::Missing) => {
            error_response(StatusCode::NOT_FOUND, format!("new source {} not found", id))
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// Promote every verified new source.
pub async fn sync_sources(State(state): State<AppState>) -> impl IntoResponse {
    match state.repo.sync_verified().await {
        Ok(promoted) => Json(serde_json::json!({ "promoted": promoted })).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

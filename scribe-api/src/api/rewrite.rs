//! Rewrite suggestion endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use scribe_common::models::{RewriteRequest, RewriteSuggestion};
use tracing::info;

use super::dispatch_failure;
use crate::error::ApiResult;
use crate::services::normalizer::normalize_rewrite;
use crate::services::prompt_builder::{build_rewrite_prompt, REWRITE_KEYS};
use crate::validation::validate_rewrite;
use crate::AppState;

pub const REWRITE_FAILED: &str = "Failed to generate rewrite suggestions. Please try again.";

/// POST /api/rewrite
pub async fn rewrite_text(
    State(state): State<AppState>,
    body: Result<Json<RewriteRequest>, JsonRejection>,
) -> ApiResult<Json<RewriteSuggestion>> {
    let api_key = state.require_api_key()?;
    let Json(request) = body?;
    let valid = validate_rewrite(&request)?;

    info!(
        sense = %valid.target,
        score = valid.current_score,
        genre = valid.genre,
        "Generating rewrite suggestions"
    );

    let prompt = build_rewrite_prompt(valid.text, valid.genre, valid.target, valid.current_score);
    let value = state
        .gateway
        .request_json(&prompt, api_key, REWRITE_KEYS)
        .await
        .map_err(|e| dispatch_failure("rewrite", e, REWRITE_FAILED))?;
    let suggestion =
        normalize_rewrite(&value).map_err(|e| dispatch_failure("rewrite", e, REWRITE_FAILED))?;

    Ok(Json(suggestion))
}

pub fn rewrite_routes() -> Router<AppState> {
    Router::new().route("/api/rewrite", post(rewrite_text))
}

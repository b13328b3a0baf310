//! Sensory analysis endpoint
//!
//! POST /api/analyze: validate, prompt the model, normalize the scores and
//! persist the result. Persistence is best effort; a failed insert is
//! logged and the analysis is returned without an id.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use scribe_common::models::{AnalysisResult, AnalyzeRequest};
use tracing::{info, warn};

use super::dispatch_failure;
use crate::db::analyses::insert_analysis;
use crate::error::ApiResult;
use crate::services::normalizer::normalize_analysis;
use crate::services::prompt_builder::{build_analysis_prompt, ANALYSIS_KEYS};
use crate::validation::validate_analyze;
use crate::AppState;

pub const ANALYZE_FAILED: &str = "Failed to analyze text. Please try again.";

/// POST /api/analyze
pub async fn analyze_text(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalysisResult>> {
    let api_key = state.require_api_key()?;
    let Json(request) = body?;
    let valid = validate_analyze(&request)?;

    info!(
        chars = valid.text.chars().count(),
        genre = valid.genre,
        focus = valid.focus,
        "Analyzing text"
    );

    let prompt = build_analysis_prompt(valid.text, valid.genre, valid.focus);
    let value = state
        .gateway
        .request_json(&prompt, api_key, ANALYSIS_KEYS)
        .await
        .map_err(|e| dispatch_failure("analyze", e, ANALYZE_FAILED))?;
    let mut analysis =
        normalize_analysis(&value).map_err(|e| dispatch_failure("analyze", e, ANALYZE_FAILED))?;

    match insert_analysis(&state.db, valid.text, &analysis, Utc::now()).await {
        Ok(id) => analysis.id = Some(id),
        Err(e) => warn!("Failed to persist analysis: {:#}", e),
    }

    Ok(Json(analysis))
}

pub fn analyze_routes() -> Router<AppState> {
    Router::new().route("/api/analyze", post(analyze_text))
}

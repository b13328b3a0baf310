//! Persisted analysis lookup

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use scribe_common::models::AnalysisRecord;

use crate::db::analyses::get_analysis;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /api/analyses/:id
pub async fn get_analysis_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AnalysisRecord>> {
    get_analysis(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Analysis \"{}\" not found", id)))
}

pub fn analysis_routes() -> Router<AppState> {
    Router::new().route("/api/analyses/:id", get(get_analysis_record))
}

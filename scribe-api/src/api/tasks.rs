//! Local task runner
//!
//! POST /api/task/run with `{taskType, text}`. The only task is
//! `rewrite_suggester`, the keyword heuristic; it never calls upstream and
//! needs no credential.

use axum::{extract::rejection::JsonRejection, routing::post, Json, Router};
use scribe_common::models::{HeuristicReport, TaskRequest};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::services::heuristic::{suggest_rewrites, RandomSelector};
use crate::AppState;

pub const REWRITE_SUGGESTER: &str = "rewrite_suggester";

/// POST /api/task/run
pub async fn run_task(
    body: Result<Json<TaskRequest>, JsonRejection>,
) -> ApiResult<Json<HeuristicReport>> {
    let Json(request) = body?;

    if request.task_type.is_empty() || request.text.is_empty() {
        return Err(ApiError::BadRequest(
            "taskType and text are required".to_string(),
        ));
    }

    if request.task_type != REWRITE_SUGGESTER {
        return Err(ApiError::BadRequest("Unsupported task type".to_string()));
    }

    let report = suggest_rewrites(&request.text, &mut RandomSelector);
    info!(
        suggestions = report.suggestions.len(),
        weak = report.overall_analysis.weak_areas.len(),
        "Heuristic rewrite task complete"
    );

    Ok(Json(report))
}

pub fn task_routes() -> Router<AppState> {
    Router::new().route("/api/task/run", post(run_task))
}

//! HTTP API handlers for scribe-api

pub mod analyses;
pub mod analyze;
pub mod health;
pub mod research;
pub mod rewrite;
pub mod tasks;

pub use analyses::analysis_routes;
pub use analyze::analyze_routes;
pub use health::health_routes;
pub use research::research_routes;
pub use rewrite::rewrite_routes;
pub use tasks::task_routes;

pub use crate::error::{ApiError, ApiResult};

use crate::services::GatewayError;

/// Log a dispatch or normalization failure and surface `message` instead
pub(crate) fn dispatch_failure(operation: &str, err: GatewayError, message: &str) -> ApiError {
    tracing::error!(operation, error = %err, "Upstream request failed");
    ApiError::Failed(message.to_string())
}

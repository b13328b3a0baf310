//! scribe-api library - Sensory Scribe analysis service
//!
//! HTTP front end over an OpenAI-compatible completion endpoint: sensory
//! scoring, rewrite suggestions, a keyword heuristic that runs locally and a
//! static research dataset of genre examples and improvement tips.

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod services;
pub mod validation;

use error::{ApiError, ApiResult};
use services::{LlmGateway, ResearchData};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Analysis record store
    pub db: SqlitePool,
    /// Upstream completion gateway
    pub gateway: Arc<LlmGateway>,
    /// Upstream credential; None answers analyze/rewrite with "Missing API key"
    pub api_key: Option<Arc<str>>,
    /// Read-only research dataset
    pub research: Arc<ResearchData>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        gateway: LlmGateway,
        api_key: Option<String>,
        research: ResearchData,
    ) -> Self {
        Self {
            db,
            gateway: Arc::new(gateway),
            api_key: api_key.map(Arc::from),
            research: Arc::new(research),
            startup_time: Utc::now(),
        }
    }

    /// The configured credential, or a configuration error
    pub fn require_api_key(&self) -> ApiResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ApiError::Configuration("Missing API key".to_string()))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::analyze_routes())
        .merge(api::rewrite_routes())
        .merge(api::analysis_routes())
        .merge(api::research_routes())
        .merge(api::task_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
}

//! Research dataset endpoints
//!
//! Genre examples, per-sense improvement tips and the genre catalogue.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use scribe_common::models::{GenreExamplesResponse, GenreSummary, ImprovementTipsResponse};
use scribe_common::Sense;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::services::research_data::GenreLookup;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GenreExamplesQuery {
    pub genre: Option<String>,
    pub sense: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TipsQuery {
    pub sense: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// GET /api/genre-examples?genre=&sense=
pub async fn genre_examples(
    State(state): State<AppState>,
    query: Result<Query<GenreExamplesQuery>, QueryRejection>,
) -> ApiResult<Json<GenreExamplesResponse>> {
    let Query(query) = query?;
    let (Some(genre), Some(sense)) = (non_empty(query.genre), non_empty(query.sense)) else {
        return Err(ApiError::BadRequest(
            "Both genre and sense parameters are required".to_string(),
        ));
    };

    match state.research.genre_examples(&genre, &sense) {
        GenreLookup::Found(found) => Ok(Json(found)),
        GenreLookup::UnknownGenre => Err(ApiError::NotFound(format!(
            "Genre \"{}\" not found. Available genres: {}",
            genre,
            state.research.genre_names().join(", ")
        ))),
        GenreLookup::UnknownSense => Err(ApiError::NotFound(format!(
            "Sense \"{}\" not found for genre \"{}\". Available senses: {}",
            sense,
            genre,
            Sense::ALL.map(|s| s.title()).join(", ")
        ))),
    }
}

/// GET /api/improvement-tips?sense=
pub async fn improvement_tips(
    State(state): State<AppState>,
    query: Result<Query<TipsQuery>, QueryRejection>,
) -> ApiResult<Json<ImprovementTipsResponse>> {
    let Query(query) = query?;
    let Some(sense) = non_empty(query.sense) else {
        return Err(ApiError::BadRequest("Sense parameter is required".to_string()));
    };

    let sense = sense.parse::<Sense>().map_err(|_| {
        ApiError::BadRequest(format!(
            "Invalid sense. Must be one of: {}",
            Sense::valid_names()
        ))
    })?;

    state
        .research
        .improvement_tips(sense)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Sense data not found".to_string()))
}

/// GET /api/genres
pub async fn list_genres(State(state): State<AppState>) -> Json<Vec<GenreSummary>> {
    Json(state.research.genre_summaries())
}

pub fn research_routes() -> Router<AppState> {
    Router::new()
        .route("/api/genre-examples", get(genre_examples))
        .route("/api/improvement-tips", get(improvement_tips))
        .route("/api/genres", get(list_genres))
}

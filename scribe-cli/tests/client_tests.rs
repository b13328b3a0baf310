//! ScribeClient against a local stand-in service

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use scribe_cli::{ClientError, ScribeClient};
use scribe_common::models::{AnalyzeRequest, RewriteRequest};
use scribe_common::Sense;
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::net::TcpListener;

async fn spawn_service(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn stand_in() -> Router {
    Router::new()
        .route(
            "/api/analyze",
            post(|Json(body): Json<Value>| async move {
                if body["text"].as_str().map_or(0, |t| t.chars().count()) < 50 {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(json!({"error": "Text too short. Please provide at least 50 characters for analysis."})),
                    );
                }
                (
                    StatusCode::OK,
                    Json(json!({
                        "id": "abc",
                        "sensory_scores": {"sight": 7, "sound": 2, "touch": 5, "taste": 0, "smell": 9},
                        "highlight_phrases": {"smell": ["burnt sugar"]},
                        "analysis_chain_of_thought": {"taste": "Nothing tasted."}
                    })),
                )
            }),
        )
        .route(
            "/api/rewrite",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Missing API key"})),
                )
            }),
        )
        .route(
            "/api/analyses/:id",
            get(|Path(id): Path<String>| async move {
                if id != "abc" {
                    return (
                        StatusCode::NOT_FOUND,
                        Json(json!({"error": format!("Analysis \"{}\" not found", id)})),
                    );
                }
                (
                    StatusCode::OK,
                    Json(json!({
                        "id": "abc",
                        "sensory_scores": {"sight": 7, "sound": 2, "touch": 5, "taste": 0, "smell": 9},
                        "highlight_phrases": {},
                        "analysis_chain_of_thought": {},
                        "text": "The kitchen smelled of burnt sugar.",
                        "created_at": "2025-03-01T10:00:00Z"
                    })),
                )
            }),
        )
        .route(
            "/api/genre-examples",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                Json(json!({
                    "explanation": format!("{} in {}", q["sense"], q["genre"]),
                    "examples": ["one", "two"]
                }))
            }),
        )
}

#[tokio::test]
async fn test_analyze_round_trip() {
    let client = ScribeClient::new(&spawn_service(stand_in()).await).unwrap();

    let analysis = client
        .analyze(&AnalyzeRequest {
            text: "a".repeat(60),
            genre: "Horror".to_string(),
            sense: "All Senses".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(analysis.id.as_deref(), Some("abc"));
    assert_eq!(analysis.sensory_scores.smell, 9);
    assert_eq!(analysis.highlight_phrases.smell, vec!["burnt sugar".to_string()]);
    assert!(analysis.highlight_phrases.sight.is_empty());

    let weak: Vec<Sense> = analysis
        .sensory_scores
        .weak_senses()
        .into_iter()
        .map(|(sense, _)| sense)
        .collect();
    assert_eq!(weak, vec![Sense::Taste, Sense::Sound, Sense::Touch]);
}

#[tokio::test]
async fn test_service_error_message_surfaced() {
    let client = ScribeClient::new(&spawn_service(stand_in()).await).unwrap();

    let err = client
        .analyze(&AnalyzeRequest {
            text: "short".to_string(),
            genre: "Horror".to_string(),
            sense: "sight".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("Text too short"));

    let err = client
        .rewrite(&RewriteRequest {
            original_text: "a".repeat(60),
            genre: "Horror".to_string(),
            target_sense: "sight".to_string(),
            current_score: Some(2.0),
        })
        .await
        .unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Missing API key");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_query_parameters_encoded() {
    let client = ScribeClient::new(&spawn_service(stand_in()).await).unwrap();

    let examples = client.genre_examples("Science Fiction", "smell").await.unwrap();
    assert_eq!(examples.explanation, "smell in Science Fiction");
    assert_eq!(examples.examples.len(), 2);
}

#[tokio::test]
async fn test_unknown_route_is_api_error() {
    let client = ScribeClient::new(&spawn_service(stand_in()).await).unwrap();

    let err = client.genres().await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_stored_analysis_lookup() {
    let client = ScribeClient::new(&spawn_service(stand_in()).await).unwrap();

    let record = client.analysis("abc").await.unwrap();
    assert_eq!(record.analysis.id.as_deref(), Some("abc"));
    assert_eq!(record.analysis.sensory_scores.smell, 9);
    assert_eq!(record.text, "The kitchen smelled of burnt sugar.");
    assert_eq!(record.created_at.to_rfc3339(), "2025-03-01T10:00:00+00:00");

    let err = client.analysis("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("not found"));
}

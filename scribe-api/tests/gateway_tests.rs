//! HTTP completion backend against a local stand-in upstream
//!
//! Each test binds an axum server on an ephemeral port that plays the
//! chat completions endpoint.

use axum::{
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use scribe_api::services::{CompletionBackend, GatewayError, HttpCompletionBackend, LlmGateway};
use scribe_common::config::LlmConfig;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Spawn `router` on 127.0.0.1:0 and return the completions URL
async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/v1/chat/completions", addr)
}

fn config_for(endpoint: String) -> LlmConfig {
    LlmConfig {
        endpoint,
        model: "test-model".to_string(),
        max_tokens: 256,
        timeout_secs: 5,
        api_key: None,
    }
}

fn completion(content: &str) -> Value {
    json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
}

#[tokio::test]
async fn test_request_shape_and_content_extraction() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            if auth != "Bearer sk-test" {
                return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
            }

            // Echo the request details back through the model content
            let content = json!({
                "model": body["model"],
                "max_tokens": body["max_tokens"],
                "format": body["response_format"]["type"],
                "prompt": body["messages"][0]["content"],
                "role": body["messages"][0]["role"],
            })
            .to_string();
            (StatusCode::OK, Json(completion(&format!("```json\n{}\n```", content))))
        }),
    );
    let endpoint = spawn_upstream(router).await;

    let backend = HttpCompletionBackend::new(&config_for(endpoint)).unwrap();
    let gateway = LlmGateway::new(Arc::new(backend));
    let value = gateway
        .request_json("Describe the room.", "sk-test", &["model", "prompt"])
        .await
        .unwrap();

    assert_eq!(value["model"], "test-model");
    assert_eq!(value["max_tokens"], 256);
    assert_eq!(value["format"], "json_object");
    assert_eq!(value["role"], "user");
    assert_eq!(value["prompt"], "Describe the room.");
}

#[tokio::test]
async fn test_non_success_status_is_upstream_error() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::TOO_MANY_REQUESTS, "rate limited") }),
    );
    let endpoint = spawn_upstream(router).await;

    let backend = HttpCompletionBackend::new(&config_for(endpoint)).unwrap();
    let err = backend.complete("prompt", "sk-test").await.unwrap_err();
    assert!(matches!(err, GatewayError::Upstream(429)));
}

#[tokio::test]
async fn test_missing_content_is_malformed() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({"choices": []})) }),
    );
    let endpoint = spawn_upstream(router).await;

    let backend = HttpCompletionBackend::new(&config_for(endpoint)).unwrap();
    let err = backend.complete("prompt", "sk-test").await.unwrap_err();
    assert!(matches!(err, GatewayError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_prose_without_json_is_malformed() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(completion("Sorry, I cannot help with that.")) }),
    );
    let endpoint = spawn_upstream(router).await;

    let gateway = LlmGateway::from_config(&config_for(endpoint)).unwrap();
    let err = gateway
        .request_json("prompt", "sk-test", &["sensory_scores"])
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    // Bind then drop to get a port with nothing listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend =
        HttpCompletionBackend::new(&config_for(format!("http://{}/v1/chat/completions", addr)))
            .unwrap();
    let err = backend.complete("prompt", "sk-test").await.unwrap_err();
    assert!(matches!(err, GatewayError::Network(_)));
}

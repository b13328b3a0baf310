//! Gateway to the upstream completion endpoint
//!
//! One call in, one JSON object out. The gateway sends exactly one request
//! per invocation, never retries, and turns whatever text the model returns
//! into a `serde_json::Value` whose required top-level keys are known to be
//! present. Everything after that point is the normalizer's job.

use async_trait::async_trait;
use scribe_common::config::LlmConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("sensory-scribe/", env!("CARGO_PKG_VERSION"));

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request could not be sent or the connection failed
    #[error("Network error: {0}")]
    Network(String),

    /// Completion endpoint answered with a non-success status
    #[error("Upstream returned HTTP {0}")]
    Upstream(u16),

    /// No text payload, no JSON object, or unparseable JSON
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// JSON parsed but required fields are missing or ill-typed
    #[error("Schema validation failed: {0}")]
    SchemaValidation(String),
}

/// Text-in, text-out completion provider
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send `prompt` and return the model's textual payload
    async fn complete(&self, prompt: &str, api_key: &str) -> Result<String, GatewayError>;
}

// ============================================================================
// Gateway
// ============================================================================

/// Prompt → validated JSON object
#[derive(Clone)]
pub struct LlmGateway {
    backend: Arc<dyn CompletionBackend>,
}

impl LlmGateway {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Gateway over the HTTP chat completions backend
    pub fn from_config(config: &LlmConfig) -> Result<Self, GatewayError> {
        Ok(Self::new(Arc::new(HttpCompletionBackend::new(config)?)))
    }

    /// Run one completion and return its JSON object
    ///
    /// Fails with `SchemaValidation` if any of `required_keys` is absent or null.
    pub async fn request_json(
        &self,
        prompt: &str,
        api_key: &str,
        required_keys: &[&str],
    ) -> Result<Value, GatewayError> {
        let raw = self.backend.complete(prompt, api_key).await?;
        debug!(chars = raw.len(), "Completion payload received");

        let value = extract_json_object(&raw)?;
        validate_required_keys(&value, required_keys)?;
        Ok(value)
    }
}

/// Remove a markdown code fence wrapping the whole payload
///
/// Only a leading ```` ``` ```` (with optional language tag) and a trailing
/// ```` ``` ```` are removed; fences inside the payload are left alone.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        text = &rest[tag_len..];
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Slice from the first `{` to the last `}` (inclusive) and parse it
pub fn extract_json_object(raw: &str) -> Result<Value, GatewayError> {
    let cleaned = strip_code_fences(raw);

    let start = cleaned
        .find('{')
        .ok_or_else(|| GatewayError::MalformedResponse("no opening brace in model output".to_string()))?;
    let end = cleaned
        .rfind('}')
        .ok_or_else(|| GatewayError::MalformedResponse("no closing brace in model output".to_string()))?;
    if end < start {
        return Err(GatewayError::MalformedResponse(
            "closing brace precedes opening brace".to_string(),
        ));
    }

    serde_json::from_str(&cleaned[start..=end])
        .map_err(|e| GatewayError::MalformedResponse(format!("invalid JSON: {}", e)))
}

/// Check that `value` is an object holding every key in `required_keys`
pub fn validate_required_keys(value: &Value, required_keys: &[&str]) -> Result<(), GatewayError> {
    let object = value
        .as_object()
        .ok_or_else(|| GatewayError::SchemaValidation("response is not a JSON object".to_string()))?;

    let missing: Vec<&str> = required_keys
        .iter()
        .copied()
        .filter(|key| object.get(*key).map_or(true, Value::is_null))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(GatewayError::SchemaValidation(format!(
            "missing required keys: {}",
            missing.join(", ")
        )))
    }
}

// ============================================================================
// HTTP backend (OpenAI-compatible chat completions)
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// reqwest client for an OpenAI-compatible `/chat/completions` endpoint
pub struct HttpCompletionBackend {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
}

impl HttpCompletionBackend {
    pub fn new(config: &LlmConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl CompletionBackend for HttpCompletionBackend {
    async fn complete(&self, prompt: &str, api_key: &str) -> Result<String, GatewayError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "Sending completion request");

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                body = %error_text.chars().take(500).collect::<String>(),
                "Completion endpoint returned an error"
            );
            return Err(GatewayError::Upstream(status.as_u16()));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                GatewayError::MalformedResponse("completion has no text content".to_string())
            })?;

        info!(chars = content.len(), "Completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAYLOAD: &str = r#"{"sensory_scores": {"sight": 6}, "highlight_phrases": {}, "analysis_chain_of_thought": {}}"#;

    struct CannedBackend(Result<String, u16>);

    #[async_trait]
    impl CompletionBackend for CannedBackend {
        async fn complete(&self, _prompt: &str, _api_key: &str) -> Result<String, GatewayError> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(GatewayError::Upstream(*status)),
            }
        }
    }

    #[test]
    fn test_fenced_payload_parses_like_plain() {
        let fenced = format!("```json\n{}\n```", PAYLOAD);
        assert_eq!(
            extract_json_object(&fenced).unwrap(),
            extract_json_object(PAYLOAD).unwrap()
        );

        let bare_fence = format!("```\n{}\n```", PAYLOAD);
        assert_eq!(
            extract_json_object(&bare_fence).unwrap(),
            extract_json_object(PAYLOAD).unwrap()
        );
    }

    #[test]
    fn test_fences_inside_strings_are_preserved() {
        let raw = r#"{"explanation": "She typed ```Hello world``` on the screen"}"#;
        let value = extract_json_object(raw).unwrap();
        assert_eq!(value["explanation"], "She typed ```Hello world``` on the screen");

        let fenced = format!("```json\n{}\n```", raw);
        let value = extract_json_object(&fenced).unwrap();
        assert_eq!(value["explanation"], "She typed ```Hello world``` on the screen");
    }

    #[test]
    fn test_surrounding_prose_is_ignored() {
        let wrapped = format!("Here is the analysis:\n{}\nHope this helps!", PAYLOAD);
        let value = extract_json_object(&wrapped).unwrap();
        assert_eq!(value["sensory_scores"]["sight"], 6);
    }

    #[test]
    fn test_missing_braces_is_malformed() {
        assert!(matches!(
            extract_json_object("I could not analyze this text."),
            Err(GatewayError::MalformedResponse(_))
        ));
        assert!(matches!(
            extract_json_object("} backwards {"),
            Err(GatewayError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        assert!(matches!(
            extract_json_object("{\"sensory_scores\": {\"sight\": }"),
            Err(GatewayError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_missing_key_is_schema_error() {
        let value = json!({"highlight_phrases": {}, "analysis_chain_of_thought": {}});
        let err = validate_required_keys(
            &value,
            &["sensory_scores", "highlight_phrases", "analysis_chain_of_thought"],
        )
        .unwrap_err();

        match err {
            GatewayError::SchemaValidation(msg) => assert!(msg.contains("sensory_scores")),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_null_key_counts_as_missing() {
        let value = json!({"sense": null});
        assert!(matches!(
            validate_required_keys(&value, &["sense"]),
            Err(GatewayError::SchemaValidation(_))
        ));
    }

    #[tokio::test]
    async fn test_request_json_validates_keys() {
        let gateway = LlmGateway::new(Arc::new(CannedBackend(Ok(format!("```json\n{}\n```", PAYLOAD)))));
        let value = gateway
            .request_json("prompt", "key", &["sensory_scores", "highlight_phrases"])
            .await
            .unwrap();
        assert_eq!(value["sensory_scores"]["sight"], 6);

        let err = gateway
            .request_json("prompt", "key", &["sense"])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::SchemaValidation(_)));
    }

    #[tokio::test]
    async fn test_upstream_error_propagates() {
        let gateway = LlmGateway::new(Arc::new(CannedBackend(Err(503))));
        let err = gateway.request_json("prompt", "key", &[]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Upstream(503)));
    }
}

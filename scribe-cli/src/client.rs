//! Sensory Scribe service client

use reqwest::StatusCode;
use scribe_common::models::{
    AnalysisRecord, AnalysisResult, AnalyzeRequest, ErrorResponse, GenreExamplesResponse,
    GenreSummary, HeuristicReport, ImprovementTipsResponse, RewriteRequest, RewriteSuggestion,
    TaskRequest,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Default service URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5790";

const USER_AGENT: &str = concat!("scribe-cli/", env!("CARGO_PKG_VERSION"));

/// Upstream analysis can take a while; leave headroom over the service's own timeout
const REQUEST_TIMEOUT_SECS: u64 = 90;

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    /// Service answered with an error body
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ClientError {
    /// HTTP status for service-reported errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// HTTP client for one scribe-api instance
pub struct ScribeClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ScribeClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult, ClientError> {
        self.post("/api/analyze", request).await
    }

    pub async fn rewrite(&self, request: &RewriteRequest) -> Result<RewriteSuggestion, ClientError> {
        self.post("/api/rewrite", request).await
    }

    /// Run the keyword heuristic (`rewrite_suggester` task)
    pub async fn suggest(&self, text: &str) -> Result<HeuristicReport, ClientError> {
        let request = TaskRequest {
            task_type: "rewrite_suggester".to_string(),
            text: text.to_string(),
        };
        self.post("/api/task/run", &request).await
    }

    pub async fn genre_examples(
        &self,
        genre: &str,
        sense: &str,
    ) -> Result<GenreExamplesResponse, ClientError> {
        self.get("/api/genre-examples", &[("genre", genre), ("sense", sense)])
            .await
    }

    pub async fn improvement_tips(&self, sense: &str) -> Result<ImprovementTipsResponse, ClientError> {
        self.get("/api/improvement-tips", &[("sense", sense)]).await
    }

    pub async fn genres(&self) -> Result<Vec<GenreSummary>, ClientError> {
        self.get("/api/genres", &[]).await
    }

    pub async fn analysis(&self, id: &str) -> Result<AnalysisRecord, ClientError> {
        self.get(&format!("/api/analyses/{}", id), &[]).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "POST");

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Self::decode(response).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "GET");

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(status, &text),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

/// `{"error": ..}` message if present, else the status reason
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_body() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"error": "Text too long."}"#),
            "Text too long."
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>oops</html>"),
            "Bad Gateway"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ScribeClient::new("http://localhost:5790/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5790");
    }
}

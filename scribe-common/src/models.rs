//! Request and response types shared by the service and the client
//!
//! Field names follow the JSON contract of the HTTP API, so the analysis
//! types use snake_case keys while the rewrite and task types use camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::senses::{HighlightPhrases, Sense, SenseNotes, SenseScores};

/// Minimum accepted prose length, in characters
pub const MIN_TEXT_CHARS: usize = 50;

/// Maximum accepted prose length, in characters
pub const MAX_TEXT_CHARS: usize = 10_000;

// ============================================================================
// Analysis
// ============================================================================

/// POST /api/analyze request body
///
/// Missing fields deserialize as empty strings so the handler can report
/// them as a validation error instead of a JSON rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeRequest {
    pub text: String,
    pub genre: String,
    /// Focus sense, or "All Senses"
    pub sense: String,
}

/// Normalized sensory analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Record identifier, present once the analysis has been persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub sensory_scores: SenseScores,
    #[serde(default)]
    pub highlight_phrases: HighlightPhrases,
    #[serde(default)]
    pub analysis_chain_of_thought: SenseNotes,
}

/// Persisted analysis with the text it was computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Rewrite
// ============================================================================

/// POST /api/rewrite request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RewriteRequest {
    pub original_text: String,
    pub genre: String,
    pub target_sense: String,
    /// Current score of the target sense, 0 to 10
    pub current_score: Option<f64>,
}

/// Model-generated rewrite of selected sentences
///
/// `original_sentences` and `rewritten_sentences` are parallel lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteSuggestion {
    pub sense: Sense,
    pub original_sentences: Vec<String>,
    pub rewritten_sentences: Vec<String>,
    pub explanation: String,
    pub improvement: String,
}

// ============================================================================
// Heuristic task
// ============================================================================

/// POST /api/task/run request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskRequest {
    pub task_type: String,
    pub text: String,
}

/// One keyword-heuristic rewrite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeuristicSuggestion {
    pub original: String,
    pub rewritten: String,
    pub explanation: String,
    pub senses_improved: Vec<Sense>,
}

/// Weak/strong summary accompanying heuristic suggestions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallAnalysis {
    pub weak_areas: Vec<Sense>,
    pub strength_areas: Vec<Sense>,
    pub improvement_summary: String,
}

/// Result of the `rewrite_suggester` task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeuristicReport {
    pub suggestions: Vec<HeuristicSuggestion>,
    pub overall_analysis: OverallAnalysis,
}

// ============================================================================
// Research data
// ============================================================================

/// GET /api/genre-examples response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreExamplesResponse {
    pub explanation: String,
    pub examples: Vec<String>,
}

/// GET /api/improvement-tips response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementTipsResponse {
    pub strategies: Vec<String>,
    pub mistakes: Vec<String>,
}

/// Entry of GET /api/genres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreSummary {
    pub name: String,
    pub overview: String,
}

/// Error body returned by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_request_uses_camel_case() {
        let request: RewriteRequest = serde_json::from_str(
            r#"{"originalText": "abc", "genre": "Horror", "targetSense": "smell", "currentScore": 3}"#,
        )
        .unwrap();
        assert_eq!(request.original_text, "abc");
        assert_eq!(request.target_sense, "smell");
        assert_eq!(request.current_score, Some(3.0));
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let request: AnalyzeRequest = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert_eq!(request.text, "hello");
        assert!(request.genre.is_empty());
        assert!(request.sense.is_empty());

        let request: RewriteRequest = serde_json::from_str("{}").unwrap();
        assert!(request.current_score.is_none());
    }

    #[test]
    fn test_analysis_id_omitted_until_persisted() {
        let analysis = AnalysisResult::default();
        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("sensory_scores").is_some());
    }
}

//! Reshape validated model JSON into typed results
//!
//! Absent optional fields coerce to zero values (0, empty list, empty
//! string). Present but ill-typed fields, and scores that are not whole
//! numbers in [0, 10], are schema violations. Scores are never clamped.

use scribe_common::senses::{HighlightPhrases, SenseNotes, SenseScores, MAX_SCORE, MIN_SCORE};
use scribe_common::{Sense, SenseMap};
use scribe_common::models::{AnalysisResult, RewriteSuggestion};
use serde_json::{Map, Value};

use super::llm_gateway::GatewayError;

fn schema(msg: String) -> GatewayError {
    GatewayError::SchemaValidation(msg)
}

/// Normalize an analysis payload
pub fn normalize_analysis(value: &Value) -> Result<AnalysisResult, GatewayError> {
    let scores = section(value, "sensory_scores")?;
    let phrases = section(value, "highlight_phrases")?;
    let notes = section(value, "analysis_chain_of_thought")?;

    let sensory_scores: SenseScores = try_sense_map(|sense| score_of(scores, sense))?;
    let highlight_phrases: HighlightPhrases = try_sense_map(|sense| {
        string_list(phrases.get(sense.as_str()), &format!("highlight_phrases.{}", sense))
    })?;
    let analysis_chain_of_thought: SenseNotes = try_sense_map(|sense| {
        string_field(notes.get(sense.as_str()), &format!("analysis_chain_of_thought.{}", sense))
    })?;

    Ok(AnalysisResult {
        id: None,
        sensory_scores,
        highlight_phrases,
        analysis_chain_of_thought,
    })
}

/// Normalize a rewrite payload
///
/// The sentence lists must be the same length; the sense must name one of
/// the five senses.
pub fn normalize_rewrite(value: &Value) -> Result<RewriteSuggestion, GatewayError> {
    let sense = match value.get("sense") {
        Some(Value::String(name)) => name
            .parse::<Sense>()
            .map_err(|_| schema(format!("unknown sense {:?}", name)))?,
        _ => return Err(schema("sense must be a string".to_string())),
    };

    let original_sentences = string_list(value.get("originalSentences"), "originalSentences")?;
    let rewritten_sentences = string_list(value.get("rewrittenSentences"), "rewrittenSentences")?;
    if original_sentences.len() != rewritten_sentences.len() {
        return Err(schema(format!(
            "originalSentences has {} entries but rewrittenSentences has {}",
            original_sentences.len(),
            rewritten_sentences.len()
        )));
    }

    Ok(RewriteSuggestion {
        sense,
        original_sentences,
        rewritten_sentences,
        explanation: string_field(value.get("explanation"), "explanation")?,
        improvement: string_field(value.get("improvement"), "improvement")?,
    })
}

// ============================================================================
// Field helpers
// ============================================================================

fn section<'a>(value: &'a Value, key: &str) -> Result<&'a Map<String, Value>, GatewayError> {
    value
        .get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| schema(format!("{} must be an object", key)))
}

fn try_sense_map<T: Default>(
    mut f: impl FnMut(Sense) -> Result<T, GatewayError>,
) -> Result<SenseMap<T>, GatewayError> {
    let mut map = SenseMap::default();
    for sense in Sense::ALL {
        *map.get_mut(sense) = f(sense)?;
    }
    Ok(map)
}

fn score_of(scores: &Map<String, Value>, sense: Sense) -> Result<u8, GatewayError> {
    let raw = match scores.get(sense.as_str()) {
        None | Some(Value::Null) => return Ok(0),
        Some(Value::Number(n)) => n,
        Some(other) => {
            return Err(schema(format!(
                "sensory_scores.{} is not a number: {}",
                sense, other
            )))
        }
    };

    let score = raw
        .as_f64()
        .ok_or_else(|| schema(format!("sensory_scores.{} is not a number", sense)))?;

    if score.fract() != 0.0 {
        return Err(schema(format!(
            "sensory_scores.{} is not a whole number: {}",
            sense, score
        )));
    }
    if score < f64::from(MIN_SCORE) || score > f64::from(MAX_SCORE) {
        return Err(schema(format!(
            "sensory_scores.{} out of range {}-{}: {}",
            sense, MIN_SCORE, MAX_SCORE, score
        )));
    }

    Ok(score as u8)
}

fn string_list(value: Option<&Value>, field: &str) -> Result<Vec<String>, GatewayError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| schema(format!("{} contains a non-string entry", field)))
            })
            .collect(),
        Some(_) => Err(schema(format!("{} must be a list of strings", field))),
    }
}

fn string_field(value: Option<&Value>, field: &str) -> Result<String, GatewayError> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(schema(format!("{} must be a string", field))),
    }
}

//! Inbound request validation
//!
//! Runs before any upstream call. Each check fails with a 400 carrying a
//! field-specific message. Text length is measured in characters.

use scribe_common::models::{AnalyzeRequest, RewriteRequest, MAX_TEXT_CHARS, MIN_TEXT_CHARS};
use scribe_common::Sense;

use crate::error::{ApiError, ApiResult};

pub const MISSING_ANALYZE_FIELDS: &str = "Missing required fields: text, genre, sense";
pub const MISSING_REWRITE_FIELDS: &str =
    "Missing required fields: originalText, genre, targetSense, currentScore";
pub const TEXT_TOO_LONG: &str = "Text too long. Please limit to 10,000 characters.";
pub const INVALID_SCORE: &str = "Invalid current score. Must be between 0 and 10.";

/// Analyze request that passed validation
#[derive(Debug, Clone)]
pub struct ValidAnalyze<'a> {
    pub text: &'a str,
    pub genre: &'a str,
    /// Focus sense or "All Senses"; unknown values fall back to all senses
    pub focus: &'a str,
}

/// Rewrite request that passed validation
#[derive(Debug, Clone)]
pub struct ValidRewrite<'a> {
    pub text: &'a str,
    pub genre: &'a str,
    pub target: Sense,
    pub current_score: f64,
}

fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

fn check_length(text: &str, purpose: &str) -> ApiResult<()> {
    let chars = text.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(ApiError::BadRequest(TEXT_TOO_LONG.to_string()));
    }
    if chars < MIN_TEXT_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Text too short. Please provide at least {} characters for {}.",
            MIN_TEXT_CHARS, purpose
        )));
    }
    Ok(())
}

pub fn validate_analyze(request: &AnalyzeRequest) -> ApiResult<ValidAnalyze<'_>> {
    if !present(&request.text) || !present(&request.genre) || !present(&request.sense) {
        return Err(ApiError::BadRequest(MISSING_ANALYZE_FIELDS.to_string()));
    }
    check_length(&request.text, "analysis")?;

    Ok(ValidAnalyze {
        text: &request.text,
        genre: request.genre.trim(),
        focus: request.sense.trim(),
    })
}

pub fn validate_rewrite(request: &RewriteRequest) -> ApiResult<ValidRewrite<'_>> {
    let current_score = match request.current_score {
        Some(score)
            if present(&request.original_text)
                && present(&request.genre)
                && present(&request.target_sense) =>
        {
            score
        }
        _ => return Err(ApiError::BadRequest(MISSING_REWRITE_FIELDS.to_string())),
    };

    check_length(&request.original_text, "rewrite suggestions")?;

    let target = request.target_sense.parse::<Sense>().map_err(|_| {
        ApiError::BadRequest(format!(
            "Invalid target sense. Must be one of: {}",
            Sense::valid_names()
        ))
    })?;

    if !(0.0..=10.0).contains(&current_score) {
        return Err(ApiError::BadRequest(INVALID_SCORE.to_string()));
    }

    Ok(ValidRewrite {
        text: &request.original_text,
        genre: request.genre.trim(),
        target,
        current_score,
    })
}

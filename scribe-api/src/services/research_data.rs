//! Static research dataset: per-genre sensory examples and per-sense tips
//!
//! Loaded once at startup and shared read-only. A dataset is bundled into
//! the binary; `research_data_path` in the TOML config replaces it.

use anyhow::{Context, Result};
use scribe_common::models::{GenreExamplesResponse, GenreSummary, ImprovementTipsResponse};
use scribe_common::Sense;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Examples, strategies and mistakes returned per lookup
pub const MAX_ITEMS: usize = 3;

const BUNDLED_DATASET: &str = include_str!("../../data/sensory_writing_research.json");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchData {
    pub genres: Vec<GenreEntry>,
    pub senses: Vec<SenseTips>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreEntry {
    pub genre_name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub sensory_applications: Vec<SensoryApplication>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensoryApplication {
    pub sense_name: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenseTips {
    pub sense_name: String,
    #[serde(default)]
    pub improvement_strategies: Vec<String>,
    #[serde(default)]
    pub common_mistakes: Vec<String>,
}

/// Outcome of a genre/sense lookup
#[derive(Debug, PartialEq)]
pub enum GenreLookup {
    Found(GenreExamplesResponse),
    UnknownGenre,
    UnknownSense,
}

impl ResearchData {
    /// Parse a dataset from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid research dataset")
    }

    /// The dataset compiled into the binary
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_DATASET)
    }

    /// Load from `path` if given, else the bundled dataset
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let data = match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read research dataset {}", path.display()))?;
                let data = Self::from_json(&json)?;
                info!("Loaded research dataset from {}", path.display());
                data
            }
            None => Self::bundled()?,
        };

        info!(
            genres = data.genres.len(),
            senses = data.senses.len(),
            "Research dataset ready"
        );
        Ok(data)
    }

    /// Genre names in dataset order
    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.genre_name.as_str()).collect()
    }

    pub fn genre_summaries(&self) -> Vec<GenreSummary> {
        self.genres
            .iter()
            .map(|g| GenreSummary {
                name: g.genre_name.clone(),
                overview: g.overview.clone(),
            })
            .collect()
    }

    /// Case-insensitive genre lookup
    pub fn find_genre(&self, genre: &str) -> Option<&GenreEntry> {
        let genre = genre.trim();
        self.genres
            .iter()
            .find(|g| g.genre_name.eq_ignore_ascii_case(genre))
    }

    /// Explanation and up to [`MAX_ITEMS`] examples for a genre and sense
    pub fn genre_examples(&self, genre: &str, sense: &str) -> GenreLookup {
        let Some(entry) = self.find_genre(genre) else {
            return GenreLookup::UnknownGenre;
        };

        let sense = sense.trim();
        match entry
            .sensory_applications
            .iter()
            .find(|a| a.sense_name.eq_ignore_ascii_case(sense))
        {
            Some(application) => GenreLookup::Found(GenreExamplesResponse {
                explanation: application.explanation.clone(),
                examples: application.examples.iter().take(MAX_ITEMS).cloned().collect(),
            }),
            None => GenreLookup::UnknownSense,
        }
    }

    /// Up to [`MAX_ITEMS`] strategies and mistakes; None if the dataset lacks the sense
    pub fn improvement_tips(&self, sense: Sense) -> Option<ImprovementTipsResponse> {
        self.senses
            .iter()
            .find(|s| s.sense_name.eq_ignore_ascii_case(sense.as_str()))
            .map(|tips| ImprovementTipsResponse {
                strategies: tips
                    .improvement_strategies
                    .iter()
                    .take(MAX_ITEMS)
                    .cloned()
                    .collect(),
                mistakes: tips.common_mistakes.iter().take(MAX_ITEMS).cloned().collect(),
            })
    }
}

//! Persisted analysis records

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use scribe_common::models::{AnalysisRecord, AnalysisResult};
use scribe_common::SenseScores;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Store an analysis and the text it was computed from; returns the new id
pub async fn insert_analysis(
    pool: &SqlitePool,
    text: &str,
    analysis: &AnalysisResult,
    created_at: DateTime<Utc>,
) -> Result<String> {
    let id = Uuid::new_v4().to_string();
    let phrases = serde_json::to_string(&analysis.highlight_phrases)
        .context("Failed to serialize highlight phrases")?;
    let explanations = serde_json::to_string(&analysis.analysis_chain_of_thought)
        .context("Failed to serialize explanations")?;
    let scores = &analysis.sensory_scores;

    sqlx::query(
        r#"
        INSERT INTO analyses (
            id, text, sight_score, sound_score, touch_score, taste_score, smell_score,
            highlight_phrases, explanations, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(text)
    .bind(i64::from(scores.sight))
    .bind(i64::from(scores.sound))
    .bind(i64::from(scores.touch))
    .bind(i64::from(scores.taste))
    .bind(i64::from(scores.smell))
    .bind(&phrases)
    .bind(&explanations)
    .bind(created_at.to_rfc3339())
    .execute(pool)
    .await
    .context("Failed to insert analysis")?;

    Ok(id)
}

/// Load an analysis by id
pub async fn get_analysis(pool: &SqlitePool, id: &str) -> Result<Option<AnalysisRecord>> {
    let row = sqlx::query(
        r#"
        SELECT id, text, sight_score, sound_score, touch_score, taste_score, smell_score,
               highlight_phrases, explanations, created_at
        FROM analyses
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let score = |column: &str| -> Result<u8> {
        let value: i64 = row.get(column);
        u8::try_from(value).with_context(|| format!("{} out of range: {}", column, value))
    };

    let sensory_scores = SenseScores {
        sight: score("sight_score")?,
        sound: score("sound_score")?,
        touch: score("touch_score")?,
        taste: score("taste_score")?,
        smell: score("smell_score")?,
    };

    let phrases: String = row.get("highlight_phrases");
    let explanations: String = row.get("explanations");
    let created_at: String = row.get("created_at");

    Ok(Some(AnalysisRecord {
        analysis: AnalysisResult {
            id: Some(row.get("id")),
            sensory_scores,
            highlight_phrases: serde_json::from_str(&phrases)
                .context("Corrupt highlight_phrases column")?,
            analysis_chain_of_thought: serde_json::from_str(&explanations)
                .context("Corrupt explanations column")?,
        },
        text: row.get("text"),
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .context("Corrupt created_at column")?
            .with_timezone(&Utc),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_pool;

    #[tokio::test]
    async fn test_insert_then_get() {
        let pool = init_memory_pool().await.unwrap();

        let mut analysis = AnalysisResult::default();
        analysis.sensory_scores.sound = 9;
        analysis.highlight_phrases.sound = vec!["a bell tolled".to_string()];
        analysis.analysis_chain_of_thought.sound = "Vivid auditory cue.".to_string();

        let created_at = Utc::now();
        let id = insert_analysis(&pool, "A bell tolled twice.", &analysis, created_at)
            .await
            .unwrap();

        let record = get_analysis(&pool, &id).await.unwrap().unwrap();
        assert_eq!(record.analysis.id.as_deref(), Some(id.as_str()));
        assert_eq!(record.analysis.sensory_scores.sound, 9);
        assert_eq!(record.analysis.highlight_phrases, analysis.highlight_phrases);
        assert_eq!(record.text, "A bell tolled twice.");
        assert_eq!(record.created_at.timestamp(), created_at.timestamp());
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let pool = init_memory_pool().await.unwrap();
        assert!(get_analysis(&pool, "missing").await.unwrap().is_none());
    }
}

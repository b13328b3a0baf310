//! Integration tests for the draft list and usage quota
//!
//! Tests cover:
//! - Draft list cap (10 entries, newest first, oldest evicted)
//! - Save/load round trip by timestamp
//! - Delete and clear
//! - Usage quota ceiling and reset
//! - File-backed persistence across store instances

use chrono::{Duration, TimeZone, Utc};
use scribe_common::client_store::{MAX_DRAFTS, MAX_USAGE};
use scribe_common::models::AnalysisResult;
use scribe_common::{ClientStore, FileStorage, MemoryStorage, NewDraft};
use tempfile::TempDir;

fn new_draft(text: &str) -> NewDraft {
    NewDraft {
        text: text.to_string(),
        genre: "Horror".to_string(),
        sense: "smell".to_string(),
        analysis: None,
    }
}

fn sample_analysis() -> AnalysisResult {
    let mut analysis = AnalysisResult::default();
    analysis.id = Some("8b0f3a52-7a43-4a8e-9d55-0c1d2f3e4a5b".to_string());
    analysis.sensory_scores.sight = 7;
    analysis.sensory_scores.smell = 2;
    analysis.highlight_phrases.sight = vec!["the lantern guttered".to_string()];
    analysis.analysis_chain_of_thought.smell = "Almost no scent cues.".to_string();
    analysis
}

// =============================================================================
// Draft list
// =============================================================================

#[test]
fn test_eleven_saves_keep_ten_newest_first() {
    let store = ClientStore::new(MemoryStorage::new());
    let base = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();

    for i in 1..=11 {
        let saved = store.save_draft_at(new_draft(&format!("draft {}", i)), base + Duration::seconds(i));
        assert!(saved);
    }

    let drafts = store.list_drafts();
    assert_eq!(drafts.len(), MAX_DRAFTS);
    assert_eq!(drafts[0].text, "draft 11");
    assert_eq!(drafts[9].text, "draft 2");
    assert!(drafts.iter().all(|d| d.text != "draft 1"));
}

#[test]
fn test_latest_draft_is_most_recent_save() {
    let store = ClientStore::new(MemoryStorage::new());
    assert!(store.latest_draft().is_none());

    assert!(store.save_draft(new_draft("older")));
    assert!(store.save_draft(new_draft("newer")));

    assert_eq!(store.latest_draft().unwrap().text, "newer");
}

#[test]
fn test_round_trip_by_timestamp() {
    let store = ClientStore::new(MemoryStorage::new());

    let mut draft = new_draft("The cellar breathed out damp earth and old iron.");
    draft.analysis = Some(sample_analysis());
    assert!(store.save_draft(draft.clone()));

    let timestamp = store.latest_draft().unwrap().timestamp;
    let loaded = store.find_draft(&timestamp).unwrap();

    assert_eq!(loaded.text, draft.text);
    assert_eq!(loaded.genre, draft.genre);
    assert_eq!(loaded.sense, draft.sense);
    assert_eq!(loaded.analysis, draft.analysis);
}

#[test]
fn test_delete_draft_by_timestamp() {
    let store = ClientStore::new(MemoryStorage::new());
    assert!(store.save_draft(new_draft("keep")));
    assert!(store.save_draft(new_draft("remove")));

    let target = store.latest_draft().unwrap().timestamp;
    assert!(store.delete_draft(&target));

    let drafts = store.list_drafts();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].text, "keep");

    // Unknown timestamp is a successful no-op
    assert!(store.delete_draft("1999-01-01T00:00:00.000Z"));
    assert_eq!(store.list_drafts().len(), 1);
}

#[test]
fn test_delete_one_of_two_saves_in_same_millisecond() {
    let store = ClientStore::new(MemoryStorage::new());
    let at = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap() + Duration::microseconds(1_200);

    assert!(store.save_draft_at(new_draft("keep"), at));
    assert!(store.save_draft_at(new_draft("remove"), at + Duration::microseconds(300)));

    let target = store.latest_draft().unwrap();
    assert_eq!(target.text, "remove");
    assert!(store.delete_draft(&target.timestamp));

    let drafts = store.list_drafts();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].text, "keep");
    assert_eq!(store.find_draft(&drafts[0].timestamp).unwrap().text, "keep");
}

#[test]
fn test_clear_all_removes_drafts_only() {
    let store = ClientStore::new(MemoryStorage::new());
    assert!(store.save_draft(new_draft("a")));
    assert!(store.record_usage());

    assert!(store.clear_all());
    assert!(store.list_drafts().is_empty());
    assert_eq!(store.usage_count(), Some(1));
}

// =============================================================================
// Usage quota
// =============================================================================

#[test]
fn test_quota_exhausts_after_three_uses() {
    let store = ClientStore::new(MemoryStorage::new());
    assert_eq!(store.usage_remaining(), MAX_USAGE);
    assert!(store.can_proceed());

    for _ in 0..3 {
        assert!(store.record_usage());
    }

    assert!(!store.can_proceed());
    assert_eq!(store.usage_remaining(), 0);

    // A fourth use never drives the remaining count negative
    assert!(store.record_usage());
    assert_eq!(store.usage_count(), Some(4));
    assert_eq!(store.usage_remaining(), 0);
    assert!(!store.can_proceed());
}

#[test]
fn test_reset_usage_restores_quota() {
    let store = ClientStore::new(MemoryStorage::new());
    for _ in 0..3 {
        store.record_usage();
    }

    assert!(store.reset_usage());
    assert_eq!(store.usage_count(), Some(0));
    assert!(store.can_proceed());
}

// =============================================================================
// File-backed storage
// =============================================================================

#[test]
fn test_file_backed_state_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("client");

    {
        let store = ClientStore::new(FileStorage::new(&dir));
        assert!(store.save_draft(new_draft("persisted")));
        assert!(store.record_usage());
    }

    let reopened = ClientStore::new(FileStorage::new(&dir));
    assert_eq!(reopened.latest_draft().unwrap().text, "persisted");
    assert_eq!(reopened.usage_remaining(), MAX_USAGE - 1);
}

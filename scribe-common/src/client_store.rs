//! Draft list and usage quota kept on the client
//!
//! Both pieces of state live behind a [`StoragePort`] under fixed keys as
//! JSON. Every operation degrades to a failure result (false, empty list,
//! None, zero remaining) when the medium is unavailable or the stored value
//! is unreadable; nothing here returns an error to the caller.

use chrono::{DateTime, Duration, DurationRound, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::AnalysisResult;
use crate::storage::StoragePort;

/// Storage key for the drafts list
pub const DRAFTS_KEY: &str = "sensory-scribe-drafts";

/// Storage key for the usage counter
pub const USAGE_KEY: &str = "sensory-scribe-usage";

/// Maximum number of drafts retained, newest first
pub const MAX_DRAFTS: usize = 10;

/// Analyses allowed per session before the quota is exhausted
pub const MAX_USAGE: u32 = 3;

/// Saved snapshot of input text plus optional prior analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub text: String,
    pub genre: String,
    pub sense: String,
    /// RFC 3339 creation time (millisecond precision, UTC); unique within the list
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
}

/// Draft contents before the store stamps a timestamp on it
#[derive(Debug, Clone, PartialEq)]
pub struct NewDraft {
    pub text: String,
    pub genre: String,
    pub sense: String,
    pub analysis: Option<AnalysisResult>,
}

/// Quota & draft store over an injected storage medium
pub struct ClientStore<S> {
    storage: S,
}

impl<S: StoragePort> ClientStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // ------------------------------------------------------------------------
    // Drafts
    // ------------------------------------------------------------------------

    /// All drafts, newest first
    pub fn list_drafts(&self) -> Vec<Draft> {
        if !self.storage.is_available() {
            return Vec::new();
        }

        match self.storage.get(DRAFTS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(drafts) => drafts,
                Err(e) => {
                    warn!("Error loading drafts: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Error loading drafts: {}", e);
                Vec::new()
            }
        }
    }

    /// Prepend a draft stamped with the current time
    pub fn save_draft(&self, draft: NewDraft) -> bool {
        self.save_draft_at(draft, Utc::now())
    }

    /// Prepend a draft stamped with `at`, keeping the [`MAX_DRAFTS`] most recent
    ///
    /// If `at` is not later than the newest stored timestamp, the stamp is
    /// moved one millisecond past it so timestamps stay unique and ordered.
    pub fn save_draft_at(&self, draft: NewDraft, at: DateTime<Utc>) -> bool {
        if !self.storage.is_available() {
            return false;
        }

        let mut drafts = self.list_drafts();

        // Stored stamps carry millisecond precision; compare at the same grain
        let mut stamp = at.duration_trunc(Duration::milliseconds(1)).unwrap_or(at);
        if let Some(newest) = drafts
            .first()
            .and_then(|d| DateTime::parse_from_rfc3339(&d.timestamp).ok())
        {
            let newest = newest.with_timezone(&Utc);
            if stamp <= newest {
                stamp = newest + Duration::milliseconds(1);
            }
        }

        drafts.insert(
            0,
            Draft {
                text: draft.text,
                genre: draft.genre,
                sense: draft.sense,
                timestamp: stamp.to_rfc3339_opts(SecondsFormat::Millis, true),
                analysis: draft.analysis,
            },
        );
        drafts.truncate(MAX_DRAFTS);

        self.write_drafts(&drafts)
    }

    /// Most recently saved draft
    pub fn latest_draft(&self) -> Option<Draft> {
        self.list_drafts().into_iter().next()
    }

    /// Draft with exactly this timestamp
    pub fn find_draft(&self, timestamp: &str) -> Option<Draft> {
        self.list_drafts()
            .into_iter()
            .find(|d| d.timestamp == timestamp)
    }

    /// Remove the draft with this timestamp; succeeds even if none matched
    pub fn delete_draft(&self, timestamp: &str) -> bool {
        if !self.storage.is_available() {
            return false;
        }

        let drafts: Vec<Draft> = self
            .list_drafts()
            .into_iter()
            .filter(|d| d.timestamp != timestamp)
            .collect();

        self.write_drafts(&drafts)
    }

    /// Remove every draft
    pub fn clear_all(&self) -> bool {
        if !self.storage.is_available() {
            return false;
        }

        match self.storage.remove(DRAFTS_KEY) {
            Ok(()) => true,
            Err(e) => {
                warn!("Error clearing drafts: {}", e);
                false
            }
        }
    }

    fn write_drafts(&self, drafts: &[Draft]) -> bool {
        let encoded = match serde_json::to_string(drafts) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Error encoding drafts: {}", e);
                return false;
            }
        };

        match self.storage.set(DRAFTS_KEY, &encoded) {
            Ok(()) => {
                debug!(count = drafts.len(), "Drafts written");
                true
            }
            Err(e) => {
                warn!("Error saving drafts: {}", e);
                false
            }
        }
    }

    // ------------------------------------------------------------------------
    // Usage quota
    // ------------------------------------------------------------------------

    /// Analyses recorded this session, or None if the medium is unavailable
    ///
    /// A missing or unreadable counter reads as zero.
    pub fn usage_count(&self) -> Option<u32> {
        if !self.storage.is_available() {
            return None;
        }

        match self.storage.get(USAGE_KEY) {
            Ok(Some(raw)) => Some(raw.trim().parse::<u32>().unwrap_or_else(|e| {
                warn!("Unreadable usage counter {:?}: {}", raw, e);
                0
            })),
            Ok(None) => Some(0),
            Err(e) => {
                warn!("Error loading usage counter: {}", e);
                None
            }
        }
    }

    /// `max(0, MAX_USAGE - usage_count)`; zero when the medium is unavailable
    pub fn usage_remaining(&self) -> u32 {
        self.usage_count()
            .map(|count| MAX_USAGE.saturating_sub(count))
            .unwrap_or(0)
    }

    pub fn can_proceed(&self) -> bool {
        self.usage_remaining() > 0
    }

    /// Increment the usage counter by exactly one
    pub fn record_usage(&self) -> bool {
        let Some(count) = self.usage_count() else {
            return false;
        };

        match self
            .storage
            .set(USAGE_KEY, &count.saturating_add(1).to_string())
        {
            Ok(()) => true,
            Err(e) => {
                warn!("Error recording usage: {}", e);
                false
            }
        }
    }

    /// Reset the usage counter to zero
    pub fn reset_usage(&self) -> bool {
        if !self.storage.is_available() {
            return false;
        }

        match self.storage.remove(USAGE_KEY) {
            Ok(()) => true,
            Err(e) => {
                warn!("Error resetting usage: {}", e);
                false
            }
        }
    }
}

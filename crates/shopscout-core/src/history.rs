//! Remote search-history model.
//!
//! The account backend assigns each term a coarse recency bucket; the engine
//! only reads these buckets, it never classifies terms itself.

use serde::{Deserialize, Serialize};

/// One recorded search term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Backend-assigned entry id, used for deletion.
    pub id: String,
    pub term: String,
}

/// Search history grouped into the backend's three recency buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistory {
    #[serde(default)]
    pub today: Vec<HistoryEntry>,
    #[serde(default)]
    pub past_week: Vec<HistoryEntry>,
    #[serde(default)]
    pub past_month: Vec<HistoryEntry>,
}

impl SearchHistory {
    /// All terms flattened across buckets, most recent bucket first.
    pub fn all_terms(&self) -> Vec<&str> {
        self.today
            .iter()
            .chain(self.past_week.iter())
            .chain(self.past_month.iter())
            .map(|entry| entry.term.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.today.is_empty() && self.past_week.is_empty() && self.past_month.is_empty()
    }
}

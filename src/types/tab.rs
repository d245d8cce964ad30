use serde::{Deserialize, Serialize};

/// Represents a browser tab with its current state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tab {
    pub id: String,
    pub url: String,
    pub title: String,
    pub status: LoadStatus,
    pub created_at: i64,
}

/// Loading state reported by tab update events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loading,
    Complete,
}

/// A tab update as observed by the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct TabUpdate {
    pub status: LoadStatus,
    pub url: Option<String>,
}

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Which of Trakt's watched lists to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchedKind {
    Movies,
    Shows,
}

impl WatchedKind {
    pub fn as_path(&self) -> &'static str {
        match self {
            WatchedKind::Movies => "movies",
            WatchedKind::Shows => "shows",
        }
    }
}

impl fmt::Display for WatchedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

/// Media objects as Trakt returned them, sent back verbatim for removal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryItems {
    pub movies: Vec<Value>,
    pub shows: Vec<Value>,
}

/// `deleted` / `added` block of Trakt's history responses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryCounts {
    #[serde(default)]
    pub movies: u64,
    #[serde(default)]
    pub episodes: u64,
}

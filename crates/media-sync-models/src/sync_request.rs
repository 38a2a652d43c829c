use crate::media_ids::IdentifierSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of Trakt's `POST /sync/history`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetSyncRequest {
    pub shows: Vec<TargetShow>,
    pub movies: Vec<TargetMovie>,
}

impl TargetSyncRequest {
    pub fn is_empty(&self) -> bool {
        self.shows.is_empty() && self.movies.is_empty()
    }
}

/// A watched show. Anime is submitted through the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetShow {
    pub watched_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasons: Option<Value>,
    pub ids: IdentifierSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetMovie {
    pub watched_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    pub ids: IdentifierSet,
}

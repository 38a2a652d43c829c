use crate::media_ids::IdentifierSet;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Full watched history as returned by Simkl's `/sync/all-items` endpoint.
///
/// Simkl leaves a category out (or sends `null`) when the user has nothing in
/// it, so every collection falls back to an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchedPayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub shows: Vec<ShowEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub movies: Vec<MovieEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub anime: Vec<ShowEntry>,
}

impl WatchedPayload {
    pub fn total_items(&self) -> usize {
        self.shows.len() + self.movies.len() + self.anime.len()
    }
}

/// A show or anime entry. Anime uses the same `show` descriptor as shows.
///
/// Entries that were never watched (plan-to-watch and the like) may come
/// without a descriptor, so it is optional here and checked when projecting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowEntry {
    #[serde(default)]
    pub last_watched_at: Option<String>,
    /// Season/episode watch markers, forwarded to Trakt untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasons: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<MediaDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieEntry {
    #[serde(default)]
    pub last_watched_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie: Option<MediaDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default)]
    pub ids: IdentifierSet,
}

/// Timestamp only if the entry was actually watched
pub(crate) fn watched_timestamp(last_watched_at: &Option<String>) -> Option<&str> {
    last_watched_at.as_deref().filter(|ts| !ts.is_empty())
}

impl ShowEntry {
    pub fn watched_at(&self) -> Option<&str> {
        watched_timestamp(&self.last_watched_at)
    }
}

impl MovieEntry {
    pub fn watched_at(&self) -> Option<&str> {
        watched_timestamp(&self.last_watched_at)
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

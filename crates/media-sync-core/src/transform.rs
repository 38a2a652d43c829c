//! Projection of Simkl's watched history into Trakt's `/sync/history` body.
//!
//! Each source category maps to one projection: shows and anime share the
//! show projection and both land in `shows`, movies land in `movies`.
//! Entries without a watch timestamp or a descriptor are dropped.

use media_sync_models::{
    MediaDescriptor, MovieEntry, ShowEntry, TargetMovie, TargetShow, TargetSyncRequest,
    WatchedPayload, MOVIE_ID_NAMESPACES, SHOW_ID_NAMESPACES,
};
use tracing::{debug, warn};

/// A borrowed source entry tagged with its category
#[derive(Debug, Clone, Copy)]
pub enum SourceItem<'a> {
    Show(&'a ShowEntry),
    Movie(&'a MovieEntry),
    Anime(&'a ShowEntry),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TargetItem {
    Show(TargetShow),
    Movie(TargetMovie),
}

impl<'a> SourceItem<'a> {
    pub fn watched_at(&self) -> Option<&'a str> {
        match *self {
            SourceItem::Show(entry) | SourceItem::Anime(entry) => entry.watched_at(),
            SourceItem::Movie(entry) => entry.watched_at(),
        }
    }

    pub fn descriptor(&self) -> Option<&'a MediaDescriptor> {
        match *self {
            SourceItem::Show(entry) | SourceItem::Anime(entry) => entry.show.as_ref(),
            SourceItem::Movie(entry) => entry.movie.as_ref(),
        }
    }

    /// `None` when the entry was never watched or has nothing to identify it by
    pub fn project(&self) -> Option<TargetItem> {
        let watched_at = self.watched_at()?;
        let descriptor = self.descriptor()?;
        let item = match *self {
            SourceItem::Show(entry) | SourceItem::Anime(entry) => {
                TargetItem::Show(project_show(entry, descriptor, watched_at))
            }
            SourceItem::Movie(_) => TargetItem::Movie(project_movie(descriptor, watched_at)),
        };
        Some(item)
    }
}

fn project_show(entry: &ShowEntry, show: &MediaDescriptor, watched_at: &str) -> TargetShow {
    TargetShow {
        watched_at: watched_at.to_string(),
        title: show.title.clone(),
        year: show.year,
        seasons: entry.seasons.clone(),
        ids: show.ids.project(&SHOW_ID_NAMESPACES),
    }
}

fn project_movie(movie: &MediaDescriptor, watched_at: &str) -> TargetMovie {
    TargetMovie {
        watched_at: watched_at.to_string(),
        title: movie.title.clone(),
        year: movie.year,
        ids: movie.ids.project(&MOVIE_ID_NAMESPACES),
    }
}

/// All entries in upload order: shows, movies, anime
pub fn source_items(payload: &WatchedPayload) -> impl Iterator<Item = SourceItem<'_>> {
    payload
        .shows
        .iter()
        .map(SourceItem::Show)
        .chain(payload.movies.iter().map(SourceItem::Movie))
        .chain(payload.anime.iter().map(SourceItem::Anime))
}

pub fn build_sync_request(payload: &WatchedPayload) -> TargetSyncRequest {
    let mut request = TargetSyncRequest::default();
    let mut skipped = 0usize;

    for item in source_items(payload) {
        match item.project() {
            Some(TargetItem::Show(show)) => request.shows.push(show),
            Some(TargetItem::Movie(movie)) => request.movies.push(movie),
            None => {
                if item.watched_at().is_some() {
                    warn!("Skipping a watched entry that has no show or movie descriptor");
                }
                skipped += 1;
            }
        }
    }

    debug!(
        shows = request.shows.len(),
        movies = request.movies.len(),
        skipped,
        "Built Trakt sync request"
    );
    request
}

#[cfg(test)]
mod tests;

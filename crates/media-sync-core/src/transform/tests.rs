use super::*;
use media_sync_models::{IdentifierSet, MediaDescriptor};
use serde_json::{json, Value};

fn ids(value: Value) -> IdentifierSet {
    serde_json::from_value(value).unwrap()
}

fn show_entry(last_watched_at: Option<&str>, title: &str, ids_json: Value) -> ShowEntry {
    ShowEntry {
        last_watched_at: last_watched_at.map(str::to_string),
        seasons: Some(json!([{"number": 1, "episodes": [{"number": 1}]}])),
        show: Some(MediaDescriptor {
            title: Some(title.to_string()),
            year: Some(2020),
            ids: ids(ids_json),
        }),
    }
}

fn movie_entry(last_watched_at: Option<&str>, title: &str, ids_json: Value) -> MovieEntry {
    MovieEntry {
        last_watched_at: last_watched_at.map(str::to_string),
        movie: Some(MediaDescriptor {
            title: Some(title.to_string()),
            year: Some(1999),
            ids: ids(ids_json),
        }),
    }
}

#[test]
fn test_unwatched_show_is_dropped() {
    let payload = WatchedPayload {
        shows: vec![show_entry(None, "Never Seen", json!({"imdb": "tt1"}))],
        movies: vec![],
        anime: vec![],
    };

    let request = build_sync_request(&payload);

    assert_eq!(serde_json::to_value(&request).unwrap(), json!({"shows": [], "movies": []}));
}

#[test]
fn test_empty_timestamp_is_dropped() {
    let payload = WatchedPayload {
        shows: vec![],
        movies: vec![movie_entry(Some(""), "Blank", json!({"imdb": "tt2"}))],
        anime: vec![],
    };

    assert!(build_sync_request(&payload).is_empty());
}

#[test]
fn test_anime_merges_into_shows() {
    let payload = WatchedPayload {
        shows: vec![],
        movies: vec![],
        anime: vec![ShowEntry {
            last_watched_at: Some("2023-01-01".to_string()),
            seasons: Some(json!({"S": 1})),
            show: Some(MediaDescriptor {
                title: Some("X".to_string()),
                year: Some(2020),
                ids: ids(json!({"mal": 1, "imdb": null, "tmdb": 5, "anidb": 9})),
            }),
        }],
    };

    let request = build_sync_request(&payload);

    assert!(request.movies.is_empty());
    assert_eq!(
        serde_json::to_value(&request.shows).unwrap(),
        json!([{
            "watched_at": "2023-01-01",
            "title": "X",
            "year": 2020,
            "seasons": {"S": 1},
            "ids": {"mal": 1, "imdb": null, "tmdb": 5, "anidb": 9}
        }])
    );
}

#[test]
fn test_order_is_shows_then_anime() {
    let payload = WatchedPayload {
        shows: vec![
            show_entry(Some("2023-01-01"), "Show A", json!({})),
            show_entry(None, "Show B", json!({})),
        ],
        movies: vec![movie_entry(Some("2023-01-02"), "Movie A", json!({}))],
        anime: vec![show_entry(Some("2023-01-03"), "Anime A", json!({}))],
    };

    let request = build_sync_request(&payload);
    let titles: Vec<_> = request.shows.iter().map(|s| s.title.as_deref().unwrap()).collect();

    assert_eq!(titles, vec!["Show A", "Anime A"]);
    assert_eq!(request.movies.len(), 1);
}

#[test]
fn test_show_ids_are_strict_subset() {
    let source_ids = json!({
        "simkl": 17465, "slug": "dark", "imdb": "tt5753856", "tmdb": "70523", "tvdb": "334824"
    });
    let payload = WatchedPayload {
        shows: vec![show_entry(Some("2023-01-01"), "Dark", source_ids.clone())],
        movies: vec![],
        anime: vec![],
    };

    let request = build_sync_request(&payload);
    let out = &request.shows[0].ids;

    assert!(!out.contains("slug"));
    assert!(!out.contains("simkl"));
    assert!(!out.contains("tvdb"));
    assert!(!out.contains("mal"));
    for ns in out.namespaces() {
        assert_eq!(out.get(ns), source_ids.get(ns));
    }
}

#[test]
fn test_movie_ids_keep_slug() {
    let source_ids = json!({
        "simkl": 1, "slug": "heat", "imdb": "tt0113277", "tmdb": 949, "mal": 3
    });
    let payload = WatchedPayload {
        shows: vec![],
        movies: vec![movie_entry(Some("2023-04-01T20:00:00Z"), "Heat", source_ids)],
        anime: vec![],
    };

    let request = build_sync_request(&payload);

    assert_eq!(
        serde_json::to_value(&request.movies[0].ids).unwrap(),
        json!({"slug": "heat", "imdb": "tt0113277", "tmdb": 949})
    );
}

#[test]
fn test_missing_optional_fields_are_omitted() {
    let payload = WatchedPayload {
        shows: vec![ShowEntry {
            last_watched_at: Some("2023-01-01".to_string()),
            seasons: None,
            show: Some(MediaDescriptor { title: None, year: None, ids: IdentifierSet::new() }),
        }],
        movies: vec![],
        anime: vec![],
    };

    let request = build_sync_request(&payload);

    assert_eq!(
        serde_json::to_value(&request.shows[0]).unwrap(),
        json!({"watched_at": "2023-01-01", "ids": {}})
    );
}

#[test]
fn test_null_title_and_year_are_omitted() {
    let payload: WatchedPayload = serde_json::from_value(json!({
        "movies": [{
            "last_watched_at": "2023-01-01",
            "movie": {"title": null, "year": null, "ids": {"imdb": "tt1"}}
        }]
    }))
    .unwrap();

    let request = build_sync_request(&payload);

    assert_eq!(
        serde_json::to_value(&request.movies[0]).unwrap(),
        json!({"watched_at": "2023-01-01", "ids": {"imdb": "tt1"}})
    );
}

#[test]
fn test_transform_is_deterministic() {
    let payload: WatchedPayload = serde_json::from_value(json!({
        "shows": [{"last_watched_at": "2023-01-01", "seasons": [], "show": {"title": "A", "year": 2001, "ids": {"tmdb": 1, "imdb": "tt1", "mal": null}}}],
        "movies": [{"last_watched_at": "2023-01-02", "movie": {"title": "B", "year": 2002, "ids": {"slug": "b", "tmdb": 2}}}],
        "anime": [{"last_watched_at": "2023-01-03", "show": {"title": "C", "ids": {"anidb": 3}}}]
    }))
    .unwrap();

    let first = serde_json::to_vec(&build_sync_request(&payload)).unwrap();
    let second = serde_json::to_vec(&build_sync_request(&payload)).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_entries_without_descriptor_are_dropped() {
    let payload: WatchedPayload = serde_json::from_value(json!({
        "shows": [{"last_watched_at": null, "status": "plantowatch"}],
        "movies": [
            {"last_watched_at": "2023-04-01T20:00:00Z", "movie": {"title": "Heat", "ids": {"imdb": "tt1"}}},
            {"last_watched_at": "2023-04-02T20:00:00Z"}
        ],
        "anime": []
    }))
    .unwrap();

    let request = build_sync_request(&payload);

    assert!(request.shows.is_empty());
    assert_eq!(request.movies.len(), 1);
    assert_eq!(request.movies[0].title.as_deref(), Some("Heat"));
}

#[test]
fn test_anime_projects_as_show() {
    let show = show_entry(Some("t"), "s", json!({}));
    let movie = movie_entry(Some("t"), "m", json!({}));

    assert!(matches!(SourceItem::Anime(&show).project(), Some(TargetItem::Show(_))));
    assert!(matches!(SourceItem::Movie(&movie).project(), Some(TargetItem::Movie(_))));
}

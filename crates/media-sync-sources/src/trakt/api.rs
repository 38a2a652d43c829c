use crate::error::{ensure_success, parse_json, SourceError};
use media_sync_models::{HistoryCounts, HistoryItems, TargetSyncRequest, WatchedKind};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

const SERVICE: &str = "Trakt";

#[derive(Debug, Deserialize)]
struct TraktWatchedItem {
    #[serde(default)]
    movie: Option<Value>,
    #[serde(default)]
    show: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RemoveHistoryResponse {
    deleted: HistoryCounts,
    #[serde(default)]
    not_found: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct AddHistoryResponse {
    added: HistoryCounts,
    #[serde(default)]
    not_found: Option<Value>,
}

/// Headers every authenticated Trakt call needs
fn authorized(request: RequestBuilder, access_token: &str, client_id: &str) -> RequestBuilder {
    request
        .header("Authorization", format!("Bearer {}", access_token))
        .header("trakt-api-version", "2")
        .header("trakt-api-key", client_id)
        .header("Content-Type", "application/json")
}

/// Count entries in Trakt's `not_found` block, for logging only
fn not_found_count(not_found: &Option<Value>) -> usize {
    not_found
        .as_ref()
        .and_then(Value::as_object)
        .map(|groups| {
            groups
                .values()
                .filter_map(Value::as_array)
                .map(Vec::len)
                .sum()
        })
        .unwrap_or(0)
}

/// Fetch the user's watched list (GET /sync/watched/{movies|shows}) and return
/// the bare `movie` / `show` objects
pub async fn get_watched(
    client: &Client,
    api_base: &str,
    access_token: &str,
    client_id: &str,
    kind: WatchedKind,
) -> Result<Vec<Value>, SourceError> {
    let url = format!("{}/sync/watched/{}", api_base, kind.as_path());

    let response = authorized(client.get(&url), access_token, client_id)
        .send()
        .await?;
    let response = ensure_success(SERVICE, response).await?;

    let response_text = response.text().await?;
    let items: Vec<TraktWatchedItem> = parse_json(SERVICE, &response_text)?;

    let media: Vec<Value> = items
        .into_iter()
        .filter_map(|item| match kind {
            WatchedKind::Movies => item.movie,
            WatchedKind::Shows => item.show,
        })
        .collect();

    debug!(kind = %kind, count = media.len(), "Fetched Trakt watched list");
    Ok(media)
}

/// Remove items from watch history (POST /sync/history/remove)
pub async fn remove_history(
    client: &Client,
    api_base: &str,
    access_token: &str,
    client_id: &str,
    items: &HistoryItems,
) -> Result<HistoryCounts, SourceError> {
    let response = authorized(
        client.post(format!("{}/sync/history/remove", api_base)),
        access_token,
        client_id,
    )
    .json(items)
    .send()
    .await?;
    let response = ensure_success(SERVICE, response).await?;

    let response_text = response.text().await?;
    let result: RemoveHistoryResponse = parse_json(SERVICE, &response_text)?;
    debug!(
        movies = result.deleted.movies,
        episodes = result.deleted.episodes,
        not_found = not_found_count(&result.not_found),
        "Removed Trakt watch history"
    );
    Ok(result.deleted)
}

/// Add watch history in a single request (POST /sync/history)
pub async fn add_history(
    client: &Client,
    api_base: &str,
    access_token: &str,
    client_id: &str,
    request: &TargetSyncRequest,
) -> Result<HistoryCounts, SourceError> {
    let response = authorized(
        client.post(format!("{}/sync/history", api_base)),
        access_token,
        client_id,
    )
    .json(request)
    .send()
    .await?;
    let response = ensure_success(SERVICE, response).await?;

    let response_text = response.text().await?;
    let result: AddHistoryResponse = parse_json(SERVICE, &response_text)?;
    debug!(
        movies = result.added.movies,
        episodes = result.added.episodes,
        not_found = not_found_count(&result.not_found),
        "Added Trakt watch history"
    );
    Ok(result.added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trakt::auth::create_trakt_client;
    use media_sync_models::{IdentifierSet, TargetMovie};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_watched_extracts_media_objects() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sync/watched/shows"))
            .and(header("trakt-api-version", "2"))
            .and(header("trakt-api-key", "trakt-id"))
            .and(header("Authorization", "Bearer access-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"plays": 3, "last_watched_at": "2023-01-01T00:00:00.000Z",
                 "show": {"title": "Dark", "year": 2017, "ids": {"trakt": 1, "imdb": "tt5753856"}},
                 "seasons": []},
                {"plays": 1, "show": {"title": "Lost", "year": 2004, "ids": {"trakt": 2}}}
            ])))
            .mount(&mock_server)
            .await;

        let client = create_trakt_client();
        let shows = get_watched(
            &client,
            &mock_server.uri(),
            "access-1",
            "trakt-id",
            WatchedKind::Shows,
        )
        .await
        .unwrap();

        assert_eq!(shows.len(), 2);
        assert_eq!(shows[0]["title"], "Dark");
        assert!(shows[0].get("plays").is_none());
    }

    #[tokio::test]
    async fn test_remove_history_sends_items() {
        let mock_server = MockServer::start().await;
        let items = HistoryItems {
            movies: vec![json!({"title": "Heat", "ids": {"trakt": 7}})],
            shows: vec![],
        };
        Mock::given(method("POST"))
            .and(path("/sync/history/remove"))
            .and(body_json(json!({
                "movies": [{"title": "Heat", "ids": {"trakt": 7}}],
                "shows": []
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "deleted": {"movies": 1, "episodes": 0},
                "not_found": {"movies": [], "shows": []}
            })))
            .mount(&mock_server)
            .await;

        let client = create_trakt_client();
        let deleted = remove_history(&client, &mock_server.uri(), "a", "c", &items)
            .await
            .unwrap();

        assert_eq!(deleted, HistoryCounts { movies: 1, episodes: 0 });
    }

    #[tokio::test]
    async fn test_remove_history_too_large() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sync/history/remove"))
            .respond_with(ResponseTemplate::new(413).set_body_string("Request Entity Too Large"))
            .mount(&mock_server)
            .await;

        let client = create_trakt_client();
        let err = remove_history(&client, &mock_server.uri(), "a", "c", &HistoryItems::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SourceError::Api { status: 413, .. }));
    }

    #[tokio::test]
    async fn test_add_history_posts_request() {
        let mock_server = MockServer::start().await;
        let request = TargetSyncRequest {
            shows: vec![],
            movies: vec![TargetMovie {
                watched_at: "2023-04-01T20:00:00Z".to_string(),
                title: Some("Heat".to_string()),
                year: Some(1995),
                ids: [("imdb", json!("tt0113277"))].into_iter().collect::<IdentifierSet>(),
            }],
        };
        Mock::given(method("POST"))
            .and(path("/sync/history"))
            .and(body_json(json!({
                "shows": [],
                "movies": [{
                    "watched_at": "2023-04-01T20:00:00Z",
                    "title": "Heat",
                    "year": 1995,
                    "ids": {"imdb": "tt0113277"}
                }]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "added": {"movies": 1, "episodes": 0},
                "not_found": {"movies": [], "shows": [], "seasons": [], "episodes": []}
            })))
            .mount(&mock_server)
            .await;

        let client = create_trakt_client();
        let added = add_history(&client, &mock_server.uri(), "a", "c", &request)
            .await
            .unwrap();

        assert_eq!(added.movies, 1);
    }

    #[tokio::test]
    async fn test_requests_carry_only_api_headers() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sync/watched/movies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&mock_server)
            .await;

        let client = create_trakt_client();
        get_watched(&client, &mock_server.uri(), "a", "c", WatchedKind::Movies)
            .await
            .unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        let headers = &requests[0].headers;
        assert_eq!(headers.get("user-agent").unwrap(), crate::USER_AGENT);
        assert_eq!(headers.get("trakt-api-key").unwrap(), "c");
        assert_eq!(headers.get("authorization").unwrap(), "Bearer a");
        assert!(!headers.contains_key("origin"));
        assert!(!headers.contains_key("referer"));
    }

    #[test]
    fn test_not_found_count() {
        let not_found = Some(json!({"movies": [{"ids": {}}], "shows": [{}, {}]}));
        assert_eq!(not_found_count(&not_found), 3);
        assert_eq!(not_found_count(&None), 0);
    }
}

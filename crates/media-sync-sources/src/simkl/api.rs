use crate::error::{ensure_success, parse_json, SourceError};
use media_sync_models::WatchedPayload;
use reqwest::Client;
use tracing::debug;

const SERVICE: &str = "Simkl";

/// Fetch the complete watched history (GET /sync/all-items/)
///
/// `extended=full` brings titles, years and all ids; `episode_watched_at=yes`
/// adds per-episode timestamps inside `seasons`.
pub async fn get_all_items(
    client: &Client,
    api_base: &str,
    access_token: &str,
    client_id: &str,
) -> Result<WatchedPayload, SourceError> {
    let url = format!("{}/sync/all-items/", api_base);

    let response = client
        .get(&url)
        .query(&[("extended", "full"), ("episode_watched_at", "yes")])
        .header("Authorization", format!("Bearer {}", access_token))
        .header("simkl-api-key", client_id)
        .header("Accept", "application/json")
        .header("Content-Type", "application/json")
        .send()
        .await?;
    let response = ensure_success(SERVICE, response).await?;

    let response_text = response.text().await?;
    // An account with no history gets an empty body or `null`
    if response_text.trim().is_empty() || response_text.trim() == "null" {
        debug!("Simkl returned no watched items");
        return Ok(WatchedPayload::default());
    }

    let payload: WatchedPayload = parse_json(SERVICE, &response_text)?;
    debug!(
        shows = payload.shows.len(),
        movies = payload.movies.len(),
        anime = payload.anime.len(),
        "Fetched Simkl watched items"
    );
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simkl::auth::create_simkl_client;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_all_items_sends_auth_and_parses() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sync/all-items/"))
            .and(query_param("extended", "full"))
            .and(query_param("episode_watched_at", "yes"))
            .and(header("Authorization", "Bearer token-123"))
            .and(header("simkl-api-key", "simkl-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "shows": [{
                    "last_watched_at": "2023-02-01T10:00:00Z",
                    "seasons": [{"number": 1, "episodes": [{"number": 1, "watched_at": "2023-02-01T10:00:00Z"}]}],
                    "show": {"title": "Dark", "year": 2017, "ids": {"simkl": 1, "imdb": "tt5753856", "tmdb": "70523"}}
                }],
                "movies": [{
                    "last_watched_at": null,
                    "movie": {"title": "Heat", "year": 1995, "ids": {"imdb": "tt0113277"}}
                }],
                "anime": null
            })))
            .mount(&mock_server)
            .await;

        let client = create_simkl_client();
        let payload = get_all_items(&client, &mock_server.uri(), "token-123", "simkl-id")
            .await
            .unwrap();

        assert_eq!(payload.shows.len(), 1);
        assert_eq!(payload.shows[0].show.as_ref().unwrap().title.as_deref(), Some("Dark"));
        assert_eq!(payload.movies.len(), 1);
        assert!(payload.movies[0].watched_at().is_none());
        assert!(payload.anime.is_empty());
    }

    #[tokio::test]
    async fn test_get_all_items_empty_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sync/all-items/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&mock_server)
            .await;

        let client = create_simkl_client();
        let payload = get_all_items(&client, &mock_server.uri(), "t", "c").await.unwrap();
        assert_eq!(payload.total_items(), 0);
    }

    #[tokio::test]
    async fn test_get_all_items_unauthorized() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sync/all-items/"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
            .mount(&mock_server)
            .await;

        let client = create_simkl_client();
        let err = get_all_items(&client, &mock_server.uri(), "t", "c").await.unwrap_err();
        assert!(matches!(err, SourceError::Api { service: "Simkl", status: 401, .. }));
    }
}

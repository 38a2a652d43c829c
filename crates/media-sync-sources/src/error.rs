use reqwest::Response;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    #[error("{service} API returned {status}: {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to parse {service} response")]
    Parse {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Authorization is still pending. Authorize the application in your browser first.")]
    AuthorizationPending,

    #[error("Authorization failed: {0}")]
    AuthorizationDenied(String),

    #[error("Device code expired. Please try again.")]
    AuthorizationExpired,

    #[error("Not authenticated with {0}")]
    NotAuthenticated(&'static str),
}

impl SourceError {
    pub fn api(service: &'static str, status: u16, body: impl Into<String>) -> Self {
        SourceError::Api {
            service,
            status,
            body: body.into(),
        }
    }
}

/// Turn a non-2xx response into `SourceError::Api`, keeping the body for the message
pub(crate) async fn ensure_success(
    service: &'static str,
    response: Response,
) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await.unwrap_or_default();
    Err(SourceError::api(service, status.as_u16(), error_text))
}

pub(crate) fn parse_json<T: DeserializeOwned>(
    service: &'static str,
    response_text: &str,
) -> Result<T, SourceError> {
    serde_json::from_str(response_text).map_err(|e| {
        tracing::error!(service, error = %e, raw = response_text, "Failed to parse response");
        SourceError::Parse { service, source: e }
    })
}

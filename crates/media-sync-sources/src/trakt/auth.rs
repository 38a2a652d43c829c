use crate::error::{ensure_success, parse_json, SourceError};
use chrono::{DateTime, Duration, Utc};
use media_sync_models::DeviceAuthorization;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration as StdDuration;
use tokio::time::sleep;
use tracing::debug;

const SERVICE: &str = "Trakt";

/// HTTP client shared by every Trakt call
pub fn create_trakt_client() -> Client {
    Client::builder()
        .user_agent(crate::USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    device_code: String,
    user_code: String,
    verification_url: String,
    expires_in: u64,
    interval: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug)]
pub struct TokenInfo {
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<TokenResponse> for TokenInfo {
    fn from(token: TokenResponse) -> Self {
        TokenInfo {
            access_token: token.access_token,
            expires_at: token
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(secs as i64)),
        }
    }
}

/// Meaning of a `/oauth/device/token` status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    Authorized,
    Pending,
    SlowDown,
    InvalidCode,
    AlreadyUsed,
    Expired,
    Denied,
    Unexpected,
}

pub fn classify_poll_status(status: u16) -> PollStatus {
    match status {
        200 => PollStatus::Authorized,
        400 => PollStatus::Pending,
        404 => PollStatus::InvalidCode,
        409 => PollStatus::AlreadyUsed,
        410 => PollStatus::Expired,
        418 => PollStatus::Denied,
        429 => PollStatus::SlowDown,
        _ => PollStatus::Unexpected,
    }
}

/// Start the device flow (POST /oauth/device/code)
pub async fn request_device_code(
    client: &Client,
    api_base: &str,
    client_id: &str,
) -> Result<DeviceAuthorization, SourceError> {
    let payload = serde_json::json!({ "client_id": client_id });

    let response = client
        .post(format!("{}/oauth/device/code", api_base))
        .json(&payload)
        .header("Accept", "application/json")
        .header("Content-Type", "application/json")
        .send()
        .await?;
    let response = ensure_success(SERVICE, response).await?;

    let response_text = response.text().await?;
    let code: DeviceCodeResponse = parse_json(SERVICE, &response_text)?;
    debug!(
        expires_in = code.expires_in,
        interval = code.interval,
        "Received Trakt device code"
    );

    Ok(DeviceAuthorization {
        user_code: code.user_code,
        verification_url: code.verification_url,
        device_code: Some(code.device_code),
        expires_in: code.expires_in,
        interval: code.interval,
    })
}

/// Poll POST /oauth/device/token until the operator authorizes the code.
///
/// Bounded both by the code's `expires_in` deadline and by
/// `expires_in / interval` attempts. A 429 widens the interval by a second.
pub async fn poll_device_token(
    client: &Client,
    api_base: &str,
    client_id: &str,
    client_secret: &str,
    authorization: &DeviceAuthorization,
) -> Result<TokenInfo, SourceError> {
    let device_code = authorization.device_code.as_deref().ok_or_else(|| {
        SourceError::AuthorizationDenied("Device authorization has no device_code".to_string())
    })?;

    let url = format!("{}/oauth/device/token", api_base);
    let payload = serde_json::json!({
        "code": device_code,
        "client_id": client_id,
        "client_secret": client_secret,
    });

    let mut poll_interval = authorization.interval;
    let expires_at = Utc::now() + Duration::seconds(authorization.expires_in as i64);
    let max_attempts = (authorization.expires_in / authorization.interval.max(1)).max(1);

    for attempt in 1..=max_attempts {
        sleep(StdDuration::from_secs(poll_interval)).await;

        if Utc::now() >= expires_at {
            break;
        }

        let response = client
            .post(&url)
            .json(&payload)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        match classify_poll_status(status) {
            PollStatus::Authorized => {
                let response_text = response.text().await?;
                let token: TokenResponse = parse_json(SERVICE, &response_text)?;
                return Ok(token.into());
            }
            PollStatus::Pending => {
                debug!(attempt, max_attempts, "Trakt authorization pending");
            }
            PollStatus::SlowDown => {
                poll_interval += 1;
                debug!(attempt, poll_interval, "Trakt asked to slow down polling");
            }
            PollStatus::InvalidCode => {
                return Err(SourceError::AuthorizationDenied("Invalid device code".to_string()));
            }
            PollStatus::AlreadyUsed => {
                return Err(SourceError::AuthorizationDenied(
                    "Device code was already used".to_string(),
                ));
            }
            PollStatus::Expired => return Err(SourceError::AuthorizationExpired),
            PollStatus::Denied => {
                return Err(SourceError::AuthorizationDenied(
                    "The user denied the authorization request".to_string(),
                ));
            }
            PollStatus::Unexpected => {
                let error_text = response.text().await.unwrap_or_default();
                return Err(SourceError::api(SERVICE, status, error_text));
            }
        }
    }

    Err(SourceError::AuthorizationExpired)
}

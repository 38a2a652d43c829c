use crate::error::{ensure_success, parse_json, SourceError};
use media_sync_models::DeviceAuthorization;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const SERVICE: &str = "Simkl";

/// HTTP client shared by every Simkl call
pub fn create_simkl_client() -> Client {
    Client::builder()
        .user_agent(crate::USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    user_code: String,
    verification_url: String,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    interval: Option<u64>,
}

// Responses: {"result": "KO", "message": "Authorization pending"} or {"result": "OK", "access_token": "..."}
#[derive(Debug, Deserialize)]
struct PinStatusResponse {
    result: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

/// Request a PIN for the operator to enter on Simkl (GET /oauth/pin?client_id=...)
pub async fn request_pin(
    client: &Client,
    api_base: &str,
    client_id: &str,
) -> Result<DeviceAuthorization, SourceError> {
    let url = format!("{}/oauth/pin", api_base);

    let response = client
        .get(&url)
        .query(&[("client_id", client_id)])
        .header("Accept", "application/json")
        .send()
        .await?;
    let response = ensure_success(SERVICE, response).await?;

    let response_text = response.text().await?;
    let pin: PinResponse = parse_json(SERVICE, &response_text)?;
    debug!(verification_url = %pin.verification_url, "Received Simkl PIN");

    // Simkl PINs are polled, not redeemed with a device code
    Ok(DeviceAuthorization {
        user_code: pin.user_code,
        verification_url: pin.verification_url,
        device_code: None,
        expires_in: pin.expires_in.unwrap_or(900),
        interval: pin.interval.unwrap_or(5),
    })
}

/// Redeem an authorized PIN for an access token (GET /oauth/pin/{USER_CODE}?client_id=...)
///
/// Called once, after the operator confirmed the browser step. A PIN that is
/// still pending at that point is an error, not a reason to keep waiting.
pub async fn exchange_pin(
    client: &Client,
    api_base: &str,
    client_id: &str,
    user_code: &str,
) -> Result<String, SourceError> {
    let url = format!("{}/oauth/pin/{}", api_base, urlencoding::encode(user_code));

    let response = client
        .get(&url)
        .query(&[("client_id", client_id)])
        .header("Accept", "application/json")
        .send()
        .await?;
    let response = ensure_success(SERVICE, response).await?;

    let response_text = response.text().await?;
    let status: PinStatusResponse = parse_json(SERVICE, &response_text)?;

    match status.result.as_str() {
        "OK" => status.access_token.filter(|t| !t.is_empty()).ok_or_else(|| {
            SourceError::AuthorizationDenied(
                "Authorization successful but no access_token in response".to_string(),
            )
        }),
        "KO" => match status.message.as_deref() {
            Some("Authorization pending") => Err(SourceError::AuthorizationPending),
            Some(msg) => Err(SourceError::AuthorizationDenied(msg.to_string())),
            None => Err(SourceError::AuthorizationDenied("Unknown error".to_string())),
        },
        other => Err(SourceError::AuthorizationDenied(format!(
            "Unexpected result in status response: {}",
            other
        ))),
    }
}

use serde::{Deserialize, Serialize};

/// Code/URL pair the operator needs to authorize a device in the browser.
///
/// Simkl's PIN endpoint and Trakt's device-code endpoint both produce one of
/// these; only Trakt sends a separate `device_code` for polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAuthorization {
    pub user_code: String,
    pub verification_url: String,
    #[serde(default)]
    pub device_code: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
    #[serde(default = "default_interval")]
    pub interval: u64,
}

fn default_expires_in() -> u64 {
    600
}

fn default_interval() -> u64 {
    5
}

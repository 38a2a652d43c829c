use crate::credentials::Credentials;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SIMKL_API: &str = "https://api.simkl.com";
pub const DEFAULT_TRAKT_API: &str = "https://api.trakt.tv";

/// Base URLs for both services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoints {
    pub simkl_api: String,
    pub trakt_api: String,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            simkl_api: DEFAULT_SIMKL_API.to_string(),
            trakt_api: DEFAULT_TRAKT_API.to_string(),
        }
    }
}

impl ServiceEndpoints {
    /// Trailing slashes are dropped so paths can be appended with `format!`
    pub fn new(simkl_api: impl Into<String>, trakt_api: impl Into<String>) -> Self {
        Self {
            simkl_api: simkl_api.into().trim_end_matches('/').to_string(),
            trakt_api: trakt_api.into().trim_end_matches('/').to_string(),
        }
    }
}

/// Everything the operator answered before the run starts
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub credentials: Credentials,
    pub remove_previous_history: bool,
    pub endpoints: ServiceEndpoints,
}

impl RunOptions {
    pub fn new(credentials: Credentials, remove_previous_history: bool) -> Self {
        Self {
            credentials,
            remove_previous_history,
            endpoints: ServiceEndpoints::default(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: ServiceEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

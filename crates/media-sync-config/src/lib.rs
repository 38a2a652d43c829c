pub mod config;
pub mod credentials;

pub use config::{RunOptions, ServiceEndpoints, DEFAULT_SIMKL_API, DEFAULT_TRAKT_API};
pub use credentials::{validate_required, Credentials, ValidationError};

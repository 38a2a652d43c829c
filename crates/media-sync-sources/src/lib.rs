pub mod traits;
pub mod trakt;
pub mod simkl;
pub mod error;

/// Sent with every Simkl and Trakt request
pub const USER_AGENT: &str = concat!("media-sync/", env!("CARGO_PKG_VERSION"));

pub use traits::{HistoryTarget, WatchedSource};
pub use error::SourceError;
pub use trakt::TraktClient;
pub use simkl::SimklClient;

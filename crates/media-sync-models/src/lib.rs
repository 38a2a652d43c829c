pub mod authorization;
pub mod history;
pub mod media_ids;
pub mod sync_request;
pub mod watch_history;

pub use authorization::DeviceAuthorization;
pub use history::{HistoryCounts, HistoryItems, WatchedKind};
pub use media_ids::{IdentifierSet, MOVIE_ID_NAMESPACES, SHOW_ID_NAMESPACES};
pub use sync_request::{TargetMovie, TargetShow, TargetSyncRequest};
pub use watch_history::{MediaDescriptor, MovieEntry, ShowEntry, WatchedPayload};

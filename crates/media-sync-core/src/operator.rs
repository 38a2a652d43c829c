use crate::sync::SyncStage;
use media_sync_models::{DeviceAuthorization, HistoryCounts};
use thiserror::Error;

/// Yes/no questions the orchestrator may put to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Asked after the source authorization code is shown
    SourceAuthorized,
    /// Asked when removing the previous target history failed
    ContinueAfterFailedRemoval,
}

impl Confirmation {
    pub fn default_answer(&self) -> bool {
        match self {
            Confirmation::SourceAuthorized => true,
            Confirmation::ContinueAfterFailedRemoval => true,
        }
    }
}

/// Progress notifications emitted while a sync runs
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    StageChanged(SyncStage),
    SourceAuthorization {
        service: String,
        authorization: DeviceAuthorization,
    },
    SourceFetched {
        shows: usize,
        movies: usize,
        anime: usize,
    },
    TargetAuthorization {
        service: String,
        authorization: DeviceAuthorization,
    },
    TargetAuthorized {
        service: String,
    },
    RemovingHistory {
        movies: usize,
        shows: usize,
    },
    HistoryRemoved(HistoryCounts),
    RemovalFailed {
        message: String,
    },
    Syncing {
        shows: usize,
        movies: usize,
    },
    HistoryAdded(HistoryCounts),
}

#[derive(Debug, Error)]
#[error("Failed to read operator input: {0}")]
pub struct PromptError(pub String);

/// The human at the terminal, as seen by the orchestrator.
///
/// `confirm` may block until the operator answers.
pub trait Operator: Send + Sync {
    fn confirm(&self, confirmation: Confirmation) -> Result<bool, PromptError>;
    fn notify(&self, event: SyncEvent);
}

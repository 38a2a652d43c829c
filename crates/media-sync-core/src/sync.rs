use crate::operator::{Confirmation, Operator, PromptError, SyncEvent};
use crate::transform::build_sync_request;
use media_sync_config::RunOptions;
use media_sync_models::{HistoryCounts, HistoryItems, WatchedKind};
use media_sync_sources::{HistoryTarget, SimklClient, SourceError, TraktClient, WatchedSource};
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Where a run currently is.
///
/// `Init → SourceAuthorizing → SourceFetched → TargetAuthorizing →
/// TargetAuthorized → [RemovingHistory →] Syncing → Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncStage {
    Init,
    SourceAuthorizing,
    SourceFetched,
    TargetAuthorizing,
    TargetAuthorized,
    RemovingHistory,
    Syncing,
    Done,
}

impl SyncStage {
    pub fn can_transition_to(self, next: SyncStage) -> bool {
        use SyncStage::*;
        matches!(
            (self, next),
            (Init, SourceAuthorizing)
                | (SourceAuthorizing, SourceFetched)
                | (SourceFetched, TargetAuthorizing)
                | (TargetAuthorizing, TargetAuthorized)
                | (TargetAuthorized, RemovingHistory)
                | (TargetAuthorized, Syncing)
                | (RemovingHistory, Syncing)
                | (Syncing, Done)
        )
    }
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStage::Init => "init",
            SyncStage::SourceAuthorizing => "source_authorizing",
            SyncStage::SourceFetched => "source_fetched",
            SyncStage::TargetAuthorizing => "target_authorizing",
            SyncStage::TargetAuthorized => "target_authorized",
            SyncStage::RemovingHistory => "removing_history",
            SyncStage::Syncing => "syncing",
            SyncStage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Source authorization failed")]
    SourceAuthorization(#[source] SourceError),

    #[error("Failed to fetch watch history")]
    SourceFetch(#[source] SourceError),

    #[error("Target authorization failed")]
    TargetAuthorization(#[source] SourceError),

    #[error("Failed to add watch history")]
    Sync(#[source] SourceError),

    #[error("Operator prompt failed")]
    Prompt {
        stage: SyncStage,
        #[source]
        source: PromptError,
    },

    #[error("Invalid sync stage transition: {from} -> {to}")]
    InvalidTransition { from: SyncStage, to: SyncStage },
}

/// One-line message for an error and every cause beneath it, joined by `: `
pub fn error_chain_message(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut cause = error.source();
    while let Some(inner) = cause {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        cause = inner.source();
    }
    message
}

impl SyncError {
    /// Stage the run was in when it failed
    pub fn stage(&self) -> SyncStage {
        match self {
            SyncError::SourceAuthorization(_) => SyncStage::SourceAuthorizing,
            SyncError::SourceFetch(_) => SyncStage::SourceAuthorizing,
            SyncError::TargetAuthorization(_) => SyncStage::TargetAuthorizing,
            SyncError::Sync(_) => SyncStage::Syncing,
            SyncError::Prompt { stage, .. } => *stage,
            SyncError::InvalidTransition { from, .. } => *from,
        }
    }

    /// True when nothing has touched the target yet
    pub fn is_source_side(&self) -> bool {
        matches!(
            self.stage(),
            SyncStage::Init | SyncStage::SourceAuthorizing | SyncStage::SourceFetched
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AbortReason {
    /// Operator did not confirm the source authorization
    SourceNotAuthorized,
    /// Removal failed and the operator chose not to continue
    RemovalDeclined,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub shows_submitted: usize,
    pub movies_submitted: usize,
    pub removed: Option<HistoryCounts>,
    pub removal_failed: bool,
    pub added: HistoryCounts,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub enum SyncOutcome {
    Completed(SyncReport),
    Aborted { stage: SyncStage, reason: AbortReason },
}

/// Runs one migration from a `WatchedSource` into a `HistoryTarget`.
///
/// Every step is awaited before the next starts. The payload fetched from
/// the source never outlives `run`.
pub struct SyncOrchestrator<'a> {
    source: Box<dyn WatchedSource>,
    target: Box<dyn HistoryTarget>,
    operator: &'a dyn Operator,
    remove_previous_history: bool,
    stage: SyncStage,
}

impl<'a> SyncOrchestrator<'a> {
    pub fn new(
        source: Box<dyn WatchedSource>,
        target: Box<dyn HistoryTarget>,
        operator: &'a dyn Operator,
    ) -> Self {
        Self {
            source,
            target,
            operator,
            remove_previous_history: false,
            stage: SyncStage::Init,
        }
    }

    /// Simkl as the source, Trakt as the target, both at `options.endpoints`
    pub fn simkl_to_trakt(options: RunOptions, operator: &'a dyn Operator) -> Self {
        let RunOptions {
            credentials,
            remove_previous_history,
            endpoints,
        } = options;
        let source = SimklClient::new(credentials.simkl_client_id, endpoints.simkl_api);
        let target = TraktClient::new(
            credentials.trakt_client_id,
            credentials.trakt_client_secret,
            endpoints.trakt_api,
        );
        Self::new(Box::new(source), Box::new(target), operator)
            .with_remove_previous_history(remove_previous_history)
    }

    pub fn with_remove_previous_history(mut self, remove: bool) -> Self {
        self.remove_previous_history = remove;
        self
    }

    pub fn stage(&self) -> SyncStage {
        self.stage
    }

    fn advance(&mut self, next: SyncStage) -> Result<(), SyncError> {
        if !self.stage.can_transition_to(next) {
            return Err(SyncError::InvalidTransition {
                from: self.stage,
                to: next,
            });
        }
        debug!(from = %self.stage, to = %next, "Sync stage transition");
        self.stage = next;
        self.operator.notify(SyncEvent::StageChanged(next));
        Ok(())
    }

    fn confirm(&self, confirmation: Confirmation) -> Result<bool, SyncError> {
        self.operator
            .confirm(confirmation)
            .map_err(|source| SyncError::Prompt {
                stage: self.stage,
                source,
            })
    }

    fn abort(&self, reason: AbortReason) -> SyncOutcome {
        info!(stage = %self.stage, ?reason, "Sync aborted by operator");
        SyncOutcome::Aborted {
            stage: self.stage,
            reason,
        }
    }

    #[instrument(
        skip(self),
        fields(source = self.source.source_name(), target = self.target.target_name())
    )]
    pub async fn run(&mut self) -> Result<SyncOutcome, SyncError> {
        let start = Instant::now();

        // Source: authorize and pull the full history
        self.advance(SyncStage::SourceAuthorizing)?;
        let authorization = self
            .source
            .request_authorization()
            .await
            .map_err(SyncError::SourceAuthorization)?;
        self.operator.notify(SyncEvent::SourceAuthorization {
            service: self.source.source_name().to_string(),
            authorization: authorization.clone(),
        });
        if !self.confirm(Confirmation::SourceAuthorized)? {
            return Ok(self.abort(AbortReason::SourceNotAuthorized));
        }
        self.source
            .complete_authorization(&authorization)
            .await
            .map_err(SyncError::SourceAuthorization)?;

        let payload = self
            .source
            .fetch_watched()
            .await
            .map_err(SyncError::SourceFetch)?;
        self.advance(SyncStage::SourceFetched)?;
        info!(
            shows = payload.shows.len(),
            movies = payload.movies.len(),
            anime = payload.anime.len(),
            "Fetched watch history"
        );
        self.operator.notify(SyncEvent::SourceFetched {
            shows: payload.shows.len(),
            movies: payload.movies.len(),
            anime: payload.anime.len(),
        });

        // Target: device flow
        self.advance(SyncStage::TargetAuthorizing)?;
        let authorization = self
            .target
            .request_authorization()
            .await
            .map_err(SyncError::TargetAuthorization)?;
        self.operator.notify(SyncEvent::TargetAuthorization {
            service: self.target.target_name().to_string(),
            authorization: authorization.clone(),
        });
        self.target
            .poll_authorization(&authorization)
            .await
            .map_err(SyncError::TargetAuthorization)?;
        self.advance(SyncStage::TargetAuthorized)?;
        self.operator.notify(SyncEvent::TargetAuthorized {
            service: self.target.target_name().to_string(),
        });

        // Optional removal; failure is the operator's call
        let mut removed = None;
        let mut removal_failed = false;
        if self.remove_previous_history {
            self.advance(SyncStage::RemovingHistory)?;
            match self.remove_history().await {
                Ok(counts) => {
                    info!(
                        movies = counts.movies,
                        episodes = counts.episodes,
                        "Removed previous history"
                    );
                    self.operator.notify(SyncEvent::HistoryRemoved(counts));
                    removed = Some(counts);
                }
                Err(e) => {
                    warn!(error = %e, "Failed to remove previous history");
                    self.operator.notify(SyncEvent::RemovalFailed {
                        message: error_chain_message(&e),
                    });
                    if !self.confirm(Confirmation::ContinueAfterFailedRemoval)? {
                        return Ok(self.abort(AbortReason::RemovalDeclined));
                    }
                    removal_failed = true;
                }
            }
        }

        // Transform and upload in one request
        self.advance(SyncStage::Syncing)?;
        let request = build_sync_request(&payload);
        self.operator.notify(SyncEvent::Syncing {
            shows: request.shows.len(),
            movies: request.movies.len(),
        });
        let added = self
            .target
            .add_history(&request)
            .await
            .map_err(SyncError::Sync)?;
        self.operator.notify(SyncEvent::HistoryAdded(added));
        self.advance(SyncStage::Done)?;

        let report = SyncReport {
            shows_submitted: request.shows.len(),
            movies_submitted: request.movies.len(),
            removed,
            removal_failed,
            added,
            duration: start.elapsed(),
        };
        info!(
            movies = added.movies,
            episodes = added.episodes,
            duration = ?report.duration,
            "Sync completed"
        );
        Ok(SyncOutcome::Completed(report))
    }

    async fn remove_history(&self) -> Result<HistoryCounts, SourceError> {
        let (movies, shows) = futures::try_join!(
            self.target.get_watched(WatchedKind::Movies),
            self.target.get_watched(WatchedKind::Shows)
        )?;
        self.operator.notify(SyncEvent::RemovingHistory {
            movies: movies.len(),
            shows: shows.len(),
        });
        self.target
            .remove_history(&HistoryItems { movies, shows })
            .await
    }
}

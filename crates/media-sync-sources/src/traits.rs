use crate::error::SourceError;
use async_trait::async_trait;
use media_sync_models::{
    DeviceAuthorization, HistoryCounts, HistoryItems, TargetSyncRequest, WatchedKind,
    WatchedPayload,
};
use serde_json::Value;

/// Service the watched history is read from
#[async_trait]
pub trait WatchedSource: Send + Sync {
    fn source_name(&self) -> &str;

    // Authentication: request a code for the operator, then redeem it once
    // they confirm they authorized it in the browser
    async fn request_authorization(&mut self) -> Result<DeviceAuthorization, SourceError>;
    async fn complete_authorization(
        &mut self,
        authorization: &DeviceAuthorization,
    ) -> Result<(), SourceError>;
    fn is_authenticated(&self) -> bool;

    async fn fetch_watched(&self) -> Result<WatchedPayload, SourceError>;
}

/// Service the watched history is written to
#[async_trait]
pub trait HistoryTarget: Send + Sync {
    fn target_name(&self) -> &str;

    // Authentication: request a device code, then poll until the operator
    // authorizes it or the code expires
    async fn request_authorization(&mut self) -> Result<DeviceAuthorization, SourceError>;
    async fn poll_authorization(
        &mut self,
        authorization: &DeviceAuthorization,
    ) -> Result<(), SourceError>;
    fn is_authenticated(&self) -> bool;

    /// Media objects currently in the user's watched list of the given kind
    async fn get_watched(&self, kind: WatchedKind) -> Result<Vec<Value>, SourceError>;
    async fn remove_history(&self, items: &HistoryItems) -> Result<HistoryCounts, SourceError>;
    async fn add_history(&self, request: &TargetSyncRequest) -> Result<HistoryCounts, SourceError>;
}

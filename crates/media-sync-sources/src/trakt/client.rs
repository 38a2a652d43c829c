use crate::error::SourceError;
use crate::traits::HistoryTarget;
use crate::trakt::api;
use crate::trakt::auth;
use async_trait::async_trait;
use media_sync_models::{
    DeviceAuthorization, HistoryCounts, HistoryItems, TargetSyncRequest, WatchedKind,
};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct TraktClient {
    client: Arc<Client>,
    api_base: String,
    access_token: Option<String>,
    client_id: String,
    client_secret: String,
}

impl TraktClient {
    pub fn new(client_id: String, client_secret: String, api_base: impl Into<String>) -> Self {
        Self {
            client: Arc::new(auth::create_trakt_client()),
            api_base: api_base.into(),
            access_token: None,
            client_id,
            client_secret,
        }
    }

    fn access_token(&self) -> Result<&str, SourceError> {
        self.access_token
            .as_deref()
            .ok_or(SourceError::NotAuthenticated("Trakt"))
    }
}

#[async_trait]
impl HistoryTarget for TraktClient {
    fn target_name(&self) -> &str {
        "Trakt"
    }

    async fn request_authorization(&mut self) -> Result<DeviceAuthorization, SourceError> {
        auth::request_device_code(&self.client, &self.api_base, &self.client_id).await
    }

    async fn poll_authorization(
        &mut self,
        authorization: &DeviceAuthorization,
    ) -> Result<(), SourceError> {
        let token_info = auth::poll_device_token(
            &self.client,
            &self.api_base,
            &self.client_id,
            &self.client_secret,
            authorization,
        )
        .await?;

        match token_info.expires_at {
            Some(expires_at) => info!("Authenticated to Trakt (token expires at {})", expires_at),
            None => info!("Authenticated to Trakt"),
        }
        self.access_token = Some(token_info.access_token);
        Ok(())
    }

    fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    async fn get_watched(&self, kind: WatchedKind) -> Result<Vec<Value>, SourceError> {
        let access_token = self.access_token()?;
        api::get_watched(&self.client, &self.api_base, access_token, &self.client_id, kind).await
    }

    async fn remove_history(&self, items: &HistoryItems) -> Result<HistoryCounts, SourceError> {
        let access_token = self.access_token()?;
        api::remove_history(&self.client, &self.api_base, access_token, &self.client_id, items)
            .await
    }

    async fn add_history(&self, request: &TargetSyncRequest) -> Result<HistoryCounts, SourceError> {
        let access_token = self.access_token()?;
        api::add_history(&self.client, &self.api_base, access_token, &self.client_id, request)
            .await
    }
}

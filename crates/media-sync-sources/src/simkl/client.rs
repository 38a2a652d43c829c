use crate::error::SourceError;
use crate::simkl::api;
use crate::simkl::auth;
use crate::traits::WatchedSource;
use async_trait::async_trait;
use media_sync_models::{DeviceAuthorization, WatchedPayload};
use reqwest::Client;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct SimklClient {
    client: Arc<Client>,
    api_base: String,
    client_id: String,
    access_token: Option<String>,
}

impl SimklClient {
    pub fn new(client_id: String, api_base: impl Into<String>) -> Self {
        Self {
            client: Arc::new(auth::create_simkl_client()),
            api_base: api_base.into(),
            client_id,
            access_token: None,
        }
    }

    fn access_token(&self) -> Result<&str, SourceError> {
        self.access_token
            .as_deref()
            .ok_or(SourceError::NotAuthenticated("Simkl"))
    }
}

#[async_trait]
impl WatchedSource for SimklClient {
    fn source_name(&self) -> &str {
        "Simkl"
    }

    async fn request_authorization(&mut self) -> Result<DeviceAuthorization, SourceError> {
        auth::request_pin(&self.client, &self.api_base, &self.client_id).await
    }

    async fn complete_authorization(
        &mut self,
        authorization: &DeviceAuthorization,
    ) -> Result<(), SourceError> {
        let token = auth::exchange_pin(
            &self.client,
            &self.api_base,
            &self.client_id,
            &authorization.user_code,
        )
        .await?;
        self.access_token = Some(token);
        info!("Authenticated to Simkl");
        Ok(())
    }

    fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    async fn fetch_watched(&self) -> Result<WatchedPayload, SourceError> {
        let access_token = self.access_token()?;
        api::get_all_items(&self.client, &self.api_base, access_token, &self.client_id).await
    }
}

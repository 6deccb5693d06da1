//! HTTP transport for the profile endpoints.

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use super::ClientError;
use crate::config::ClientSettings;
use crate::domain::profiles::{Profile, ProfileFields, ProfileId};
use crate::error::ErrorResponse;
use crate::middleware::RequestIdExt;

/// Thin typed wrapper over the REST surface. Holds no state besides the
/// connection pool.
#[derive(Clone)]
pub struct ProfileApi {
    client: Client,
    base_url: Url,
}

impl ProfileApi {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        if settings.api_url.cannot_be_a_base() {
            bail!("Profile API URL '{}' cannot be a base URL", settings.api_url);
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(base_url = %settings.api_url, "Profile client initialized");

        Ok(Self {
            client,
            base_url: settings.api_url.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn profile_url(&self, id: ProfileId) -> Url {
        let id = id.to_string();
        self.endpoint(&["profiles", id.as_str()])
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Profile>, ClientError> {
        let req = self.client.get(self.endpoint(&["profiles"]));
        json(self.send(req).await?).await
    }

    #[instrument(skip(self, fields))]
    pub async fn create(&self, fields: &ProfileFields) -> Result<Profile, ClientError> {
        let req = self.client.post(self.endpoint(&["profiles"])).json(fields);
        json(self.send(req).await?).await
    }

    #[instrument(skip(self, fields))]
    pub async fn update(&self, id: ProfileId, fields: &ProfileFields) -> Result<Profile, ClientError> {
        let req = self.client.put(self.profile_url(id)).json(fields);
        json(self.send(req).await?).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProfileId) -> Result<(), ClientError> {
        self.send(self.client.delete(self.profile_url(id))).await?;
        Ok(())
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ClientError> {
        let response = req.send().await?;
        let status = response.status();

        if status.is_success() {
            debug!(status = %status, "Profile API request succeeded");
            return Ok(response);
        }

        let request_id = response.headers().request_id().map(str::to_owned);
        let body = response.json::<ErrorResponse>().await.ok();
        let err = ClientError::from_response(status, body);

        warn!(
            status = %status,
            request_id = request_id.as_deref().unwrap_or("-"),
            error = %err,
            "Profile API request failed"
        );

        Err(err)
    }
}

async fn json<R: DeserializeOwned>(response: Response) -> Result<R, ClientError> {
    Ok(response.json::<R>().await?)
}

pub mod models;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Result;
pub use models::{InfoEntry, InfoResponse, RawEpisode, State};

/// Thin wrapper over the two form-encoded POST methods of the media API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        ApiClient { http, base_url }
    }

    /// Client used for the stream downloads as well.
    pub fn http(&self) -> &Client {
        &self.http
    }

    async fn post<T: DeserializeOwned>(&self, method: &str, id: u64) -> Result<T> {
        let url = format!("{}{}", self.base_url, method);
        debug!("POST {} id={}", url, id);
        let response = self
            .http
            .post(url)
            .form(&[("id", id)])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    pub async fn info(&self, id: u64) -> Result<InfoResponse> {
        self.post("info", id).await
    }

    pub async fn playlist(&self, id: u64) -> Result<Vec<RawEpisode>> {
        self.post("playlist", id).await
    }
}

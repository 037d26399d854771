pub mod controller;
pub mod draft;
pub mod view;

use crate::config::ClientConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{ApiEnvelope, EndorsementResult, Profile, UpsertProfilePayload};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

/// The remote profile API as seen by the client state controller.
pub trait ProfileApi {
    fn fetch_profile(&self) -> impl Future<Output = AppResult<Profile>> + Send;

    fn update_profile(&self, payload: UpsertProfilePayload) -> impl Future<Output = AppResult<Profile>> + Send;

    fn endorse_skill(&self, skill_id: &str) -> impl Future<Output = AppResult<EndorsementResult>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpProfileClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpProfileClient {
    pub fn new(config: &ClientConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The skill id travels as one escaped path segment.
    fn endorse_url(&self, skill_id: &str) -> AppResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.url("/profile/endorse"))
            .map_err(|error| AppError::Remote(format!("invalid api url {}: {}", self.base_url, error)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Remote(format!("api url {} cannot carry a path", self.base_url)))?
            .push(skill_id);
        Ok(url)
    }
}

impl ProfileApi for HttpProfileClient {
    async fn fetch_profile(&self) -> AppResult<Profile> {
        let response = self.http.get(self.url("/profile")).send().await?;
        decode(response).await
    }

    async fn update_profile(&self, payload: UpsertProfilePayload) -> AppResult<Profile> {
        let response = self.http.put(self.url("/profile")).json(&payload).send().await?;
        decode(response).await
    }

    async fn endorse_skill(&self, skill_id: &str) -> AppResult<EndorsementResult> {
        let url = self.endorse_url(skill_id)?;
        let response = self.http.patch(url).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
    let status = response.status();
    let envelope = response.json::<ApiEnvelope<T>>().await.map_err(|error| {
        AppError::Remote(format!("unreadable response (status {}): {}", status, error))
    })?;

    if status.is_success() && envelope.success {
        return envelope
            .data
            .ok_or_else(|| AppError::Remote("response carried no data".to_string()));
    }

    let message = envelope
        .message
        .unwrap_or_else(|| format!("request failed with status {}", status));
    Err(match status.as_u16() {
        400 => AppError::Validation(message),
        404 => AppError::NotFound(message),
        _ => AppError::Storage(message),
    })
}

/// Message to surface to the user: the server's own message when it sent one, else `fallback`.
pub fn user_message(error: &AppError, fallback: &str) -> String {
    match error {
        AppError::Validation(message) | AppError::NotFound(message) | AppError::Storage(message) => message.clone(),
        _ => fallback.to_string(),
    }
}

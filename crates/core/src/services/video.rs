//! Video metadata provider.
//!
//! External collaborator consulted once at submission creation to verify
//! clip ownership and capture the view count the payment is computed from,
//! and again on demand to refresh the drifting view count.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clipcommerce_common::config::VideoConfig;
use clipcommerce_common::{AppError, AppResult};
use serde::Deserialize;
use url::Url;

/// Metadata for a video at the external platform.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    /// Current view count.
    pub view_count: u64,
    /// Video title.
    pub title: String,
    /// Thumbnail URL.
    pub thumbnail_url: Option<String>,
    /// Publication timestamp.
    pub published_at: Option<DateTime<Utc>>,
}

/// Video metadata provider.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Fetch metadata for a video.
    async fn video_metadata(&self, video_id: &str) -> AppResult<VideoMetadata>;

    /// Check whether a video belongs to the given channel.
    async fn verify_ownership(&self, video_id: &str, channel_id: &str) -> AppResult<bool>;
}

/// HTTP implementation of [`VideoProvider`].
pub struct HttpVideoProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpVideoProvider {
    /// Create a provider from configuration.
    pub fn new(config: &VideoConfig) -> AppResult<Self> {
        let base = Url::parse(&config.provider_url)
            .map_err(|e| AppError::Config(format!("invalid video provider url: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwnershipResponse {
    owned: bool,
}

#[async_trait]
impl VideoProvider for HttpVideoProvider {
    async fn video_metadata(&self, video_id: &str) -> AppResult<VideoMetadata> {
        let url = format!("{}/videos/{video_id}", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::Dependency(format!("video metadata request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Dependency(format!(
                "video metadata request returned {}",
                response.status()
            )));
        }

        response
            .json::<VideoMetadata>()
            .await
            .map_err(|e| AppError::Dependency(format!("invalid video metadata response: {e}")))
    }

    async fn verify_ownership(&self, video_id: &str, channel_id: &str) -> AppResult<bool> {
        let url = format!(
            "{}/videos/{video_id}/ownership?channel={channel_id}",
            self.base_url
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::Dependency(format!("ownership check failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Dependency(format!(
                "ownership check returned {}",
                response.status()
            )));
        }

        let body = response
            .json::<OwnershipResponse>()
            .await
            .map_err(|e| AppError::Dependency(format!("invalid ownership response: {e}")))?;

        Ok(body.owned)
    }
}

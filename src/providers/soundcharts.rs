//! HTTP client for the streaming stats provider (Soundcharts-shaped API).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use super::models::{StreamWindow, TrackMetadata};

pub const DEFAULT_SOUNDCHARTS_BASE_URL: &str =
    "https://customer.api.soundcharts.com/api/v2/track";

#[derive(Debug, Clone)]
pub struct SoundchartsCredentials {
    pub app_id: String,
    pub api_key: String,
}

pub struct SoundchartsClient {
    client: reqwest::Client,
    base_url: String,
    credentials: SoundchartsCredentials,
}

#[derive(Deserialize)]
struct StreamingAudienceResponse {
    streams: StreamWindow,
}

impl SoundchartsClient {
    pub fn new(
        credentials: SoundchartsCredentials,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create Soundcharts HTTP client")?;
        let base_url = base_url.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header("x-app-id", &self.credentials.app_id)
            .header("x-api-key", &self.credentials.api_key)
            .send()
            .await
            .context("Failed to reach Soundcharts API")?;

        if !response.status().is_success() {
            anyhow::bail!("Soundcharts API returned status {}", response.status());
        }

        response
            .json()
            .await
            .context("Failed to parse Soundcharts API response")
    }

    /// Daily stream counts for a track, keyed by ISRC.
    pub async fn streaming_audience(&self, isrc: &str) -> Result<StreamWindow> {
        let response: StreamingAudienceResponse = self
            .get_json(&format!("/by-isrc/{}/audience/streaming", isrc))
            .await?;
        Ok(response.streams)
    }

    /// Track identity (name, artist) as known upstream.
    pub async fn track_metadata(&self, isrc: &str) -> Result<TrackMetadata> {
        self.get_json(&format!("/by-isrc/{}", isrc)).await
    }
}

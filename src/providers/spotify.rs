//! HTTP client for the analytics provider (Spotify for Artists shaped API).
//!
//! Authenticates with the client credentials flow, then fetches per-track
//! behavioral insights. A fresh token is requested per call: the audit paths
//! issue at most a handful of requests per minute, so token caching is not
//! worth the shared state.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use super::models::TrackAnalytics;

pub const DEFAULT_SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

#[derive(Debug, Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

pub struct SpotifyClient {
    client: reqwest::Client,
    accounts_url: String,
    api_url: String,
    credentials: SpotifyCredentials,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl SpotifyClient {
    pub fn new(
        credentials: SpotifyCredentials,
        accounts_url: String,
        api_url: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create Spotify HTTP client")?;
        Ok(Self {
            client,
            accounts_url: accounts_url.trim_end_matches('/').to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    async fn access_token(&self) -> Result<String> {
        let url = format!("{}/api/token", self.accounts_url);
        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
            ])
            .send()
            .await
            .context("Failed to reach Spotify token endpoint")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Spotify token endpoint returned status {}",
                response.status()
            );
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse Spotify token response")?;
        Ok(token.access_token)
    }

    /// Skip rate and listener path insights for a track, keyed by ISRC.
    pub async fn track_insights(&self, isrc: &str) -> Result<TrackAnalytics> {
        let token = self.access_token().await?;
        let url = format!("{}/tracks/insights/isrc/{}", self.api_url, isrc);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to reach Spotify insights endpoint")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Spotify insights endpoint returned status {}",
                response.status()
            );
        }

        response
            .json()
            .await
            .context("Failed to parse Spotify insights response")
    }
}

//! Upstream data providers.
//!
//! Both providers are optional: the gateway degrades to "no data" when a
//! provider is unconfigured or its API call fails, and the caller falls back
//! to the baseline catalog values. No call on this surface ever returns an
//! error.

mod models;
mod soundcharts;
mod spotify;

pub use models::{ListenerPath, StreamWindow, TrackAnalytics, TrackMetadata};
pub use soundcharts::{SoundchartsClient, SoundchartsCredentials, DEFAULT_SOUNDCHARTS_BASE_URL};
pub use spotify::{
    SpotifyClient, SpotifyCredentials, DEFAULT_SPOTIFY_ACCOUNTS_URL, DEFAULT_SPOTIFY_API_URL,
};

use tracing::warn;

pub struct ProviderGateway {
    soundcharts: Option<SoundchartsClient>,
    spotify: Option<SpotifyClient>,
}

impl ProviderGateway {
    pub fn new(soundcharts: Option<SoundchartsClient>, spotify: Option<SpotifyClient>) -> Self {
        if soundcharts.is_none() {
            warn!("Soundcharts keys missing. Falling back to baseline streaming data.");
        }
        if spotify.is_none() {
            warn!("Spotify credentials missing. Falling back to baseline analytics.");
        }
        Self {
            soundcharts,
            spotify,
        }
    }

    /// Gateway with no upstream providers configured; every fetch yields `None`.
    pub fn disabled() -> Self {
        Self {
            soundcharts: None,
            spotify: None,
        }
    }

    /// Live stream counts for a track, or `None` when the streaming provider
    /// is unconfigured or unreachable. Single attempt, no retry.
    pub async fn fetch_streaming_data(&self, isrc: &str) -> Option<StreamWindow> {
        let client = self.soundcharts.as_ref()?;
        match client.streaming_audience(isrc).await {
            Ok(window) => Some(window),
            Err(err) => {
                warn!("Soundcharts API error for ISRC {}: {:#}", isrc, err);
                None
            }
        }
    }

    /// Live behavioral analytics for a track, or `None` on any failure.
    pub async fn fetch_analytics(&self, isrc: &str) -> Option<TrackAnalytics> {
        let client = self.spotify.as_ref()?;
        match client.track_insights(isrc).await {
            Ok(analytics) => Some(analytics),
            Err(err) => {
                warn!("Spotify API error for ISRC {}: {:#}", isrc, err);
                None
            }
        }
    }

    /// Upstream track identity, used to cross-check the baseline record when
    /// drafting a dispute. `None` on any failure.
    pub async fn fetch_track_metadata(&self, isrc: &str) -> Option<TrackMetadata> {
        let client = self.soundcharts.as_ref()?;
        match client.track_metadata(isrc).await {
            Ok(metadata) => Some(metadata),
            Err(err) => {
                warn!("Soundcharts API error for ISRC {}: {:#}", isrc, err);
                None
            }
        }
    }
}

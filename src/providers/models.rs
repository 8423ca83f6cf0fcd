use serde::Deserialize;

/// Stream counts for the current and previous observation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StreamWindow {
    pub current: u64,
    pub previous: u64,
}

/// Behavioral analytics for a track, as reported by the analytics provider.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackAnalytics {
    /// Fraction of listens abandoned before the 31 second mark.
    pub skip_rate_31s: f64,
    #[serde(default)]
    pub listener_paths: Vec<ListenerPath>,
}

/// How listeners arrived at the track (search, radio, playlists, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct ListenerPath {
    pub source: String,
    pub percentage: f64,
}

/// Track identity as known to the streaming stats provider.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackMetadata {
    pub name: String,
    pub artist: String,
}

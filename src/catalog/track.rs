use serde::{Deserialize, Serialize};

/// Cached display label on the baseline record. Not authoritative: the risk
/// engine recomputes the real classification on every audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackStatus {
    Green,
    Yellow,
    Red,
}

/// Baseline record for a monitored track.
///
/// Seeded once at startup and never mutated afterwards. Live provider data
/// may override `current_streams`/`previous_streams`/`skip_rate` per request,
/// but those overrides never touch the stored baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub isrc: String,
    pub name: String,
    pub artist: String,
    pub current_streams: u64,
    pub previous_streams: u64,
    pub playlist_source: String,
    pub skip_rate: f64,
    pub status: TrackStatus,
}

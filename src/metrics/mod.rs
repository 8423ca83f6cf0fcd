//! Per-track metrics aggregation.
//!
//! Merges the baseline catalog record with optional live overrides from the
//! provider gateway into the view returned by the track listing endpoint.

use serde::Serialize;

use crate::catalog::{Track, TrackStatus};
use crate::providers::{StreamWindow, TrackAnalytics};

/// A track as surfaced to the dashboard: baseline fields with live overrides
/// applied, plus the derived growth figures. Never persisted, rebuilt on
/// every listing request.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedTrackView {
    pub id: String,
    pub isrc: String,
    pub name: String,
    pub artist: String,
    pub current_streams: u64,
    pub previous_streams: u64,
    pub playlist_source: String,
    pub skip_rate: f64,
    pub status: TrackStatus,
    /// Week-over-week growth as a percentage with one decimal, e.g. "125.0".
    pub growth: String,
    #[serde(rename = "isHighGrowth")]
    pub is_high_growth: bool,
}

/// Growth as a fraction of the previous window.
///
/// A previous count of zero has no meaningful ratio; growth is defined as
/// 0.0 in that case so non-finite values never reach the wire.
fn growth_fraction(current: u64, previous: u64) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    (current as f64 - previous as f64) / previous as f64
}

/// Build the aggregated view for one track.
///
/// Live values take precedence over the baseline when present; the input
/// track is never mutated.
pub fn build_view(
    track: &Track,
    streaming: Option<StreamWindow>,
    analytics: Option<TrackAnalytics>,
) -> AggregatedTrackView {
    let (current_streams, previous_streams) = match streaming {
        Some(window) => (window.current, window.previous),
        None => (track.current_streams, track.previous_streams),
    };
    let skip_rate = match analytics {
        Some(analytics) => analytics.skip_rate_31s,
        None => track.skip_rate,
    };

    let growth = growth_fraction(current_streams, previous_streams);

    AggregatedTrackView {
        id: track.id.clone(),
        isrc: track.isrc.clone(),
        name: track.name.clone(),
        artist: track.artist.clone(),
        current_streams,
        previous_streams,
        playlist_source: track.playlist_source.clone(),
        skip_rate,
        status: track.status,
        growth: format!("{:.1}", growth * 100.0),
        is_high_growth: growth > 0.5,
    }
}

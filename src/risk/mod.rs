//! Rule-based anomaly scoring.
//!
//! Two independent sub-analyses (skip rate, playlist source) each contribute
//! a fixed weight; the summed score maps onto the Green/Yellow/Red risk
//! levels. Single-shot evaluation, no state kept across calls.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::catalog::{Track, TrackCatalog};

/// Industry average 31-second skip rate used as the reference point.
pub const INDUSTRY_AVG_SKIP_RATE: f64 = 0.25;

/// Playlist-source keywords associated with stream manipulation services.
/// Declared order is the report order.
pub const BLACKLIST_KEYWORDS: [&str; 5] = [
    "Real Plays",
    "Growth Hub",
    "Bot-Farm",
    "Promote Only",
    "Instant Fans",
];

/// Emitted when neither sub-analysis raises a finding.
pub const NO_ANOMALIES_FINDING: &str =
    "No anomalies detected based on current behavioral signatures";

const SKIP_RATE_HIGH_WEIGHT: u32 = 50;
const SKIP_RATE_MEDIUM_WEIGHT: u32 = 20;
const PLAYLIST_MATCH_WEIGHT: u32 = 50;

const RED_SCORE_THRESHOLD: u32 = 50;
const YELLOW_SCORE_THRESHOLD: u32 = 20;

/// Discrete risk classification. Surfaced on the wire with the dashboard
/// color names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Green")]
    Low,
    #[serde(rename = "Yellow")]
    Medium,
    #[serde(rename = "Red")]
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Green",
            RiskLevel::Medium => "Yellow",
            RiskLevel::High => "Red",
        }
    }

    pub fn parse(s: &str) -> Option<RiskLevel> {
        match s {
            "Green" => Some(RiskLevel::Low),
            "Yellow" => Some(RiskLevel::Medium),
            "Red" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

/// Outcome of one audit. Immutable once created; findings keep their
/// evaluation order (skip rate first, playlist second).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub track_id: String,
    /// ISO-8601 UTC timestamp of the evaluation.
    pub timestamp: String,
    pub risk_level: RiskLevel,
    /// Human-readable findings; never empty.
    pub findings: Vec<String>,
}

#[derive(Debug, Error)]
pub enum RiskError {
    #[error("track not found: {0}")]
    TrackNotFound(String),
}

/// Result of one sub-analysis: the weight it contributes to the risk score
/// and the finding to report, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SignalAnalysis {
    weight: u32,
    finding: Option<String>,
}

impl SignalAnalysis {
    fn clean() -> Self {
        Self {
            weight: 0,
            finding: None,
        }
    }
}

/// Skip-rate tiers relative to the industry average. Both boundaries are
/// strict: a rate of exactly 2x average lands in the middle tier, exactly
/// 1.5x in the clean tier.
fn analyze_skip_rate(skip_rate: f64) -> SignalAnalysis {
    if skip_rate > INDUSTRY_AVG_SKIP_RATE * 2.0 {
        SignalAnalysis {
            weight: SKIP_RATE_HIGH_WEIGHT,
            finding: Some(format!(
                "Critical skip rate detected: {:.1}% (Industry avg: 25%)",
                skip_rate * 100.0
            )),
        }
    } else if skip_rate > INDUSTRY_AVG_SKIP_RATE * 1.5 {
        SignalAnalysis {
            weight: SKIP_RATE_MEDIUM_WEIGHT,
            finding: Some(format!("Elevated skip rate: {:.1}%", skip_rate * 100.0)),
        }
    } else {
        SignalAnalysis::clean()
    }
}

/// Case-insensitive substring match against the keyword blacklist. The
/// finding lists every matched keyword, comma-joined in declared order.
fn check_playlist_blacklist(playlist_source: &str) -> SignalAnalysis {
    let source = playlist_source.to_lowercase();
    let matches: Vec<&str> = BLACKLIST_KEYWORDS
        .iter()
        .copied()
        .filter(|keyword| source.contains(&keyword.to_lowercase()))
        .collect();

    if matches.is_empty() {
        SignalAnalysis::clean()
    } else {
        SignalAnalysis {
            weight: PLAYLIST_MATCH_WEIGHT,
            finding: Some(format!(
                "Associated with suspicious playlist keywords: {}",
                matches.join(", ")
            )),
        }
    }
}

pub struct RiskEngine {
    catalog: Arc<dyn TrackCatalog>,
}

impl RiskEngine {
    pub fn new(catalog: Arc<dyn TrackCatalog>) -> Self {
        Self { catalog }
    }

    /// Audit a track by id. Fails only when the id is unknown.
    pub fn audit_track(&self, track_id: &str) -> Result<AuditResult, RiskError> {
        let track = self
            .catalog
            .get_by_id(track_id)
            .ok_or_else(|| RiskError::TrackNotFound(track_id.to_string()))?;
        Ok(Self::evaluate(&track))
    }

    /// Score a track. Deterministic for identical inputs, aside from the
    /// embedded timestamp.
    pub fn evaluate(track: &Track) -> AuditResult {
        let skip = analyze_skip_rate(track.skip_rate);
        let playlist = check_playlist_blacklist(&track.playlist_source);

        let mut risk_score = 0u32;
        let mut findings = Vec::new();

        if let Some(finding) = skip.finding {
            findings.push(finding);
            risk_score += skip.weight;
        }
        if let Some(finding) = playlist.finding {
            findings.push(finding);
            risk_score += playlist.weight;
        }

        let risk_level = if risk_score >= RED_SCORE_THRESHOLD {
            RiskLevel::High
        } else if risk_score >= YELLOW_SCORE_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        if findings.is_empty() {
            findings.push(NO_ANOMALIES_FINDING.to_string());
        }

        AuditResult {
            track_id: track.id.clone(),
            timestamp: Utc::now().to_rfc3339(),
            risk_level,
            findings,
        }
    }
}

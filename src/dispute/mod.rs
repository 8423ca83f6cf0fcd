//! Dispute narrative generation.
//!
//! Turns a completed audit into the letter a label manager sends to a
//! platform's compliance team. Pure function of the track, the audit and the
//! current date.

use chrono::Utc;
use serde::Serialize;

use crate::catalog::Track;
use crate::risk::AuditResult;

#[derive(Debug, Clone, Serialize)]
pub struct DisputeDraft {
    pub subject: String,
    pub body: String,
}

/// Compose a dispute draft from a track and its audit, dated today (UTC).
///
/// The audit's findings are embedded verbatim, bulleted, in their original
/// order. By convention only invoked for Red outcomes, but any audit works.
pub fn compose(track: &Track, audit: &AuditResult) -> DisputeDraft {
    compose_dated(track, audit, &Utc::now().format("%m/%d/%Y").to_string())
}

fn compose_dated(track: &Track, audit: &AuditResult, date: &str) -> DisputeDraft {
    let findings = audit
        .findings
        .iter()
        .map(|finding| format!("\u{2022} {}", finding))
        .collect::<Vec<_>>()
        .join("\n");

    let subject = format!(
        "URGENT: Dispute of Suspicious Streaming Activity - ISRC {}",
        track.isrc
    );

    let body = format!(
        "To the Compliance Team,\n\
        \n\
        I am writing to formally dispute and report suspicious streaming activity detected on our track \"{name}\" ({isrc}) by \"{artist}\".\n\
        \n\
        Our internal monitoring system, Royalty Shield, flagged a sudden spike on {date} originating from a suspicious source: \"{playlist_source}\".\n\
        \n\
        Forensic Findings:\n\
        {findings}\n\
        \n\
        We did not authorize any inorganic promotion for this track. We request that you protect our account standing and exclude these suspicious metrics from our royalty calculations to prevent any DSP penalties.\n\
        \n\
        Regards,\n\
        Label Manager\n\
        Royalty Shield Verified",
        name = track.name,
        isrc = track.isrc,
        artist = track.artist,
        date = date,
        playlist_source = track.playlist_source,
        findings = findings,
    );

    DisputeDraft { subject, body }
}

//! Sustainability deep-dive over uploaded audience reports.
//!
//! Classifies each row of a "Spotify for Artists" style CSV export by its
//! saves-to-streams ratio. Pure, single pass, no concurrency.

use serde::Serialize;
use thiserror::Error;

/// Accepted header spellings per logical column, capitalized variant first.
/// The first header present in the file wins.
const DATE_ALIASES: [&str; 2] = ["Date", "date"];
const STREAMS_ALIASES: [&str; 2] = ["Streams", "streams"];
const LISTENERS_ALIASES: [&str; 2] = ["Listeners", "listeners"];
const SAVES_ALIASES: [&str; 2] = ["Saves", "saves"];

/// Suspicious iff the score is below this and the row has enough streams to
/// matter.
const SUSPICIOUS_SCORE_THRESHOLD: f64 = 1.0;
const RELEVANT_STREAMS_THRESHOLD: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilityRow {
    pub date: String,
    pub streams: u64,
    pub listeners: u64,
    pub saves: u64,
    /// Saves-to-streams ratio in percent, rounded to two decimals. Zero when
    /// the row has no streams.
    pub sustainability_score: f64,
    pub is_suspicious: bool,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report file is empty")]
    EmptyReport,
    #[error("No recognizable columns in header (expected Date, Streams, Listeners, Saves)")]
    UnrecognizedHeader,
}

/// Classify one report row. Missing fields arrive as 0 / "N/A" from the
/// parser.
pub fn classify(date: String, streams: u64, listeners: u64, saves: u64) -> SustainabilityRow {
    let raw_score = if streams > 0 {
        saves as f64 / streams as f64 * 100.0
    } else {
        0.0
    };
    let sustainability_score = (raw_score * 100.0).round() / 100.0;

    SustainabilityRow {
        date,
        streams,
        listeners,
        saves,
        sustainability_score,
        is_suspicious: sustainability_score < SUSPICIOUS_SCORE_THRESHOLD
            && streams > RELEVANT_STREAMS_THRESHOLD,
    }
}

/// Parse and classify a whole uploaded report.
///
/// Tolerant of missing columns and unparseable cells (both default to 0);
/// the batch fails only when the file structure itself is unusable: empty
/// input, or a header naming none of the known columns. Row order is
/// preserved.
pub fn parse_report(input: &str) -> Result<Vec<SustainabilityRow>, ReportError> {
    let mut lines = input
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty());

    let header_line = lines.next().ok_or(ReportError::EmptyReport)?;
    let headers = split_csv_line(header_line);

    let known = [
        &DATE_ALIASES[..],
        &STREAMS_ALIASES[..],
        &LISTENERS_ALIASES[..],
        &SAVES_ALIASES[..],
    ];
    let recognized = headers
        .iter()
        .any(|h| known.iter().any(|aliases| aliases.contains(&h.as_str())));
    if !recognized {
        return Err(ReportError::UnrecognizedHeader);
    }

    let rows = lines
        .map(|line| {
            let cells = split_csv_line(line);
            let date = field(&headers, &cells, &DATE_ALIASES)
                .map(|s| s.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            let streams = numeric_field(&headers, &cells, &STREAMS_ALIASES);
            let listeners = numeric_field(&headers, &cells, &LISTENERS_ALIASES);
            let saves = numeric_field(&headers, &cells, &SAVES_ALIASES);
            classify(date, streams, listeners, saves)
        })
        .collect();

    Ok(rows)
}

/// Cell for the first alias whose header is present.
fn field<'a>(headers: &[String], cells: &'a [String], aliases: &[&str]) -> Option<&'a str> {
    for alias in aliases {
        if let Some(index) = headers.iter().position(|h| h == alias) {
            return cells.get(index).map(|s| s.as_str());
        }
    }
    None
}

fn numeric_field(headers: &[String], cells: &[String], aliases: &[&str]) -> u64 {
    field(headers, cells, aliases)
        .and_then(|cell| cell.trim().parse::<u64>().ok())
        .unwrap_or(0)
}

/// Minimal CSV field splitter: comma separated, double quotes wrap fields
/// containing commas, `""` escapes a quote inside a quoted field.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current = String::new();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_save_ratio_on_relevant_volume_is_suspicious() {
        let row = classify("2026-01-01".to_string(), 1000, 500, 5);
        assert_eq!(row.sustainability_score, 0.5);
        assert!(row.is_suspicious);
    }

    #[test]
    fn healthy_save_ratio_is_not_suspicious() {
        let row = classify("2026-01-01".to_string(), 1000, 500, 50);
        assert_eq!(row.sustainability_score, 5.0);
        assert!(!row.is_suspicious);
    }

    #[test]
    fn zero_streams_score_zero_regardless_of_saves() {
        let row = classify("2026-01-01".to_string(), 0, 0, 40);
        assert_eq!(row.sustainability_score, 0.0);
        assert!(!row.is_suspicious);
    }

    #[test]
    fn zero_saves_score_zero() {
        let row = classify("2026-01-01".to_string(), 5000, 100, 0);
        assert_eq!(row.sustainability_score, 0.0);
        assert!(row.is_suspicious);
    }

    #[test]
    fn exactly_one_hundred_streams_is_below_relevance_threshold() {
        let row = classify("2026-01-01".to_string(), 100, 50, 0);
        assert!(!row.is_suspicious);
    }

    #[test]
    fn one_hundred_and_one_streams_with_low_score_is_suspicious() {
        let row = classify("2026-01-01".to_string(), 101, 50, 1);
        assert_eq!(row.sustainability_score, 0.99);
        assert!(row.is_suspicious);
    }

    #[test]
    fn parses_capitalized_spotify_export_headers() {
        let csv = "Date,Streams,Listeners,Saves\n2026-01-01,1000,400,5\n2026-01-02,1000,400,50\n";
        let rows = parse_report(csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_suspicious);
        assert!(!rows[1].is_suspicious);
        assert_eq!(rows[0].date, "2026-01-01");
    }

    #[test]
    fn accepts_lowercase_headers() {
        let csv = "date,streams,listeners,saves\n2026-01-01,200,80,1\n";
        let rows = parse_report(csv).unwrap();
        assert_eq!(rows[0].streams, 200);
        assert_eq!(rows[0].sustainability_score, 0.5);
        assert!(rows[0].is_suspicious);
    }

    #[test]
    fn capitalized_header_wins_when_both_are_present() {
        let csv = "Streams,streams\n500,9000\n";
        let rows = parse_report(csv).unwrap();
        assert_eq!(rows[0].streams, 500);
    }

    #[test]
    fn missing_columns_default_to_zero() {
        let csv = "Date,Streams\n2026-01-01,5000\n";
        let rows = parse_report(csv).unwrap();
        assert_eq!(rows[0].saves, 0);
        assert_eq!(rows[0].listeners, 0);
        assert_eq!(rows[0].sustainability_score, 0.0);
        assert!(rows[0].is_suspicious);
    }

    #[test]
    fn unparseable_cells_default_to_zero() {
        let csv = "Date,Streams,Saves\n2026-01-01,lots,5\n";
        let rows = parse_report(csv).unwrap();
        assert_eq!(rows[0].streams, 0);
        assert!(!rows[0].is_suspicious);
    }

    #[test]
    fn skips_empty_lines_and_preserves_row_order() {
        let csv = "Date,Streams,Saves\n\n2026-01-01,1000,5\n\n2026-01-02,1000,50\n\n";
        let rows = parse_report(csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "2026-01-01");
        assert_eq!(rows[1].date, "2026-01-02");
    }

    #[test]
    fn quoted_fields_with_commas_are_handled() {
        let csv = "Date,Streams,Saves\n\"Jan 1, 2026\",1000,50\n";
        let rows = parse_report(csv).unwrap();
        assert_eq!(rows[0].date, "Jan 1, 2026");
        assert_eq!(rows[0].streams, 1000);
    }

    #[test]
    fn empty_input_fails_the_batch() {
        assert!(matches!(parse_report(""), Err(ReportError::EmptyReport)));
        assert!(matches!(
            parse_report("  \n \n"),
            Err(ReportError::EmptyReport)
        ));
    }

    #[test]
    fn unrecognized_header_fails_the_batch() {
        let result = parse_report("foo,bar\n1,2\n");
        assert!(matches!(result, Err(ReportError::UnrecognizedHeader)));
    }

    #[test]
    fn header_only_report_yields_no_rows() {
        let rows = parse_report("Date,Streams,Listeners,Saves\n").unwrap();
        assert!(rows.is_empty());
    }
}

//! Ids and fixtures from the built-in reference catalog.

pub const CLEAN_TRACK_ID: &str = "1";
pub const SUSPICIOUS_TRACK_ID: &str = "2";
pub const SUSPICIOUS_TRACK_ISRC: &str = "USRC87654321";
pub const UNKNOWN_TRACK_ID: &str = "999";

pub const REQUEST_TIMEOUT_SECS: u64 = 10;

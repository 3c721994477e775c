//! Timestamp handling.
//!
//! - `Timestamp`: serializable millisecond timestamp used for arithmetic
//! - `parse_timestamp`: accepts the forms produced by `datetime-local` inputs
//!   and the RFC 3339 strings returned by the service
//!
//! Naive inputs (no offset) are read as UTC, never in the host's zone. A
//! range typed into `datetime-local` fields is therefore measured in
//! wall-clock hours: a range spanning a daylight-saving change prices the
//! hours shown on the clock, not the one hour more or less that actually
//! elapsed. Results are the same on every host.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Sub;
use std::time::Duration;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Wire format used when sending timestamps back to the service.
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// =========================================================
// Timestamp
// =========================================================

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    #[inline]
    pub const fn new(ms: i64) -> Self {
        Self(ms)
    }

    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn as_secs(&self) -> i64 {
        self.0 / 1000
    }

    fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
    }

    /// `YYYY-MM-DDTHH:MM:SS`, the form sent in reservation payloads.
    pub fn to_wire(self) -> String {
        self.to_datetime()
            .map(|dt| dt.format(WIRE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self(ms)
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Duration;

    /// Elapsed time from `rhs` to `self`, clamped at zero.
    fn sub(self, rhs: Timestamp) -> Self::Output {
        let diff_ms = (self.0 - rhs.0).max(0);
        Duration::from_millis(diff_ms as u64)
    }
}

// =========================================================
// Parsing & display
// =========================================================

/// Parses a timestamp string. Returns `None` for empty or unparsable input.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(Timestamp(dt.timestamp_millis()));
    }

    NAIVE_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(raw, format)
            .ok()
            .map(|naive| Timestamp(naive.and_utc().timestamp_millis()))
    })
}

/// Normalises a user-entered timestamp to the wire format. Unparsable input
/// is passed through untouched; the service has the final word.
pub fn normalize_for_wire(raw: &str) -> String {
    parse_timestamp(raw)
        .map(Timestamp::to_wire)
        .unwrap_or_else(|| raw.trim().to_string())
}

/// `dd/mm/yyyy`, or the raw text when it does not parse.
pub fn format_date(raw: &str) -> String {
    format_with(raw, "%d/%m/%Y")
}

/// `HH:MM`, or the raw text when it does not parse.
pub fn format_time(raw: &str) -> String {
    format_with(raw, "%H:%M")
}

fn format_with(raw: &str, pattern: &str) -> String {
    parse_timestamp(raw)
        .and_then(Timestamp::to_datetime)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_else(|| raw.to_string())
}

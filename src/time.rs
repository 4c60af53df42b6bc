use crate::error::ReportError;
use chrono::DateTime;

/// Jan 1, 3000 in seconds. Anything smaller is taken to be a seconds timestamp.
pub const SECONDS_THRESHOLD: i64 = 32_503_680_000;

pub fn normalize_timestamp(timestamp: i64) -> i64 {
    if timestamp < SECONDS_THRESHOLD {
        timestamp.saturating_mul(1000)
    } else {
        timestamp
    }
}

/// Renders milliseconds since the epoch as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_timestamp(timestamp_ms: i64) -> String {
    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("{} ms (out of range)", timestamp_ms),
    }
}

/// Inclusive query window in milliseconds, `start_ms < end_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeWindow {
    /// Builds a window from raw second or millisecond inputs.
    pub fn from_inputs(start: i64, end: i64) -> Result<Self, ReportError> {
        let start_ms = normalize_timestamp(start);
        let end_ms = normalize_timestamp(end);
        if start_ms < 0 || end_ms < 0 || start_ms >= end_ms {
            return Err(ReportError::InvalidWindow { start_ms, end_ms });
        }
        Ok(Self { start_ms, end_ms })
    }

    pub fn contains(&self, timestamp_ms: i64) -> bool {
        self.start_ms <= timestamp_ms && timestamp_ms <= self.end_ms
    }

    pub fn start_secs(&self) -> i64 {
        self.start_ms.div_euclid(1000)
    }

    pub fn end_secs(&self) -> i64 {
        self.end_ms.div_euclid(1000)
    }
}

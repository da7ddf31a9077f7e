//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, Local, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (seconds)
    fn now_unix_seconds(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_seconds(&self) -> i64 {
        get_unix_timestamp()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_seconds: i64) -> Self {
        Self {
            fixed_time: fixed_time_seconds,
        }
    }
}

impl Clock for FixedClock {
    fn now_unix_seconds(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp (seconds)
pub fn get_unix_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Convert Unix timestamp (seconds) to UTC RFC 3339 format
///
/// Returns `None` when the timestamp is outside chrono's representable range.
pub fn timestamp_to_rfc3339(timestamp_seconds: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(timestamp_seconds, 0).map(|dt| dt.to_rfc3339())
}

/// Convert Unix timestamp (seconds) to an HTTP date (`Expires` cookie attribute)
pub fn timestamp_to_http_date(timestamp_seconds: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(timestamp_seconds, 0)
        .map(|dt| dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
}

/// Current local wall-clock time as `HH:MM:SS`, for terminal output
pub fn local_clock_label() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

//! Time helpers.
//!
//! All timestamps handled by Huddle are Unix milliseconds in UTC.

use chrono::{DateTime, SecondsFormat, Utc};

/// Get the current Unix timestamp in milliseconds (UTC).
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a Unix timestamp in milliseconds to an RFC 3339 string (UTC).
///
/// Out-of-range values fall back to the Unix epoch.
pub fn timestamp_to_rfc3339(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

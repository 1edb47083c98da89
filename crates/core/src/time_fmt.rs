// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time formatting helpers shared across crates.

use chrono::{DateTime, TimeZone, Utc};

/// Format a Unix-second timestamp as RFC 1123 for `If-Modified-Since`.
pub fn rfc1123(unix_secs: i64) -> String {
    let t = Utc.timestamp_opt(unix_secs, 0).single().unwrap_or_default();
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// `YYYY/MM/DD` path component used in remote object keys.
pub fn date_key(t: DateTime<Utc>) -> String {
    t.format("%Y/%m/%d").to_string()
}

/// Nanoseconds since the Unix epoch, saturating on overflow.
pub fn unix_nanos(t: DateTime<Utc>) -> i64 {
    t.timestamp_nanos_opt().unwrap_or(i64::MAX)
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;

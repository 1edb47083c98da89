// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

#[test]
fn rfc1123_formats_gmt() {
    // 2024-01-01T00:00:00Z is a Monday
    assert_eq!(rfc1123(1704067200), "Mon, 01 Jan 2024 00:00:00 GMT");
}

#[test]
fn rfc1123_epoch_for_zero() {
    assert_eq!(rfc1123(0), "Thu, 01 Jan 1970 00:00:00 GMT");
}

#[test]
fn date_key_zero_pads() {
    let t = Utc.with_ymd_and_hms(2024, 3, 7, 23, 59, 59).unwrap();
    assert_eq!(date_key(t), "2024/03/07");
}

#[test]
fn unix_nanos_round_trips_seconds() {
    let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(unix_nanos(t), 1704067200 * 1_000_000_000);
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{Duration, TimeZone};

fn task(expire: DateTime<Utc>) -> PreviewTask {
    PreviewTask {
        task_uuid: TaskId::new("p1"),
        pull_addr: "rtsp://camera/stream".to_string(),
        push_addr: "rtmp://relay/p1".to_string(),
        expire_time: expire,
    }
}

#[test]
fn expiry_is_inclusive() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    assert!(task(now).expired(now));
    assert!(task(now - Duration::seconds(1)).expired(now));
    assert!(!task(now + Duration::seconds(60)).expired(now));
}

#[test]
fn preview_task_wire_format() {
    let expire = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let json = serde_json::to_value(task(expire)).unwrap();
    assert_eq!(json["taskUuid"], "p1");
    assert_eq!(json["pullAddr"], "rtsp://camera/stream");
    assert_eq!(json["pushAddr"], "rtmp://relay/p1");
    assert_eq!(json["expireTime"], "2024-06-01T12:00:00Z");
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

fn detect_options() -> DetectOptions {
    DetectOptions {
        model: "yolo".to_string(),
        interval_ms: 1000,
        labels: vec!["person".to_string(), "car".to_string()],
        trigger_count: 2,
        trigger_interval_secs: 5,
    }
}

fn detect_spec() -> JobSpec {
    JobSpec {
        uuid: JobId::new("j-detect"),
        kind: JobKind::Detect,
        input: "rtsp://camera/stream".to_string(),
        enabled: true,
        update_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        detect: Some(detect_options()),
        segment: None,
    }
}

fn segment_spec() -> JobSpec {
    JobSpec {
        uuid: JobId::new("j-segment"),
        kind: JobKind::VideoSegment,
        input: "rtsp://camera/stream".to_string(),
        enabled: true,
        update_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        detect: None,
        segment: Some(SegmentOptions { duration_secs: 60 }),
    }
}

#[test]
fn validate_accepts_matching_blocks() {
    assert!(detect_spec().validate().is_ok());
    assert!(segment_spec().validate().is_ok());
}

#[test]
fn validate_rejects_missing_block() {
    let mut spec = detect_spec();
    spec.detect = None;
    assert!(matches!(
        spec.validate(),
        Err(JobSpecError::MissingDetectOptions(_))
    ));

    let mut spec = segment_spec();
    spec.segment = None;
    assert!(matches!(
        spec.validate(),
        Err(JobSpecError::MissingSegmentOptions(_))
    ));
}

#[test]
fn validate_rejects_mismatched_block() {
    let mut spec = detect_spec();
    spec.segment = Some(SegmentOptions { duration_secs: 60 });
    assert!(matches!(spec.validate(), Err(JobSpecError::KindMismatch(..))));

    let mut spec = segment_spec();
    spec.detect = Some(detect_options());
    assert!(matches!(spec.validate(), Err(JobSpecError::KindMismatch(..))));
}

#[test]
fn job_spec_wire_format() {
    let json = serde_json::to_value(detect_spec()).unwrap();
    assert_eq!(json["kind"], "detect");
    assert_eq!(json["updateTime"], "2024-01-01T00:00:00Z");
    assert_eq!(json["detectOptions"]["interval"], 1000);
    assert_eq!(json["detectOptions"]["triggerCount"], 2);
    assert_eq!(json["detectOptions"]["triggerInterval"], 5);
    assert!(json.get("segmentOptions").is_none());

    let json = serde_json::to_value(segment_spec()).unwrap();
    assert_eq!(json["kind"], "video-segment");
    assert_eq!(json["segmentOptions"]["duration"], 60);
}

#[test]
fn job_spec_round_trips() {
    let spec = detect_spec();
    let json = serde_json::to_string(&spec).unwrap();
    let parsed: JobSpec = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, spec);
}

#[yare::parameterized(
    stopped = { ExecutorStatus::Stopped, 0, false },
    running = { ExecutorStatus::Running, 1, false },
    finished = { ExecutorStatus::Finished, 2, true },
    failed = { ExecutorStatus::Failed, 3, true },
)]
fn executor_status_wire_ints(status: ExecutorStatus, wire: u8, terminal: bool) {
    assert_eq!(status.as_u8(), wire);
    assert_eq!(ExecutorStatus::from_u8(wire), status);
    assert_eq!(status.is_terminal(), terminal);
}

#[test]
fn unknown_status_int_maps_to_stopped() {
    assert_eq!(ExecutorStatus::from_u8(99), ExecutorStatus::Stopped);
}

#[test]
fn status_report_wire_format() {
    let mut report = StatusReport::default();
    report.insert(&JobId::new("j1"), ExecutorStatus::Running);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["jobStatus"]["j1"]["exectorStatus"], 1);
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn job_list_envelope_parses() {
    let body = r#"{
        "items": [{
            "uuid": "j1",
            "kind": "detect",
            "input": "rtsp://cam/1",
            "enabled": true,
            "updateTime": "2024-01-01T00:00:00Z",
            "detectOptions": {
                "model": "m",
                "interval": 1000,
                "labels": ["person", "car"],
                "triggerCount": 2,
                "triggerInterval": 5
            }
        }],
        "total": 1
    }"#;

    let parsed: JobListResponse = serde_json::from_str(body).unwrap();
    assert_eq!(parsed.items.len(), 1);
    let job = &parsed.items[0];
    assert_eq!(job.uuid, "j1");
    assert!(job.validate().is_ok());
    let detect = job.detect.as_ref().unwrap();
    assert_eq!(detect.labels, vec!["person", "car"]);
    assert_eq!(detect.trigger_interval_secs, 5);
}

#[test]
fn job_list_ignores_unknown_fields() {
    let body = r#"{
        "items": [{
            "uuid": "j2",
            "kind": "video-segment",
            "input": "rtsp://cam/2",
            "enabled": false,
            "updateTime": "2024-01-01T00:00:00Z",
            "segmentOptions": {"duration": 60},
            "futureField": {"nested": true}
        }],
        "total": 1
    }"#;

    let parsed: JobListResponse = serde_json::from_str(body).unwrap();
    assert_eq!(parsed.items[0].segment.as_ref().unwrap().duration_secs, 60);
}

#[test]
fn preview_list_envelope_parses() {
    let body = r#"{
        "items": [{
            "taskUuid": "p1",
            "pullAddr": "rtsp://cam/1",
            "pushAddr": "rtmp://relay/p1",
            "expireTime": "2024-06-01T12:00:00Z"
        }]
    }"#;

    let parsed: PreviewListResponse = serde_json::from_str(body).unwrap();
    assert_eq!(parsed.items[0].task_uuid, "p1");
}

#[test]
fn register_response_parses() {
    let body = r#"{
        "uuid": "dev-1",
        "token": "tok",
        "s3AccessKeyID": "AK",
        "s3SecretAccessKey": "SK"
    }"#;

    let parsed: RegisterResponse = serde_json::from_str(body).unwrap();
    assert_eq!(parsed.uuid, "dev-1");
    assert_eq!(parsed.s3_access_key_id, "AK");
}

#[test]
fn register_request_omits_unset_optionals() {
    let req = RegisterRequest {
        access_token: "at".to_string(),
        uuid: None,
        name: None,
    };
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["accessToken"], "at");
    assert!(json.get("uuid").is_none());
    assert!(json.get("name").is_none());
}

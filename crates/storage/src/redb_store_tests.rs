// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use vigil_core::{DetectOptions, JobKind};

fn open_temp() -> (tempfile::TempDir, RedbStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = RedbStore::open(&dir.path().join("meta.redb")).unwrap();
    (dir, store)
}

fn spec(uuid: &str, update_secs: i64) -> JobSpec {
    JobSpec {
        uuid: JobId::new(uuid),
        kind: JobKind::Detect,
        input: "video.mp4".to_string(),
        enabled: true,
        update_time: chrono::Utc.timestamp_opt(update_secs, 0).unwrap(),
        detect: Some(DetectOptions {
            model: "m".to_string(),
            interval_ms: 1000,
            labels: vec!["person".to_string()],
            trigger_count: 1,
            trigger_interval_secs: 1,
        }),
        segment: None,
    }
}

#[test]
fn fresh_store_reads_empty() {
    let (_dir, store) = open_temp();

    assert!(store.device_info().unwrap().is_none());
    assert!(store.last_fetch_time().unwrap().is_none());
    assert!(store.job(&JobId::new("missing")).unwrap().is_none());
    assert!(store.list_jobs().unwrap().is_empty());
}

#[test]
fn device_patch_merges() {
    let (_dir, store) = open_temp();

    let info = store
        .update_device_info(DevicePatch {
            uuid: Some("dev-1".to_string()),
            token: Some("tok".to_string()),
            ..DevicePatch::default()
        })
        .unwrap();
    assert_eq!(info.uuid, "dev-1");

    // Second patch only touches the token; uuid survives.
    let info = store
        .update_device_info(DevicePatch {
            token: Some("tok-2".to_string()),
            ..DevicePatch::default()
        })
        .unwrap();
    assert_eq!(info.uuid, "dev-1");
    assert_eq!(info.token, "tok-2");

    let read_back = store.device_info().unwrap().unwrap();
    assert_eq!(read_back, info);
}

#[test]
fn watermark_round_trips() {
    let (_dir, store) = open_temp();

    store.set_last_fetch_time(1704067200).unwrap();
    assert_eq!(store.last_fetch_time().unwrap(), Some(1704067200));

    store.set_last_fetch_time(1704067300).unwrap();
    assert_eq!(store.last_fetch_time().unwrap(), Some(1704067300));
}

#[test]
fn job_crud() {
    let (_dir, store) = open_temp();

    store.set_job(&spec("j1", 100)).unwrap();
    store.set_job(&spec("j2", 200)).unwrap();

    assert_eq!(store.job(&JobId::new("j1")).unwrap(), Some(spec("j1", 100)));

    // Overwrite updates in place.
    store.set_job(&spec("j1", 150)).unwrap();
    assert_eq!(store.job(&JobId::new("j1")).unwrap(), Some(spec("j1", 150)));

    store.delete_job(&JobId::new("j1")).unwrap();
    assert!(store.job(&JobId::new("j1")).unwrap().is_none());

    let remaining = store.list_jobs().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].uuid, "j2");
}

#[test]
fn delete_missing_job_is_ok() {
    let (_dir, store) = open_temp();
    store.delete_job(&JobId::new("never-existed")).unwrap();
}

#[test]
fn list_scans_only_the_job_prefix() {
    let (_dir, store) = open_temp();

    store.set_last_fetch_time(42).unwrap();
    store
        .update_device_info(DevicePatch {
            uuid: Some("dev-1".to_string()),
            ..DevicePatch::default()
        })
        .unwrap();
    store.set_job(&spec("j1", 100)).unwrap();

    let jobs = store.list_jobs().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].uuid, "j1");
}

#[test]
fn reopen_preserves_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meta.redb");

    {
        let store = RedbStore::open(&path).unwrap();
        store.set_job(&spec("j1", 100)).unwrap();
        store.set_last_fetch_time(100).unwrap();
    }

    let store = RedbStore::open(&path).unwrap();
    assert_eq!(store.list_jobs().unwrap().len(), 1);
    assert_eq!(store.last_fetch_time().unwrap(), Some(100));
}

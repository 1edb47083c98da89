// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::job::JobId;
use crate::preview::TaskId;

#[test]
fn job_id_display() {
    let id = JobId::new("7f1c3a9e");
    assert_eq!(id.to_string(), "7f1c3a9e");
}

#[test]
fn job_id_equality() {
    let id1 = JobId::new("job-1");
    let id2 = JobId::new("job-1");
    let id3 = JobId::new("job-2");

    assert_eq!(id1, id2);
    assert_ne!(id1, id3);
}

#[test]
fn job_id_serde() {
    let id = JobId::new("my-job");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"my-job\"");

    let parsed: JobId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn task_id_short() {
    let id = TaskId::new("0123456789abcdef");
    assert_eq!(id.short(8), "01234567");
    assert_eq!(TaskId::new("ab").short(8), "ab");
}

#[test]
fn uuid_id_gen_is_unique() {
    use crate::id::{IdGen, UuidIdGen};
    let id_gen = UuidIdGen;
    assert_ne!(id_gen.next(), id_gen.next());
}

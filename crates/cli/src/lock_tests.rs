// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn acquire_writes_pid_and_excludes_second_holder() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vigil.lock");

    let held = acquire(&path).unwrap();
    let pid = std::fs::read_to_string(&path).unwrap();
    assert_eq!(pid.trim(), std::process::id().to_string());

    let err = acquire(&path).unwrap_err();
    assert!(err.to_string().contains("another vigil instance"));

    drop(held);
    acquire(&path).unwrap();
}

#[test]
fn acquire_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("vigil.lock");

    acquire(&path).unwrap();
    assert!(path.exists());
}

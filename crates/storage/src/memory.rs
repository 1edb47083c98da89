// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory metadata store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use vigil_core::{DeviceInfo, DevicePatch, JobId, JobSpec};

use crate::meta::{MetaStore, StoreError};

#[derive(Default)]
struct MemoryState {
    device: Option<DeviceInfo>,
    last_fetch: Option<i64>,
    jobs: BTreeMap<String, JobSpec>,
    fail_writes: bool,
}

/// In-memory store with the same semantics as [`crate::RedbStore`].
///
/// Writes can be made to fail on demand to exercise partial-failure
/// paths (watermark gating, retry-next-tick).
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent mutation fail until cleared.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.lock().fail_writes = fail;
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.inner.lock().fail_writes {
            return Err(StoreError::WriteRejected("injected failure".to_string()));
        }
        Ok(())
    }
}

impl MetaStore for MemoryStore {
    fn device_info(&self) -> Result<Option<DeviceInfo>, StoreError> {
        Ok(self.inner.lock().device.clone())
    }

    fn update_device_info(&self, patch: DevicePatch) -> Result<DeviceInfo, StoreError> {
        self.check_writable()?;
        let mut inner = self.inner.lock();
        let merged = patch.apply(inner.device.take());
        inner.device = Some(merged.clone());
        Ok(merged)
    }

    fn last_fetch_time(&self) -> Result<Option<i64>, StoreError> {
        Ok(self.inner.lock().last_fetch)
    }

    fn set_last_fetch_time(&self, unix_secs: i64) -> Result<(), StoreError> {
        self.check_writable()?;
        self.inner.lock().last_fetch = Some(unix_secs);
        Ok(())
    }

    fn job(&self, id: &JobId) -> Result<Option<JobSpec>, StoreError> {
        Ok(self.inner.lock().jobs.get(id.as_str()).cloned())
    }

    fn set_job(&self, spec: &JobSpec) -> Result<(), StoreError> {
        self.check_writable()?;
        self.inner
            .lock()
            .jobs
            .insert(spec.uuid.to_string(), spec.clone());
        Ok(())
    }

    fn delete_job(&self, id: &JobId) -> Result<(), StoreError> {
        self.check_writable()?;
        self.inner.lock().jobs.remove(id.as_str());
        Ok(())
    }

    fn list_jobs(&self) -> Result<Vec<JobSpec>, StoreError> {
        Ok(self.inner.lock().jobs.values().cloned().collect())
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! redb-backed metadata store.
//!
//! A single ordered table keyed by string: the device record and fetch
//! watermark under reserved keys, job specs under the `job/` prefix so
//! listing is a prefix scan. Values are JSON documents.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};
use vigil_core::{DeviceInfo, DevicePatch, JobId, JobSpec};

use crate::meta::{MetaStore, StoreError};

const META: TableDefinition<&str, &[u8]> = TableDefinition::new("meta");

const DEVICE_KEY: &str = "device/info";
const FETCH_KEY: &str = "fetch/last";
const JOB_PREFIX: &str = "job/";

/// Crash-safe metadata store on a redb database file.
///
/// Every mutation is its own committed transaction, so there are no
/// outstanding writes to flush: dropping the last handle closes the
/// database cleanly.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create the store at `path`.
    ///
    /// Creates the table eagerly so fresh databases read back as empty
    /// rather than erroring on a missing table.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        let txn = db.begin_write()?;
        txn.open_table(META)?;
        txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(META)?;
        Ok(table.get(key)?.map(|v| v.value().to_vec()))
    }

    fn put_raw(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(META)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn job_key(id: &JobId) -> String {
        format!("{JOB_PREFIX}{id}")
    }
}

impl MetaStore for RedbStore {
    fn device_info(&self) -> Result<Option<DeviceInfo>, StoreError> {
        match self.get_raw(DEVICE_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }

    fn update_device_info(&self, patch: DevicePatch) -> Result<DeviceInfo, StoreError> {
        // Read-modify-write inside one write transaction so concurrent
        // readers see either the old or the merged record.
        let txn = self.db.begin_write()?;
        let merged = {
            let mut table = txn.open_table(META)?;
            let current = match table.get(DEVICE_KEY)? {
                Some(raw) => Some(serde_json::from_slice(raw.value())?),
                None => None,
            };
            let merged = patch.apply(current);
            let raw = serde_json::to_vec(&merged)?;
            table.insert(DEVICE_KEY, raw.as_slice())?;
            merged
        };
        txn.commit()?;
        Ok(merged)
    }

    fn last_fetch_time(&self) -> Result<Option<i64>, StoreError> {
        match self.get_raw(FETCH_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_last_fetch_time(&self, unix_secs: i64) -> Result<(), StoreError> {
        self.put_raw(FETCH_KEY, &serde_json::to_vec(&unix_secs)?)
    }

    fn job(&self, id: &JobId) -> Result<Option<JobSpec>, StoreError> {
        match self.get_raw(&Self::job_key(id))? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_job(&self, spec: &JobSpec) -> Result<(), StoreError> {
        self.put_raw(&Self::job_key(&spec.uuid), &serde_json::to_vec(spec)?)
    }

    fn delete_job(&self, id: &JobId) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(META)?;
            table.remove(Self::job_key(id).as_str())?;
        }
        txn.commit()?;
        Ok(())
    }

    fn list_jobs(&self) -> Result<Vec<JobSpec>, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(META)?;

        let mut jobs = Vec::new();
        for entry in table.range(JOB_PREFIX..)? {
            let (key, value) = entry?;
            if !key.value().starts_with(JOB_PREFIX) {
                break;
            }
            match serde_json::from_slice(value.value()) {
                Ok(spec) => jobs.push(spec),
                Err(e) => {
                    // A corrupt record must not hide the rest of the set.
                    tracing::warn!(key = key.value(), error = %e, "skipping unreadable job record");
                }
            }
        }
        Ok(jobs)
    }
}

#[cfg(test)]
#[path = "redb_store_tests.rs"]
mod tests;

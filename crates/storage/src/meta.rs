// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The metadata store interface.

use thiserror::Error;
use vigil_core::{DeviceInfo, DevicePatch, JobId, JobSpec};

/// Errors from metadata store operations.
///
/// "Not found" is never an error: lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("open failed: {0}")]
    Open(#[from] redb::DatabaseError),
    #[error("transaction failed: {0}")]
    Transaction(#[from] redb::TransactionError),
    #[error("table access failed: {0}")]
    Table(#[from] redb::TableError),
    #[error("storage failed: {0}")]
    Storage(#[from] redb::StorageError),
    #[error("commit failed: {0}")]
    Commit(#[from] redb::CommitError),
    #[error("value encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("write rejected: {0}")]
    WriteRejected(String),
}

/// Durable device metadata: identity, job specs, fetch watermark.
///
/// All mutations are atomic; readers never observe torn writes. The
/// reconciler is the single writer while the agent runs; any holder of
/// the handle may read.
pub trait MetaStore: Clone + Send + Sync + 'static {
    /// The singleton device identity, if registered.
    fn device_info(&self) -> Result<Option<DeviceInfo>, StoreError>;

    /// Merge a partial update into the device identity and return the
    /// merged record.
    fn update_device_info(&self, patch: DevicePatch) -> Result<DeviceInfo, StoreError>;

    /// The last successful fetch watermark, as Unix seconds.
    fn last_fetch_time(&self) -> Result<Option<i64>, StoreError>;

    fn set_last_fetch_time(&self, unix_secs: i64) -> Result<(), StoreError>;

    fn job(&self, id: &JobId) -> Result<Option<JobSpec>, StoreError>;

    fn set_job(&self, spec: &JobSpec) -> Result<(), StoreError>;

    fn delete_job(&self, id: &JobId) -> Result<(), StoreError>;

    /// All stored job specs, in key order.
    fn list_jobs(&self) -> Result<Vec<JobSpec>, StoreError>;
}

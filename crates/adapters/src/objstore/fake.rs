// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake uploader for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{UploadError, Uploader};

/// Recorded upload call
#[derive(Debug, Clone)]
pub struct UploadCall {
    pub local: PathBuf,
    pub remote_key: String,
}

#[derive(Default)]
struct FakeUploaderState {
    calls: Vec<UploadCall>,
    fail: bool,
}

/// Fake uploader recording calls, with an injectable failure mode.
#[derive(Clone, Default)]
pub struct FakeUploader {
    inner: Arc<Mutex<FakeUploaderState>>,
}

impl FakeUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upload fail until cleared.
    pub fn set_fail(&self, fail: bool) {
        self.inner.lock().fail = fail;
    }

    /// Get all recorded upload calls
    pub fn calls(&self) -> Vec<UploadCall> {
        self.inner.lock().calls.clone()
    }

    /// Remote keys of successful uploads, in order.
    pub fn uploaded_keys(&self) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .map(|c| c.remote_key.clone())
            .collect()
    }
}

#[async_trait]
impl Uploader for FakeUploader {
    async fn upload(&self, local: &Path, remote_key: &str) -> Result<(), UploadError> {
        let mut inner = self.inner.lock();
        if inner.fail {
            return Err(UploadError::Timeout(0));
        }
        inner.calls.push(UploadCall {
            local: local.to_path_buf(),
            remote_key: remote_key.to_string(),
        });
        Ok(())
    }
}

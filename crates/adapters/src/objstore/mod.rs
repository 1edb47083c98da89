// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object-storage uploader.

mod s3;

pub use s3::{S3Config, S3Uploader};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeUploader, UploadCall};

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from upload operations.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store error: {0}")]
    Store(#[from] object_store::Error),
    #[error("upload timed out after {0}s")]
    Timeout(u64),
}

/// Uploads local files to the device's bucket.
///
/// A failed upload leaves the local file intact; success permits the
/// caller to unlink it.
#[async_trait]
pub trait Uploader: Clone + Send + Sync + 'static {
    /// Upload `local` to `remote_key` (leading separator stripped),
    /// content-typed by extension.
    async fn upload(&self, local: &Path, remote_key: &str) -> Result<(), UploadError>;
}

/// Content type inferred from a file extension.
pub(crate) fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("mp4") => "video/mp4",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

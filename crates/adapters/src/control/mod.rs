// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control-plane client: the agent's view of the central job service.

mod http;

pub use http::{register, HttpControlClient};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ControlCall, FakeControlClient};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vigil_core::{JobSpec, PreviewTask, StatusReport};

/// Errors from control-plane requests.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Client for the control plane's device API.
///
/// All requests carry the device bearer token. No in-client retry: the
/// calling ticker applies policy.
#[async_trait]
pub trait ControlClient: Clone + Send + Sync + 'static {
    /// Fetch the authoritative job set, conditional on the watermark.
    ///
    /// `Ok(None)` means 304: nothing changed since `last_fetch_unix`.
    async fn fetch_jobs(
        &self,
        last_fetch_unix: Option<i64>,
    ) -> Result<Option<Vec<JobSpec>>, ControlError>;

    /// Fetch the full current preview-task set.
    async fn fetch_preview_tasks(&self) -> Result<Vec<PreviewTask>, ControlError>;

    /// Report per-job executor status.
    async fn report_status(&self, report: &StatusReport) -> Result<(), ControlError>;

    /// Tell the server this device is going away.
    async fn unregister(&self) -> Result<(), ControlError>;
}

/// Wire envelope for the job list.
#[derive(Debug, Deserialize)]
pub(crate) struct JobListResponse {
    pub items: Vec<JobSpec>,
    #[allow(dead_code)]
    pub total: u64,
}

/// Wire envelope for the preview-task list.
#[derive(Debug, Deserialize)]
pub(crate) struct PreviewListResponse {
    pub items: Vec<PreviewTask>,
}

/// Out-of-band registration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Registration response: the identity the agent persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub uuid: String,
    pub token: String,
    #[serde(rename = "s3AccessKeyID")]
    pub s3_access_key_id: String,
    #[serde(rename = "s3SecretAccessKey")]
    pub s3_secret_access_key: String,
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod wire_tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inference client: thin adapter to the external model server.

mod http;

pub use http::HttpInferenceClient;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeInferenceClient, InferCall};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from inference calls.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Client for the model server.
///
/// `infer` returns one flat FP32 tensor interpreted by the caller as
/// `[N x 6]` rows of `(x1, y1, x2, y2, confidence, class_index)`.
/// No retries here; callers apply policy.
#[async_trait]
pub trait InferenceClient: Clone + Send + Sync + 'static {
    async fn server_live(&self) -> Result<bool, InferenceError>;

    async fn server_ready(&self) -> Result<bool, InferenceError>;

    async fn model_ready(&self, model: &str) -> Result<bool, InferenceError>;

    async fn infer(
        &self,
        model: &str,
        frame: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<f32>, InferenceError>;
}

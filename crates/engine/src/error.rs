// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use thiserror::Error;

/// Errors that can occur constructing or starting an executor
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("invalid job spec: {0}")]
    Spec(#[from] vigil_core::JobSpecError),
    #[error("precondition failed: {0}")]
    Precondition(String),
    #[error("inference error: {0}")]
    Inference(#[from] vigil_adapters::InferenceError),
    #[error("video error: {0}")]
    Video(#[from] vigil_adapters::VideoError),
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

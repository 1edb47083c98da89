// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake inference client for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{InferenceClient, InferenceError};

/// Recorded infer call
#[derive(Debug, Clone)]
pub struct InferCall {
    pub model: String,
    pub frame_len: usize,
    pub width: u32,
    pub height: u32,
}

struct FakeInferenceState {
    live: bool,
    ready: bool,
    model_ready: bool,
    results: VecDeque<Result<Vec<f32>, u16>>,
    calls: Vec<InferCall>,
}

/// Fake inference client with scripted per-frame results.
///
/// Queued results are consumed in order; once drained, every call
/// returns an empty tensor (no detections).
#[derive(Clone)]
pub struct FakeInferenceClient {
    inner: Arc<Mutex<FakeInferenceState>>,
}

impl Default for FakeInferenceClient {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeInferenceState {
                live: true,
                ready: true,
                model_ready: true,
                results: VecDeque::new(),
                calls: Vec::new(),
            })),
        }
    }
}

impl FakeInferenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_live(&self, live: bool) {
        self.inner.lock().live = live;
    }

    pub fn set_ready(&self, ready: bool) {
        self.inner.lock().ready = ready;
    }

    pub fn set_model_ready(&self, ready: bool) {
        self.inner.lock().model_ready = ready;
    }

    /// Queue a successful result: one flat `[N x 6]` tensor.
    pub fn push_result(&self, flat: Vec<f32>) {
        self.inner.lock().results.push_back(Ok(flat));
    }

    /// Queue a failing result with the given HTTP status.
    pub fn push_error(&self, status: u16) {
        self.inner.lock().results.push_back(Err(status));
    }

    /// Get all recorded infer calls
    pub fn calls(&self) -> Vec<InferCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl InferenceClient for FakeInferenceClient {
    async fn server_live(&self) -> Result<bool, InferenceError> {
        Ok(self.inner.lock().live)
    }

    async fn server_ready(&self) -> Result<bool, InferenceError> {
        Ok(self.inner.lock().ready)
    }

    async fn model_ready(&self, _model: &str) -> Result<bool, InferenceError> {
        Ok(self.inner.lock().model_ready)
    }

    async fn infer(
        &self,
        model: &str,
        frame: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<f32>, InferenceError> {
        let mut inner = self.inner.lock();
        inner.calls.push(InferCall {
            model: model.to_string(),
            frame_len: frame.len(),
            width,
            height,
        });

        match inner.results.pop_front() {
            Some(Ok(flat)) => Ok(flat),
            Some(Err(status)) => Err(InferenceError::Status(status)),
            None => Ok(Vec::new()),
        }
    }
}

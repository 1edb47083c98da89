// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake publisher for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{PublishError, Publisher};

/// Recorded publish call
#[derive(Debug, Clone)]
pub struct PublishCall {
    pub subject: String,
    pub payload: Vec<u8>,
}

#[derive(Default)]
struct FakePublisherState {
    calls: Vec<PublishCall>,
    fail: bool,
}

/// Fake publisher recording accepted messages, with an injectable
/// failure mode.
#[derive(Clone, Default)]
pub struct FakePublisher {
    inner: Arc<Mutex<FakePublisherState>>,
}

impl FakePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent publish fail until cleared.
    pub fn set_fail(&self, fail: bool) {
        self.inner.lock().fail = fail;
    }

    /// Get all accepted messages
    pub fn calls(&self) -> Vec<PublishCall> {
        self.inner.lock().calls.clone()
    }

    /// Accepted payloads decoded as JSON, in order.
    pub fn json_payloads(&self) -> Vec<serde_json::Value> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| serde_json::from_slice(&c.payload).ok())
            .collect()
    }
}

#[async_trait]
impl Publisher for FakePublisher {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), PublishError> {
        let mut inner = self.inner.lock();
        if inner.fail {
            return Err(PublishError::Send("injected failure".to_string()));
        }
        inner.calls.push(PublishCall {
            subject: subject.to_string(),
            payload,
        });
        Ok(())
    }
}

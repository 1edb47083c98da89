// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message-bus publisher.

mod nats;

pub use nats::NatsPublisher;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePublisher, PublishCall};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from publish operations.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("publish failed: {0}")]
    Send(String),
}

/// At-least-once publisher of small JSON envelopes.
///
/// A successful publish means the broker has accepted the message.
/// Callers treat failure as retriable.
#[async_trait]
pub trait Publisher: Clone + Send + Sync + 'static {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), PublishError>;
}

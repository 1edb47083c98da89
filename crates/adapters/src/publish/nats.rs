// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! NATS publisher.

use async_trait::async_trait;
use tracing::info;

use super::{PublishError, Publisher};

/// Publisher backed by a NATS connection.
#[derive(Clone)]
pub struct NatsPublisher {
    client: async_nats::Client,
}

impl NatsPublisher {
    /// Connect to the NATS server and return a publisher.
    pub async fn connect(url: &str) -> Result<Self, PublishError> {
        info!(url, "connecting NATS publisher");
        let client = async_nats::ConnectOptions::new()
            .retry_on_initial_connect()
            .connect(url)
            .await
            .map_err(|e| PublishError::Connect(e.to_string()))?;
        info!("NATS publisher connected");
        Ok(Self { client })
    }

    /// Flush any buffered messages; used during shutdown.
    pub async fn flush(&self) -> Result<(), PublishError> {
        self.client
            .flush()
            .await
            .map_err(|e| PublishError::Send(e.to_string()))
    }
}

#[async_trait]
impl Publisher for NatsPublisher {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), PublishError> {
        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| PublishError::Send(e.to_string()))?;
        // Flush per publish: "accepted" must mean the broker has the
        // message before artifacts are deleted.
        self.client
            .flush()
            .await
            .map_err(|e| PublishError::Send(e.to_string()))
    }
}

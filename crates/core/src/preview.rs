// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Preview task: ephemeral per-camera live restream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifier for a preview task, assigned by the control plane.
    pub struct TaskId;
}

/// A live restream published by the server.
///
/// Lifetime is entirely under server control; the agent mirrors the
/// server's set and additionally drops tasks whose TTL has passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewTask {
    pub task_uuid: TaskId,
    /// Source stream to pull from
    pub pull_addr: String,
    /// Sink stream to push to
    pub push_addr: String,
    pub expire_time: DateTime<Utc>,
}

impl PreviewTask {
    pub fn expired(&self, now: DateTime<Utc>) -> bool {
        self.expire_time <= now
    }
}

#[cfg(test)]
#[path = "preview_tests.rs"]
mod tests;

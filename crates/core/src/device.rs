// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Device identity record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The singleton device identity.
///
/// Created by the out-of-band register flow; its presence is a precondition
/// for the agent to start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub uuid: String,
    /// Bearer token for control-plane requests
    pub token: String,
    pub registered_at: DateTime<Utc>,
    #[serde(rename = "s3AccessKeyID", default)]
    pub s3_access_key_id: String,
    #[serde(rename = "s3SecretAccessKey", default)]
    pub s3_secret_access_key: String,
}

impl DeviceInfo {
    /// True when the record carries everything `serve` needs.
    pub fn is_complete(&self) -> bool {
        !self.uuid.is_empty()
            && !self.token.is_empty()
            && !self.s3_access_key_id.is_empty()
            && !self.s3_secret_access_key.is_empty()
    }
}

/// Partial update to [`DeviceInfo`]: set fields overwrite, unset preserve.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePatch {
    pub uuid: Option<String>,
    pub token: Option<String>,
    pub registered_at: Option<DateTime<Utc>>,
    #[serde(rename = "s3AccessKeyID")]
    pub s3_access_key_id: Option<String>,
    #[serde(rename = "s3SecretAccessKey")]
    pub s3_secret_access_key: Option<String>,
}

impl DevicePatch {
    /// Merge into an existing record (or a blank one when none exists).
    pub fn apply(self, base: Option<DeviceInfo>) -> DeviceInfo {
        let mut info = base.unwrap_or(DeviceInfo {
            uuid: String::new(),
            token: String::new(),
            registered_at: Utc::now(),
            s3_access_key_id: String::new(),
            s3_secret_access_key: String::new(),
        });
        if let Some(uuid) = self.uuid {
            info.uuid = uuid;
        }
        if let Some(token) = self.token {
            info.token = token;
        }
        if let Some(ts) = self.registered_at {
            info.registered_at = ts;
        }
        if let Some(key) = self.s3_access_key_id {
            info.s3_access_key_id = key;
        }
        if let Some(secret) = self.s3_secret_access_key {
            info.s3_secret_access_key = secret;
        }
        info
    }

    /// Patch that clears credentials but keeps the device UUID, used by
    /// the unregister flow.
    pub fn cleared_credentials() -> Self {
        Self {
            token: Some(String::new()),
            s3_access_key_id: Some(String::new()),
            s3_secret_access_key: Some(String::new()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[path = "device_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `register` and `unregister` commands: out-of-band identity flows.

use std::path::Path;

use anyhow::Context;
use chrono::Utc;

use vigil_adapters::{control, ControlClient, HttpControlClient, RegisterRequest};
use vigil_core::{DevicePatch, IdGen, UuidIdGen};
use vigil_storage::{MetaStore, RedbStore};

use crate::config::AgentConfig;
use crate::lock;

pub async fn register(config: &AgentConfig, info_path: &Path) -> anyhow::Result<()> {
    let _lock = lock::acquire(&config.lock_path())?;

    let raw = std::fs::read_to_string(info_path)
        .with_context(|| format!("reading {}", info_path.display()))?;
    let mut request: RegisterRequest =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", info_path.display()))?;
    // Propose an identity when the operator did not pin one; the server
    // may still assign its own.
    if request.uuid.is_none() {
        request.uuid = Some(UuidIdGen.next());
    }

    let response = control::register(&config.server_addr, &request)
        .await
        .context("registration request failed")?;

    let store = RedbStore::open(&config.store_path())?;
    let device = store.update_device_info(DevicePatch {
        uuid: Some(response.uuid),
        token: Some(response.token),
        registered_at: Some(Utc::now()),
        s3_access_key_id: Some(response.s3_access_key_id),
        s3_secret_access_key: Some(response.s3_secret_access_key),
    })?;

    println!("registered device {}", device.uuid);
    Ok(())
}

pub async fn unregister(config: &AgentConfig) -> anyhow::Result<()> {
    let _lock = lock::acquire(&config.lock_path())?;

    let store = RedbStore::open(&config.store_path())?;
    let device = store
        .device_info()?
        .context("device is not registered")?;

    let client = HttpControlClient::new(&config.server_addr, &device.token);
    client
        .unregister()
        .await
        .context("unregister request failed")?;

    // Server no longer knows us; drop the credentials but keep the UUID
    // so re-registration can reclaim the same identity.
    store.update_device_info(DevicePatch::cleared_credentials())?;

    println!("unregistered device {}", device.uuid);
    Ok(())
}

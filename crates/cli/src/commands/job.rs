// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `job` commands: provision and inspect locally stored job specs.

use std::path::Path;

use anyhow::Context;

use vigil_core::{JobId, JobSpec};
use vigil_storage::{MetaStore, RedbStore};

use crate::config::AgentConfig;
use crate::lock;

pub fn add(config: &AgentConfig, spec_path: &Path) -> anyhow::Result<()> {
    let _lock = lock::acquire(&config.lock_path())?;

    let raw = std::fs::read_to_string(spec_path)
        .with_context(|| format!("reading {}", spec_path.display()))?;
    let spec: JobSpec =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", spec_path.display()))?;
    spec.validate()?;

    let store = RedbStore::open(&config.store_path())?;
    store.set_job(&spec)?;

    println!("added job {} ({})", spec.uuid, spec.kind);
    Ok(())
}

pub fn list(config: &AgentConfig) -> anyhow::Result<()> {
    let _lock = lock::acquire(&config.lock_path())?;

    let store = RedbStore::open(&config.store_path())?;
    let jobs = store.list_jobs()?;

    if jobs.is_empty() {
        println!("no jobs");
        return Ok(());
    }

    println!(
        "{:<38} {:<14} {:<8} {}",
        "UUID", "KIND", "ENABLED", "UPDATED"
    );
    for job in jobs {
        println!(
            "{:<38} {:<14} {:<8} {}",
            job.uuid,
            job.kind.to_string(),
            job.enabled,
            job.update_time.to_rfc3339()
        );
    }
    Ok(())
}

pub fn delete(config: &AgentConfig, uuid: &str) -> anyhow::Result<()> {
    let _lock = lock::acquire(&config.lock_path())?;

    let store = RedbStore::open(&config.store_path())?;
    let id = JobId::new(uuid);
    if store.job(&id)?.is_none() {
        anyhow::bail!("job {uuid} not found");
    }
    store.delete_job(&id)?;

    println!("deleted job {uuid}");
    Ok(())
}

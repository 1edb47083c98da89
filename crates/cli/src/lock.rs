// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-instance lock on the working directory.
//!
//! The store has one writer per key within one process; the lock keeps a
//! second vigil process (serve or CLI mutation) from becoming a second
//! writer.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use fs2::FileExt;

/// Held for the life of the owning command; dropping releases the lock.
#[derive(Debug)]
pub struct InstanceLock {
    _file: std::fs::File,
}

/// Acquire the exclusive instance lock, writing our PID for diagnostics.
pub fn acquire(path: &Path) -> anyhow::Result<InstanceLock> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)
        .with_context(|| format!("opening lock file {}", path.display()))?;

    file.try_lock_exclusive().map_err(|_| {
        let pid = std::fs::read_to_string(path).unwrap_or_default();
        let pid = pid.trim();
        if pid.is_empty() {
            anyhow::anyhow!("another vigil instance is running")
        } else {
            anyhow::anyhow!("another vigil instance is running (pid {pid})")
        }
    })?;

    let _ = file.set_len(0);
    let _ = writeln!(file, "{}", std::process::id());

    Ok(InstanceLock { _file: file })
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;

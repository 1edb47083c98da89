// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared executor status cell.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use vigil_core::ExecutorStatus;

/// Atomic status shared between an executor's tasks and the reconciler.
#[derive(Clone, Debug, Default)]
pub struct StatusCell(Arc<AtomicU8>);

impl StatusCell {
    pub fn new(status: ExecutorStatus) -> Self {
        Self(Arc::new(AtomicU8::new(status.as_u8())))
    }

    pub fn set(&self, status: ExecutorStatus) {
        self.0.store(status.as_u8(), Ordering::Release);
    }

    pub fn get(&self) -> ExecutorStatus {
        ExecutorStatus::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Set only if the current status is not already terminal; keeps a
    /// `failed`/`finished` verdict from being overwritten by `stopped`
    /// during shutdown.
    pub fn set_if_live(&self, status: ExecutorStatus) {
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cur| {
                if ExecutorStatus::from_u8(cur).is_terminal() {
                    None
                } else {
                    Some(status.as_u8())
                }
            });
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Three-tier reconciliation: server to store, store to executors.
//!
//! The fetch tick pulls the authoritative job set from the control plane
//! and diffs it into the local store, advancing the conditional-GET
//! watermark only when every store mutation succeeded. The sync tick
//! diffs the store against the live executor map and starts/stops
//! workers accordingly. The ticker body is a single cooperative loop, so
//! the executor map needs no locking.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use vigil_adapters::{ControlClient, InferenceClient, Publisher, Uploader, VideoSource};
use vigil_core::{ExecutorStatus, JobId, JobSpec, StatusReport};
use vigil_storage::MetaStore;

use crate::executor::{ExecutorFactory, JobExecutor};

/// Control-plane fetch cadence.
const FETCH_INTERVAL: Duration = Duration::from_secs(5);

/// Store-to-executor sync cadence.
const SYNC_INTERVAL: Duration = Duration::from_secs(1);

/// The reconciler owns the executor map exclusively.
pub struct Reconciler<S, C, V, I, U, P> {
    store: S,
    control: C,
    factory: ExecutorFactory<V, I, U, P>,
    executors: HashMap<JobId, JobExecutor<V, I, U, P>>,
    cancel: CancellationToken,
}

impl<S, C, V, I, U, P> Reconciler<S, C, V, I, U, P>
where
    S: MetaStore,
    C: ControlClient,
    V: VideoSource,
    I: InferenceClient,
    U: Uploader,
    P: Publisher,
{
    pub fn new(
        store: S,
        control: C,
        factory: ExecutorFactory<V, I, U, P>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            store,
            control,
            factory,
            executors: HashMap::new(),
            cancel,
        }
    }

    /// Run both tickers until the agent scope is cancelled, then stop
    /// every executor.
    pub async fn run(mut self) {
        let mut fetch_tick = tokio::time::interval(FETCH_INTERVAL);
        fetch_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut sync_tick = tokio::time::interval(SYNC_INTERVAL);
        sync_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = fetch_tick.tick() => self.fetch_tick().await,
                _ = sync_tick.tick() => self.sync_tick().await,
            }
        }

        self.shutdown().await;
    }

    /// One fetch pass: conditional GET, diff into the store, report
    /// executor status back.
    pub async fn fetch_tick(&mut self) {
        let watermark = match self.store.last_fetch_time() {
            Ok(watermark) => watermark,
            Err(e) => {
                warn!(error = %e, "watermark read failed");
                return;
            }
        };

        match self.control.fetch_jobs(watermark).await {
            Ok(Some(items)) => self.apply_jobs(items, watermark),
            Ok(None) => debug!("job set unchanged"),
            Err(e) => warn!(error = %e, "job fetch failed"),
        }

        self.report_status().await;
    }

    /// Diff the server's job set against the store.
    ///
    /// The watermark advances to the newest server update time only if
    /// every mutation in this pass succeeded; a partial failure leaves it
    /// unchanged so the next pass retries from the same frontier.
    fn apply_jobs(&mut self, items: Vec<JobSpec>, watermark: Option<i64>) {
        let new: HashMap<JobId, JobSpec> = items
            .into_iter()
            .map(|spec| (spec.uuid.clone(), spec))
            .collect();
        let old: HashMap<JobId, JobSpec> = match self.store.list_jobs() {
            Ok(jobs) => jobs
                .into_iter()
                .map(|spec| (spec.uuid.clone(), spec))
                .collect(),
            Err(e) => {
                warn!(error = %e, "job list read failed");
                return;
            }
        };

        let mut all_ok = true;
        let mut ids: Vec<&JobId> = old.keys().chain(new.keys()).collect();
        ids.sort();
        ids.dedup();

        for id in ids {
            let result = match (old.get(id), new.get(id)) {
                (Some(old_spec), Some(new_spec)) => {
                    if old_spec.update_time != new_spec.update_time {
                        info!(job_id = %id, "job updated");
                        self.store.set_job(new_spec)
                    } else {
                        Ok(())
                    }
                }
                (Some(_), None) => {
                    info!(job_id = %id, "job deleted");
                    self.store.delete_job(id)
                }
                (None, Some(new_spec)) => {
                    info!(job_id = %id, kind = %new_spec.kind, "job added");
                    self.store.set_job(new_spec)
                }
                (None, None) => Ok(()),
            };
            if let Err(e) = result {
                warn!(job_id = %id, error = %e, "store mutation failed");
                all_ok = false;
            }
        }

        let max_update: Option<DateTime<Utc>> = new.values().map(|spec| spec.update_time).max();
        if all_ok {
            if let Some(max_update) = max_update {
                // The watermark never moves backwards.
                let candidate = max_update.timestamp();
                if watermark.map_or(true, |current| candidate > current) {
                    if let Err(e) = self.store.set_last_fetch_time(candidate) {
                        warn!(error = %e, "watermark write failed");
                    }
                }
            }
        }
    }

    /// POST per-job executor status. Jobs without a live executor report
    /// as stopped.
    async fn report_status(&self) {
        let jobs = match self.store.list_jobs() {
            Ok(jobs) => jobs,
            Err(e) => {
                warn!(error = %e, "job list read failed");
                return;
            }
        };

        let mut report = StatusReport::default();
        for spec in &jobs {
            let status = self
                .executors
                .get(&spec.uuid)
                .map(|executor| executor.status())
                .unwrap_or(ExecutorStatus::Stopped);
            report.insert(&spec.uuid, status);
        }

        if let Err(e) = self.control.report_status(&report).await {
            warn!(error = %e, "status report failed");
        }
    }

    /// One sync pass: converge the executor map to the store's enabled
    /// job set.
    pub async fn sync_tick(&mut self) {
        let specs: HashMap<JobId, JobSpec> = match self.store.list_jobs() {
            Ok(jobs) => jobs
                .into_iter()
                .map(|spec| (spec.uuid.clone(), spec))
                .collect(),
            Err(e) => {
                warn!(error = %e, "job list read failed");
                return;
            }
        };

        // Stop executors whose spec is gone, disabled, or superseded. A
        // superseded executor is recreated next pass from the fresh spec.
        let stale: Vec<JobId> = self
            .executors
            .iter()
            .filter_map(|(id, executor)| match specs.get(id) {
                None => Some(id.clone()),
                Some(spec) if !spec.enabled => Some(id.clone()),
                Some(spec) if spec.update_time != executor.spec().update_time => Some(id.clone()),
                Some(_) => None,
            })
            .collect();
        for id in &stale {
            if let Some(mut executor) = self.executors.remove(id) {
                info!(job_id = %id, "stopping executor");
                executor.stop().await;
            }
        }

        // Start executors for enabled specs that lack one. Specs stopped
        // this pass wait for the next one. Construction or start
        // failures are logged and retried next pass.
        for (id, spec) in &specs {
            if !spec.enabled || self.executors.contains_key(id) || stale.contains(id) {
                continue;
            }
            let mut executor = match self.factory.build(spec.clone(), self.cancel.child_token()) {
                Ok(executor) => executor,
                Err(e) => {
                    warn!(job_id = %id, error = %e, "executor construction failed");
                    continue;
                }
            };
            match executor.start().await {
                Ok(()) => {
                    info!(job_id = %id, kind = %spec.kind, "executor started");
                    self.executors.insert(id.clone(), executor);
                }
                Err(e) => {
                    warn!(job_id = %id, error = %e, "executor start failed, will retry");
                    executor.stop().await;
                }
            }
        }
    }

    /// Stop every executor; called once on shutdown.
    async fn shutdown(&mut self) {
        for (id, mut executor) in self.executors.drain() {
            debug!(job_id = %id, "stopping executor for shutdown");
            executor.stop().await;
        }
    }

    /// Status of a job's executor, if one is live. Test hook.
    #[cfg(any(test, feature = "test-support"))]
    pub fn executor_status(&self, id: &JobId) -> Option<ExecutorStatus> {
        self.executors.get(id).map(|executor| executor.status())
    }

    /// IDs of live executors, sorted. Test hook.
    #[cfg(any(test, feature = "test-support"))]
    pub fn executor_ids(&self) -> Vec<JobId> {
        let mut ids: Vec<JobId> = self.executors.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;

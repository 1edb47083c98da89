// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Preview manager: a short-TTL set of live restreams converging to the
//! server-published set.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use vigil_adapters::subprocess::KILL_WAIT_TIMEOUT;
use vigil_adapters::video::{probe_codec, restream_command};
use vigil_adapters::ControlClient;
use vigil_core::{PreviewTask, TaskId};

/// Preview reconciliation cadence.
const PREVIEW_TICK: Duration = Duration::from_secs(5);

/// Backoff between restream relaunches.
const RESTREAM_BACKOFF: Duration = Duration::from_secs(5);

/// Runs one restream until cancelled; swappable for tests.
#[async_trait]
pub trait RestreamRunner: Clone + Send + Sync + 'static {
    async fn run(&self, task: PreviewTask, cancel: CancellationToken);
}

struct RestreamHandle {
    task: PreviewTask,
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

/// Maintains the `task UUID -> supervised restream` mapping.
pub struct PreviewManager<C, R> {
    control: C,
    runner: R,
    restreams: HashMap<TaskId, RestreamHandle>,
    cancel: CancellationToken,
}

impl<C, R> PreviewManager<C, R>
where
    C: ControlClient,
    R: RestreamRunner,
{
    pub fn new(control: C, runner: R, cancel: CancellationToken) -> Self {
        Self {
            control,
            runner,
            restreams: HashMap::new(),
            cancel,
        }
    }

    /// Run preview ticks until the agent scope is cancelled, then stop
    /// every restream.
    pub async fn run(mut self) {
        let mut tick = tokio::time::interval(PREVIEW_TICK);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tick.tick() => {}
            }
            self.tick().await;
        }

        let ids: Vec<TaskId> = self.restreams.keys().cloned().collect();
        for id in ids {
            self.stop_restream(&id).await;
        }
    }

    /// One pass: drop expired tasks, fetch the server set, start new
    /// restreams, cancel revoked ones.
    pub async fn tick(&mut self) {
        let now = Utc::now();

        let expired: Vec<TaskId> = self
            .restreams
            .iter()
            .filter(|(_, handle)| handle.task.expired(now))
            .map(|(id, _)| id.clone())
            .collect();
        for id in expired {
            info!(task_id = %id, "preview task expired");
            self.stop_restream(&id).await;
        }

        let server_tasks = match self.control.fetch_preview_tasks().await {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(error = %e, "preview task fetch failed");
                return;
            }
        };
        let server: HashMap<TaskId, PreviewTask> = server_tasks
            .into_iter()
            .map(|task| (task.task_uuid.clone(), task))
            .collect();

        for (id, task) in &server {
            if self.restreams.contains_key(id) || task.expired(now) {
                continue;
            }
            info!(task_id = %id, pull = %task.pull_addr, push = %task.push_addr, "starting restream");
            let cancel = self.cancel.child_token();
            let join = tokio::spawn({
                let runner = self.runner.clone();
                let task = task.clone();
                let cancel = cancel.clone();
                async move { runner.run(task, cancel).await }
            });
            self.restreams.insert(
                id.clone(),
                RestreamHandle {
                    task: task.clone(),
                    cancel,
                    join,
                },
            );
        }

        let revoked: Vec<TaskId> = self
            .restreams
            .keys()
            .filter(|id| !server.contains_key(*id))
            .cloned()
            .collect();
        for id in revoked {
            info!(task_id = %id, "preview task revoked");
            self.stop_restream(&id).await;
        }
    }

    async fn stop_restream(&mut self, id: &TaskId) {
        if let Some(handle) = self.restreams.remove(id) {
            handle.cancel.cancel();
            if let Err(e) = handle.join.await {
                warn!(task_id = %id, error = %e, "restream task panicked");
            }
        }
    }

    /// IDs of live restreams, sorted. Test hook.
    #[cfg(any(test, feature = "test-support"))]
    pub fn restream_ids(&self) -> Vec<TaskId> {
        let mut ids: Vec<TaskId> = self.restreams.keys().cloned().collect();
        ids.sort();
        ids
    }
}

/// Production restream runner: an ffmpeg child in a relaunch loop.
///
/// A codec probe selects pass-through for H.264 (and unknown codecs) and
/// real-time transcode for H.265. On child failure the runner sleeps and
/// relaunches until cancelled.
#[derive(Clone, Default)]
pub struct FfmpegRestreamRunner;

impl FfmpegRestreamRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RestreamRunner for FfmpegRestreamRunner {
    async fn run(&self, task: PreviewTask, cancel: CancellationToken) {
        let id = task.task_uuid.clone();
        loop {
            if cancel.is_cancelled() {
                break;
            }

            let transcode = match probe_codec(&task.pull_addr).await {
                Ok(codec) => codec == "hevc" || codec == "h265",
                Err(e) => {
                    debug!(task_id = %id, error = %e, "codec probe failed, assuming pass-through");
                    false
                }
            };

            match restream_command(&task.pull_addr, &task.push_addr, transcode).spawn() {
                Ok(mut child) => {
                    tokio::select! {
                        result = child.wait() => {
                            warn!(task_id = %id, result = ?result.ok(), "restream exited, relaunching");
                        }
                        _ = cancel.cancelled() => {
                            if let Err(e) = child.start_kill() {
                                warn!(task_id = %id, error = %e, "restream kill failed");
                            }
                            let _ = tokio::time::timeout(KILL_WAIT_TIMEOUT, child.wait()).await;
                            break;
                        }
                    }
                }
                Err(e) => {
                    warn!(task_id = %id, error = %e, "restream spawn failed");
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(RESTREAM_BACKOFF) => {}
                _ = cancel.cancelled() => break,
            }
        }
        debug!(task_id = %id, "restream runner exiting");
    }
}

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake_runner {
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tokio_util::sync::CancellationToken;

    use vigil_core::PreviewTask;

    use super::RestreamRunner;

    /// Fake restream runner recording started tasks and blocking until
    /// cancelled.
    #[derive(Clone, Default)]
    pub struct FakeRestreamRunner {
        started: Arc<Mutex<Vec<PreviewTask>>>,
    }

    impl FakeRestreamRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn started(&self) -> Vec<PreviewTask> {
            self.started.lock().clone()
        }
    }

    #[async_trait]
    impl RestreamRunner for FakeRestreamRunner {
        async fn run(&self, task: PreviewTask, cancel: CancellationToken) {
            self.started.lock().push(task);
            cancel.cancelled().await;
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake_runner::FakeRestreamRunner;

#[cfg(test)]
#[path = "preview_tests.rs"]
mod tests;

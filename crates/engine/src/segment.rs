// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Segmentation executor: a supervised external segmenter producing
//! rotating video chunks, and their uploader.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use vigil_adapters::subprocess::KILL_WAIT_TIMEOUT;
use vigil_adapters::video::segment_command;
use vigil_adapters::{Publisher, Uploader};
use vigil_core::{unix_nanos, ExecutorStatus, JobId, JobSpec, SegmentMessage, SegmentOptions};

use crate::artifact::{file_event_time, remote_key, scan_segments};
use crate::error::ExecutorError;
use crate::status::StatusCell;

/// Work-directory scan cadence for the uploader.
const UPLOAD_TICK: Duration = Duration::from_secs(1);

/// A running video-segment job: one supervised segmenter child plus an
/// uploader task.
pub struct SegmentExecutor<U, P> {
    spec: JobSpec,
    opts: SegmentOptions,
    device_uuid: String,
    work_dir: PathBuf,
    subject: String,
    uploader: U,
    publisher: P,
    status: StatusCell,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl<U, P> SegmentExecutor<U, P>
where
    U: Uploader,
    P: Publisher,
{
    pub fn new(
        spec: JobSpec,
        device_uuid: String,
        work_dir: PathBuf,
        subject: String,
        uploader: U,
        publisher: P,
        cancel: CancellationToken,
    ) -> Result<Self, ExecutorError> {
        spec.validate()?;
        let opts = spec
            .segment
            .clone()
            .ok_or_else(|| ExecutorError::Precondition("missing segment options".to_string()))?;

        Ok(Self {
            spec,
            opts,
            device_uuid,
            work_dir,
            subject,
            uploader,
            publisher,
            status: StatusCell::new(ExecutorStatus::Stopped),
            cancel,
            tasks: Vec::new(),
        })
    }

    pub fn spec(&self) -> &JobSpec {
        &self.spec
    }

    pub fn status(&self) -> ExecutorStatus {
        self.status.get()
    }

    /// Spawn the segmenter child and the uploader.
    pub async fn start(&mut self) -> Result<(), ExecutorError> {
        tokio::fs::create_dir_all(&self.work_dir).await?;

        let child = segment_command(&self.spec.input, &self.work_dir, self.opts.duration_secs)
            .spawn()
            .map_err(|e| ExecutorError::Spawn(e.to_string()))?;

        self.tasks.push(tokio::spawn(supervise_segmenter(
            child,
            self.spec.uuid.clone(),
            self.status.clone(),
            self.cancel.clone(),
        )));

        self.tasks.push(tokio::spawn(segment_upload_loop(
            self.spec.uuid.clone(),
            self.device_uuid.clone(),
            self.work_dir.clone(),
            self.subject.clone(),
            self.uploader.clone(),
            self.publisher.clone(),
            self.status.clone(),
            self.cancel.clone(),
        )));

        self.status.set(ExecutorStatus::Running);
        info!(
            job_id = %self.spec.uuid,
            input = %self.spec.input,
            duration_secs = self.opts.duration_secs,
            "segment executor started"
        );
        Ok(())
    }

    /// Cancel the scope (killing the child) and wait for every task.
    /// Idempotent.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                warn!(job_id = %self.spec.uuid, error = %e, "executor task panicked");
            }
        }
        self.status.set_if_live(ExecutorStatus::Stopped);
    }
}

/// Watch the segmenter child: clean exit is `finished`, non-zero exit is
/// `failed`, cancellation kills and awaits it.
async fn supervise_segmenter(
    mut child: Child,
    job: JobId,
    status: StatusCell,
    cancel: CancellationToken,
) {
    tokio::select! {
        result = child.wait() => match result {
            Ok(exit) if exit.success() => {
                info!(job_id = %job, "segmenter exited cleanly");
                status.set_if_live(ExecutorStatus::Finished);
            }
            Ok(exit) => {
                warn!(job_id = %job, code = exit.code(), "segmenter exited with error");
                status.set_if_live(ExecutorStatus::Failed);
            }
            Err(e) => {
                warn!(job_id = %job, error = %e, "segmenter wait failed");
                status.set_if_live(ExecutorStatus::Failed);
            }
        },
        _ = cancel.cancelled() => {
            if let Err(e) = child.start_kill() {
                warn!(job_id = %job, error = %e, "segmenter kill failed");
            }
            if tokio::time::timeout(KILL_WAIT_TIMEOUT, child.wait()).await.is_err() {
                warn!(job_id = %job, "segmenter did not exit after kill");
            }
            status.set_if_live(ExecutorStatus::Stopped);
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn segment_upload_loop<U: Uploader, P: Publisher>(
    job: JobId,
    device_uuid: String,
    work_dir: PathBuf,
    subject: String,
    uploader: U,
    publisher: P,
    status: StatusCell,
    cancel: CancellationToken,
) {
    let mut tick = tokio::time::interval(UPLOAD_TICK);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tick.tick() => {}
        }
        let writer_active = status.get() == ExecutorStatus::Running;
        upload_segments(
            &job,
            &device_uuid,
            &work_dir,
            &subject,
            &uploader,
            &publisher,
            writer_active,
        )
        .await;
    }
}

/// One uploader pass over the work directory.
///
/// Chunks sort by name, which the segmenter's strftime naming makes
/// creation order. While the child is writing, the newest chunk is left
/// alone; once the child has exited there is no writer, so the tail is
/// shipped too.
pub(crate) async fn upload_segments<U: Uploader, P: Publisher>(
    job: &JobId,
    device_uuid: &str,
    work_dir: &Path,
    subject: &str,
    uploader: &U,
    publisher: &P,
    writer_active: bool,
) {
    let mut segments = match scan_segments(work_dir).await {
        Ok(segments) => segments,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return,
        Err(e) => {
            warn!(job_id = %job, error = %e, "work directory scan failed");
            return;
        }
    };

    if writer_active {
        segments.pop();
    }

    for path in segments {
        if let Err(e) = ship_segment(job, device_uuid, &path, subject, uploader, publisher).await {
            warn!(
                job_id = %job,
                path = %path.display(),
                error = e,
                "segment upload failed, will retry"
            );
        }
    }
}

/// Upload one chunk, publish its pointer, then delete it locally.
async fn ship_segment<U: Uploader, P: Publisher>(
    job: &JobId,
    device_uuid: &str,
    path: &Path,
    subject: &str,
    uploader: &U,
    publisher: &P,
) -> Result<(), String> {
    let basename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| "segment path has no basename".to_string())?
        .to_string();

    let event_time = file_event_time(path).await;
    let key = remote_key(device_uuid, event_time, job, &basename);

    uploader
        .upload(path, &key)
        .await
        .map_err(|e| format!("upload: {e}"))?;

    let message = SegmentMessage {
        job_uuid: job.clone(),
        timestamp: unix_nanos(event_time),
        video_path: key,
    };
    let payload = serde_json::to_vec(&message).map_err(|e| format!("message encode: {e}"))?;
    publisher
        .publish(subject, payload)
        .await
        .map_err(|e| format!("publish: {e}"))?;

    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(job_id = %job, error = %e, "segment cleanup failed");
    }
    Ok(())
}

#[cfg(test)]
#[path = "segment_tests.rs"]
mod tests;

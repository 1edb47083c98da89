// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Detection executor: video capture, sampled inference, trigger
//! debouncing, artifact persistence and upload.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use vigil_adapters::{Frame, FrameStream, InferenceClient, Publisher, Uploader, VideoSource};
use vigil_core::{
    unix_nanos, DetectBox, DetectMessage, DetectOptions, ExecutorStatus, JobId, JobSpec, Sidecar,
};

use crate::artifact::{file_event_time, remote_key, scan_sidecars, write_detection_artifact};
use crate::error::ExecutorError;
use crate::status::StatusCell;
use crate::trigger::TriggerDebouncer;

/// Bound on buffered frames between the reader and the inferrer.
pub const FRAME_CHANNEL_CAPACITY: usize = 10;

/// Work-directory scan cadence for the uploader.
const UPLOAD_TICK: Duration = Duration::from_secs(1);

/// How often the inferrer logs its processing rate.
const RATE_LOG_INTERVAL: Duration = Duration::from_secs(5);

/// A running detect job: reader, inferrer and uploader tasks under one
/// cancellable scope.
pub struct DetectExecutor<V, I, U, P> {
    spec: JobSpec,
    opts: DetectOptions,
    device_uuid: String,
    work_dir: PathBuf,
    subject: String,
    video: V,
    inference: I,
    uploader: U,
    publisher: P,
    status: StatusCell,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl<V, I, U, P> DetectExecutor<V, I, U, P>
where
    V: VideoSource,
    I: InferenceClient,
    U: Uploader,
    P: Publisher,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        spec: JobSpec,
        device_uuid: String,
        work_dir: PathBuf,
        subject: String,
        video: V,
        inference: I,
        uploader: U,
        publisher: P,
        cancel: CancellationToken,
    ) -> Result<Self, ExecutorError> {
        spec.validate()?;
        let opts = spec
            .detect
            .clone()
            .ok_or_else(|| ExecutorError::Precondition("missing detect options".to_string()))?;

        Ok(Self {
            spec,
            opts,
            device_uuid,
            work_dir,
            subject,
            video,
            inference,
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

    /// Check preconditions and launch the pipeline.
    ///
    /// Any precondition failure terminates the start and leaves the
    /// executor stopped; the reconciler retries on its next pass.
    pub async fn start(&mut self) -> Result<(), ExecutorError> {
        if !self.inference.server_live().await? {
            return Err(ExecutorError::Precondition(
                "inference server not live".to_string(),
            ));
        }
        if !self.inference.server_ready().await? {
            return Err(ExecutorError::Precondition(
                "inference server not ready".to_string(),
            ));
        }
        if !self.inference.model_ready(&self.opts.model).await? {
            return Err(ExecutorError::Precondition(format!(
                "model {} not ready",
                self.opts.model
            )));
        }
        let stream = self.video.open(&self.spec.input).await?;

        tokio::fs::create_dir_all(&self.work_dir).await?;

        let (frame_tx, frame_rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);

        self.tasks.push(tokio::spawn(read_frames(
            stream,
            frame_tx,
            Duration::from_millis(self.opts.interval_ms),
            self.spec.uuid.clone(),
            self.status.clone(),
            self.cancel.clone(),
        )));

        self.tasks.push(tokio::spawn(infer_frames(
            frame_rx,
            self.spec.uuid.clone(),
            self.opts.clone(),
            self.work_dir.clone(),
            self.inference.clone(),
            self.cancel.clone(),
        )));

        self.tasks.push(tokio::spawn(upload_loop(
            self.spec.uuid.clone(),
            self.device_uuid.clone(),
            self.work_dir.clone(),
            self.subject.clone(),
            self.uploader.clone(),
            self.publisher.clone(),
            self.cancel.clone(),
        )));

        self.status.set(ExecutorStatus::Running);
        info!(job_id = %self.spec.uuid, input = %self.spec.input, "detect executor started");
        Ok(())
    }

    /// Cancel the scope and wait for every task. Idempotent.
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

/// Reader: pull frames, drop empties and over-rate frames, offer the
/// survivors to the bounded channel without blocking.
async fn read_frames<F: FrameStream>(
    mut stream: F,
    frame_tx: mpsc::Sender<Frame>,
    sample_interval: Duration,
    job: JobId,
    status: StatusCell,
    cancel: CancellationToken,
) {
    let mut last_sent: Option<Instant> = None;

    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => break,
            frame = stream.next_frame() => frame,
        };

        match frame {
            Ok(Some(frame)) => {
                if frame.is_empty() {
                    continue;
                }
                if let Some(sent) = last_sent {
                    if sent.elapsed() < sample_interval {
                        continue;
                    }
                }
                match frame_tx.try_send(frame) {
                    Ok(()) => last_sent = Some(Instant::now()),
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        warn!(job_id = %job, "frame channel full, dropping frame");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => break,
                }
            }
            Ok(None) => {
                info!(job_id = %job, "input reached end of stream");
                status.set_if_live(ExecutorStatus::Finished);
                break;
            }
            Err(e) => {
                warn!(job_id = %job, error = %e, "frame read failed");
                status.set_if_live(ExecutorStatus::Failed);
                break;
            }
        }
    }
    // Dropping the sender closes the channel; the inferrer drains what
    // remains and exits.
}

/// Inferrer: consume frames, call the model server, debounce, persist
/// triggered frames.
async fn infer_frames<I: InferenceClient>(
    mut frame_rx: mpsc::Receiver<Frame>,
    job: JobId,
    opts: DetectOptions,
    work_dir: PathBuf,
    inference: I,
    cancel: CancellationToken,
) {
    let mut debouncer = TriggerDebouncer::new(
        opts.trigger_count,
        Duration::from_secs(opts.trigger_interval_secs),
        Instant::now(),
    );
    let mut rate_tick = tokio::time::interval(RATE_LOG_INTERVAL);
    rate_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut processed: u64 = 0;

    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => {
                // Drain so no frame outlives stop().
                while frame_rx.try_recv().is_ok() {}
                break;
            }
            _ = rate_tick.tick() => {
                if processed > 0 {
                    let fps = processed as f64 / RATE_LOG_INTERVAL.as_secs_f64();
                    info!(job_id = %job, frames = processed, fps, "processing rate");
                    processed = 0;
                }
                continue;
            }
            frame = frame_rx.recv() => match frame {
                Some(frame) => frame,
                None => break,
            },
        };

        processed += 1;
        let flat = match inference
            .infer(&opts.model, &frame.bytes, frame.width, frame.height)
            .await
        {
            Ok(flat) => flat,
            Err(e) => {
                // Single-frame failures never propagate.
                warn!(job_id = %job, error = %e, "inference failed, skipping frame");
                continue;
            }
        };

        let boxes = decode_detections(&flat, &opts.labels);
        if !debouncer.observe(!boxes.is_empty(), Instant::now()) {
            continue;
        }

        let now = Utc::now();
        let ts_nanos = unix_nanos(now);
        let sidecar = Sidecar {
            job_id: job.clone(),
            timestamp: ts_nanos,
            boxes,
        };
        if let Err(e) = write_detection_artifact(&work_dir, ts_nanos, &frame.bytes, &sidecar).await
        {
            warn!(job_id = %job, error = %e, "artifact write failed");
        }
    }
}

/// Decode a flat `[N x 6]` tensor against the job's label map.
///
/// Rows whose class index is out of range or unmapped are dropped.
pub(crate) fn decode_detections(flat: &[f32], labels: &[String]) -> Vec<DetectBox> {
    let mut boxes = Vec::new();
    for row in flat.chunks_exact(6) {
        let class_index = row[5] as i64;
        if class_index < 0 {
            continue;
        }
        let Some(label) = labels.get(class_index as usize) else {
            continue;
        };
        boxes.push(DetectBox {
            x1: row[0],
            y1: row[1],
            x2: row[2],
            y2: row[3],
            confidence: row[4],
            class_id: class_index as u32,
            label: label.clone(),
        });
    }
    boxes
}

async fn upload_loop<U: Uploader, P: Publisher>(
    job: JobId,
    device_uuid: String,
    work_dir: PathBuf,
    subject: String,
    uploader: U,
    publisher: P,
    cancel: CancellationToken,
) {
    let mut tick = tokio::time::interval(UPLOAD_TICK);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tick.tick() => {}
        }
        upload_detections(&job, &device_uuid, &work_dir, &subject, &uploader, &publisher).await;
    }
}

/// One uploader pass: ship every completed sidecar in the work
/// directory. A failed step leaves that artifact pair on disk for the
/// next tick.
pub(crate) async fn upload_detections<U: Uploader, P: Publisher>(
    job: &JobId,
    device_uuid: &str,
    work_dir: &Path,
    subject: &str,
    uploader: &U,
    publisher: &P,
) {
    let sidecars = match scan_sidecars(work_dir).await {
        Ok(sidecars) => sidecars,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return,
        Err(e) => {
            warn!(job_id = %job, error = %e, "work directory scan failed");
            return;
        }
    };

    for sidecar_path in sidecars {
        if let Err(e) =
            ship_detection(job, device_uuid, &sidecar_path, subject, uploader, publisher).await
        {
            warn!(
                job_id = %job,
                path = %sidecar_path.display(),
                error = e,
                "detection upload failed, will retry"
            );
        }
    }
}

/// Upload one artifact pair, publish its pointer, then delete both.
async fn ship_detection<U: Uploader, P: Publisher>(
    job: &JobId,
    device_uuid: &str,
    sidecar_path: &Path,
    subject: &str,
    uploader: &U,
    publisher: &P,
) -> Result<(), String> {
    let raw = tokio::fs::read(sidecar_path)
        .await
        .map_err(|e| format!("sidecar read: {e}"))?;
    let sidecar: Sidecar =
        serde_json::from_slice(&raw).map_err(|e| format!("sidecar parse: {e}"))?;

    let image_path = sidecar_path.with_extension("jpg");
    let basename = image_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| "image path has no basename".to_string())?
        .to_string();

    let event_time = if sidecar.timestamp > 0 {
        DateTime::from_timestamp_nanos(sidecar.timestamp)
    } else {
        file_event_time(&image_path).await
    };
    let key = remote_key(device_uuid, event_time, job, &basename);

    uploader
        .upload(&image_path, &key)
        .await
        .map_err(|e| format!("upload: {e}"))?;

    let message = DetectMessage {
        job_uuid: job.clone(),
        timestamp: sidecar.timestamp,
        image_path: key,
        detect_boxes: sidecar.boxes,
    };
    let payload = serde_json::to_vec(&message).map_err(|e| format!("message encode: {e}"))?;
    publisher
        .publish(subject, payload)
        .await
        .map_err(|e| format!("publish: {e}"))?;

    // Both shipped; only now may the pair disappear locally.
    if let Err(e) = tokio::fs::remove_file(&image_path).await {
        warn!(job_id = %job, error = %e, "image cleanup failed");
    }
    if let Err(e) = tokio::fs::remove_file(sidecar_path).await {
        warn!(job_id = %job, error = %e, "sidecar cleanup failed");
    }
    Ok(())
}

#[cfg(test)]
#[path = "detect_tests.rs"]
mod tests;

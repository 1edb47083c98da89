// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The executor capability set and its kind-indexed factory.

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

use vigil_adapters::{InferenceClient, Publisher, Uploader, VideoSource};
use vigil_core::{ExecutorStatus, JobKind, JobSpec};

use crate::detect::DetectExecutor;
use crate::error::ExecutorError;
use crate::segment::SegmentExecutor;

/// A running job of either kind.
///
/// Closed tagged variant: adding a job kind means adding an arm here and
/// in the factory.
pub enum JobExecutor<V, I, U, P> {
    Detect(DetectExecutor<V, I, U, P>),
    Segment(SegmentExecutor<U, P>),
}

impl<V, I, U, P> JobExecutor<V, I, U, P>
where
    V: VideoSource,
    I: InferenceClient,
    U: Uploader,
    P: Publisher,
{
    pub async fn start(&mut self) -> Result<(), ExecutorError> {
        match self {
            JobExecutor::Detect(executor) => executor.start().await,
            JobExecutor::Segment(executor) => executor.start().await,
        }
    }

    pub async fn stop(&mut self) {
        match self {
            JobExecutor::Detect(executor) => executor.stop().await,
            JobExecutor::Segment(executor) => executor.stop().await,
        }
    }

    pub fn spec(&self) -> &JobSpec {
        match self {
            JobExecutor::Detect(executor) => executor.spec(),
            JobExecutor::Segment(executor) => executor.spec(),
        }
    }

    pub fn status(&self) -> ExecutorStatus {
        match self {
            JobExecutor::Detect(executor) => executor.status(),
            JobExecutor::Segment(executor) => executor.status(),
        }
    }
}

/// Builds executors for job specs, keyed by the spec's kind tag.
///
/// Holds the adapter handles and per-device settings every executor
/// needs; work directories are `<job_root>/<jobUUID>`.
#[derive(Clone)]
pub struct ExecutorFactory<V, I, U, P> {
    pub device_uuid: String,
    pub job_root: PathBuf,
    pub subject: String,
    pub video: V,
    pub inference: I,
    pub uploader: U,
    pub publisher: P,
}

impl<V, I, U, P> ExecutorFactory<V, I, U, P>
where
    V: VideoSource,
    I: InferenceClient,
    U: Uploader,
    P: Publisher,
{
    /// Construct (but do not start) an executor for `spec`.
    ///
    /// Specs violating the kind/option-block invariant are rejected here.
    pub fn build(
        &self,
        spec: JobSpec,
        cancel: CancellationToken,
    ) -> Result<JobExecutor<V, I, U, P>, ExecutorError> {
        let work_dir = self.job_root.join(spec.uuid.as_str());
        match spec.kind {
            JobKind::Detect => Ok(JobExecutor::Detect(DetectExecutor::new(
                spec,
                self.device_uuid.clone(),
                work_dir,
                self.subject.clone(),
                self.video.clone(),
                self.inference.clone(),
                self.uploader.clone(),
                self.publisher.clone(),
                cancel,
            )?)),
            JobKind::VideoSegment => Ok(JobExecutor::Segment(SegmentExecutor::new(
                spec,
                self.device_uuid.clone(),
                work_dir,
                self.subject.clone(),
                self.uploader.clone(),
                self.publisher.clone(),
                cancel,
            )?)),
        }
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake control-plane client for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use vigil_core::{JobSpec, PreviewTask, StatusReport};

use super::{ControlClient, ControlError};

/// Recorded control-plane call
#[derive(Debug, Clone)]
pub enum ControlCall {
    FetchJobs { last_fetch_unix: Option<i64> },
    FetchPreviewTasks,
    ReportStatus { report: StatusReport },
    Unregister,
}

/// One scripted answer to a `fetch_jobs` call.
#[derive(Debug, Clone)]
enum JobsReply {
    Items(Vec<JobSpec>),
    NotModified,
    Error(u16),
}

#[derive(Default)]
struct FakeControlState {
    calls: Vec<ControlCall>,
    jobs_replies: VecDeque<JobsReply>,
    preview_tasks: Vec<PreviewTask>,
    preview_error: Option<u16>,
    report_error: Option<u16>,
}

/// Fake control-plane client with scripted responses.
///
/// `fetch_jobs` pops queued replies; when the queue is empty the last
/// queued job set repeats as a 304.
#[derive(Clone, Default)]
pub struct FakeControlClient {
    inner: Arc<Mutex<FakeControlState>>,
}

impl FakeControlClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ControlCall> {
        self.inner.lock().calls.clone()
    }

    /// Queue a 200 reply carrying `jobs`.
    pub fn push_jobs(&self, jobs: Vec<JobSpec>) {
        self.inner
            .lock()
            .jobs_replies
            .push_back(JobsReply::Items(jobs));
    }

    /// Queue a 304 reply.
    pub fn push_not_modified(&self) {
        self.inner
            .lock()
            .jobs_replies
            .push_back(JobsReply::NotModified);
    }

    /// Queue an error reply with the given HTTP status.
    pub fn push_jobs_error(&self, status: u16) {
        self.inner
            .lock()
            .jobs_replies
            .push_back(JobsReply::Error(status));
    }

    /// Set the preview-task set returned by every fetch.
    pub fn set_preview_tasks(&self, tasks: Vec<PreviewTask>) {
        self.inner.lock().preview_tasks = tasks;
    }

    pub fn set_preview_error(&self, status: Option<u16>) {
        self.inner.lock().preview_error = status;
    }

    pub fn set_report_error(&self, status: Option<u16>) {
        self.inner.lock().report_error = status;
    }

    /// The most recent status report, if any.
    pub fn last_report(&self) -> Option<StatusReport> {
        self.inner
            .lock()
            .calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ControlCall::ReportStatus { report } => Some(report.clone()),
                _ => None,
            })
    }
}

#[async_trait]
impl ControlClient for FakeControlClient {
    async fn fetch_jobs(
        &self,
        last_fetch_unix: Option<i64>,
    ) -> Result<Option<Vec<JobSpec>>, ControlError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ControlCall::FetchJobs { last_fetch_unix });

        match inner.jobs_replies.pop_front() {
            Some(JobsReply::Items(jobs)) => Ok(Some(jobs)),
            Some(JobsReply::NotModified) | None => Ok(None),
            Some(JobsReply::Error(status)) => Err(ControlError::Status(status)),
        }
    }

    async fn fetch_preview_tasks(&self) -> Result<Vec<PreviewTask>, ControlError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ControlCall::FetchPreviewTasks);

        if let Some(status) = inner.preview_error {
            return Err(ControlError::Status(status));
        }
        Ok(inner.preview_tasks.clone())
    }

    async fn report_status(&self, report: &StatusReport) -> Result<(), ControlError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ControlCall::ReportStatus {
            report: report.clone(),
        });

        if let Some(status) = inner.report_error {
            return Err(ControlError::Status(status));
        }
        Ok(())
    }

    async fn unregister(&self) -> Result<(), ControlError> {
        self.inner.lock().calls.push(ControlCall::Unregister);
        Ok(())
    }
}

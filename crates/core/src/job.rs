// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job specification and executor status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

crate::define_id! {
    /// Unique identifier for a job specification.
    ///
    /// Assigned by the control plane; stable across updates to the spec.
    #[derive(Default)]
    pub struct JobId;
}

/// Errors raised when a job specification is internally inconsistent
#[derive(Debug, Error)]
pub enum JobSpecError {
    #[error("job {0}: detect job without detect options")]
    MissingDetectOptions(JobId),
    #[error("job {0}: video-segment job without segment options")]
    MissingSegmentOptions(JobId),
    #[error("job {0}: option block does not match kind {1}")]
    KindMismatch(JobId, JobKind),
}

/// The kind of work a job performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobKind {
    /// Frame-by-frame inference with trigger debouncing
    Detect,
    /// Rotating video chunk recording
    VideoSegment,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Detect => write!(f, "detect"),
            JobKind::VideoSegment => write!(f, "video-segment"),
        }
    }
}

/// Options for a detect job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectOptions {
    /// Model identifier on the inference server
    pub model: String,
    /// Minimum milliseconds between frames submitted to inference
    #[serde(rename = "interval")]
    pub interval_ms: u64,
    /// Ordered label names; class index = position
    pub labels: Vec<String>,
    /// Consecutive non-empty results required before an emission
    pub trigger_count: u32,
    /// Minimum seconds between emissions
    #[serde(rename = "triggerInterval")]
    pub trigger_interval_secs: u64,
}

/// Options for a video-segment job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentOptions {
    /// Duration of each recorded chunk in seconds
    #[serde(rename = "duration")]
    pub duration_secs: u64,
}

/// A job specification as published by the control plane.
///
/// Exactly one of `detect`/`segment` is populated and must match `kind`;
/// [`JobSpec::validate`] enforces this at executor construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    pub uuid: JobId,
    pub kind: JobKind,
    /// File path or live stream URL
    pub input: String,
    pub enabled: bool,
    /// Server-authoritative update timestamp (RFC 3339)
    pub update_time: DateTime<Utc>,
    #[serde(
        rename = "detectOptions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub detect: Option<DetectOptions>,
    #[serde(
        rename = "segmentOptions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub segment: Option<SegmentOptions>,
}

impl JobSpec {
    /// Check the kind/option-block invariant.
    pub fn validate(&self) -> Result<(), JobSpecError> {
        match self.kind {
            JobKind::Detect => {
                if self.segment.is_some() {
                    return Err(JobSpecError::KindMismatch(self.uuid.clone(), self.kind));
                }
                if self.detect.is_none() {
                    return Err(JobSpecError::MissingDetectOptions(self.uuid.clone()));
                }
            }
            JobKind::VideoSegment => {
                if self.detect.is_some() {
                    return Err(JobSpecError::KindMismatch(self.uuid.clone(), self.kind));
                }
                if self.segment.is_none() {
                    return Err(JobSpecError::MissingSegmentOptions(self.uuid.clone()));
                }
            }
        }
        Ok(())
    }
}

/// Lifecycle status of a job executor.
///
/// The discriminants are the wire integers used in status reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ExecutorStatus {
    Stopped = 0,
    Running = 1,
    Finished = 2,
    Failed = 3,
}

impl ExecutorStatus {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => ExecutorStatus::Running,
            2 => ExecutorStatus::Finished,
            3 => ExecutorStatus::Failed,
            _ => ExecutorStatus::Stopped,
        }
    }

    /// A terminal executor will never transition again on its own.
    pub fn is_terminal(self) -> bool {
        matches!(self, ExecutorStatus::Finished | ExecutorStatus::Failed)
    }
}

impl fmt::Display for ExecutorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutorStatus::Stopped => write!(f, "stopped"),
            ExecutorStatus::Running => write!(f, "running"),
            ExecutorStatus::Finished => write!(f, "finished"),
            ExecutorStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One job's entry in a status report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusEntry {
    /// Wire integer of [`ExecutorStatus`]. The field name typo is part of
    /// the protocol.
    #[serde(rename = "exectorStatus")]
    pub executor_status: i32,
}

/// Status report payload POSTed to the control plane.
///
/// Jobs without a live executor are reported as `stopped`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusReport {
    #[serde(rename = "jobStatus")]
    pub job_status: HashMap<String, JobStatusEntry>,
}

impl StatusReport {
    pub fn insert(&mut self, id: &JobId, status: ExecutorStatus) {
        self.job_status.insert(
            id.to_string(),
            JobStatusEntry {
                executor_status: status.as_u8() as i32,
            },
        );
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;

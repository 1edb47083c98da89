// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vigil-core: domain types for the Vigil edge device agent

pub mod artifact;
pub mod device;
pub mod id;
pub mod job;
pub mod preview;
pub mod time_fmt;

pub use artifact::{DetectBox, DetectMessage, SegmentMessage, Sidecar};
pub use device::{DeviceInfo, DevicePatch};
pub use id::{IdGen, UuidIdGen};
pub use job::{
    DetectOptions, ExecutorStatus, JobId, JobKind, JobSpec, JobSpecError, JobStatusEntry,
    SegmentOptions, StatusReport,
};
pub use preview::{PreviewTask, TaskId};
pub use time_fmt::{date_key, rfc1123, unix_nanos};

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O

pub mod control;
pub mod inference;
pub mod objstore;
pub mod publish;
pub mod subprocess;
pub mod video;

pub use control::{ControlClient, ControlError, HttpControlClient, RegisterRequest, RegisterResponse};
pub use inference::{HttpInferenceClient, InferenceClient, InferenceError};
pub use objstore::{S3Config, S3Uploader, UploadError, Uploader};
pub use publish::{NatsPublisher, PublishError, Publisher};
pub use video::{FfmpegVideoSource, Frame, FrameStream, VideoError, VideoSource};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use control::{ControlCall, FakeControlClient};
#[cfg(any(test, feature = "test-support"))]
pub use inference::{FakeInferenceClient, InferCall};
#[cfg(any(test, feature = "test-support"))]
pub use objstore::{FakeUploader, UploadCall};
#[cfg(any(test, feature = "test-support"))]
pub use publish::{FakePublisher, PublishCall};
#[cfg(any(test, feature = "test-support"))]
pub use video::FakeVideoSource;

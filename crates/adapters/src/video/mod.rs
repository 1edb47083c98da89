// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Video ingest: frame sources and external ffmpeg plumbing.

mod ffmpeg;
mod mjpeg;

pub use ffmpeg::{
    probe_codec, restream_command, segment_command, FfmpegFrameStream, FfmpegVideoSource,
};
pub use mjpeg::{jpeg_dimensions, MjpegSplitter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeFrameStream, FakeVideoSource};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from video ingest.
#[derive(Debug, Error)]
pub enum VideoError {
    #[error("input not openable: {0}")]
    Unopenable(String),
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("probe failed: {0}")]
    Probe(String),
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// One decoded-enough frame: the encoded JPEG plus its pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Opens a frame stream from a file path or live stream URL.
#[async_trait]
pub trait VideoSource: Clone + Send + Sync + 'static {
    type Stream: FrameStream + Send + 'static;

    /// Open the input. Fails if the input cannot be read at all; this is
    /// the executor's "input openable" precondition.
    async fn open(&self, input: &str) -> Result<Self::Stream, VideoError>;
}

/// A sequence of frames. `Ok(None)` is end of input.
#[async_trait]
pub trait FrameStream: Send {
    async fn next_frame(&mut self) -> Result<Option<Frame>, VideoError>;
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake video source for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{Frame, FrameStream, VideoError, VideoSource};

#[derive(Default)]
struct FakeVideoState {
    frames: Vec<Frame>,
    unopenable: bool,
    hold_open: bool,
    opens: usize,
}

/// Fake video source yielding preloaded frames.
///
/// With `hold_open` set, the stream behaves like a live camera: after the
/// preloaded frames it blocks instead of reporting EOF.
#[derive(Clone, Default)]
pub struct FakeVideoSource {
    inner: Arc<Mutex<FakeVideoState>>,
}

impl FakeVideoSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_frames(&self, frames: Vec<Frame>) {
        self.inner.lock().frames = frames;
    }

    /// Make `open` fail, for precondition tests.
    pub fn set_unopenable(&self, unopenable: bool) {
        self.inner.lock().unopenable = unopenable;
    }

    /// Block after the last frame instead of reporting EOF.
    pub fn set_hold_open(&self, hold: bool) {
        self.inner.lock().hold_open = hold;
    }

    /// How many times `open` has been called.
    pub fn opens(&self) -> usize {
        self.inner.lock().opens
    }
}

#[async_trait]
impl VideoSource for FakeVideoSource {
    type Stream = FakeFrameStream;

    async fn open(&self, input: &str) -> Result<Self::Stream, VideoError> {
        let mut inner = self.inner.lock();
        inner.opens += 1;
        if inner.unopenable {
            return Err(VideoError::Unopenable(input.to_string()));
        }
        Ok(FakeFrameStream {
            frames: inner.frames.clone().into(),
            hold_open: inner.hold_open,
        })
    }
}

/// Stream over a fake source's preloaded frames.
pub struct FakeFrameStream {
    frames: VecDeque<Frame>,
    hold_open: bool,
}

#[async_trait]
impl FrameStream for FakeFrameStream {
    async fn next_frame(&mut self) -> Result<Option<Frame>, VideoError> {
        match self.frames.pop_front() {
            Some(frame) => Ok(Some(frame)),
            None if self.hold_open => {
                std::future::pending::<()>().await;
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

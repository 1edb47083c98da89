// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ffmpeg/ffprobe plumbing: frame pipe, segmenter and restream commands.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStdout, Command};

use crate::subprocess::{run_with_timeout, FFPROBE_TIMEOUT};

use super::mjpeg::{jpeg_dimensions, MjpegSplitter};
use super::{Frame, FrameStream, VideoError, VideoSource};

/// Probe the codec name of an input's first video stream.
pub async fn probe_codec(input: &str) -> Result<String, VideoError> {
    let mut cmd = Command::new("ffprobe");
    cmd.args([
        "-v",
        "error",
        "-select_streams",
        "v:0",
        "-show_entries",
        "stream=codec_name",
        "-of",
        "default=noprint_wrappers=1:nokey=1",
        input,
    ])
    .stdin(Stdio::null());

    let output = run_with_timeout(cmd, FFPROBE_TIMEOUT, "ffprobe")
        .await
        .map_err(VideoError::Probe)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(VideoError::Unopenable(stderr.trim().to_string()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Command reading `input` in real time and writing an MJPEG stream to
/// stdout.
fn frame_pipe_command(input: &str) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.args([
        "-nostdin", "-loglevel", "error", "-re", "-i", input, "-f", "image2pipe", "-c:v", "mjpeg",
        "pipe:1",
    ])
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::null())
    .kill_on_drop(true);
    cmd
}

/// Command recording `input` into rotating chunks under `dir`.
///
/// The strftime pattern makes chunk names monotonically sortable by
/// creation time, which the uploader's skip-the-newest discipline
/// depends on.
pub fn segment_command(input: &str, dir: &Path, duration_secs: u64) -> Command {
    let pattern = dir.join("segment_%Y%m%d%H%M%S.mp4");
    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-nostdin", "-loglevel", "error", "-i", input])
        .args(["-c", "copy", "-f", "segment"])
        .args(["-segment_time", &duration_secs.to_string()])
        .args(["-reset_timestamps", "1", "-strftime", "1"])
        .arg(pattern)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    cmd
}

/// Command pulling from `pull` and pushing to `push`.
///
/// Pass-through for H.264 inputs; real-time transcode for H.265.
pub fn restream_command(pull: &str, push: &str, transcode: bool) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-nostdin", "-loglevel", "error", "-re", "-i", pull]);
    if transcode {
        cmd.args([
            "-c:v",
            "libx264",
            "-preset",
            "ultrafast",
            "-tune",
            "zerolatency",
            "-c:a",
            "copy",
        ]);
    } else {
        cmd.args(["-c", "copy"]);
    }
    cmd.args(["-f", "flv", push])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    cmd
}

/// Frame source decoding any ffmpeg-readable input to an MJPEG pipe.
#[derive(Clone, Default)]
pub struct FfmpegVideoSource;

impl FfmpegVideoSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl VideoSource for FfmpegVideoSource {
    type Stream = FfmpegFrameStream;

    async fn open(&self, input: &str) -> Result<Self::Stream, VideoError> {
        // Probe first: a bad path or dead stream should fail the open,
        // not surface later as an instant EOF.
        probe_codec(input).await?;

        let mut child = frame_pipe_command(input)
            .spawn()
            .map_err(|e| VideoError::Spawn(e.to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| VideoError::Spawn("no stdout pipe".to_string()))?;

        Ok(FfmpegFrameStream {
            child,
            stdout,
            splitter: MjpegSplitter::new(),
            eof: false,
        })
    }
}

/// Frames split out of a live ffmpeg MJPEG pipe.
pub struct FfmpegFrameStream {
    child: Child,
    stdout: ChildStdout,
    splitter: MjpegSplitter,
    eof: bool,
}

#[async_trait]
impl FrameStream for FfmpegFrameStream {
    async fn next_frame(&mut self) -> Result<Option<Frame>, VideoError> {
        let mut chunk = [0u8; 16 * 1024];
        loop {
            if let Some(bytes) = self.splitter.next_frame() {
                // Frames whose header cannot be parsed are skipped.
                if let Some((width, height)) = jpeg_dimensions(&bytes) {
                    return Ok(Some(Frame {
                        bytes,
                        width,
                        height,
                    }));
                }
                continue;
            }

            if self.eof {
                let _ = self.child.wait().await;
                return Ok(None);
            }

            let n = self.stdout.read(&mut chunk).await?;
            if n == 0 {
                self.eof = true;
                continue;
            }
            self.splitter.push(&chunk[..n]);
        }
    }
}

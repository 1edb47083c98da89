// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Detection artifacts and message-bus payloads.

use serde::{Deserialize, Serialize};

use crate::job::JobId;

/// One detected bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub confidence: f32,
    pub class_id: u32,
    pub label: String,
}

/// Sidecar metadata written next to each triggered frame.
///
/// Persisted as `<ts>.json` beside `<ts>.jpg`; written via
/// `<ts>.json.tmp` + rename so the pair becomes visible atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sidecar {
    pub job_id: JobId,
    /// Event time in nanoseconds since the Unix epoch
    pub timestamp: i64,
    pub boxes: Vec<DetectBox>,
}

/// Message published for each uploaded detection artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectMessage {
    pub job_uuid: JobId,
    /// Event time in nanoseconds since the Unix epoch
    pub timestamp: i64,
    pub image_path: String,
    pub detect_boxes: Vec<DetectBox>,
}

/// Message published for each uploaded video segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentMessage {
    pub job_uuid: JobId,
    /// Event time in nanoseconds since the Unix epoch
    pub timestamp: i64,
    pub video_path: String,
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Artifact layout: remote keys, sidecar writes, work-directory scans.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use vigil_core::{date_key, JobId, Sidecar};

/// Remote object key: `/<deviceUUID>/YYYY/MM/DD/<jobUUID>/<basename>`.
///
/// The date is the artifact's own event time, not upload time.
pub fn remote_key(device_uuid: &str, ts: DateTime<Utc>, job: &JobId, basename: &str) -> String {
    format!("/{}/{}/{}/{}", device_uuid, date_key(ts), job, basename)
}

/// Write a detection artifact pair into `dir`.
///
/// The image is written first, then the sidecar via `.json.tmp` +
/// rename, so an uploader never observes a sidecar whose image is
/// incomplete.
pub async fn write_detection_artifact(
    dir: &Path,
    ts_nanos: i64,
    jpeg: &[u8],
    sidecar: &Sidecar,
) -> io::Result<()> {
    let image_path = dir.join(format!("{ts_nanos}.jpg"));
    let tmp_path = dir.join(format!("{ts_nanos}.json.tmp"));
    let sidecar_path = dir.join(format!("{ts_nanos}.json"));

    tokio::fs::write(&image_path, jpeg).await?;

    let json = serde_json::to_vec(sidecar).map_err(io::Error::other)?;
    tokio::fs::write(&tmp_path, json).await?;
    tokio::fs::rename(&tmp_path, &sidecar_path).await?;
    Ok(())
}

/// Completed sidecars in `dir`, sorted by name. `.tmp` files are
/// write-in-progress and ignored.
pub async fn scan_sidecars(dir: &Path) -> io::Result<Vec<PathBuf>> {
    scan_extension(dir, "json").await
}

/// Video chunks in `dir`, sorted by name. With the segmenter's strftime
/// naming, name order is creation order.
pub async fn scan_segments(dir: &Path) -> io::Result<Vec<PathBuf>> {
    scan_extension(dir, "mp4").await
}

async fn scan_extension(dir: &Path, ext: &str) -> io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some(ext) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Event time for an artifact file: mtime, falling back to now.
pub async fn file_event_time(path: &Path) -> DateTime<Utc> {
    match tokio::fs::metadata(path).await.and_then(|m| m.modified()) {
        Ok(mtime) => mtime.into(),
        Err(_) => Utc::now(),
    }
}

#[cfg(test)]
#[path = "artifact_tests.rs"]
mod tests;

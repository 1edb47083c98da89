// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;
use vigil_adapters::{FakePublisher, FakeUploader};

struct Harness {
    _dir: TempDir,
    work_dir: PathBuf,
    uploader: FakeUploader,
    publisher: FakePublisher,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let work_dir = dir.path().join("j1");
        std::fs::create_dir_all(&work_dir).unwrap();
        Self {
            _dir: dir,
            work_dir,
            uploader: FakeUploader::new(),
            publisher: FakePublisher::new(),
        }
    }

    fn chunk(&self, name: &str) {
        std::fs::write(self.work_dir.join(name), b"mp4-bytes").unwrap();
    }

    async fn pass(&self, writer_active: bool) {
        upload_segments(
            &JobId::new("j1"),
            "dev-1",
            &self.work_dir,
            "vigil.events",
            &self.uploader,
            &self.publisher,
            writer_active,
        )
        .await;
    }

    fn remaining(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.work_dir)
            .unwrap()
            .filter_map(|e| e.unwrap().file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }
}

#[tokio::test]
async fn skips_the_newest_chunk_while_the_writer_is_active() {
    let harness = Harness::new();
    harness.chunk("segment_20240101120000.mp4");
    harness.chunk("segment_20240101120100.mp4");
    harness.chunk("segment_20240101120200.mp4");

    harness.pass(true).await;

    let keys = harness.uploader.uploaded_keys();
    assert_eq!(keys.len(), 2);
    assert!(keys[0].ends_with("/j1/segment_20240101120000.mp4"));
    assert!(keys[1].ends_with("/j1/segment_20240101120100.mp4"));

    assert_eq!(harness.remaining(), vec!["segment_20240101120200.mp4"]);
}

#[tokio::test]
async fn a_single_chunk_is_left_alone_while_the_writer_is_active() {
    let harness = Harness::new();
    harness.chunk("segment_20240101120000.mp4");

    harness.pass(true).await;

    assert!(harness.uploader.calls().is_empty());
    assert_eq!(harness.remaining(), vec!["segment_20240101120000.mp4"]);
}

#[tokio::test]
async fn uploads_the_tail_once_the_writer_has_exited() {
    let harness = Harness::new();
    harness.chunk("segment_20240101120000.mp4");
    harness.chunk("segment_20240101120100.mp4");

    harness.pass(false).await;

    assert_eq!(harness.uploader.calls().len(), 2);
    assert!(harness.remaining().is_empty());
}

#[tokio::test]
async fn publishes_a_pointer_per_uploaded_chunk() {
    let harness = Harness::new();
    harness.chunk("segment_20240101120000.mp4");

    harness.pass(false).await;

    let payloads = harness.publisher.json_payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0]["jobUuid"], "j1");
    assert!(payloads[0]["videoPath"]
        .as_str()
        .unwrap()
        .ends_with("/j1/segment_20240101120000.mp4"));
    assert!(payloads[0]["timestamp"].as_i64().unwrap() > 0);
    assert!(payloads[0].get("imagePath").is_none());
}

#[tokio::test]
async fn failed_uploads_leave_chunks_for_the_next_tick() {
    let harness = Harness::new();
    harness.chunk("segment_20240101120000.mp4");
    harness.chunk("segment_20240101120100.mp4");

    harness.uploader.set_fail(true);
    harness.pass(false).await;

    assert_eq!(harness.remaining().len(), 2);
    assert!(harness.publisher.calls().is_empty());

    harness.uploader.set_fail(false);
    harness.pass(false).await;
    assert!(harness.remaining().is_empty());
    assert_eq!(harness.publisher.calls().len(), 2);
}

#[tokio::test]
async fn construction_rejects_mismatched_spec() {
    use chrono::TimeZone;
    use vigil_core::JobKind;

    let spec = JobSpec {
        uuid: JobId::new("j1"),
        kind: JobKind::VideoSegment,
        input: "rtsp://camera/stream".to_string(),
        enabled: true,
        update_time: chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        detect: None,
        segment: None,
    };
    let result = SegmentExecutor::new(
        spec,
        "dev-1".to_string(),
        PathBuf::from("/tmp/j1"),
        "vigil.events".to_string(),
        FakeUploader::new(),
        FakePublisher::new(),
        CancellationToken::new(),
    );
    assert!(matches!(result, Err(ExecutorError::Spec(_))));
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

/// A minimal structurally-valid JPEG: SOI, SOF0 with the given
/// dimensions, EOI.
fn tiny_jpeg(width: u16, height: u16) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    // SOF0: marker, len=11, precision, height, width, 1 component
    data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x0B, 0x08]);
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&[0x01, 0x01, 0x11, 0x00]);
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

#[test]
fn splitter_extracts_single_frame() {
    let mut splitter = MjpegSplitter::new();
    let jpeg = tiny_jpeg(640, 480);
    splitter.push(&jpeg);

    assert_eq!(splitter.next_frame(), Some(jpeg));
    assert_eq!(splitter.next_frame(), None);
    assert_eq!(splitter.pending_len(), 0);
}

#[test]
fn splitter_handles_split_chunks() {
    let mut splitter = MjpegSplitter::new();
    let jpeg = tiny_jpeg(640, 480);
    let (a, b) = jpeg.split_at(5);

    splitter.push(a);
    assert_eq!(splitter.next_frame(), None);

    splitter.push(b);
    assert_eq!(splitter.next_frame(), Some(jpeg));
}

#[test]
fn splitter_extracts_back_to_back_frames() {
    let mut splitter = MjpegSplitter::new();
    let first = tiny_jpeg(640, 480);
    let second = tiny_jpeg(320, 240);

    let mut stream = first.clone();
    stream.extend_from_slice(&second);
    splitter.push(&stream);

    assert_eq!(splitter.next_frame(), Some(first));
    assert_eq!(splitter.next_frame(), Some(second));
    assert_eq!(splitter.next_frame(), None);
}

#[test]
fn splitter_discards_leading_garbage() {
    let mut splitter = MjpegSplitter::new();
    let jpeg = tiny_jpeg(640, 480);

    let mut stream = vec![0x00, 0x13, 0x37];
    stream.extend_from_slice(&jpeg);
    splitter.push(&stream);

    assert_eq!(splitter.next_frame(), Some(jpeg));
}

#[test]
fn dimensions_from_sof0() {
    assert_eq!(jpeg_dimensions(&tiny_jpeg(640, 480)), Some((640, 480)));
    assert_eq!(jpeg_dimensions(&tiny_jpeg(1920, 1080)), Some((1920, 1080)));
}

#[test]
fn dimensions_skip_leading_app_segments() {
    // APP0 segment before the SOF, as emitted by most encoders.
    let mut data = vec![0xFF, 0xD8];
    data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x04, 0x4A, 0x46]);
    data.extend_from_slice(&tiny_jpeg(800, 600)[2..]);

    assert_eq!(jpeg_dimensions(&data), Some((800, 600)));
}

#[yare::parameterized(
    empty = { &[] },
    not_a_jpeg = { &[0x00, 0x01, 0x02, 0x03] },
    truncated_soi = { &[0xFF, 0xD8, 0xFF] },
)]
fn dimensions_reject_malformed(data: &[u8]) {
    assert_eq!(jpeg_dimensions(data), None);
}

#[test]
fn dimensions_reject_missing_sof() {
    // SOI then EOI with no SOF in between.
    assert_eq!(jpeg_dimensions(&[0xFF, 0xD8, 0xFF, 0xD9]), None);
}

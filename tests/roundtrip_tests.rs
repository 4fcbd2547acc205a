//! Integration tests for parsing CLX archives and writing them back.

mod common;

use clx::clx::{probe_layout, Archive, IStream, Layout};
use clx::Error;
use common::*;

use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_roundtrip_multi_group_identity() {
    let bytes = build_clx(&three_groups());
    let archive = Archive::from_bytes(bytes.clone()).expect("Failed to parse archive");

    assert_eq!(archive.group_offsets(), &[12, 140, 310]);
    assert_eq!(archive.file_size(), 406);
    assert!(archive.is_contiguous());

    let written = archive.to_bytes().expect("Failed to write archive");
    assert_eq!(written, bytes);
}

#[test]
fn test_roundtrip_after_recalculation_identity() {
    let bytes = build_clx(&four_groups());
    let mut archive = Archive::from_bytes(bytes.clone()).expect("Failed to parse archive");
    let parsed = archive.clone();

    archive.recalculate_offsets().expect("Failed to recalculate");
    assert_eq!(archive, parsed);
    assert_eq!(archive.to_bytes().expect("Failed to write archive"), bytes);
}

#[test]
fn test_roundtrip_mono_group_identity() {
    let bytes = build_clx(&[vec![frame(3, 2, 0x70, 6), frame(3, 2, 0x71, 6), frame(3, 2, 0x72, 9)]]);
    let stream = IStream::from_bytes(bytes.clone());
    assert_eq!(probe_layout(&stream).unwrap(), Layout::MonoGroup);

    let archive = Archive::read(&stream).expect("Failed to parse archive");
    assert!(archive.is_mono_group());
    assert_eq!(archive.group_offsets(), &[0]);
    assert_eq!(archive.clips()[0].frame_count(), 3);
    assert_eq!(archive.to_bytes().unwrap(), bytes);
}

#[test]
fn test_roundtrip_through_files() {
    let bytes = build_clx(&four_groups());
    let mut input = NamedTempFile::new().expect("Failed to create temp file");
    input.write_all(&bytes).unwrap();
    input.flush().unwrap();

    for use_mmap in [true, false] {
        let archive = Archive::open_opts(input.path(), use_mmap).expect("Failed to open archive");
        let output = NamedTempFile::new().expect("Failed to create temp file");
        archive.write(output.path()).expect("Failed to write archive");
        assert_eq!(std::fs::read(output.path()).unwrap(), bytes);
    }
}

#[test]
fn test_frame_headers_survive_parsing() {
    let archive = Archive::from_bytes(build_clx(&four_groups())).unwrap();
    let widths: Vec<u16> = archive
        .clips()
        .iter()
        .map(|c| c.frames()[0].width().unwrap())
        .collect();
    assert_eq!(widths, vec![8, 16, 2, 32]);

    let header = archive.clips()[1].frames()[0].header().unwrap();
    assert_eq!(header.header_size, 10);
    assert_eq!(header.height, 4);
}

#[test]
fn test_single_entry_table_is_kept() {
    // One group behind a one-entry group table
    let group = vec![frame(1, 1, 0x30, 30)];
    let mut bytes = 4u32.to_be_bytes().to_vec();
    let mono = build_clx(&[group]);
    bytes.extend_from_slice(&mono);

    let archive = Archive::from_bytes(bytes.clone()).unwrap();
    assert_eq!(archive.group_offsets(), &[4]);
    assert!(archive.has_group_table());
    assert_eq!(archive.to_bytes().unwrap(), bytes);

    // Recalculation moves the lone group to offset 0
    let mut archive = archive;
    archive.recalculate_offsets().unwrap();
    assert!(!archive.has_group_table());
    assert_eq!(archive.to_bytes().unwrap(), mono);
}

#[test]
fn test_truncated_archive_rejected() {
    let mut bytes = build_clx(&three_groups());
    bytes.truncate(400);
    let err = Archive::from_bytes(bytes).unwrap_err();
    assert!(err.is_malformed(), "unexpected error: {err}");
}

#[test]
fn test_empty_input_rejected() {
    assert!(matches!(
        Archive::from_bytes(Vec::new()),
        Err(Error::UnexpectedEof { pos: 0, .. })
    ));
}

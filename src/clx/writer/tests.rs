use super::*;
use std::io::Cursor;
use tempfile::{tempdir, NamedTempFile};

use crate::clx::format::STRIPPED_SUFFIX;

fn frame(width: u16, height: u16, fill: u8, pixels: usize) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&10u16.to_be_bytes());
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&height.to_be_bytes());
    out.extend(std::iter::repeat(fill).take(pixels));
    out
}

fn sample_archive() -> Archive {
    Archive::from_clips(vec![
        Clip::from_images(vec![frame(4, 4, 0x10, 10), frame(4, 4, 0x11, 12)]).unwrap(),
        Clip::from_images(vec![frame(8, 2, 0x20, 20)]).unwrap(),
    ])
    .unwrap()
}

#[test]
fn test_write_multi_group_layout() -> crate::util::Result<()> {
    let archive = sample_archive();
    let bytes = archive.to_bytes()?;
    assert_eq!(bytes.len() as u64, archive.file_size());

    // Group table
    assert_eq!(&bytes[0..4], &8u32.to_be_bytes());
    let second = archive.group_offsets()[1];
    assert_eq!(&bytes[4..8], &second.to_be_bytes());

    // First clip header: count, relative frame offsets, next pointer
    assert_eq!(&bytes[8..12], &2u32.to_be_bytes());
    assert_eq!(&bytes[12..16], &16u32.to_be_bytes());
    assert_eq!(&bytes[16..20], &32u32.to_be_bytes());
    assert_eq!(&bytes[20..24], &(16u32 + 16 + 18).to_be_bytes());

    // First frame payload follows the header
    assert_eq!(&bytes[24..30], &[0, 10, 0, 4, 0, 4]);
    Ok(())
}

#[test]
fn test_write_mono_group_has_no_table() -> crate::util::Result<()> {
    let archive =
        Archive::from_clips(vec![Clip::from_images(vec![frame(1, 1, 0x55, 2)]).unwrap()])?;
    let bytes = archive.to_bytes()?;

    assert_eq!(bytes.len(), 12 + 8);
    assert_eq!(&bytes[0..4], &1u32.to_be_bytes());
    assert_eq!(&bytes[4..8], &12u32.to_be_bytes());
    assert_eq!(&bytes[8..12], &20u32.to_be_bytes());
    Ok(())
}

#[test]
fn test_written_bytes_parse_back() -> crate::util::Result<()> {
    let archive = sample_archive();
    let bytes = archive.to_bytes()?;
    let parsed = Archive::from_bytes(bytes.clone())?;

    assert_eq!(parsed, archive);
    assert_eq!(parsed.to_bytes()?, bytes);
    Ok(())
}

#[test]
fn test_write_file() -> crate::util::Result<()> {
    let temp = NamedTempFile::new()?;
    let archive = sample_archive();

    let size = archive.write(temp.path())?;
    assert_eq!(size, archive.file_size());
    assert_eq!(std::fs::read(temp.path())?, archive.to_bytes()?);
    Ok(())
}

#[test]
fn test_write_file_leaves_no_temporaries() -> crate::util::Result<()> {
    let dir = tempdir()?;
    let target = dir.path().join(format!("out.clx{}", STRIPPED_SUFFIX));
    sample_archive().write(&target)?;

    let names: Vec<_> = std::fs::read_dir(dir.path())?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name())
        .collect();
    assert_eq!(names.len(), 1);
    assert_eq!(names[0], "out.clx.stripped");
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_write_file_mode_matches_file_create() -> crate::util::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fn mode(path: &std::path::Path) -> std::io::Result<u32> {
        Ok(std::fs::metadata(path)?.permissions().mode() & 0o777)
    }

    let dir = tempdir()?;
    let target = dir.path().join("out.clx");
    sample_archive().write(&target)?;

    let plain = dir.path().join("plain");
    std::fs::File::create(&plain)?;
    assert_eq!(mode(&target)?, mode(&plain)?);
    Ok(())
}

#[test]
fn test_write_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("missing").join("out.clx");
    assert!(matches!(sample_archive().write(&target), Err(Error::Io(_))));
    assert!(!target.exists());
}

#[test]
fn test_ostream_positions() -> crate::util::Result<()> {
    let mut stream = OStream::new(Cursor::new(Vec::new()));
    stream.seek(6)?;
    stream.write_u16(0x0102)?;
    assert_eq!(stream.pos(), 8);
    stream.seek(0)?;
    stream.write_u32(0x0a0b_0c0d)?;
    assert_eq!(stream.pos(), 4);
    stream.write_bytes(&[0xee])?;
    stream.flush()?;

    let bytes = stream.into_inner().into_inner();
    assert_eq!(bytes, vec![0x0a, 0x0b, 0x0c, 0x0d, 0xee, 0x00, 0x01, 0x02]);
    Ok(())
}

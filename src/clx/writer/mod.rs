//! CLX archive writer.
//!
//! Serialization runs in three passes, each seeking to the absolute
//! offsets recorded in the model: the group-offset table, the clip
//! headers, then the frame payloads.

mod stream;

pub use stream::OStream;

use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use tempfile::Builder;

use super::archive::Archive;
use super::clip::Clip;
use crate::util::{Error, Result};

/// Write `archive` to a seekable writer. Returns the archive size in bytes.
pub fn write_archive<W: Write + Seek>(archive: &Archive, writer: W) -> Result<u64> {
    archive.validate()?;
    let mut stream = OStream::new(writer);

    if archive.has_group_table() {
        write_group_table(&mut stream, archive)?;
        tracing::debug!(groups = archive.group_count(), "wrote group offsets");
    }

    for clip in archive.clips() {
        write_clip_header(&mut stream, clip)?;
    }
    tracing::debug!("wrote clip headers");

    for clip in archive.clips() {
        for frame in clip.frames() {
            stream.seek(u64::from(frame.offset()))?;
            stream.write_bytes(frame.image())?;
        }
    }
    tracing::debug!("wrote frames");

    stream.flush()?;
    Ok(archive.file_size())
}

/// Write `archive` to a new file at `path`.
///
/// Data goes to a temporary file in the same directory, renamed over
/// `path` only after every pass has completed. The file gets the same
/// umask-derived mode as one made by `File::create`.
pub fn write_file(archive: &Archive, path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    builder.prefix(".clx");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Masked by the process umask on creation
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut temp = builder.tempfile_in(dir)?;
    let size = write_archive(archive, BufWriter::new(temp.as_file_mut()))?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::info!(path = %path.display(), size, "wrote archive");
    Ok(size)
}

fn write_group_table<W: Write + Seek>(stream: &mut OStream<W>, archive: &Archive) -> Result<()> {
    stream.seek(0)?;
    for &offset in archive.group_offsets() {
        stream.write_u32(offset)?;
    }
    Ok(())
}

/// Frame count, frame offsets relative to the clip, then `nextOffset`.
fn write_clip_header<W: Write + Seek>(stream: &mut OStream<W>, clip: &Clip) -> Result<()> {
    let frame_count = u32::try_from(clip.frame_count())
        .map_err(|_| Error::overflow(format!("frame count {}", clip.frame_count())))?;

    stream.seek(u64::from(clip.offset()))?;
    stream.write_u32(frame_count)?;
    for &frame_offset in clip.frame_offsets() {
        let relative = frame_offset.checked_sub(clip.offset()).ok_or_else(|| {
            Error::invalid(format!(
                "frame at {} precedes its group at {}",
                frame_offset,
                clip.offset()
            ))
        })?;
        stream.write_u32(relative)?;
    }
    stream.write_u32(clip.next_offset())
}

#[cfg(test)]
mod tests;

//! CLX archive parser.
//!
//! The archive has no magic bytes and no explicit layout tag. The first
//! word is either the frame count of a single implicit group at offset 0
//! (mono-group) or the first entry of the group-offset table
//! (multi-group). [`probe_layout`] tells the two apart by following the
//! word as a frame count to where that group's `nextOffset` would sit and
//! comparing the value found there with the file size.

use super::clip::Clip;
use super::format::*;
use super::frame::Frame;
use super::reader::IStream;
use crate::util::{Error, Result};

/// Archive layout detected from the first word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One group at offset 0, no group-offset table.
    MonoGroup,
    /// Group-offset table occupying `[0, table_size)`.
    MultiGroup { table_size: u32 },
}

/// Mono-group predicate: the tail pointer found by reading the first word
/// as a frame count equals the file size.
///
/// This is a size coincidence, not a format tag. A multi-group archive
/// whose bytes at the probed position happen to encode the file size is
/// reported as mono-group.
#[inline]
pub fn is_mono_group(tail_pointer: u32, file_size: u64) -> bool {
    u64::from(tail_pointer) == file_size
}

/// Determine whether the stream holds a mono-group or multi-group archive.
pub fn probe_layout(stream: &IStream) -> Result<Layout> {
    let file_size = stream.size();
    if file_size > u64::from(u32::MAX) {
        return Err(Error::overflow(format!("archive of {} bytes", file_size)));
    }

    let first = stream.read_u32(0)?;
    let tail_pos = next_offset_pos(first);
    let tail = stream.read_u32(tail_pos)?;
    tracing::debug!(file_size, first, tail_pos, tail, "probed archive layout");

    if is_mono_group(tail, file_size) {
        tracing::debug!("mono-group archive, using implicit group offset 0");
        Ok(Layout::MonoGroup)
    } else {
        Ok(Layout::MultiGroup { table_size: first })
    }
}

/// Read the group-offset table (or synthesize `[0]` for mono-group).
pub fn read_group_offsets(stream: &IStream) -> Result<Vec<u32>> {
    let table_size = match probe_layout(stream)? {
        Layout::MonoGroup => return Ok(vec![0]),
        Layout::MultiGroup { table_size } => table_size,
    };

    if table_size == 0 || table_size % WORD_SIZE != 0 {
        return Err(Error::invalid(format!(
            "group offset table size {} is not a positive multiple of {}",
            table_size, WORD_SIZE
        )));
    }
    if u64::from(table_size) >= stream.size() {
        return Err(Error::UnexpectedEof {
            pos: 0,
            len: u64::from(table_size),
        });
    }

    // The first entry is the table size itself, read again in this pass
    let mut offsets = Vec::with_capacity((table_size / WORD_SIZE) as usize);
    let mut pos = 0u32;
    while pos != table_size {
        let offset = stream.read_u32(u64::from(pos))?;
        if u64::from(offset) >= stream.size() {
            return Err(Error::invalid(format!(
                "group {} offset {} lies outside the file",
                offsets.len(),
                offset
            )));
        }
        if offsets.last().is_some_and(|&prev| offset <= prev) || offset < table_size {
            return Err(Error::invalid(format!(
                "group {} offset {} is out of order",
                offsets.len(),
                offset
            )));
        }
        offsets.push(offset);
        pos += WORD_SIZE;
    }

    tracing::debug!(groups = offsets.len(), "read group offset table");
    Ok(offsets)
}

/// Parse the clip whose header starts at `group_offset`.
pub fn read_clip(stream: &IStream, group_offset: u32) -> Result<Clip> {
    let base = u64::from(group_offset);
    let frame_count = stream.read_u32(base)?;
    if frame_count == 0 {
        return Err(Error::invalid(format!("group at {} has no frames", group_offset)));
    }

    // Bound the header before allocating for it
    let header_end = base + next_offset_pos(frame_count) + u64::from(NEXT_OFFSET_SIZE);
    if header_end > stream.size() {
        return Err(Error::UnexpectedEof {
            pos: base,
            len: header_end - base,
        });
    }

    let mut frame_offsets = Vec::with_capacity(frame_count as usize);
    for f in 0..u64::from(frame_count) {
        let relative = stream.read_u32(base + u64::from(FRAME_COUNT_SIZE) + f * u64::from(WORD_SIZE))?;
        let absolute = relative
            .checked_add(group_offset)
            .ok_or_else(|| Error::overflow(format!("frame {} of group at {}", f, group_offset)))?;
        frame_offsets.push(absolute);
    }

    let next_offset = stream.read_u32(header_end - u64::from(NEXT_OFFSET_SIZE))?;
    let end = group_offset
        .checked_add(next_offset)
        .ok_or_else(|| Error::overflow(format!("end of group at {}", group_offset)))?;

    let frames = read_frames(stream, &frame_offsets, end)?;
    Ok(Clip::from_parts(group_offset, next_offset, frames))
}

/// Read every frame payload. A frame ends where the next one starts; the
/// last frame ends at `group_end`.
fn read_frames(stream: &IStream, frame_offsets: &[u32], group_end: u32) -> Result<Vec<Frame>> {
    let mut frames = Vec::with_capacity(frame_offsets.len());
    for (f, &start) in frame_offsets.iter().enumerate() {
        let end = frame_offsets.get(f + 1).copied().unwrap_or(group_end);
        if end <= start {
            return Err(Error::invalid(format!(
                "frame {} spans [{}, {}) which is empty or reversed",
                f, start, end
            )));
        }
        let image = stream.read_bytes(u64::from(start), (end - start) as usize)?;
        frames.push(Frame::new(start, image)?);
    }
    Ok(frames)
}

/// Parse a whole archive into its group offsets and clips.
pub fn parse(stream: &IStream) -> Result<(Vec<u32>, Vec<Clip>)> {
    tracing::debug!(file_size = stream.size(), "parsing archive");
    let group_offsets = read_group_offsets(stream)?;
    let clips = group_offsets
        .iter()
        .map(|&offset| read_clip(stream, offset))
        .collect::<Result<Vec<_>>>()?;
    Ok((group_offsets, clips))
}

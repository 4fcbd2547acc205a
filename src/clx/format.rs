//! CLX format constants and size helpers.

use crate::util::{Error, Result};

/// Size of every offset, count and pointer field in the archive.
pub const WORD_SIZE: u32 = 4;

/// Size of the `frameCount` field at the start of a group header.
pub const FRAME_COUNT_SIZE: u32 = WORD_SIZE;

/// Size of the `nextOffset` field closing a group header.
pub const NEXT_OFFSET_SIZE: u32 = WORD_SIZE;

/// Size of the header at the start of each frame payload
/// (header size, width, height; 16 bits each).
pub const FRAME_HEADER_SIZE: usize = 6;

/// Offset of the frame header-size field inside a frame payload.
pub const FRAME_HEADER_SIZE_OFFSET: usize = 0;

/// Offset of the frame width field inside a frame payload.
pub const FRAME_WIDTH_OFFSET: usize = 2;

/// Offset of the frame height field inside a frame payload.
pub const FRAME_HEIGHT_OFFSET: usize = 4;

/// Suffix appended to the input path to name an edited archive.
pub const STRIPPED_SUFFIX: &str = ".stripped";

/// Serialized size of a group header holding `frame_count` frame offsets.
#[inline]
pub fn clip_header_size(frame_count: usize) -> Result<u32> {
    u32::try_from(frame_count)
        .ok()
        .and_then(|n| n.checked_mul(WORD_SIZE))
        .and_then(|n| n.checked_add(FRAME_COUNT_SIZE + NEXT_OFFSET_SIZE))
        .ok_or_else(|| Error::overflow(format!("header of a group with {} frames", frame_count)))
}

/// Serialized size of the group-offset table for `group_count` groups.
#[inline]
pub fn group_table_size(group_count: usize) -> Result<u32> {
    u32::try_from(group_count)
        .ok()
        .and_then(|n| n.checked_mul(WORD_SIZE))
        .ok_or_else(|| Error::overflow(format!("offset table of {} groups", group_count)))
}

/// Position of the `nextOffset` field relative to the start of a group
/// header that declares `frame_count` frames.
#[inline]
pub const fn next_offset_pos(frame_count: u32) -> u64 {
    frame_count as u64 * WORD_SIZE as u64 + FRAME_COUNT_SIZE as u64
}

/// Bytes needed to tell the layout apart when the first word is `first`:
/// the probe reads it as a frame count and looks at the `nextOffset` word
/// of a group at offset 0.
#[inline]
pub const fn layout_probe_end(first: u32) -> u64 {
    next_offset_pos(first) + NEXT_OFFSET_SIZE as u64
}

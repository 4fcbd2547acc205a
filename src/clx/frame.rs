//! A single frame: one contiguous pixel payload at an absolute offset.

use super::codec;
use super::format::*;
use crate::util::{Error, Result};

/// Header at the start of every frame payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub header_size: u16,
    pub width: u16,
    pub height: u16,
}

/// One still image of a clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    offset: u32,
    image: Vec<u8>,
}

impl Frame {
    /// Create a frame from its absolute offset and raw payload.
    ///
    /// The payload must be non-empty and addressable with 32-bit offsets.
    pub fn new(offset: u32, image: Vec<u8>) -> Result<Self> {
        if image.is_empty() {
            return Err(Error::invalid(format!("empty frame at offset {}", offset)));
        }
        if u32::try_from(image.len()).is_err() {
            return Err(Error::overflow(format!("frame of {} bytes", image.len())));
        }
        Ok(Self { offset, image })
    }

    /// Absolute position of the payload in the archive.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Raw payload bytes (frame header followed by pixel data).
    #[inline]
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// Payload length in bytes.
    #[inline]
    pub fn size(&self) -> u32 {
        // Bounded by the check in `new`
        self.image.len() as u32
    }

    pub(crate) fn set_offset(&mut self, offset: u32) {
        self.offset = offset;
    }

    /// Decode the frame header, if the payload is long enough to hold one.
    pub fn header(&self) -> Option<FrameHeader> {
        if self.image.len() < FRAME_HEADER_SIZE {
            return None;
        }
        Some(FrameHeader {
            header_size: self.header_size()?,
            width: self.width()?,
            height: self.height()?,
        })
    }

    /// Declared header size.
    pub fn header_size(&self) -> Option<u16> {
        codec::decode_u16(&self.image, FRAME_HEADER_SIZE_OFFSET)
    }

    /// Declared width in pixels.
    pub fn width(&self) -> Option<u16> {
        codec::decode_u16(&self.image, FRAME_WIDTH_OFFSET)
    }

    /// Declared height in pixels.
    pub fn height(&self) -> Option<u16> {
        codec::decode_u16(&self.image, FRAME_HEIGHT_OFFSET)
    }
}

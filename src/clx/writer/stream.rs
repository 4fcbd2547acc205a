//! Positioned output stream for CLX data.

use std::io::{Seek, SeekFrom, Write};

use crate::clx::codec;
use crate::util::Result;

/// Output stream that tracks its write position.
///
/// Seeking past the current end and writing leaves the skipped range
/// zero-filled, as files and cursors do.
pub struct OStream<W: Write + Seek> {
    writer: W,
    pos: u64,
}

impl<W: Write + Seek> OStream<W> {
    /// Wrap a seekable writer positioned at its start.
    pub fn new(writer: W) -> Self {
        Self { writer, pos: 0 }
    }

    /// Get the current write position.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Write bytes and advance position.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.pos += data.len() as u64;
        Ok(())
    }

    /// Write a u32 value (big-endian).
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        codec::write_u32(&mut self.writer, value)?;
        self.pos += 4;
        Ok(())
    }

    /// Write a u16 value (big-endian).
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        codec::write_u16(&mut self.writer, value)?;
        self.pos += 2;
        Ok(())
    }

    /// Seek to an absolute position and return it.
    pub fn seek(&mut self, pos: u64) -> Result<u64> {
        self.writer.flush()?;
        let new_pos = self.writer.seek(SeekFrom::Start(pos))?;
        self.pos = new_pos;
        Ok(new_pos)
    }

    /// Flush buffered data to the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

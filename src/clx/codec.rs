//! Big-endian integer codec shared by the parser and the writer.
//!
//! Every multi-byte field in a CLX archive is stored most-significant byte
//! first. All width and byte-order handling goes through this module.

use std::io::{ErrorKind, Read, Seek, Write};

use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};

use crate::util::{Error, Result};

/// Map a failed fixed-width read at `pos` to a truncation error.
fn read_error(err: std::io::Error, pos: u64, len: u64) -> Error {
    if err.kind() == ErrorKind::UnexpectedEof {
        Error::UnexpectedEof { pos, len }
    } else {
        Error::Io(err)
    }
}

/// Read a big-endian u16 at the current position, advancing by 2 bytes.
pub fn read_u16<R: Read + Seek>(reader: &mut R) -> Result<u16> {
    let pos = reader.stream_position()?;
    reader.read_u16::<BigEndian>().map_err(|e| read_error(e, pos, 2))
}

/// Read a big-endian u32 at the current position, advancing by 4 bytes.
pub fn read_u32<R: Read + Seek>(reader: &mut R) -> Result<u32> {
    let pos = reader.stream_position()?;
    reader.read_u32::<BigEndian>().map_err(|e| read_error(e, pos, 4))
}

/// Write a big-endian u16 at the current position.
pub fn write_u16<W: Write>(writer: &mut W, value: u16) -> Result<()> {
    writer.write_u16::<BigEndian>(value)?;
    Ok(())
}

/// Write a big-endian u32 at the current position.
pub fn write_u32<W: Write>(writer: &mut W, value: u32) -> Result<()> {
    writer.write_u32::<BigEndian>(value)?;
    Ok(())
}

/// Decode a big-endian u16 from `bytes[pos..pos + 2]`, if present.
#[inline]
pub fn decode_u16(bytes: &[u8], pos: usize) -> Option<u16> {
    bytes.get(pos..pos.checked_add(2)?).map(BigEndian::read_u16)
}

//! Random-access input for CLX archives.

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use memmap2::Mmap;
use parking_lot::RwLock;

use super::codec;
use crate::util::{Error, Result};

/// Input stream for reading CLX data.
/// Supports memory-mapped, buffered file and in-memory modes.
pub struct IStream {
    inner: StreamInner,
    size: u64,
}

enum StreamInner {
    /// Memory-mapped file (preferred)
    Mmap(Mmap),
    /// Seek-and-read file access (fallback)
    File(RwLock<File>),
    /// Owned bytes, used for in-memory archives
    Memory(Vec<u8>),
}

impl IStream {
    /// Open a file for reading, memory-mapped when the `mmap` feature is on.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_opts(path, cfg!(feature = "mmap"))
    }

    /// Open a file with optional memory mapping.
    pub fn open_opts(path: impl AsRef<Path>, use_mmap: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;

        let size = file.metadata()?.len();

        // Mapping an empty file fails on some platforms
        let inner = if use_mmap && size > 0 {
            // Safety: the map is read-only and dropped with the stream
            let mmap = unsafe { Mmap::map(&file) }?;
            StreamInner::Mmap(mmap)
        } else {
            StreamInner::File(RwLock::new(file))
        };

        tracing::debug!(path = %path.display(), size, mmap = matches!(inner, StreamInner::Mmap(_)), "opened archive");
        Ok(Self { inner, size })
    }

    /// Wrap an in-memory archive.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self { inner: StreamInner::Memory(bytes), size }
    }

    /// Get the total stream size in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read `len` bytes starting at `pos`.
    pub fn read_bytes(&self, pos: u64, len: usize) -> Result<Vec<u8>> {
        if pos.saturating_add(len as u64) > self.size {
            return Err(Error::UnexpectedEof { pos, len: len as u64 });
        }
        let mut buf = vec![0u8; len];
        self.read_into(pos, &mut buf)?;
        Ok(buf)
    }

    /// Fill `buf` with the bytes starting at `pos`.
    pub fn read_into(&self, pos: u64, buf: &mut [u8]) -> Result<()> {
        let len = buf.len() as u64;
        match pos.checked_add(len) {
            Some(end) if end <= self.size => {}
            _ => return Err(Error::UnexpectedEof { pos, len }),
        }

        match &self.inner {
            StreamInner::Mmap(mmap) => {
                buf.copy_from_slice(&mmap[pos as usize..(pos + len) as usize]);
                Ok(())
            }
            StreamInner::Memory(bytes) => {
                buf.copy_from_slice(&bytes[pos as usize..(pos + len) as usize]);
                Ok(())
            }
            StreamInner::File(file) => {
                let mut f = file.write();
                f.seek(SeekFrom::Start(pos))?;
                f.read_exact(buf)?;
                Ok(())
            }
        }
    }

    /// Read a big-endian u32 at the given position.
    pub fn read_u32(&self, pos: u64) -> Result<u32> {
        match &self.inner {
            StreamInner::Mmap(mmap) => read_u32_at(&mut Cursor::new(&mmap[..]), pos),
            StreamInner::Memory(bytes) => read_u32_at(&mut Cursor::new(&bytes[..]), pos),
            StreamInner::File(file) => read_u32_at(&mut *file.write(), pos),
        }
    }
}

fn read_u32_at<R: Read + Seek>(reader: &mut R, pos: u64) -> Result<u32> {
    reader.seek(SeekFrom::Start(pos))?;
    codec::read_u32(reader)
}

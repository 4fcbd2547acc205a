//! Error types for the CLX library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for CLX operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// A field or payload extends past the end of the archive
    #[error("Truncated archive: {len} bytes needed at position {pos}")]
    UnexpectedEof { pos: u64, len: u64 },

    /// Invalid data structure in file
    #[error("Invalid archive structure: {0}")]
    InvalidStructure(String),

    /// Group index outside of the archive
    #[error("Group index {index} out of bounds (count: {count})")]
    GroupOutOfBounds { index: usize, count: usize },

    /// The edit would leave an archive with no groups
    #[error("Archive must keep at least one group")]
    EmptyArchive,

    /// Output path is the input archive itself
    #[error("Refusing to overwrite input archive: {0}")]
    InPlaceWrite(PathBuf),

    /// An offset or size left the 32-bit range of the format
    #[error("Offset overflow: {0} exceeds the 32-bit offset range")]
    Overflow(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    /// Create an overflow error naming the quantity that overflowed.
    pub fn overflow(what: impl Into<String>) -> Self {
        Self::Overflow(what.into())
    }

    /// True for errors caused by a malformed or truncated input archive.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::UnexpectedEof { .. } | Self::InvalidStructure(_))
    }
}

/// Result type alias for CLX operations.
pub type Result<T> = std::result::Result<T, Error>;

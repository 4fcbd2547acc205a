//! # CLX
//!
//! Reader, editor and writer for CLX archives: grouped animation frames
//! addressed through a two-level table of big-endian offsets.
//!
//! An archive is parsed into a structural model ([`clx::Archive`] of
//! [`clx::Clip`]s of [`clx::Frame`]s), edited by removing whole groups, and
//! written back with every offset recalculated so the result is
//! contiguous and self-consistent.
//!
//! ## Modules
//!
//! - [`util`] - Errors and version information
//! - [`clx`] - Binary format: codec, parser, model, writer
//! - [`edit`] - Load / remove groups / write sessions
//!
//! ## Example
//!
//! ```no_run
//! use clx::prelude::*;
//!
//! let mut archive = Archive::open("towner.clx")?;
//! archive.remove_groups(&[1, 3])?;
//! archive.write("towner.clx.stripped")?;
//! # Ok::<(), clx::Error>(())
//! ```

pub mod util;
pub mod clx;
pub mod edit;

// Re-export commonly used types
pub use util::{Error, Result};
pub use clx::{Archive, Clip, Frame, FrameHeader, IStream};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::clx::{Archive, ArchiveSummary, Clip, Frame, FrameHeader, IStream, Layout};
    pub use crate::edit::{EditOptions, EditReport};
}

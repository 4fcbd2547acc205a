//! CLX binary archive format.
//!
//! A CLX archive stores animation groups ("clips"), each an ordered list of
//! variable-length frames. All integers are big-endian u32 unless noted.
//!
//! ## File Structure
//!
//! ```text
//! Multi-group:                         Mono-group:
//! +----------------------+             +----------------------+
//! | Group offsets  4 * G |             | Group header @ 0     |
//! +----------------------+             +----------------------+
//! | Group header         |             | Frames               |
//! +----------------------+             +----------------------+
//! | Frames               |
//! +----------------------+
//! | ... next group ...   |
//! +----------------------+
//!
//! Group header:
//! +----------------------+
//! | Frame count N        |  4 bytes
//! +----------------------+
//! | Frame offsets        |  4 * N bytes, relative to the group start
//! +----------------------+
//! | Next offset          |  4 bytes, relative to the group start
//! +----------------------+
//!
//! Frame payload:
//! +----------------------+
//! | Header size          |  u16
//! | Width                |  u16
//! | Height               |  u16
//! +----------------------+
//! | Pixel data           |  up to the next frame / group end
//! +----------------------+
//! ```
//!
//! There is no tag separating the two layouts; see [`probe_layout`].

mod archive;
mod clip;
pub mod codec;
mod format;
mod frame;
pub mod parser;
mod reader;
mod summary;
pub mod writer;

pub use archive::*;
pub use clip::*;
pub use format::*;
pub use frame::*;
pub use parser::{is_mono_group, probe_layout, Layout};
pub use reader::*;
pub use summary::*;
pub use writer::{write_archive, write_file, OStream};

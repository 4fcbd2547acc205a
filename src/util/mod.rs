//! Utility types and functions for CLX.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - [`library_version`] - Version string for tools

mod error;
mod version;

pub use error::*;
pub use version::*;

//! Edit sessions: load an archive, remove groups, write a new archive.
//!
//! The input file is never modified. Output goes to a derived path (the
//! input path with [`STRIPPED_SUFFIX`] appended) unless one is given.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::clx::{Archive, STRIPPED_SUFFIX};
use crate::util::{Error, Result};

/// Options for an edit session.
#[derive(Debug, Clone)]
pub struct EditOptions {
    /// Explicit output path; derived from the input when `None`.
    pub output: Option<PathBuf>,
    /// Suffix appended to the input path to derive the output path.
    pub suffix: String,
    /// Memory-map the input archive.
    pub use_mmap: bool,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            output: None,
            suffix: STRIPPED_SUFFIX.to_string(),
            use_mmap: cfg!(feature = "mmap"),
        }
    }
}

impl EditOptions {
    /// Options writing to an explicit output path.
    pub fn with_output(output: impl Into<PathBuf>) -> Self {
        Self {
            output: Some(output.into()),
            ..Self::default()
        }
    }

    /// Resolve the output path for `input`.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => derive_output_path(input, &self.suffix),
        }
    }
}

/// Outcome of an edit session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub groups_before: usize,
    pub groups_after: usize,
    /// Removed indices in removal order (highest first).
    pub removed: Vec<usize>,
    pub bytes_written: u64,
}

/// Append `suffix` to the full file name of `input`.
pub fn derive_output_path(input: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Remove `indices` from the archive at `input` and write the result.
///
/// Every index is validated before anything is written. Duplicate indices
/// are removed once.
pub fn remove_groups(input: impl AsRef<Path>, indices: &[usize], options: &EditOptions) -> Result<EditReport> {
    let input = input.as_ref();
    let output = options.output_path(input);
    check_not_in_place(input, &output)?;

    let mut archive = Archive::open_opts(input, options.use_mmap)?;
    let groups_before = archive.group_count();
    tracing::info!(path = %input.display(), groups = groups_before, "loaded archive");

    // Recalculates offsets even when nothing is removed
    let removed = archive.remove_groups(indices)?;
    tracing::info!(groups = archive.group_count(), "edited archive");

    let bytes_written = archive.write(&output)?;
    Ok(EditReport {
        input: input.to_path_buf(),
        output,
        groups_before,
        groups_after: archive.group_count(),
        removed,
        bytes_written,
    })
}

/// Parse `input`, recalculate every offset and write it to `output`.
pub fn rewrite(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<EditReport> {
    remove_groups(input, &[], &EditOptions::with_output(output.as_ref()))
}

fn check_not_in_place(input: &Path, output: &Path) -> Result<()> {
    let same = match (input.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => input == output,
    };
    if same {
        return Err(Error::InPlaceWrite(output.to_path_buf()));
    }
    Ok(())
}

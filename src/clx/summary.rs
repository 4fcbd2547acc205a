//! Serializable structural summary of an archive.

use serde::Serialize;

use super::archive::Archive;
use super::clip::Clip;

/// Per-frame entry of a [`ClipSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameSummary {
    pub offset: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u16>,
}

/// Per-group entry of an [`ArchiveSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClipSummary {
    pub index: usize,
    pub offset: u32,
    pub next_offset: u32,
    pub frame_count: usize,
    pub frames: Vec<FrameSummary>,
}

/// Layout overview of a whole archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveSummary {
    pub group_count: usize,
    pub mono_group: bool,
    pub contiguous: bool,
    pub file_size: u64,
    pub groups: Vec<ClipSummary>,
}

impl ClipSummary {
    fn new(index: usize, clip: &Clip) -> Self {
        let frames = clip
            .frames()
            .iter()
            .map(|f| FrameSummary {
                offset: f.offset(),
                size: f.size(),
                width: f.width(),
                height: f.height(),
            })
            .collect();
        Self {
            index,
            offset: clip.offset(),
            next_offset: clip.next_offset(),
            frame_count: clip.frame_count(),
            frames,
        }
    }
}

impl ArchiveSummary {
    /// Summarize the current layout of `archive`.
    pub fn new(archive: &Archive) -> Self {
        Self {
            group_count: archive.group_count(),
            mono_group: archive.is_mono_group(),
            contiguous: archive.is_contiguous(),
            file_size: archive.file_size(),
            groups: archive
                .clips()
                .iter()
                .enumerate()
                .map(|(i, c)| ClipSummary::new(i, c))
                .collect(),
        }
    }

    /// Total number of frames across all groups.
    pub fn frame_count(&self) -> usize {
        self.groups.iter().map(|g| g.frame_count).sum()
    }
}

//! In-memory CLX archive: group offsets plus parsed clips.

use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::Path;

use super::clip::Clip;
use super::format::{group_table_size, layout_probe_end};
use super::parser;
use super::reader::IStream;
use super::writer;
use crate::util::{Error, Result};

/// A whole CLX archive.
///
/// `group_offsets[i]` is the offset of `clips[i]`. Offsets are rewritten as
/// a unit by [`Archive::recalculate_offsets`] after every structural edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    group_offsets: Vec<u32>,
    clips: Vec<Clip>,
}

impl Archive {
    /// Open and parse an archive file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::read(&IStream::open(path)?)
    }

    /// Open and parse an archive file with optional memory mapping.
    pub fn open_opts(path: impl AsRef<Path>, use_mmap: bool) -> Result<Self> {
        Self::read(&IStream::open_opts(path, use_mmap)?)
    }

    /// Parse an archive held in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::read(&IStream::from_bytes(bytes))
    }

    /// Parse an archive from an input stream.
    pub fn read(stream: &IStream) -> Result<Self> {
        let (group_offsets, clips) = parser::parse(stream)?;
        let archive = Self { group_offsets, clips };
        archive.validate()?;
        tracing::debug!(
            groups = archive.group_count(),
            mono = archive.is_mono_group(),
            "parsed archive"
        );
        if !archive.is_contiguous() {
            tracing::warn!(
                file_size = stream.size(),
                "archive layout has gaps or overlaps; rewriting will compact it"
            );
        }
        Ok(archive)
    }

    /// Build an archive from clips and lay it out contiguously.
    ///
    /// Fails when the result could not be parsed back, see [`Archive::validate`].
    pub fn from_clips(clips: Vec<Clip>) -> Result<Self> {
        if clips.is_empty() {
            return Err(Error::EmptyArchive);
        }
        let mut archive = Self {
            group_offsets: vec![0; clips.len()],
            clips,
        };
        archive.recalculate_offsets()?;
        archive.validate()?;
        Ok(archive)
    }

    /// Group offsets in file order.
    #[inline]
    pub fn group_offsets(&self) -> &[u32] {
        &self.group_offsets
    }

    /// Clips in file order.
    #[inline]
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Number of groups.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.group_offsets.len()
    }

    /// True when the archive holds exactly one group.
    #[inline]
    pub fn is_mono_group(&self) -> bool {
        self.group_offsets.len() == 1
    }

    /// True when the group-offset table is part of the serialized file.
    ///
    /// A single group at offset 0 has no table. A single group elsewhere
    /// (a one-entry table as found in some files) keeps it.
    pub fn has_group_table(&self) -> bool {
        !(self.is_mono_group() && self.clips.first().is_some_and(|c| c.offset() == 0))
    }

    /// End of the last clip: its offset plus its `nextOffset`.
    pub fn file_size(&self) -> u64 {
        self.clips
            .last()
            .map_or(0, |c| u64::from(c.offset()) + u64::from(c.next_offset()))
    }

    /// Remove one group and recalculate every offset.
    ///
    /// Fails without touching the model when `index` is out of range or the
    /// group is the last one left.
    pub fn remove_group(&mut self, index: usize) -> Result<Clip> {
        self.check_index(index)?;
        if self.clips.len() == 1 {
            return Err(Error::EmptyArchive);
        }

        self.group_offsets.remove(index);
        let clip = self.clips.remove(index);
        self.recalculate_offsets()?;

        tracing::info!(index, remaining = self.group_count(), "removed group");
        Ok(clip)
    }

    /// Remove several groups in one pass.
    ///
    /// Every index is checked before anything is removed. Duplicates are
    /// collapsed and groups are removed from the highest index down, so
    /// earlier removals never shift a pending index. Returns the removed
    /// indices in removal order.
    pub fn remove_groups(&mut self, indices: &[usize]) -> Result<Vec<usize>> {
        let unique: BTreeSet<usize> = indices.iter().copied().collect();
        for &index in &unique {
            self.check_index(index)?;
        }
        if unique.len() == self.clips.len() {
            return Err(Error::EmptyArchive);
        }

        let order: Vec<usize> = unique.into_iter().rev().collect();
        for &index in &order {
            tracing::info!(index, "removing group");
            self.group_offsets.remove(index);
            self.clips.remove(index);
        }
        self.recalculate_offsets()?;

        tracing::info!(removed = order.len(), remaining = self.group_count(), "removed groups");
        Ok(order)
    }

    /// Rewrite every offset so clips and frames are contiguous.
    ///
    /// A single clip starts at 0; otherwise the first clip follows the
    /// group-offset table. Each clip's `nextOffset` becomes its own size,
    /// and frames follow their clip header back to back. The whole layout
    /// is checked for overflow before any offset is written.
    pub fn recalculate_offsets(&mut self) -> Result<()> {
        let mut offset = if self.clips.len() == 1 {
            0
        } else {
            group_table_size(self.group_offsets.len())?
        };

        let mut layout = Vec::with_capacity(self.clips.len());
        for clip in &self.clips {
            layout.push(offset);
            offset = offset
                .checked_add(clip.size()?)
                .ok_or_else(|| Error::overflow("archive size"))?;
        }

        for (clip, &offset) in self.clips.iter_mut().zip(&layout) {
            clip.relocate(offset)?;
        }
        self.group_offsets = layout;
        tracing::debug!(file_size = self.file_size(), "recalculated offsets");
        Ok(())
    }

    /// Check the structural post-conditions of a loaded or edited model.
    ///
    /// Beyond offset bookkeeping this rejects models whose serialized form
    /// the parser would refuse: groups without frames, and group tables so
    /// large relative to the file that the layout probe runs past its end.
    pub fn validate(&self) -> Result<()> {
        if self.group_offsets.len() != self.clips.len() {
            return Err(Error::invalid(format!(
                "{} group offsets for {} clips",
                self.group_offsets.len(),
                self.clips.len()
            )));
        }
        if self.clips.is_empty() {
            return Err(Error::EmptyArchive);
        }
        for (i, (clip, &offset)) in self.clips.iter().zip(&self.group_offsets).enumerate() {
            if clip.offset() != offset {
                return Err(Error::invalid(format!(
                    "group {} offset {} does not match clip offset {}",
                    i,
                    offset,
                    clip.offset()
                )));
            }
            if !clip.is_consistent() {
                return Err(Error::invalid(format!("group {} frame table is inconsistent", i)));
            }
            if clip.frame_count() == 0 {
                return Err(Error::invalid(format!("group {} has no frames", i)));
            }
        }

        if self.has_group_table() {
            let needed = layout_probe_end(self.group_offsets[0]);
            if self.file_size() < needed {
                return Err(Error::invalid(format!(
                    "{} groups in {} bytes; the layout cannot be detected below {} bytes",
                    self.group_count(),
                    self.file_size(),
                    needed
                )));
            }
        }
        Ok(())
    }

    /// True when clips follow the table and each other without gaps and
    /// every clip's frames follow its header without gaps.
    pub fn is_contiguous(&self) -> bool {
        let Ok(table) = group_table_size(self.group_offsets.len()) else {
            return false;
        };
        let mut expected = if self.has_group_table() { u64::from(table) } else { 0 };
        for clip in &self.clips {
            if u64::from(clip.offset()) != expected || !clip.is_contiguous() {
                return false;
            }
            expected += u64::from(clip.next_offset());
        }
        true
    }

    /// Serialize the archive into a new file at `path`.
    ///
    /// The file appears only once it is completely written.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<u64> {
        writer::write_file(self, path)
    }

    /// Serialize the archive into memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::with_capacity(self.file_size() as usize));
        writer::write_archive(self, &mut cursor)?;
        Ok(cursor.into_inner())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.group_offsets.len() {
            return Err(Error::GroupOutOfBounds {
                index,
                count: self.group_offsets.len(),
            });
        }
        Ok(())
    }
}

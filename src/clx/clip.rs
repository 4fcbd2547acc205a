//! A clip: one group of frames sharing a header.

use super::format::clip_header_size;
use super::frame::Frame;
use crate::util::{Error, Result};

/// One animation group of the archive.
///
/// `frame_offsets` always mirrors the offsets of `frames`, so the frame
/// count is the length of either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    offset: u32,
    next_offset: u32,
    frame_offsets: Vec<u32>,
    frames: Vec<Frame>,
}

impl Clip {
    /// Assemble a parsed clip from its header fields and frames.
    pub fn from_parts(offset: u32, next_offset: u32, frames: Vec<Frame>) -> Self {
        let frame_offsets = frames.iter().map(Frame::offset).collect();
        Self { offset, next_offset, frame_offsets, frames }
    }

    /// Build a clip from raw frame payloads, laid out at offset 0.
    ///
    /// Offsets are provisional until the clip is placed in an archive.
    /// A clip needs at least one frame.
    pub fn from_images<I>(images: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let frames = images
            .into_iter()
            .map(|image| Frame::new(0, image))
            .collect::<Result<Vec<_>>>()?;
        if frames.is_empty() {
            return Err(Error::invalid("group without frames"));
        }
        let mut clip = Self::from_parts(0, 0, frames);
        clip.relocate(0)?;
        Ok(clip)
    }

    /// Absolute position of the clip header.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Distance from the clip start to the byte after the clip.
    #[inline]
    pub fn next_offset(&self) -> u32 {
        self.next_offset
    }

    /// Number of frames in the clip.
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Absolute frame offsets in playback order.
    #[inline]
    pub fn frame_offsets(&self) -> &[u32] {
        &self.frame_offsets
    }

    /// Frames in playback order.
    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Serialized header size: frame count, offset table and next pointer.
    pub fn header_size(&self) -> Result<u32> {
        clip_header_size(self.frames.len())
    }

    /// Total serialized footprint: header plus every frame payload.
    pub fn size(&self) -> Result<u32> {
        self.frames.iter().try_fold(self.header_size()?, |total, frame| {
            total
                .checked_add(frame.size())
                .ok_or_else(|| Error::overflow(format!("group at offset {}", self.offset)))
        })
    }

    /// Move the clip to `offset` and lay its frames out back to back
    /// directly after the header.
    pub(crate) fn relocate(&mut self, offset: u32) -> Result<()> {
        let size = self.size()?;
        offset
            .checked_add(size)
            .ok_or_else(|| Error::overflow(format!("group placed at offset {}", offset)))?;

        self.offset = offset;
        self.next_offset = size;

        // Bounded by the check above
        let mut pos = offset + self.header_size()?;
        self.frame_offsets.clear();
        for frame in &mut self.frames {
            frame.set_offset(pos);
            self.frame_offsets.push(pos);
            pos += frame.size();
        }
        Ok(())
    }

    /// Check that the frame table mirrors the frames.
    pub(crate) fn is_consistent(&self) -> bool {
        self.frame_offsets.len() == self.frames.len()
            && self
                .frame_offsets
                .iter()
                .zip(&self.frames)
                .all(|(&off, frame)| off == frame.offset())
    }

    /// Check that frames follow the header without gaps or overlaps.
    pub fn is_contiguous(&self) -> bool {
        let Ok(header) = self.header_size() else {
            return false;
        };
        let mut expected = u64::from(self.offset) + u64::from(header);
        for frame in &self.frames {
            if u64::from(frame.offset()) != expected {
                return false;
            }
            expected += u64::from(frame.size());
        }
        expected == u64::from(self.offset) + u64::from(self.next_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip_with(sizes: &[usize]) -> Clip {
        Clip::from_images(sizes.iter().map(|&n| vec![0x11; n])).unwrap()
    }

    #[test]
    fn test_sizes() {
        let clip = clip_with(&[10, 20]);
        assert_eq!(clip.frame_count(), 2);
        assert_eq!(clip.header_size().unwrap(), 16);
        assert_eq!(clip.size().unwrap(), 46);
        assert_eq!(clip.next_offset(), 46);
    }

    #[test]
    fn test_relocate_lays_out_frames() {
        let mut clip = clip_with(&[10, 20, 5]);
        clip.relocate(100).unwrap();
        assert_eq!(clip.offset(), 100);
        assert_eq!(clip.frame_offsets(), &[120, 130, 150]);
        let frame_offsets: Vec<u32> = clip.frames().iter().map(Frame::offset).collect();
        assert_eq!(frame_offsets, clip.frame_offsets());
        assert!(clip.is_consistent());
        assert!(clip.is_contiguous());
    }

    #[test]
    fn test_relocate_overflow_leaves_clip_untouched() {
        let mut clip = clip_with(&[10]);
        let before = clip.clone();
        let result = clip.relocate(u32::MAX - 8);
        assert!(matches!(result, Err(Error::Overflow(_))));
        assert_eq!(clip, before);
    }

    #[test]
    fn test_clip_without_frames_rejected() {
        assert!(matches!(
            Clip::from_images(Vec::<Vec<u8>>::new()),
            Err(Error::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_parsed_gap_is_not_contiguous() {
        let frames = vec![Frame::new(20, vec![1; 4]).unwrap()];
        // Header ends at 12, frame starts at 20
        let clip = Clip::from_parts(0, 24, frames);
        assert!(clip.is_consistent());
        assert!(!clip.is_contiguous());
    }
}

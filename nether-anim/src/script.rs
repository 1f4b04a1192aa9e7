//! Parsed animation model
//!
//! A [`Script`] owns its frames and each [`Frame`] owns its tags. Scripts are
//! built once (by the decoder or the editing API) and then shared read-only by
//! every cursor playing that move.

use smallvec::SmallVec;

use crate::MAX_SPRITE_INDEX;
use crate::error::ScriptError;
use crate::tags::{Param, TagDescriptor, TagId, mnemonic};

/// Inline capacity for tags on one frame; most frames carry fewer
pub(crate) type TagList = SmallVec<[Tag; 4]>;

// =============================================================================
// Tag
// =============================================================================

/// One tag instance on a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    id: TagId,
    value: Option<i32>,
}

impl Tag {
    /// Build a tag, enforcing the descriptor's parameter rule
    pub fn new(mnemonic: &str, value: Option<i32>) -> Result<Self, ScriptError> {
        let id = TagId::from_mnemonic(mnemonic)
            .ok_or_else(|| ScriptError::UnknownTag(mnemonic.to_string()))?;
        let desc = id.descriptor();
        match (desc.param, value) {
            (Param::Required, None) => return Err(ScriptError::MissingParameter(desc.mnemonic)),
            (Param::None, Some(_)) => return Err(ScriptError::UnexpectedParameter(desc.mnemonic)),
            _ => {}
        }
        // `x-5` reads back as the decrement tag
        let bare_axis = desc.mnemonic == mnemonic::X_SET || desc.mnemonic == mnemonic::Y_SET;
        match value {
            Some(v) if bare_axis && v < 0 => {
                return Err(ScriptError::UnrepresentableValue {
                    mnemonic: desc.mnemonic,
                    value: v,
                });
            }
            _ => {}
        }
        Ok(Self { id, value })
    }

    pub(crate) fn from_parts(id: TagId, value: Option<i32>) -> Self {
        Self { id, value }
    }

    /// Registry id
    pub fn id(&self) -> TagId {
        self.id
    }

    /// Registry descriptor
    pub fn descriptor(&self) -> &'static TagDescriptor {
        self.id.descriptor()
    }

    /// Mnemonic as written in animation strings
    pub fn mnemonic(&self) -> &'static str {
        self.id.mnemonic()
    }

    /// Numeric parameter, if any
    pub fn value(&self) -> Option<i32> {
        self.value
    }
}

/// Interpretation of a destroy-child tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildDestroy {
    /// Bare `md`: every child spawned by this animation
    All,
    /// `md<n>`: the child spawned with id `n`
    Id(i32),
}

// =============================================================================
// Frame
// =============================================================================

/// One sprite shown for a fixed number of ticks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    sprite: u8,
    tick_len: u32,
    tags: TagList,
}

impl Frame {
    /// Create an empty frame
    pub fn new(sprite: u8, tick_len: u32) -> Result<Self, ScriptError> {
        if sprite > MAX_SPRITE_INDEX {
            return Err(ScriptError::SpriteOutOfRange(sprite));
        }
        Ok(Self {
            sprite,
            tick_len,
            tags: TagList::new(),
        })
    }

    pub(crate) fn from_parts(sprite: u8, tick_len: u32, tags: TagList) -> Self {
        Self {
            sprite,
            tick_len,
            tags,
        }
    }

    /// Sprite index (0 = `A`)
    pub fn sprite(&self) -> u8 {
        self.sprite
    }

    /// Frame marker letter
    pub fn letter(&self) -> char {
        (b'A' + self.sprite) as char
    }

    /// Duration in ticks
    pub fn tick_len(&self) -> u32 {
        self.tick_len
    }

    /// Tags in the order they were written
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Tag by mnemonic; the last occurrence wins when repeated
    pub fn tag(&self, mnemonic: &str) -> Option<&Tag> {
        let id = TagId::from_mnemonic(mnemonic)?;
        self.tag_by_id(id)
    }

    pub(crate) fn tag_by_id(&self, id: TagId) -> Option<&Tag> {
        self.tags.iter().rev().find(|t| t.id == id)
    }

    /// Whether the frame carries the tag
    pub fn has_tag(&self, mnemonic: &str) -> bool {
        self.tag(mnemonic).is_some()
    }

    /// Value of a tag, if present and parameterized
    pub fn value(&self, mnemonic: &str) -> Option<i32> {
        self.tag(mnemonic).and_then(Tag::value)
    }

    /// Append a tag
    pub fn push_tag(&mut self, mnemonic: &str, value: Option<i32>) -> Result<(), ScriptError> {
        self.tags.push(Tag::new(mnemonic, value)?);
        Ok(())
    }

    /// Child destruction requested on this frame
    pub fn destroy_child(&self) -> Option<ChildDestroy> {
        self.tag(mnemonic::DESTROY_CHILD)
            .map(|t| t.value.map_or(ChildDestroy::All, ChildDestroy::Id))
    }
}

// =============================================================================
// Script
// =============================================================================

/// Decoded animation: a non-empty list of frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    frames: Vec<Frame>,
    /// Cumulative end tick of each frame
    ends: Vec<u32>,
}

fn frame_ends(frames: &[Frame]) -> Option<Vec<u32>> {
    let mut total = 0u32;
    frames
        .iter()
        .map(|f| {
            total = total.checked_add(f.tick_len)?;
            Some(total)
        })
        .collect()
}

impl Script {
    /// Build a script from frames
    pub fn from_frames(frames: Vec<Frame>) -> Result<Self, ScriptError> {
        if frames.is_empty() {
            return Err(ScriptError::EmptyScript);
        }
        let ends = frame_ends(&frames).ok_or(ScriptError::TickOverflow)?;
        Ok(Self { frames, ends })
    }

    /// Decoder entry point; frames and ends are already validated
    pub(crate) fn from_decoded(frames: Vec<Frame>, ends: Vec<u32>) -> Self {
        debug_assert!(!frames.is_empty() && frames.len() == ends.len());
        Self { frames, ends }
    }

    /// All frames in playback order
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of frames (always at least one)
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frame by index
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Sum of all frame lengths
    pub fn total_ticks(&self) -> u32 {
        self.ends.last().copied().unwrap_or(0)
    }

    /// First tick of a frame
    pub fn frame_start(&self, index: usize) -> Option<u32> {
        let end = *self.ends.get(index)?;
        Some(end - self.frames[index].tick_len)
    }

    /// Tick at which a frame is left
    pub fn frame_end(&self, index: usize) -> Option<u32> {
        self.ends.get(index).copied()
    }

    /// Index of the frame shown at `tick`
    ///
    /// Zero-length frames are never returned. `None` once `tick` reaches
    /// [`Script::total_ticks`].
    pub fn frame_index_at(&self, tick: u32) -> Option<usize> {
        let index = self.ends.partition_point(|&end| end <= tick);
        (index < self.frames.len()).then_some(index)
    }

    /// Frame shown at `tick`
    pub fn frame_at(&self, tick: u32) -> Option<&Frame> {
        self.frame_index_at(tick).map(|i| &self.frames[i])
    }

    /// Whether ticks `a` and `b` show different frames
    pub fn frame_changed(&self, a: u32, b: u32) -> bool {
        a != b && self.frame_index_at(a) != self.frame_index_at(b)
    }

    /// Whether `tick` falls on the first frame
    pub fn is_first_frame_at(&self, tick: u32) -> bool {
        self.frame_index_at(tick) == Some(0)
    }

    /// Whether `tick` falls on the last frame
    pub fn is_last_frame_at(&self, tick: u32) -> bool {
        self.frame_index_at(tick) == Some(self.frames.len() - 1)
    }

    /// First frame starting after `tick` that shows `sprite`
    pub fn next_frame_with_sprite(&self, sprite: u8, tick: u32) -> Option<usize> {
        self.next_frame_where(tick, |f| f.sprite == sprite)
    }

    /// First frame starting after `tick` that carries the tag
    pub fn next_frame_with_tag(&self, mnemonic: &str, tick: u32) -> Option<usize> {
        let id = TagId::from_mnemonic(mnemonic)?;
        self.next_frame_where(tick, |f| f.tag_by_id(id).is_some())
    }

    fn next_frame_where(&self, tick: u32, pred: impl Fn(&Frame) -> bool) -> Option<usize> {
        if tick > self.total_ticks() {
            return None;
        }
        (0..self.frames.len()).find(|&i| {
            let start = self.ends[i] - self.frames[i].tick_len;
            tick < start && pred(&self.frames[i])
        })
    }

    /// Starting position requested by the first frame (`x=` and `y=`)
    pub fn initial_position(&self) -> (Option<i32>, Option<i32>) {
        let first = &self.frames[0];
        (
            first.value(mnemonic::X_TARGET),
            first.value(mnemonic::Y_TARGET),
        )
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    fn frame_mut(&mut self, index: usize) -> Result<&mut Frame, ScriptError> {
        let count = self.frames.len();
        self.frames
            .get_mut(index)
            .ok_or(ScriptError::FrameOutOfRange { index, count })
    }

    fn refresh_ends(&mut self, index: usize, tick_len: u32) -> Result<(), ScriptError> {
        let old = self.frames[index].tick_len;
        self.frames[index].tick_len = tick_len;
        match frame_ends(&self.frames) {
            Some(ends) => {
                self.ends = ends;
                Ok(())
            }
            None => {
                self.frames[index].tick_len = old;
                Err(ScriptError::TickOverflow)
            }
        }
    }

    /// Append an empty frame, returning its index
    pub fn append_frame(&mut self, sprite: u8, tick_len: u32) -> Result<usize, ScriptError> {
        let frame = Frame::new(sprite, tick_len)?;
        let end = self
            .total_ticks()
            .checked_add(tick_len)
            .ok_or(ScriptError::TickOverflow)?;
        self.frames.push(frame);
        self.ends.push(end);
        Ok(self.frames.len() - 1)
    }

    /// Set a tag on a frame, replacing any existing tag with that mnemonic
    pub fn set_tag(
        &mut self,
        frame: usize,
        mnemonic: &str,
        value: Option<i32>,
    ) -> Result<(), ScriptError> {
        let tag = Tag::new(mnemonic, value)?;
        let frame = self.frame_mut(frame)?;
        frame.tags.retain(|t| t.id != tag.id);
        frame.tags.push(tag);
        Ok(())
    }

    /// Remove the first tag with this mnemonic; returns whether one was removed
    pub fn delete_tag(&mut self, frame: usize, mnemonic: &str) -> Result<bool, ScriptError> {
        let id = TagId::from_mnemonic(mnemonic)
            .ok_or_else(|| ScriptError::UnknownTag(mnemonic.to_string()))?;
        let frame = self.frame_mut(frame)?;
        match frame.tags.iter().position(|t| t.id == id) {
            Some(pos) => {
                frame.tags.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove every tag from a frame
    pub fn clear_tags(&mut self, frame: usize) -> Result<(), ScriptError> {
        self.frame_mut(frame)?.tags.clear();
        Ok(())
    }

    /// Change a frame's duration
    pub fn set_tick_len(&mut self, frame: usize, tick_len: u32) -> Result<(), ScriptError> {
        self.frame_mut(frame)?;
        self.refresh_ends(frame, tick_len)
    }

    /// Change a frame's sprite
    pub fn set_sprite(&mut self, frame: usize, sprite: u8) -> Result<(), ScriptError> {
        if sprite > MAX_SPRITE_INDEX {
            return Err(ScriptError::SpriteOutOfRange(sprite));
        }
        self.frame_mut(frame)?.sprite = sprite;
        Ok(())
    }
}

// =============================================================================
// Free helpers
// =============================================================================

/// Frame shown at `tick`, without a cursor
pub fn get_frame_at(script: &Script, tick: u32) -> Option<&Frame> {
    script.frame_at(tick)
}

/// Frame by index, without a cursor
pub fn get_frame(script: &Script, index: usize) -> Option<&Frame> {
    script.frame(index)
}

/// Sprite index for a frame marker letter
pub fn letter_to_sprite(letter: char) -> Option<u8> {
    letter.is_ascii_uppercase().then(|| letter as u8 - b'A')
}

/// Frame marker letter for a sprite index
pub fn sprite_to_letter(sprite: u8) -> Option<char> {
    (sprite <= MAX_SPRITE_INDEX).then(|| (b'A' + sprite) as char)
}

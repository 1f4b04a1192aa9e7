//! Playback cursor
//!
//! One cursor per animating object. The simulation feeds it its tick counter;
//! the cursor tracks which frame is showing, resolves jumps, and remembers the
//! values of persisting tags (blend levels, flips) set on earlier frames.
//!
//! Every call to [`Cursor::advance`] terminates: frames are stepped forward
//! at most once each, and at most one jump or repeat wrap is resolved per call.
//! A repeat wrap rebases the clock into the current loop, so a long pause
//! between ticks is caught up in a single call.

use bitcode::{Decode, Encode};

use crate::config::{JumpMode, PlaybackConfig};
use crate::error::{ScriptError, StateError};
use crate::script::{Script, Tag};
use crate::tags::{TagId, mnemonic};

// =============================================================================
// State
// =============================================================================

/// Lifecycle of a cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum Phase {
    /// No tick seen yet
    Idle,
    /// Showing a frame
    Playing,
    /// Past the end; further ticks are ignored
    Finished,
}

/// A persisting tag value still in effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
struct Carried {
    tag: TagId,
    value: Option<i32>,
    frame: u32,
}

/// Plain-data state of a [`Cursor`]
///
/// Snapshot it for rollback and restore it onto a cursor playing the same
/// script.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct CursorState {
    phase: Phase,
    last_tick: Option<u32>,
    /// External tick that maps to animation tick 0; `None` anchors at the
    /// next advance
    origin: Option<i64>,
    frame: u32,
    carried: Vec<Carried>,
}

impl CursorState {
    fn new(origin: Option<i64>) -> Self {
        Self {
            phase: Phase::Idle,
            last_tick: None,
            origin,
            frame: 0,
            carried: Vec::new(),
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Serialize for storage or transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    /// Deserialize bytes produced by [`CursorState::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateError> {
        bitcode::decode(bytes).map_err(|e| StateError::Decode(e.to_string()))
    }
}

/// A tag value in effect on the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveTag {
    /// Tag parameter, if it has one
    pub value: Option<i32>,
    /// Frame the tag was set on
    pub frame: usize,
}

// =============================================================================
// Cursor
// =============================================================================

/// Per-object interpreter over a shared [`Script`]
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    script: &'a Script,
    config: PlaybackConfig,
    state: CursorState,
}

impl<'a> Cursor<'a> {
    /// Cursor whose animation tick 0 is external tick 0
    pub fn new(script: &'a Script) -> Self {
        Self::with_config(script, PlaybackConfig::default())
    }

    /// Cursor with explicit playback settings
    pub fn with_config(script: &'a Script, config: PlaybackConfig) -> Self {
        Self {
            script,
            config,
            state: CursorState::new(Some(0)),
        }
    }

    /// Cursor whose animation tick 0 is external tick `tick`
    pub fn starting_at(script: &'a Script, tick: u32) -> Self {
        let mut cursor = Self::new(script);
        cursor.state.origin = Some(i64::from(tick));
        cursor
    }

    /// Script being played
    pub fn script(&self) -> &'a Script {
        self.script
    }

    /// Playback settings
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Advancing
    // -------------------------------------------------------------------------

    /// Feed the current external tick; returns whether the frame changed
    ///
    /// Ticks must be non-decreasing; an older tick is ignored.
    pub fn advance(&mut self, tick: u32) -> bool {
        if self.state.phase == Phase::Finished {
            return false;
        }
        if self.state.last_tick.is_some_and(|last| tick < last) {
            return false;
        }
        self.state.last_tick = Some(tick);
        let origin = *self.state.origin.get_or_insert(i64::from(tick));
        if i64::from(tick) < origin {
            return false;
        }

        let mut changed = false;
        if self.state.phase == Phase::Idle {
            self.state.phase = Phase::Playing;
            self.state.carried.clear();
            self.enter(0);
            changed = true;
            if self.take_jump(0, tick) {
                return true;
            }
        }

        let last = self.last_frame();
        loop {
            let frame = self.state.frame as usize;
            let Some(end) = self.script.frame_end(frame) else {
                // Only reachable with a state restored onto the wrong script
                self.finish();
                break;
            };
            if self.elapsed_at(tick) < u64::from(end) {
                break;
            }

            if frame >= last {
                if !self.config.repeat {
                    self.finish();
                    break;
                }
                changed = true;
                if self.wrap(end, tick) {
                    break;
                }
                continue;
            }

            self.enter(frame + 1);
            changed = true;
            if self.take_jump(frame + 1, tick) {
                break;
            }
        }
        changed
    }

    /// Animation tick corresponding to external `tick`
    fn elapsed_at(&self, tick: u32) -> u64 {
        let origin = self.state.origin.unwrap_or(i64::from(tick));
        i64::from(tick)
            .checked_sub(origin)
            .and_then(|elapsed| u64::try_from(elapsed).ok())
            .unwrap_or(0)
    }

    /// Loop back to frame 0 once `tick` has run past `end`, the end of the
    /// final frame
    ///
    /// The clock is rebased so `tick` lands inside the loop, however many
    /// loops were skipped. Returns whether stepping must stop for this call:
    /// a jump fired on frame 0, or every frame is empty.
    fn wrap(&mut self, end: u32, tick: u32) -> bool {
        let into_loop = match end {
            0 => 0,
            len => self.elapsed_at(tick) % u64::from(len),
        };
        // into_loop < end <= u32::MAX
        self.state.origin = Some(i64::from(tick) - into_loop as i64);
        self.state.carried.clear();
        self.enter(0);
        tracing::debug!(tick, into_loop, "animation wrapped");
        self.take_jump(0, tick) || end == 0
    }

    /// Index of the frame after which playback ends
    fn last_frame(&self) -> usize {
        let last = self.script.frame_count() - 1;
        self.config.end_frame.map_or(last, |end| end.min(last))
    }

    /// Make `index` current and record its persisting tags
    fn enter(&mut self, index: usize) {
        self.state.frame = index as u32;
        self.record_persisting(index);
    }

    fn record_persisting(&mut self, index: usize) {
        let Some(frame) = self.script.frame(index) else {
            return;
        };
        for tag in frame.tags().iter().filter(|t| t.descriptor().persists) {
            let entry = Carried {
                tag: tag.id(),
                value: tag.value(),
                frame: index as u32,
            };
            match self.state.carried.iter_mut().find(|c| c.tag == entry.tag) {
                Some(slot) => *slot = entry,
                None => self.state.carried.push(entry),
            }
        }
    }

    /// Carried state as if frames `0..=index` had been played in order
    fn rebuild_carried(&mut self, index: usize) {
        self.state.carried.clear();
        for i in 0..=index {
            self.record_persisting(i);
        }
    }

    fn finish(&mut self) {
        self.state.phase = Phase::Finished;
        tracing::debug!(frame = self.state.frame, "animation finished");
    }

    /// Resolve a jump on a freshly entered frame; returns whether one fired
    fn take_jump(&mut self, index: usize, tick: u32) -> bool {
        let Some(jump) = self.script.frame(index).and_then(|f| f.value(mnemonic::JUMP)) else {
            return false;
        };

        let target = match self.config.jump_mode {
            JumpMode::AbsoluteTick => Some(i64::from(jump)),
            JumpMode::FrameIndex => match usize::try_from(jump) {
                Ok(i) => self.script.frame_start(i).map(i64::from),
                Err(_) => Some(0),
            },
            JumpMode::Relative => self
                .script
                .frame_start(index)
                .map(|start| i64::from(start) + i64::from(jump)),
        };
        let total = i64::from(self.script.total_ticks());
        let target = target.unwrap_or(total).max(0);

        let dest = u32::try_from(target)
            .ok()
            .and_then(|t| self.script.frame_index_at(t).map(|i| (t, i)));
        match dest {
            Some((target, dest)) => {
                tracing::debug!(from = index, to = dest, target, "animation jump");
                self.state.origin = Some(i64::from(tick) - i64::from(target));
                self.state.frame = dest as u32;
                self.rebuild_carried(dest);
            }
            None => {
                tracing::debug!(from = index, target, "animation jump past end");
                self.finish();
            }
        }
        true
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Tag literally present on `frame`; the last occurrence wins
    pub fn get_tag(&self, frame: usize, mnemonic: &str) -> Option<&'a Tag> {
        let id = TagId::from_mnemonic(mnemonic);
        debug_assert!(id.is_some(), "unregistered tag mnemonic '{mnemonic}'");
        self.script.frame(frame)?.tag_by_id(id?)
    }

    /// Value of a tag in effect on the current frame
    ///
    /// The current frame's own tag wins; otherwise a persisting tag reports
    /// the value from the frame that last set it.
    pub fn get_active(&self, mnemonic: &str) -> Option<ActiveTag> {
        let id = TagId::from_mnemonic(mnemonic);
        debug_assert!(id.is_some(), "unregistered tag mnemonic '{mnemonic}'");
        let id = id?;
        if self.state.phase == Phase::Idle {
            return None;
        }

        let frame = self.state.frame as usize;
        if let Some(tag) = self.script.frame(frame).and_then(|f| f.tag_by_id(id)) {
            return Some(ActiveTag {
                value: tag.value(),
                frame,
            });
        }
        if !id.descriptor().persists {
            return None;
        }
        self.state
            .carried
            .iter()
            .find(|c| c.tag == id)
            .map(|c| ActiveTag {
                value: c.value,
                frame: c.frame as usize,
            })
    }

    /// Index of the frame currently showing
    pub fn current_frame(&self) -> usize {
        self.state.frame as usize
    }

    /// Animation ticks elapsed as of the last accepted tick
    pub fn elapsed_ticks(&self) -> u32 {
        match self.state.last_tick {
            Some(tick) => u32::try_from(self.elapsed_at(tick)).unwrap_or(u32::MAX),
            None => 0,
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Whether the first frame is showing
    pub fn is_first_frame(&self) -> bool {
        self.state.phase == Phase::Playing && self.state.frame == 0
    }

    /// Whether the frame after which playback ends is showing
    pub fn is_final_frame(&self) -> bool {
        self.state.phase == Phase::Playing && self.current_frame() == self.last_frame()
    }

    /// Whether playback has ended
    pub fn is_finished(&self) -> bool {
        self.state.phase == Phase::Finished
    }

    // -------------------------------------------------------------------------
    // Control
    // -------------------------------------------------------------------------

    /// Return to the first frame; the next advance becomes animation tick 0
    pub fn reset(&mut self) {
        self.state = CursorState::new(None);
    }

    /// Show `index` immediately, mapping external `tick` to its first tick
    ///
    /// A jump on the target frame does not fire.
    pub fn goto_frame(&mut self, index: usize, tick: u32) -> Result<(), ScriptError> {
        let start = self
            .script
            .frame_start(index)
            .ok_or(ScriptError::FrameOutOfRange {
                index,
                count: self.script.frame_count(),
            })?;
        self.state.phase = Phase::Playing;
        self.state.last_tick = Some(tick);
        self.state.origin = Some(i64::from(tick) - i64::from(start));
        self.state.frame = index as u32;
        self.rebuild_carried(index);
        Ok(())
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> CursorState {
        self.state.clone()
    }

    /// Replace the current state with a snapshot taken on this script
    pub fn restore(&mut self, state: CursorState) -> Result<(), StateError> {
        let count = self.script.frame_count();
        let clock = -i64::from(u32::MAX)..=i64::from(u32::MAX);
        if state.origin.is_some_and(|origin| !clock.contains(&origin)) {
            return Err(StateError::Mismatch("clock origin out of range"));
        }
        if state.frame as usize >= count {
            return Err(StateError::Mismatch("frame index out of range"));
        }
        for carried in &state.carried {
            if TagId::from_index(carried.tag.index() as u8).is_none() {
                return Err(StateError::Mismatch("unknown tag id"));
            }
            if !carried.tag.descriptor().persists {
                return Err(StateError::Mismatch("carried tag does not persist"));
            }
            if carried.frame as usize >= count {
                return Err(StateError::Mismatch("carried frame out of range"));
            }
        }
        self.state = state;
        Ok(())
    }
}

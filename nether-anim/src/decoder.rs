//! Animation string decoder
//!
//! Single left-to-right pass over the input bytes. Tags accumulate in a
//! pending list until a frame marker (`[A-Z][0-9]+`) closes them into a frame.

use crate::SEPARATOR;
use crate::error::{DecodeError, DecodeErrorKind};
use crate::script::{Frame, Script, Tag, TagList};
use crate::tags::{Param, TagDescriptor, match_prefix};

/// Decode an animation string into a [`Script`]
///
/// # Example
/// ```
/// use nether_anim::{DecodeErrorKind, decode};
///
/// let script = decode("bs10A5-B5").unwrap();
/// assert_eq!(script.frame(0).unwrap().value("bs"), Some(10));
///
/// let err = decode("x+4zcubs21l50zp").unwrap_err();
/// assert_eq!(err.kind, DecodeErrorKind::InvalidTag);
/// assert_eq!(err.offset, 3);
/// ```
pub fn decode(input: &str) -> Result<Script, DecodeError> {
    Decoder::new(input.as_bytes()).run().inspect_err(|err| {
        tracing::trace!(kind = %err.kind, offset = err.offset, "animation decode failed");
    })
}

struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
    frames: Vec<Frame>,
    ends: Vec<u32>,
    pending: TagList,
}

impl<'a> Decoder<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            frames: Vec::new(),
            ends: Vec::new(),
            pending: TagList::new(),
        }
    }

    fn run(mut self) -> Result<Script, DecodeError> {
        while let Some(&byte) = self.input.get(self.pos) {
            match byte {
                SEPARATOR => self.pos += 1,
                b'A'..=b'Z' => self.read_frame(byte - b'A')?,
                b'a'..=b'z' => self.read_tag()?,
                _ => return Err(self.error(DecodeErrorKind::InvalidTag, self.pos)),
            }
        }

        let end = self.input.len();
        if !self.pending.is_empty() {
            return Err(self.error(DecodeErrorKind::DanglingTags, end));
        }
        if self.frames.is_empty() {
            return Err(self.error(DecodeErrorKind::EmptyScript, end));
        }
        Ok(Script::from_decoded(self.frames, self.ends))
    }

    fn error(&self, kind: DecodeErrorKind, offset: usize) -> DecodeError {
        DecodeError::new(kind, offset)
    }

    // =========================================================================
    // Frames
    // =========================================================================

    fn read_frame(&mut self, sprite: u8) -> Result<(), DecodeError> {
        self.pos += 1; // letter
        let digits_at = self.pos;
        let tick_len = match self.read_unsigned()? {
            Some(n) => n,
            None => return Err(self.error(DecodeErrorKind::MissingTickLength, digits_at)),
        };

        let end = self
            .ends
            .last()
            .copied()
            .unwrap_or(0)
            .checked_add(tick_len)
            .ok_or_else(|| self.error(DecodeErrorKind::NumberOverflow, digits_at))?;

        let tags = std::mem::take(&mut self.pending);
        self.frames.push(Frame::from_parts(sprite, tick_len, tags));
        self.ends.push(end);
        Ok(())
    }

    // =========================================================================
    // Tags
    // =========================================================================

    fn read_tag(&mut self) -> Result<(), DecodeError> {
        let input = self.input;
        let start = self.pos;

        let mut longest: Option<&'static TagDescriptor> = None;
        for desc in match_prefix(&input[start..]) {
            longest.get_or_insert(desc);
            let after = start + desc.mnemonic.len();
            let has_number = self.number_at(after);
            let fits = match desc.param {
                Param::None => !has_number,
                Param::Required => has_number,
                Param::Optional => true,
            };
            if !fits {
                continue;
            }

            self.pos = after;
            let value = if has_number {
                Some(self.read_signed()?)
            } else {
                None
            };
            self.pending.push(Tag::from_parts(desc.id, value));
            return Ok(());
        }

        // Report against the longest candidate so `smf5` reads as a stray
        // number after `smf` rather than a short `s` missing its value
        match longest {
            Some(desc) => {
                let after = start + desc.mnemonic.len();
                match desc.param {
                    Param::Required => Err(self.error(DecodeErrorKind::MissingParameter, after)),
                    _ => Err(self.error(DecodeErrorKind::InvalidTag, after)),
                }
            }
            None => Err(self.error(DecodeErrorKind::InvalidTag, start)),
        }
    }

    /// Whether a signed number (`[+-]?[0-9]`) starts at `pos`
    fn number_at(&self, pos: usize) -> bool {
        let digit_at = |i: usize| self.input.get(i).is_some_and(u8::is_ascii_digit);
        match self.input.get(pos) {
            Some(b'+' | b'-') => digit_at(pos + 1),
            _ => digit_at(pos),
        }
    }

    // =========================================================================
    // Numbers
    // =========================================================================

    /// Read a run of digits as `u32`; `None` if there are no digits
    fn read_unsigned(&mut self) -> Result<Option<u32>, DecodeError> {
        let start = self.pos;
        let magnitude = self.read_magnitude(start)?;
        match magnitude {
            None => Ok(None),
            Some(m) => u32::try_from(m)
                .map(Some)
                .map_err(|_| self.error(DecodeErrorKind::NumberOverflow, start)),
        }
    }

    /// Read `[+-]?[0-9]+` as `i32`; the caller has already checked a digit follows
    fn read_signed(&mut self) -> Result<i32, DecodeError> {
        let start = self.pos;
        let negative = match self.input.get(self.pos) {
            Some(b'-') => {
                self.pos += 1;
                true
            }
            Some(b'+') => {
                self.pos += 1;
                false
            }
            _ => false,
        };

        let magnitude = self
            .read_magnitude(start)?
            .ok_or_else(|| self.error(DecodeErrorKind::MissingParameter, start))?;
        let value = if negative {
            -(magnitude as i64)
        } else {
            magnitude as i64
        };
        i32::try_from(value).map_err(|_| self.error(DecodeErrorKind::NumberOverflow, start))
    }

    /// Consume digits at the current position, failing once the value
    /// exceeds the `u32` range
    fn read_magnitude(&mut self, number_start: usize) -> Result<Option<u64>, DecodeError> {
        let mut value: Option<u64> = None;
        while let Some(&byte) = self.input.get(self.pos) {
            if !byte.is_ascii_digit() {
                break;
            }
            let next = value.unwrap_or(0) * 10 + u64::from(byte - b'0');
            if next > u64::from(u32::MAX) {
                return Err(self.error(DecodeErrorKind::NumberOverflow, number_start));
            }
            value = Some(next);
            self.pos += 1;
        }
        Ok(value)
    }
}

//! Animation string encoder
//!
//! Writes the canonical text form: tags in their original order, the frame
//! letter, the tick length, and a separator between frames. Decoding the
//! output yields a structurally identical [`Script`].

use core::fmt::{self, Write};

use crate::SEPARATOR;
use crate::error::EncodeError;
use crate::script::{Frame, Script, Tag};

// =============================================================================
// Lengths
// =============================================================================

fn unsigned_len(value: u32) -> usize {
    value.checked_ilog10().map_or(1, |log| log as usize + 1)
}

fn signed_len(value: i32) -> usize {
    usize::from(value < 0) + unsigned_len(value.unsigned_abs())
}

fn tag_len(tag: &Tag) -> usize {
    tag.mnemonic().len() + tag.value().map_or(0, signed_len)
}

fn frame_len(frame: &Frame) -> usize {
    let tags: usize = frame.tags().iter().map(tag_len).sum();
    tags + 1 + unsigned_len(frame.tick_len())
}

/// Exact number of bytes [`encode`] writes for `script`
pub fn encoded_length(script: &Script) -> usize {
    let frames: usize = script.frames().iter().map(frame_len).sum();
    frames + script.frame_count().saturating_sub(1)
}

// =============================================================================
// Encoding
// =============================================================================

/// `fmt::Write` over a fixed byte slice
struct SliceWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        let dst = self.buf.get_mut(self.len..end).ok_or(fmt::Error)?;
        dst.copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

/// Encode `script` into `out`, returning the number of bytes written
///
/// Nothing is written when `out` is shorter than [`encoded_length`].
pub fn encode(script: &Script, out: &mut [u8]) -> Result<usize, EncodeError> {
    let needed = encoded_length(script);
    let available = out.len();
    if available < needed {
        return Err(EncodeError::BufferTooSmall { needed, available });
    }

    let mut writer = SliceWriter { buf: out, len: 0 };
    write!(writer, "{script}").map_err(|_| EncodeError::BufferTooSmall { needed, available })?;
    debug_assert_eq!(writer.len, needed);
    Ok(writer.len)
}

/// Canonical text of a whole script
pub fn encode_to_string(script: &Script) -> String {
    let mut text = String::with_capacity(encoded_length(script));
    // Writing into a String cannot fail
    let _ = write!(text, "{script}");
    text
}

/// Canonical text of a single frame (no separator)
pub fn encode_frame(frame: &Frame) -> String {
    frame.to_string()
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())?;
        match self.value() {
            Some(value) => write!(f, "{value}"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tag in self.tags() {
            write!(f, "{tag}")?;
        }
        write!(f, "{}{}", self.letter(), self.tick_len())
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames().iter().enumerate() {
            if i > 0 {
                f.write_char(SEPARATOR as char)?;
            }
            write!(f, "{frame}")?;
        }
        Ok(())
    }
}

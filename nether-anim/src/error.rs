//! Animation string error types

use core::fmt;

/// What went wrong while decoding an animation string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Unknown mnemonic or stray character at the current position
    InvalidTag,
    /// Parameterized tag without a following integer
    MissingParameter,
    /// Frame marker without a following tick length
    MissingTickLength,
    /// Tag value, tick length or total tick count does not fit
    NumberOverflow,
    /// Tags after the last frame marker
    DanglingTags,
    /// Input produced no frames at all
    EmptyScript,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DecodeErrorKind::InvalidTag => "invalid tag",
            DecodeErrorKind::MissingParameter => "missing tag parameter",
            DecodeErrorKind::MissingTickLength => "missing frame tick length",
            DecodeErrorKind::NumberOverflow => "number out of range",
            DecodeErrorKind::DanglingTags => "tags without a closing frame",
            DecodeErrorKind::EmptyScript => "no frames",
        };
        f.write_str(text)
    }
}

/// Decode failure with the byte offset of the offending input
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at byte {offset}")]
pub struct DecodeError {
    /// Failure category
    pub kind: DecodeErrorKind,
    /// Byte offset into the input where decoding stopped
    pub offset: usize,
}

impl DecodeError {
    pub(crate) fn new(kind: DecodeErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// Encode failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// Output buffer is shorter than [`crate::encoded_length`]
    #[error("output buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

/// Errors from the script editing API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("unknown tag: {0}")]
    UnknownTag(String),

    #[error("frame {index} out of range (script has {count} frames)")]
    FrameOutOfRange { index: usize, count: usize },

    #[error("sprite index {0} out of range (max 25)")]
    SpriteOutOfRange(u8),

    #[error("tag '{0}' requires a parameter")]
    MissingParameter(&'static str),

    #[error("tag '{0}' takes no parameter")]
    UnexpectedParameter(&'static str),

    #[error("tag '{mnemonic}' cannot encode value {value}")]
    UnrepresentableValue { mnemonic: &'static str, value: i32 },

    #[error("total tick count overflows")]
    TickOverflow,

    #[error("script has no frames")]
    EmptyScript,
}

/// Errors when restoring a cursor snapshot from bytes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("failed to decode cursor state: {0}")]
    Decode(String),

    #[error("cursor state does not fit this script: {0}")]
    Mismatch(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DecodeError::new(DecodeErrorKind::InvalidTag, 3).to_string(),
            "invalid tag at byte 3"
        );
        assert_eq!(
            DecodeError::new(DecodeErrorKind::DanglingTags, 12).to_string(),
            "tags without a closing frame at byte 12"
        );
        assert_eq!(
            EncodeError::BufferTooSmall {
                needed: 10,
                available: 4
            }
            .to_string(),
            "output buffer too small: need 10 bytes, have 4"
        );
        assert_eq!(
            ScriptError::SpriteOutOfRange(26).to_string(),
            "sprite index 26 out of range (max 25)"
        );
    }
}

//! Nether-Anim: animation string language for Nethercore fighting moves
//!
//! Every HAR move and every arena background animation is driven by a short
//! animation string stored inside the binary asset records. The string lists
//! the sprites to show, how many ticks each one stays on screen, and the
//! directives (tags) that fire on each frame: sounds, damage, child effects,
//! position changes, blending and flips.
//!
//! This crate decodes those strings into an immutable [`Script`], encodes them
//! back to canonical text, and plays them with a per-object [`Cursor`] driven by
//! the simulation tick counter. It never opens files and never performs the
//! effects itself; the animation layer asks the cursor what is active and
//! acts on it.
//!
//! # Format Overview
//!
//! ```text
//! brA20-bs200B200-bf200C200-d1B10
//! ││ │  │    │    │    │    │ └── frame: sprite B for 10 ticks
//! ││ │  │    │    │    │    └──── tag: jump to tick 1
//! ││ │  │    │    │    └───────── frame: sprite C for 200 ticks
//! ││ │  │    │    └────────────── tag: blend finish 200
//! ││ │  │    └─────────────────── frame: sprite B for 200 ticks
//! ││ │  └──────────────────────── tag: blend start 200
//! ││ └─────────────────────────── frame: sprite A for 20 ticks
//! │└───────────────────────────── (tags come before the frame they belong to)
//! └────────────────────────────── tag: additive blending
//! ```
//!
//! # Usage
//!
//! ```
//! use nether_anim::{Cursor, decode, mnemonic};
//!
//! let script = decode("brA20-bs200B200-bf200C200").unwrap();
//! assert_eq!(script.total_ticks(), 420);
//!
//! let mut cursor = Cursor::new(&script);
//! for tick in 0..=250 {
//!     if cursor.advance(tick) {
//!         // Frame changed: re-read tags for the new frame
//!     }
//! }
//! let blend = cursor.get_active(mnemonic::BLEND_START).unwrap();
//! assert_eq!(blend.value, Some(200));
//! assert_eq!(blend.frame, 1);
//! ```

mod config;
mod cursor;
mod decoder;
mod encoder;
mod error;
mod script;
mod tags;

pub use config::{ConfigError, JumpMode, PlaybackConfig};
pub use cursor::{ActiveTag, Cursor, CursorState, Phase};
pub use decoder::decode;
pub use encoder::{encode, encode_frame, encode_to_string, encoded_length};
pub use error::{DecodeError, DecodeErrorKind, EncodeError, ScriptError, StateError};
pub use script::{
    ChildDestroy, Frame, Script, Tag, get_frame, get_frame_at, letter_to_sprite,
    sprite_to_letter,
};
pub use tags::{Param, TAGS, TagDescriptor, TagId, lookup, match_prefix, mnemonic};

// =============================================================================
// Constants
// =============================================================================

/// Highest sprite index a frame marker can address (`Z`)
pub const MAX_SPRITE_INDEX: u8 = 25;

/// Longest mnemonic in the tag vocabulary
pub const MAX_MNEMONIC_LEN: usize = 3;

/// Cosmetic separator written between frames
pub const SEPARATOR: u8 = b'-';

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(MAX_SPRITE_INDEX, b'Z' - b'A');
        assert_eq!(SEPARATOR, b'-');
        assert!(TAGS.iter().all(|t| t.mnemonic.len() <= MAX_MNEMONIC_LEN));
    }

    #[test]
    fn test_decode_play_encode() {
        let script = decode("s3A5-cp10B5").unwrap();
        let mut cursor = Cursor::new(&script);

        assert!(cursor.advance(0));
        assert_eq!(cursor.get_active(mnemonic::SOUND).unwrap().value, Some(3));
        assert!(cursor.advance(5));
        assert_eq!(cursor.get_active(mnemonic::DAMAGE).unwrap().value, Some(10));
        assert!(cursor.get_active(mnemonic::SOUND).is_none());

        assert_eq!(encode_to_string(&script), "s3A5-cp10B5");
    }
}

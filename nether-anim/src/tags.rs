//! Tag registry
//!
//! The closed vocabulary of animation tags. Mnemonics share prefixes (`s`,
//! `smo`, `smf`; `m`, `md`, `mx`; `x`, `x+`), so lookups at a scan position
//! always try the longest candidate first.

use std::sync::LazyLock;

use bitcode::{Decode, Encode};
use hashbrown::HashMap;

use crate::MAX_MNEMONIC_LEN;

/// Whether a tag carries a numeric parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// Bare tag, never has a value
    None,
    /// Always followed by a signed integer
    Required,
    /// May be followed by a signed integer
    Optional,
}

/// Stable index of a descriptor in [`TAGS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode)]
pub struct TagId(u8);

impl TagId {
    /// Resolve a mnemonic to its id
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        INDEX.get(mnemonic).copied()
    }

    /// Position in [`TAGS`]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Descriptor for this id
    pub fn descriptor(self) -> &'static TagDescriptor {
        &TAGS[self.index()]
    }

    /// Mnemonic for this id
    pub fn mnemonic(self) -> &'static str {
        self.descriptor().mnemonic
    }

    /// Id from a raw table index, if in range
    pub(crate) fn from_index(index: u8) -> Option<Self> {
        ((index as usize) < TAGS.len()).then_some(Self(index))
    }
}

/// Static description of one tag
#[derive(Debug, PartialEq, Eq)]
pub struct TagDescriptor {
    /// Table position
    pub id: TagId,
    /// 1-3 character code as written in animation strings
    pub mnemonic: &'static str,
    /// Parameter rule enforced by the decoder
    pub param: Param,
    /// Value stays in effect on later frames until overridden
    pub persists: bool,
    /// Short human readable description
    pub description: &'static str,
}

impl TagDescriptor {
    /// True for tags that accept a numeric parameter
    pub const fn takes_param(&self) -> bool {
        !matches!(self.param, Param::None)
    }
}

const fn tag(
    id: u8,
    mnemonic: &'static str,
    param: Param,
    persists: bool,
    description: &'static str,
) -> TagDescriptor {
    TagDescriptor {
        id: TagId(id),
        mnemonic,
        param,
        persists,
        description,
    }
}

// =============================================================================
// Vocabulary
// =============================================================================

/// Mnemonics of every registered tag
pub mod mnemonic {
    /// smo - Start music track
    pub const MUSIC_ON: &str = "smo";
    /// smf - Stop music
    pub const MUSIC_OFF: &str = "smf";
    /// s - Play sound effect
    pub const SOUND: &str = "s";
    /// d - Jump
    pub const JUMP: &str = "d";
    /// bs - Blend start level
    pub const BLEND_START: &str = "bs";
    /// bf - Blend finish level
    pub const BLEND_FINISH: &str = "bf";
    /// br - Additive blending
    pub const BLEND_ADDITIVE: &str = "br";
    /// m - Spawn child animation
    pub const SPAWN_CHILD: &str = "m";
    /// md - Destroy child animation
    pub const DESTROY_CHILD: &str = "md";
    /// mx - Child x offset
    pub const CHILD_X: &str = "mx";
    /// my - Child y offset
    pub const CHILD_Y: &str = "my";
    /// cp - Apply damage
    pub const DAMAGE: &str = "cp";
    /// f - Flip vertically
    pub const FLIP_VERTICAL: &str = "f";
    /// r - Flip horizontally
    pub const FLIP_HORIZONTAL: &str = "r";
    /// x- - Move left
    pub const X_DEC: &str = "x-";
    /// x+ - Move right
    pub const X_INC: &str = "x+";
    /// x= - Interpolate x towards target
    pub const X_TARGET: &str = "x=";
    /// x - Set x
    pub const X_SET: &str = "x";
    /// y- - Move up
    pub const Y_DEC: &str = "y-";
    /// y+ - Move down
    pub const Y_INC: &str = "y+";
    /// y= - Interpolate y towards target
    pub const Y_TARGET: &str = "y=";
    /// y - Set y
    pub const Y_SET: &str = "y";
}

/// Every tag the decoder accepts, indexed by [`TagId`]
pub static TAGS: [TagDescriptor; 22] = [
    tag(0, mnemonic::MUSIC_ON, Param::Required, false, "Start music track"),
    tag(1, mnemonic::MUSIC_OFF, Param::None, false, "Stop music"),
    tag(2, mnemonic::SOUND, Param::Required, false, "Play sound effect"),
    tag(3, mnemonic::JUMP, Param::Required, false, "Jump to tick"),
    tag(4, mnemonic::BLEND_START, Param::Required, true, "Blend start level"),
    tag(5, mnemonic::BLEND_FINISH, Param::Required, true, "Blend finish level"),
    tag(6, mnemonic::BLEND_ADDITIVE, Param::None, true, "Additive blending"),
    tag(7, mnemonic::SPAWN_CHILD, Param::Required, false, "Spawn child animation"),
    tag(8, mnemonic::DESTROY_CHILD, Param::Optional, false, "Destroy child animation"),
    tag(9, mnemonic::CHILD_X, Param::Required, false, "Child animation x offset"),
    tag(10, mnemonic::CHILD_Y, Param::Required, false, "Child animation y offset"),
    tag(11, mnemonic::DAMAGE, Param::Required, false, "Apply damage"),
    tag(12, mnemonic::FLIP_VERTICAL, Param::None, true, "Flip sprite vertically"),
    tag(13, mnemonic::FLIP_HORIZONTAL, Param::None, true, "Flip sprite horizontally"),
    tag(14, mnemonic::X_DEC, Param::Required, false, "Decrement x position"),
    tag(15, mnemonic::X_INC, Param::Required, false, "Increment x position"),
    tag(16, mnemonic::X_TARGET, Param::Required, false, "Interpolate x towards target"),
    tag(17, mnemonic::X_SET, Param::Required, false, "Set x position"),
    tag(18, mnemonic::Y_DEC, Param::Required, false, "Decrement y position"),
    tag(19, mnemonic::Y_INC, Param::Required, false, "Increment y position"),
    tag(20, mnemonic::Y_TARGET, Param::Required, false, "Interpolate y towards target"),
    tag(21, mnemonic::Y_SET, Param::Required, false, "Set y position"),
];

static INDEX: LazyLock<HashMap<&'static str, TagId>> =
    LazyLock::new(|| TAGS.iter().map(|t| (t.mnemonic, t.id)).collect());

// =============================================================================
// Lookup
// =============================================================================

/// Look up a tag by its exact mnemonic
pub fn lookup(mnemonic: &str) -> Option<&'static TagDescriptor> {
    TagId::from_mnemonic(mnemonic).map(TagId::descriptor)
}

/// Registered tags that are a prefix of `input`, longest first
///
/// The decoder takes the first candidate it can accept, so `bs10` yields
/// `bs` before anything shorter is considered.
pub fn match_prefix(input: &[u8]) -> impl Iterator<Item = &'static TagDescriptor> + '_ {
    let longest = input.len().min(MAX_MNEMONIC_LEN);
    (1..=longest).rev().filter_map(move |len| {
        std::str::from_utf8(&input[..len]).ok().and_then(lookup)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_match_table_position() {
        for (i, tag) in TAGS.iter().enumerate() {
            assert_eq!(tag.id.index(), i, "{} has wrong id", tag.mnemonic);
        }
    }

    #[test]
    fn test_mnemonics_unique() {
        assert_eq!(INDEX.len(), TAGS.len());
    }

    #[test]
    fn test_lookup_exact() {
        let bs = lookup("bs").unwrap();
        assert_eq!(bs.mnemonic, "bs");
        assert!(bs.takes_param());
        assert!(bs.persists);

        assert!(lookup("b").is_none());
        assert!(lookup("zcu").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_match_prefix_longest_first() {
        let found: Vec<_> = match_prefix(b"bs10").map(|t| t.mnemonic).collect();
        assert_eq!(found, vec!["bs"]);

        let found: Vec<_> = match_prefix(b"smo3").map(|t| t.mnemonic).collect();
        assert_eq!(found, vec!["smo", "s"]);

        let found: Vec<_> = match_prefix(b"md").map(|t| t.mnemonic).collect();
        assert_eq!(found, vec!["md", "m"]);

        let found: Vec<_> = match_prefix(b"x+4").map(|t| t.mnemonic).collect();
        assert_eq!(found, vec!["x+", "x"]);
    }

    #[test]
    fn test_match_prefix_short_and_non_ascii() {
        assert_eq!(match_prefix(b"").count(), 0);
        assert_eq!(match_prefix(b"z").count(), 0);
        // Cutting inside a multi-byte character must not panic
        assert_eq!(match_prefix("s\u{e9}".as_bytes()).count(), 1);
    }

    #[test]
    fn test_param_kinds() {
        assert_eq!(lookup("br").unwrap().param, Param::None);
        assert_eq!(lookup("md").unwrap().param, Param::Optional);
        assert!(lookup("md").unwrap().takes_param());
        assert!(!lookup("f").unwrap().takes_param());
    }

    #[test]
    fn test_persisting_tags_are_blend_and_flip() {
        let persisting: Vec<_> = TAGS
            .iter()
            .filter(|t| t.persists)
            .map(|t| t.mnemonic)
            .collect();
        assert_eq!(persisting, vec!["bs", "bf", "br", "f", "r"]);
    }

    #[test]
    fn test_tag_id_roundtrip() {
        let id = TagId::from_mnemonic("cp").unwrap();
        assert_eq!(id.mnemonic(), "cp");
        assert_eq!(TagId::from_index(id.index() as u8), Some(id));
        assert_eq!(TagId::from_index(TAGS.len() as u8), None);
    }
}

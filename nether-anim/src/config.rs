//! Playback configuration
//!
//! Settings that change how a [`crate::Cursor`] interprets a script. Loaded
//! from TOML by tools; games usually construct it in code.

use serde::{Deserialize, Serialize};

/// How the parameter of a jump tag (`d`) is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum JumpMode {
    /// Absolute animation tick
    #[default]
    AbsoluteTick,
    /// Frame index; jumps to the first tick of that frame
    FrameIndex,
    /// Signed tick offset from the start of the frame carrying the jump
    Relative,
}

/// Cursor playback configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Jump parameter semantics (default: absolute-tick)
    #[serde(default)]
    pub jump_mode: JumpMode,
    /// Wrap to the first frame instead of finishing (default: false)
    #[serde(default)]
    pub repeat: bool,
    /// Finish after leaving this frame instead of the last one
    #[serde(default)]
    pub end_frame: Option<usize>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            jump_mode: JumpMode::default(),
            repeat: false,
            end_frame: None,
        }
    }
}

/// Errors from parsing or writing configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid playback config: {0}")]
    Parse(String),

    #[error("failed to serialize playback config: {0}")]
    Serialize(String),
}

impl PlaybackConfig {
    /// Parse from a TOML document; missing keys take their defaults
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize to a TOML document
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

//! Tool configuration (anim.toml)
//!
//! Read from `--config PATH`, or from `anim.toml` in the platform config
//! directory. Missing sections and keys take their defaults.

use anyhow::{Context, Result};
use nether_anim::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the config directory
pub const CONFIG_FILE: &str = "anim.toml";

/// Tool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnimToolConfig {
    /// Cursor settings used by `play`
    #[serde(default)]
    pub playback: PlaybackConfig,
    /// `play` command settings
    #[serde(default)]
    pub play: PlayConfig,
}

/// Settings for the play command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayConfig {
    /// Stop after this many ticks if the animation never finishes (default: 2000)
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u32,
}

fn default_max_ticks() -> u32 {
    2000
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
        }
    }
}

/// Returns the platform-specific configuration directory.
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.nethercore", "", "Nethercore")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Load the configuration.
///
/// An explicit path must exist and parse. Without one, `anim.toml` in the
/// config directory is used when present; otherwise defaults.
pub fn load(path: Option<&Path>) -> Result<AnimToolConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match config_dir().map(|dir| dir.join(CONFIG_FILE)) {
            Some(path) if path.exists() => path,
            _ => return Ok(AnimToolConfig::default()),
        },
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = parse(&content).with_context(|| format!("Invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Parse a TOML document
pub fn parse(content: &str) -> Result<AnimToolConfig> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nether_anim::JumpMode;

    #[test]
    fn test_config_default() {
        let config = AnimToolConfig::default();
        assert_eq!(config.play.max_ticks, 2000);
        assert_eq!(config.playback, PlaybackConfig::default());
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config = parse("").unwrap();
        assert_eq!(config, AnimToolConfig::default());
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml_str = r#"
[playback]
jump_mode = "relative"
"#;
        let config = parse(toml_str).unwrap();
        assert_eq!(config.playback.jump_mode, JumpMode::Relative);
        assert!(!config.playback.repeat); // default
        assert_eq!(config.play.max_ticks, 2000); // default
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anim.toml");
        std::fs::write(&path, "[play]\nmax_ticks = 50\n[playback]\nrepeat = true\n").unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.play.max_ticks, 50);
        assert!(config.playback.repeat);
    }

    #[test]
    fn test_load_explicit_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load(Some(&missing)).is_err());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[playback]\njump_mode = \"sideways\"\n").unwrap();
        let err = load(Some(&bad)).unwrap_err();
        assert!(err.to_string().starts_with("Invalid config"));
    }

    #[test]
    fn test_config_serialize_roundtrip() {
        let mut config = AnimToolConfig::default();
        config.play.max_ticks = 10;
        config.playback.end_frame = Some(3);
        let toml_str = toml::to_string(&config).unwrap();
        assert_eq!(parse(&toml_str).unwrap(), config);
    }
}

//! Play command - run a cursor tick by tick and print what changes

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use nether_anim::{Cursor, PlaybackConfig, Script, TAGS, decode, encode_frame};

use crate::config;
use crate::input::InputArgs;

/// Arguments for the play command
#[derive(Args, Debug)]
pub struct PlayArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Maximum ticks to simulate (default from config, 2000)
    #[arg(long)]
    pub ticks: Option<u32>,

    /// Config file (default: anim.toml in the config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Loop back to the first frame instead of finishing
    #[arg(long)]
    pub repeat: bool,
}

/// Something observed while playing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A new frame started showing
    Frame {
        tick: u32,
        frame: usize,
        text: String,
        /// Moved backwards (jump or repeat)
        rewind: bool,
        /// Persisting tags in effect: mnemonic, value, frame set on
        carried: Vec<(&'static str, Option<i32>, usize)>,
    },
    /// Playback ended
    Finished { tick: u32 },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Frame {
                tick,
                frame,
                text,
                rewind,
                carried,
            } => {
                write!(f, "{tick:>6}  frame {frame:<3} {text}")?;
                if *rewind {
                    f.write_str("  (rewind)")?;
                }
                for (tag, value, set_on) in carried {
                    match value {
                        Some(v) => write!(f, "  {tag}={v}@{set_on}")?,
                        None => write!(f, "  {tag}@{set_on}")?,
                    }
                }
                Ok(())
            }
            Event::Finished { tick } => write!(f, "{tick:>6}  finished"),
        }
    }
}

/// Advance a fresh cursor once per tick from 0 to `max_ticks`
pub fn simulate(script: &Script, playback: PlaybackConfig, max_ticks: u32) -> Vec<Event> {
    let mut cursor = Cursor::with_config(script, playback);
    let mut events = Vec::new();
    let mut previous: Option<usize> = None;

    for tick in 0..=max_ticks {
        if cursor.advance(tick) {
            let frame = cursor.current_frame();
            let carried = TAGS
                .iter()
                .filter(|desc| desc.persists)
                .filter_map(|desc| {
                    cursor
                        .get_active(desc.mnemonic)
                        .map(|active| (desc.mnemonic, active.value, active.frame))
                })
                .collect();
            events.push(Event::Frame {
                tick,
                frame,
                text: script.frame(frame).map(encode_frame).unwrap_or_default(),
                rewind: previous.is_some_and(|p| frame <= p),
                carried,
            });
            previous = Some(frame);
        }
        if cursor.is_finished() {
            events.push(Event::Finished { tick });
            break;
        }
    }
    events
}

/// Execute the play command
pub fn execute(args: PlayArgs) -> Result<()> {
    let mut config = config::load(args.config.as_deref())?;
    if args.repeat {
        config.playback.repeat = true;
    }
    let max_ticks = args.ticks.unwrap_or(config.play.max_ticks);
    tracing::info!(playback = ?config.playback, max_ticks, "playing");

    for entry in args.input.load()? {
        let script = decode(&entry.text).with_context(|| entry.label.clone())?;
        println!("{} ({} ticks)", entry.text, script.total_ticks());
        let events = simulate(&script, config.playback.clone(), max_ticks);
        let finished = matches!(events.last(), Some(Event::Finished { .. }));
        for event in &events {
            println!("{event}");
        }
        if !finished {
            println!("{max_ticks:>6}  still playing");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(events: &[Event]) -> Vec<(u32, usize, bool)> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::Frame {
                    tick,
                    frame,
                    rewind,
                    ..
                } => Some((*tick, *frame, *rewind)),
                Event::Finished { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_simulate_to_finish() {
        let script = decode("brA20-bs200B200-bf200C200").unwrap();
        let events = simulate(&script, PlaybackConfig::default(), 2000);
        assert_eq!(
            frames(&events),
            vec![(0, 0, false), (20, 1, false), (220, 2, false)]
        );
        assert_eq!(events.last(), Some(&Event::Finished { tick: 420 }));
    }

    #[test]
    fn test_simulate_jump_is_rewind() {
        let script = decode("A5-B5-d0C5").unwrap();
        let events = simulate(&script, PlaybackConfig::default(), 30);
        assert_eq!(
            frames(&events)[..4],
            [(0, 0, false), (5, 1, false), (10, 0, true), (15, 1, false)]
        );
        assert!(!matches!(events.last(), Some(Event::Finished { .. })));
    }

    #[test]
    fn test_event_display() {
        let script = decode("brA2-bs9B2").unwrap();
        let events = simulate(&script, PlaybackConfig::default(), 10);
        let lines: Vec<String> = events.iter().map(ToString::to_string).collect();
        assert_eq!(lines[0], "     0  frame 0   brA2  br@0");
        assert_eq!(lines[1], "     2  frame 1   bs9B2  bs=9@1  br@0");
        assert_eq!(lines[2], "     4  finished");
    }
}

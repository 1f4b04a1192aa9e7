//! Dump command - list frames and tags

use anyhow::{Context, Result};
use clap::Args;
use nether_anim::{Script, decode};
use serde::Serialize;

use crate::input::InputArgs;

/// Arguments for the dump command
#[derive(Args, Debug)]
pub struct DumpArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print JSON instead of a text listing
    #[arg(long)]
    pub json: bool,
}

/// Serializable view of a decoded script
#[derive(Debug, Serialize)]
pub struct ScriptDump {
    pub source: String,
    pub total_ticks: u32,
    pub frames: Vec<FrameDump>,
}

#[derive(Debug, Serialize)]
pub struct FrameDump {
    pub index: usize,
    pub sprite: char,
    pub start: u32,
    pub ticks: u32,
    pub tags: Vec<TagDump>,
}

#[derive(Debug, Serialize)]
pub struct TagDump {
    pub tag: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
    pub description: &'static str,
}

impl ScriptDump {
    pub fn new(source: &str, script: &Script) -> Self {
        let frames = script
            .frames()
            .iter()
            .enumerate()
            .map(|(index, frame)| FrameDump {
                index,
                sprite: frame.letter(),
                start: script.frame_start(index).unwrap_or(0),
                ticks: frame.tick_len(),
                tags: frame
                    .tags()
                    .iter()
                    .map(|tag| TagDump {
                        tag: tag.mnemonic(),
                        value: tag.value(),
                        description: tag.descriptor().description,
                    })
                    .collect(),
            })
            .collect();

        Self {
            source: source.to_string(),
            total_ticks: script.total_ticks(),
            frames,
        }
    }

    /// Human-readable listing
    pub fn to_text(&self) -> String {
        let mut out = format!("{} ({} ticks)\n", self.source, self.total_ticks);
        for frame in &self.frames {
            out.push_str(&format!(
                "  [{:>2}] {} t={:<5} len={}\n",
                frame.index, frame.sprite, frame.start, frame.ticks
            ));
            for tag in &frame.tags {
                let value = tag.value.map(|v| v.to_string()).unwrap_or_default();
                out.push_str(&format!(
                    "         {:<4}{:<8} {}\n",
                    tag.tag, value, tag.description
                ));
            }
        }
        out
    }
}

/// Execute the dump command
pub fn execute(args: DumpArgs) -> Result<()> {
    let mut dumps = Vec::new();
    for entry in args.input.load()? {
        let script = decode(&entry.text).with_context(|| entry.label.clone())?;
        dumps.push(ScriptDump::new(&entry.text, &script));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dumps)?);
    } else {
        for dump in &dumps {
            print!("{}", dump.to_text());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_json() {
        let source = "brA20-bs200B200";
        let script = decode(source).unwrap();
        let dump = ScriptDump::new(source, &script);
        let json = serde_json::to_value(&dump).unwrap();

        assert_eq!(json["total_ticks"], 220);
        assert_eq!(json["frames"][1]["sprite"], "B");
        assert_eq!(json["frames"][1]["start"], 20);
        assert_eq!(json["frames"][1]["tags"][0]["tag"], "bs");
        assert_eq!(json["frames"][1]["tags"][0]["value"], 200);
        // Bare tags have no value key
        assert!(json["frames"][0]["tags"][0].get("value").is_none());
    }

    #[test]
    fn test_dump_text() {
        let source = "s3A5";
        let script = decode(source).unwrap();
        let text = ScriptDump::new(source, &script).to_text();
        assert!(text.starts_with("s3A5 (5 ticks)\n"));
        assert!(text.contains("[ 0] A t=0"));
        assert!(text.contains("Play sound effect"));
    }
}

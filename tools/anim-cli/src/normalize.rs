//! Normalize command - print the canonical encoding

use anyhow::{Context, Result};
use clap::Args;
use nether_anim::{decode, encode_to_string};

use crate::input::InputArgs;

/// Arguments for the normalize command
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Execute the normalize command
pub fn execute(args: NormalizeArgs) -> Result<()> {
    for entry in args.input.load()? {
        println!("{}", normalize(&entry.text).with_context(|| entry.label.clone())?);
    }
    Ok(())
}

/// Canonical form of one string
pub fn normalize(text: &str) -> Result<String> {
    let script = decode(text)?;
    let canonical = encode_to_string(&script);
    if canonical != text {
        tracing::debug!(from = text, to = %canonical, "normalized");
    }
    Ok(canonical)
}

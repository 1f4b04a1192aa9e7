//! Nether Anim CLI - authoring and debugging tool for animation strings
//!
//! # Commands
//!
//! - `nether-anim check` - Decode strings and point at the first bad byte
//! - `nether-anim dump` - List frames and tags (text or JSON)
//! - `nether-anim normalize` - Print the canonical encoding
//! - `nether-anim play` - Run a playback cursor tick by tick
//! - `nether-anim tags` - Print the tag vocabulary
//!
//! # Usage
//!
//! ```bash
//! # Check a single move string
//! nether-anim check "brA20-bs200B200-bf200C200"
//!
//! # Check every string in a file (one per line, # comments allowed)
//! nether-anim check --file moves.txt
//!
//! # Watch a looping move for 1000 ticks with frame-index jumps
//! nether-anim play --ticks 1000 --config anim.toml "A5-B5-d0C5"
//! ```
//!
//! # Configuration (anim.toml)
//!
//! ```toml
//! [playback]
//! jump_mode = "absolute-tick"
//! repeat = false
//!
//! [play]
//! max_ticks = 2000
//! ```

mod check;
mod config;
mod dump;
mod input;
mod normalize;
mod play;
mod tags;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Nether Anim - animation string tool
#[derive(Parser)]
#[command(name = "nether-anim")]
#[command(about = "Check, inspect and play animation strings")]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode strings and report errors with their byte offset
    Check(check::CheckArgs),

    /// List frames and tags
    Dump(dump::DumpArgs),

    /// Print the canonical encoding of each string
    Normalize(normalize::NormalizeArgs),

    /// Play a string tick by tick and print frame changes
    Play(play::PlayArgs),

    /// Print the tag vocabulary
    Tags,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check(args) => check::execute(args),
        Commands::Dump(args) => dump::execute(args),
        Commands::Normalize(args) => normalize::execute(args),
        Commands::Play(args) => play::execute(args),
        Commands::Tags => tags::execute(),
    }
}

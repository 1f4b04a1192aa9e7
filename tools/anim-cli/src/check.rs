//! Check command - decode strings and point at the failing byte

use anyhow::{Result, bail};
use clap::Args;
use nether_anim::{DecodeError, decode};

use crate::input::InputArgs;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Only print failures
    #[arg(long, short)]
    pub quiet: bool,
}

/// Execute the check command
pub fn execute(args: CheckArgs) -> Result<()> {
    let entries = args.input.load()?;

    let mut failed = 0;
    for entry in &entries {
        match decode(&entry.text) {
            Ok(script) => {
                if !args.quiet {
                    println!(
                        "ok    {}: {} frames, {} ticks",
                        entry.label,
                        script.frame_count(),
                        script.total_ticks()
                    );
                }
            }
            Err(err) => {
                failed += 1;
                println!("error {}: {}", entry.label, err);
                println!("{}", render_diagnostic(&entry.text, &err));
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} animation strings failed to decode", entries.len());
    }
    Ok(())
}

/// The input with a caret under the failing byte
pub fn render_diagnostic(text: &str, err: &DecodeError) -> String {
    // Caret column counts characters so multi-byte input still lines up
    let column = text
        .get(..err.offset)
        .map_or(err.offset, |prefix| prefix.chars().count());
    format!("  {text}\n  {}^", " ".repeat(column))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_diagnostic() {
        let text = "x+4zcubs21l50zp";
        let err = decode(text).unwrap_err();
        assert_eq!(
            render_diagnostic(text, &err),
            "  x+4zcubs21l50zp\n     ^"
        );
    }

    #[test]
    fn test_render_diagnostic_at_end() {
        let text = "A1-s4";
        let err = decode(text).unwrap_err();
        assert_eq!(render_diagnostic(text, &err), "  A1-s4\n       ^");
    }

    #[test]
    fn test_render_diagnostic_multibyte() {
        let text = "\u{e9}A1";
        let err = decode(text).unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(render_diagnostic(text, &err), "  \u{e9}A1\n  ^");
    }

    #[test]
    fn test_execute_fails_on_bad_string() {
        let args = CheckArgs {
            input: InputArgs {
                strings: vec!["A1".to_string(), "f5A1".to_string()],
                file: None,
            },
            quiet: true,
        };
        let err = execute(args).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 animation strings failed to decode");
    }

    #[test]
    fn test_execute_passes() {
        let args = CheckArgs {
            input: InputArgs {
                strings: vec!["brA20-bs200B200-bf200C200".to_string()],
                file: None,
            },
            quiet: false,
        };
        assert!(execute(args).is_ok());
    }
}

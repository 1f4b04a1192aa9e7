//! Animation string sources shared by every command

use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::PathBuf;

/// Where to read animation strings from
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Animation strings to process
    pub strings: Vec<String>,

    /// Read strings from a file, one per line (blank lines and # comments skipped)
    #[arg(long, short)]
    pub file: Option<PathBuf>,
}

/// One animation string and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// `arg 1`, `moves.txt:12`, ...
    pub label: String,
    pub text: String,
}

impl InputArgs {
    /// Collect strings from arguments, then from the file
    pub fn load(&self) -> Result<Vec<Entry>> {
        let mut entries: Vec<Entry> = self
            .strings
            .iter()
            .enumerate()
            .map(|(i, text)| Entry {
                label: format!("arg {}", i + 1),
                text: text.clone(),
            })
            .collect();

        if let Some(path) = &self.file {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let name = path.display().to_string();
            entries.extend(parse_lines(&content).map(|(line, text)| Entry {
                label: format!("{name}:{line}"),
                text: text.to_string(),
            }));
            tracing::debug!(path = %name, count = entries.len(), "loaded animation strings");
        }

        if entries.is_empty() {
            bail!("No animation strings given (pass them as arguments or use --file)");
        }
        Ok(entries)
    }
}

/// Non-empty, non-comment lines with their 1-based line numbers
pub fn parse_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_lines_skips_comments_and_blanks() {
        let content = "# jab\nA5-B5\n\n   \n  # kick\n  s3A1  \n";
        let lines: Vec<_> = parse_lines(content).collect();
        assert_eq!(lines, vec![(2, "A5-B5"), (6, "s3A1")]);
    }

    #[test]
    fn test_load_from_args_and_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# moves").unwrap();
        writeln!(file, "A1").unwrap();
        writeln!(file, "B2").unwrap();

        let args = InputArgs {
            strings: vec!["C3".to_string()],
            file: Some(file.path().to_path_buf()),
        };
        let entries = args.load().unwrap();
        let texts: Vec<_> = entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["C3", "A1", "B2"]);
        assert_eq!(entries[0].label, "arg 1");
        assert!(entries[1].label.ends_with(":2"));
    }

    #[test]
    fn test_load_requires_input() {
        let args = InputArgs {
            strings: Vec::new(),
            file: None,
        };
        assert!(args.load().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = InputArgs {
            strings: Vec::new(),
            file: Some(dir.path().join("missing.txt")),
        };
        let err = args.load().unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}

//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! A command's result goes to stdout and is always printed. The quiet flag
//! only silences chatter: status messages and warnings. Errors go to stderr
//! unconditionally. Debug detail goes through `tracing`, not through here.

use std::fmt::Display;

use serde::Serialize;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
}

impl Verbosity {
    /// Create verbosity from the quiet flag.
    pub fn from_quiet(quiet: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a status message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a result that already carries its own line endings (always shown).
pub fn print_raw(text: &str) {
    print!("{}", text);
}

/// Print a value as pretty JSON (always shown).
pub fn print_json<T: Serialize>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Format `key = value` lines with aligned values.
pub fn format_pairs(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(key, value)| format!("{:<width$} = {}", key, value, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_from_quiet() {
        assert_eq!(Verbosity::from_quiet(true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_quiet(false), Verbosity::Normal);
    }

    #[test]
    fn pairs_are_aligned() {
        let text = format_pairs(&[("a", "1".to_string()), ("long.key", "2".to_string())]);
        assert_eq!(text, "a        = 1\nlong.key = 2");
    }

    #[test]
    fn no_pairs() {
        assert_eq!(format_pairs(&[]), "");
    }
}

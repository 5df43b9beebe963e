//! core::trailers
//!
//! Structured reading and writing of commit message lines.
//!
//! # Contract
//!
//! - The **summary** of a message is its first line with surrounding
//!   whitespace trimmed. An empty message has an empty summary.
//! - A **change id** is carried by a line of exactly the form
//!   `Change-Id: I<token>`, where the token is lowercase alphanumeric and
//!   trailing whitespace is allowed. The first such line wins.
//! - A **treesame trailer** (`Treesame-Commit-Id: <oid>`) is appended to
//!   synthesized commits, separated from the body by a blank line.
//!
//! # Example
//!
//! ```
//! use treesame::core::trailers::{summary, ChangeId};
//!
//! let message = "Fix parser\n\nChange-Id: I0123abcd\n";
//! assert_eq!(summary(message), "Fix parser");
//! assert_eq!(ChangeId::parse(message).unwrap().as_str(), "I0123abcd");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::types::Oid;

static CHANGE_ID_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Change-Id:\s+(I[0-9a-z]+)\s*$").expect("change id pattern is valid")
});

/// Trailer key recorded on synthesized commits.
pub const TREESAME_TRAILER_KEY: &str = "Treesame-Commit-Id";

/// First line of a commit message, trimmed.
pub fn summary(message: &str) -> &str {
    message.lines().next().unwrap_or("").trim()
}

/// A change identifier correlating equivalent commits across rewritten
/// histories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ChangeId(String);

impl ChangeId {
    /// Extract the change id from a commit message, if any line carries one.
    pub fn parse(message: &str) -> Option<Self> {
        message.lines().find_map(|line| {
            CHANGE_ID_LINE
                .captures(line)
                .map(|caps| ChangeId(caps[1].to_string()))
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChangeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Append the treesame trailer to a message body.
///
/// The result is `"<body>\n\nTreesame-Commit-Id: <source>\n"`.
pub fn with_treesame_trailer(body: &str, source: &Oid) -> String {
    format!("{}\n\n{}: {}\n", body, TREESAME_TRAILER_KEY, source)
}

/// Read back the source commit recorded by [`with_treesame_trailer`].
///
/// The last matching line wins, since the trailer is appended after any
/// user-supplied text.
pub fn treesame_source(message: &str) -> Option<Oid> {
    let prefix = format!("{}:", TREESAME_TRAILER_KEY);
    message
        .lines()
        .rev()
        .filter_map(|line| line.strip_prefix(prefix.as_str()))
        .find_map(|value| Oid::new(value.trim()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod summary {
        use super::*;

        #[test]
        fn first_line_trimmed() {
            assert_eq!(summary("  Add thing  \n\nbody"), "Add thing");
        }

        #[test]
        fn single_line() {
            assert_eq!(summary("Only line"), "Only line");
        }

        #[test]
        fn empty_message() {
            assert_eq!(summary(""), "");
        }
    }

    mod change_id {
        use super::*;

        #[test]
        fn parses_trailer() {
            let msg = "Subject\n\nbody text\nChange-Id: I1a2b3c\n";
            assert_eq!(ChangeId::parse(msg).unwrap().as_str(), "I1a2b3c");
        }

        #[test]
        fn allows_trailing_whitespace() {
            let msg = "Subject\n\nChange-Id:   Iabc  ";
            assert_eq!(ChangeId::parse(msg).unwrap().as_str(), "Iabc");
        }

        #[test]
        fn requires_leading_i() {
            assert!(ChangeId::parse("Subject\n\nChange-Id: abc123").is_none());
        }

        #[test]
        fn rejects_uppercase_token() {
            assert!(ChangeId::parse("Subject\n\nChange-Id: IABC").is_none());
        }

        #[test]
        fn rejects_indented_line() {
            assert!(ChangeId::parse("Subject\n\n  Change-Id: Iabc").is_none());
        }

        #[test]
        fn rejects_trailing_text() {
            assert!(ChangeId::parse("Change-Id: Iabc extra").is_none());
        }

        #[test]
        fn first_match_wins() {
            let msg = "Subject\nChange-Id: Ifirst\nChange-Id: Isecond";
            assert_eq!(ChangeId::parse(msg).unwrap().as_str(), "Ifirst");
        }

        #[test]
        fn absent_when_missing() {
            assert!(ChangeId::parse("Just a subject").is_none());
        }
    }

    mod treesame_trailer {
        use super::*;

        fn oid() -> Oid {
            Oid::new("abc123def4567890abc123def4567890abc12345").unwrap()
        }

        #[test]
        fn appends_after_blank_line() {
            let msg = with_treesame_trailer("treesame commit of main", &oid());
            assert_eq!(
                msg,
                "treesame commit of main\n\nTreesame-Commit-Id: abc123def4567890abc123def4567890abc12345\n"
            );
        }

        #[test]
        fn reads_back_source() {
            let msg = with_treesame_trailer("subject", &oid());
            assert_eq!(treesame_source(&msg), Some(oid()));
        }

        #[test]
        fn missing_trailer() {
            assert_eq!(treesame_source("subject\n\nbody"), None);
        }
    }
}

//! core::commit
//!
//! Commit objects as written to the object database.
//!
//! [`RawCommit`] holds everything needed to persist a new commit and knows
//! git's canonical serialization for it:
//!
//! ```text
//! tree <tree-id>
//! parent <parent-id>        (zero or more, in order)
//! author <signature>
//! committer <signature>
//!
//! <message>
//! ```

use chrono::{DateTime, FixedOffset};

use super::types::Oid;

/// An author or committer line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub when: DateTime<FixedOffset>,
}

impl Signature {
    pub fn new(name: impl Into<String>, email: impl Into<String>, when: DateTime<FixedOffset>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            when,
        }
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.when.timestamp(),
            self.when.format("%z")
        )
    }
}

/// A commit that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    pub tree: Oid,
    /// First parent is the mainline side.
    pub parents: Vec<Oid>,
    pub author: Signature,
    pub committer: Signature,
    pub message: String,
}

impl RawCommit {
    /// Serialize to the body of a git commit object (without the
    /// `commit <len>\0` header, which the object store adds).
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = String::new();
        out.push_str(&format!("tree {}\n", self.tree));
        for parent in &self.parents {
            out.push_str(&format!("parent {}\n", parent));
        }
        out.push_str(&format!("author {}\n", self.author));
        out.push_str(&format!("committer {}\n", self.committer));
        out.push('\n');
        out.push_str(&self.message);
        out.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn when() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-03-01T12:00:00+02:00").unwrap()
    }

    fn oid(c: char) -> Oid {
        Oid::new(c.to_string().repeat(40)).unwrap()
    }

    #[test]
    fn signature_format() {
        let sig = Signature::new("Test User", "test@example.com", when());
        assert_eq!(sig.to_string(), "Test User <test@example.com> 1709287200 +0200");
    }

    #[test]
    fn serialize_single_parent() {
        let sig = Signature::new("A", "a@example.com", when());
        let commit = RawCommit {
            tree: oid('a'),
            parents: vec![oid('b')],
            author: sig.clone(),
            committer: sig,
            message: "subject\n".to_string(),
        };

        let text = String::from_utf8(commit.serialize()).unwrap();
        let expected = format!(
            "tree {}\nparent {}\nauthor A <a@example.com> 1709287200 +0200\ncommitter A <a@example.com> 1709287200 +0200\n\nsubject\n",
            oid('a'),
            oid('b')
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn serialize_preserves_parent_order() {
        let sig = Signature::new("A", "a@example.com", when());
        let commit = RawCommit {
            tree: oid('a'),
            parents: vec![oid('c'), oid('b')],
            author: sig.clone(),
            committer: sig,
            message: String::new(),
        };

        let text = String::from_utf8(commit.serialize()).unwrap();
        let c_pos = text.find(&format!("parent {}", oid('c'))).unwrap();
        let b_pos = text.find(&format!("parent {}", oid('b'))).unwrap();
        assert!(c_pos < b_pos);
    }

    #[test]
    fn serialize_root_commit_has_no_parent_lines() {
        let sig = Signature::new("A", "a@example.com", when());
        let commit = RawCommit {
            tree: oid('a'),
            parents: vec![],
            author: sig.clone(),
            committer: sig,
            message: "root".to_string(),
        };

        let text = String::from_utf8(commit.serialize()).unwrap();
        assert!(!text.contains("parent "));
    }
}

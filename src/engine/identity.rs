//! engine::identity
//!
//! Author and committer resolution for synthesized commits.
//!
//! Each of the four fields (author name/email, committer name/email) comes
//! from an explicit override when one is given, and otherwise from the
//! repository's `user.name` / `user.email` config. A field with neither is an
//! error rather than an empty string.

use chrono::{DateTime, FixedOffset};

use super::EngineError;
use crate::core::commit::Signature;
use crate::graph::CommitGraph;

/// Explicit identity values, typically from `GIT_AUTHOR_*` /
/// `GIT_COMMITTER_*` or command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityOverrides {
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub committer_name: Option<String>,
    pub committer_email: Option<String>,
}

/// A name and email pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    /// Stamp this identity at `when`.
    pub fn signature(&self, when: DateTime<FixedOffset>) -> Signature {
        Signature::new(self.name.clone(), self.email.clone(), when)
    }
}

/// Fully resolved identities for one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub author: Identity,
    pub committer: Identity,
}

impl IdentityOverrides {
    /// Fill every field, falling back to repository config.
    ///
    /// # Errors
    ///
    /// [`EngineError::MissingIdentity`] naming the config key that would
    /// have supplied the missing field.
    pub fn resolve<G: CommitGraph + ?Sized>(&self, graph: &G) -> Result<ResolvedIdentity, EngineError> {
        Ok(ResolvedIdentity {
            author: Identity {
                name: field(graph, &self.author_name, "user.name")?,
                email: field(graph, &self.author_email, "user.email")?,
            },
            committer: Identity {
                name: field(graph, &self.committer_name, "user.name")?,
                email: field(graph, &self.committer_email, "user.email")?,
            },
        })
    }
}

fn field<G: CommitGraph + ?Sized>(
    graph: &G,
    explicit: &Option<String>,
    key: &str,
) -> Result<String, EngineError> {
    if let Some(value) = explicit {
        return Ok(value.clone());
    }
    graph
        .config_value(key)?
        .ok_or_else(|| EngineError::MissingIdentity {
            key: key.to_string(),
        })
}

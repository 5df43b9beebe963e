//! graph::traits
//!
//! The narrow read/write interface the changelog and treesame engines need
//! from a commit graph.
//!
//! # Design
//!
//! Every operation is a blocking call that either completes or returns a
//! [`GitError`]. Implementations never retry. The engines only ever see
//! [`GraphCommit`] snapshots; nothing here hands out live repository
//! handles.
//!
//! Two implementations exist:
//! - [`crate::git::Git`] backed by a real repository
//! - [`crate::graph::mock::MockGraph`] for deterministic tests
//!
//! # Example
//!
//! ```ignore
//! use treesame::graph::CommitGraph;
//!
//! fn tip_summary(graph: &dyn CommitGraph) -> Result<String, GitError> {
//!     let head = graph.resolve("HEAD")?.expect("HEAD exists");
//!     Ok(head.summary().to_string())
//! }
//! ```

use std::collections::BTreeSet;

use serde::Serialize;

use crate::core::trailers::{self, ChangeId};
use crate::core::types::Oid;
use crate::git::GitError;

/// A read-only snapshot of one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphCommit {
    /// The commit id.
    pub id: Oid,
    /// Parent ids. The first parent is the mainline side.
    pub parents: Vec<Oid>,
    /// Content-state identifier (the root tree id).
    pub tree: Oid,
    /// Full commit message.
    pub message: String,
}

impl GraphCommit {
    /// First line of the message, trimmed.
    pub fn summary(&self) -> &str {
        trailers::summary(&self.message)
    }

    /// The `Change-Id` trailer value, if the message carries one.
    pub fn change_id(&self) -> Option<ChangeId> {
        ChangeId::parse(&self.message)
    }

    /// The mainline parent, or `None` for a root commit.
    pub fn first_parent(&self) -> Option<&Oid> {
        self.parents.first()
    }

    /// Abbreviated id as shown in changelog lines.
    pub fn short_id(&self) -> &str {
        self.id.short(Oid::SHORT_LEN)
    }
}

/// Commit graph operations.
///
/// `rev` arguments accept anything the backing store can name: a full
/// ref (`refs/heads/main`), a short branch name, `HEAD`, or a commit id.
pub trait CommitGraph {
    /// Resolve a revision to a commit. Returns `Ok(None)` if it names
    /// nothing.
    fn resolve(&self, rev: &str) -> Result<Option<GraphCommit>, GitError>;

    /// Load a commit by id.
    fn commit(&self, oid: &Oid) -> Result<GraphCommit, GitError>;

    /// Commits reachable from `to` but not from `from`, newest first with
    /// children always before their parents. A `from` of `None` yields the
    /// full ancestry of `to`.
    fn commits_between(&self, from: Option<&Oid>, to: &Oid) -> Result<Vec<GraphCommit>, GitError>;

    /// The best common ancestor of two commits, if any.
    fn merge_base(&self, a: &Oid, b: &Oid) -> Result<Option<Oid>, GitError>;

    /// Paths whose content differs between `other` and `commit`. An `other`
    /// of `None` compares against the empty tree.
    fn changed_paths(&self, commit: &Oid, other: Option<&Oid>) -> Result<BTreeSet<String>, GitError>;

    /// Persist a serialized commit object and return its id.
    fn write_raw_object(&self, data: &[u8]) -> Result<Oid, GitError>;

    /// Read the target of a symbolic ref. Returns `Ok(None)` if `name` is
    /// missing, is not symbolic (e.g. a detached `HEAD`), or is not a full
    /// ref name at all (a short branch name such as `main`).
    fn read_symbolic_ref(&self, name: &str) -> Result<Option<String>, GitError>;

    /// Point a direct ref at `oid`, creating it if needed. `name` must be
    /// `HEAD` or a full `refs/...` name.
    fn write_ref(&self, name: &str, oid: &Oid, log_message: &str) -> Result<(), GitError>;

    /// Read a repository configuration value such as `user.name`.
    fn config_value(&self, key: &str) -> Result<Option<String>, GitError>;

    /// Force the index and working files to match `oid`'s tree, discarding
    /// uncommitted changes. Refs are left untouched.
    fn reset_working_state(&self, oid: &Oid) -> Result<(), GitError>;
}

//! engine
//!
//! The graph-search and history-synthesis algorithms.
//!
//! # Components
//!
//! - [`base_finder`] - N-way search for tree-identical commits
//! - [`changelog`] - Added/removed commit sets between two refs
//! - [`treesame`] - Synthesis of commits that reuse another commit's tree
//! - [`identity`] - Author/committer resolution for synthesized commits
//!
//! # Invariants
//!
//! - Every computation works over refs resolved once, up front
//! - The engines only talk to a repository through [`CommitGraph`]
//! - The only write path is [`treesame::synthesize`], and it writes the
//!   object before any ref is touched
//!
//! # Example
//!
//! ```
//! use treesame::core::config::ChangelogStyle;
//! use treesame::engine::changelog::{Changelog, FormatOptions};
//! use treesame::graph::mock::MockGraph;
//!
//! let graph = MockGraph::new();
//! let root = graph.add_commit(&[], &[("README.md", "v1")], "Initial commit");
//! let tip = graph.add_commit(&[&root], &[("README.md", "v2")], "Update readme");
//! graph.set_branch("old", &root);
//! graph.set_branch("new", &tip);
//!
//! let changelog = Changelog::compute(&graph, "old", "new", ChangelogStyle::Treesame).unwrap();
//! let text = changelog.format(FormatOptions::default());
//! assert!(text.starts_with("  * [+"));
//! assert!(text.ends_with("] Update readme\n"));
//! ```

pub mod base_finder;
pub mod changelog;
pub mod identity;
pub mod treesame;

use std::path::PathBuf;

use crate::graph::{CommitGraph, GraphCommit};

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags that affect command behavior.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

/// Errors from engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A ref did not resolve to a commit.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// Every search lane ran out of history before a shared tree was found.
    #[error("no common baseline found between {}", .refs.join(", "))]
    Graph {
        /// The refs that were searched, in lane order.
        refs: Vec<String>,
    },

    /// Neither an override nor repository config supplied an identity field.
    #[error("no {key} configured; set it with `git config {key} <value>`")]
    MissingIdentity {
        /// The config key that was consulted (e.g. `user.name`).
        key: String,
    },

    /// The target of a ref update is not a ref that can be moved.
    #[error("cannot move '{target}': not a branch or symbolic ref")]
    UnmovableTarget {
        /// The target as given by the caller.
        target: String,
    },

    /// Git error.
    #[error("git error: {0}")]
    Git(#[from] crate::git::GitError),
}

/// Resolve a revision to a commit, failing with
/// [`EngineError::InvalidReference`] if it names nothing.
pub fn resolve_commit<G: CommitGraph + ?Sized>(
    graph: &G,
    rev: &str,
) -> Result<GraphCommit, EngineError> {
    graph
        .resolve(rev)?
        .ok_or_else(|| EngineError::InvalidReference(rev.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::mock::MockGraph;

    mod context {
        use super::*;

        #[test]
        fn default_values() {
            let ctx = Context::default();
            assert!(ctx.cwd.is_none());
            assert!(!ctx.quiet);
        }
    }

    mod engine_error {
        use super::*;

        #[test]
        fn graph_error_lists_refs() {
            let err = EngineError::Graph {
                refs: vec!["old".to_string(), "new".to_string()],
            };
            assert_eq!(err.to_string(), "no common baseline found between old, new");
        }

        #[test]
        fn invalid_reference_names_ref() {
            let err = EngineError::InvalidReference("nope".to_string());
            assert_eq!(err.to_string(), "invalid reference: nope");
        }

        #[test]
        fn git_error_converts() {
            let err: EngineError = crate::git::GitError::BareRepo.into();
            assert!(matches!(err, EngineError::Git(_)));
        }
    }

    mod resolve {
        use super::*;

        #[test]
        fn resolves_existing_ref() {
            let graph = MockGraph::new();
            let root = graph.add_commit(&[], &[("a", "1")], "root");
            graph.set_branch("main", &root);
            assert_eq!(resolve_commit(&graph, "main").unwrap().id, root);
        }

        #[test]
        fn missing_ref_is_invalid_reference() {
            let graph = MockGraph::new();
            let err = resolve_commit(&graph, "nope").unwrap_err();
            assert!(matches!(err, EngineError::InvalidReference(ref r) if r == "nope"));
        }
    }
}

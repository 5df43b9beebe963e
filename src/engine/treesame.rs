//! engine::treesame
//!
//! Synthesis of commits that reuse another commit's tree under new parents.
//!
//! # Flow
//!
//! 1. Resolve the source and the target parent.
//! 2. If both already have the same tree and `force` is not set, stop.
//! 3. Build the parent list: `[target]`, plus the source when merging.
//! 4. Resolve identities, build the message with its
//!    `Treesame-Commit-Id` trailer, and persist the raw object.
//!
//! [`synthesize`] touches nothing but the object store. Moving a ref and
//! forcing the working state are separate, explicit [`PostActions`] that
//! callers apply afterwards with [`apply_post_actions`], so the object always
//! exists before any ref names it.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::{debug, info};

use super::identity::IdentityOverrides;
use super::{resolve_commit, EngineError};
use crate::core::commit::RawCommit;
use crate::core::trailers::with_treesame_trailer;
use crate::core::types::Oid;
use crate::graph::CommitGraph;

/// What to synthesize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreesameRequest {
    /// Ref whose tree the new commit takes.
    pub source: String,
    /// Ref that becomes the first parent.
    pub target: String,
    /// Record the source as a second parent.
    pub merge: bool,
    /// Write a commit even when the trees already match.
    pub force: bool,
    /// Message body; defaults to `treesame commit of <source>`.
    pub message: Option<String>,
}

impl TreesameRequest {
    /// A request onto `HEAD` with every option off.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: "HEAD".to_string(),
            merge: false,
            force: false,
            message: None,
        }
    }

    fn body(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| format!("treesame commit of {}", self.source))
    }
}

/// A commit written by [`synthesize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreesameCommit {
    pub id: Oid,
    pub tree: Oid,
    pub parents: Vec<Oid>,
    /// The commit whose tree was taken.
    pub source: Oid,
}

/// Result of [`synthesize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreesameOutcome {
    /// Source and target already share `tree`; nothing was written.
    Unchanged { tree: Oid },
    Created(TreesameCommit),
}

/// Build and persist a treesame commit.
///
/// # Errors
///
/// - [`EngineError::InvalidReference`] if source or target does not resolve
/// - [`EngineError::MissingIdentity`] if an identity field has no value
/// - [`EngineError::Git`] if the object write fails
pub fn synthesize<G: CommitGraph + ?Sized>(
    graph: &G,
    request: &TreesameRequest,
    identity: &IdentityOverrides,
    now: DateTime<FixedOffset>,
) -> Result<TreesameOutcome, EngineError> {
    let source = resolve_commit(graph, &request.source)?;
    let target = resolve_commit(graph, &request.target)?;

    if source.tree == target.tree && !request.force {
        debug!(tree = %source.tree, "source and target already share a tree");
        return Ok(TreesameOutcome::Unchanged { tree: source.tree });
    }

    let mut parents = vec![target.id.clone()];
    if request.merge {
        parents.push(source.id.clone());
    }

    let resolved = identity.resolve(graph)?;
    let raw = RawCommit {
        tree: source.tree.clone(),
        parents,
        author: resolved.author.signature(now),
        committer: resolved.committer.signature(now),
        message: with_treesame_trailer(&request.body(), &source.id),
    };

    let id = graph.write_raw_object(&raw.serialize())?;
    info!(
        commit = %id,
        tree = %raw.tree,
        source = %source.id,
        "wrote treesame commit"
    );

    Ok(TreesameOutcome::Created(TreesameCommit {
        id,
        tree: raw.tree,
        parents: raw.parents,
        source: source.id,
    }))
}

/// Optional side effects after a commit has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostActions {
    /// Move the target ref to the new commit.
    pub update_ref: bool,
    /// Force the index and working tree to the new commit.
    pub reset_working_state: bool,
}

impl Default for PostActions {
    fn default() -> Self {
        Self {
            update_ref: true,
            reset_working_state: true,
        }
    }
}

impl PostActions {
    /// Neither action.
    pub fn none() -> Self {
        Self {
            update_ref: false,
            reset_working_state: false,
        }
    }
}

/// What [`apply_post_actions`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostActionsReport {
    /// The ref that was moved, if any.
    pub moved: Option<String>,
    /// Whether the index and working tree were forced to the new commit.
    pub reset: bool,
}

/// Apply `actions` for a commit created on top of `target`.
///
/// The ref update runs before the reset. The working state is only reset
/// when `target` is checked out (see [`is_checked_out`]); otherwise the
/// reset is skipped and the report's `reset` stays false.
pub fn apply_post_actions<G: CommitGraph + ?Sized>(
    graph: &G,
    target: &str,
    created: &TreesameCommit,
    actions: PostActions,
) -> Result<PostActionsReport, EngineError> {
    let mut report = PostActionsReport::default();

    if actions.update_ref {
        let name = ref_to_update(graph, target)?;
        let log_message = format!("treesame: commit of {}", created.source);
        graph.write_ref(&name, &created.id, &log_message)?;
        info!(refname = %name, commit = %created.id, "updated ref");
        report.moved = Some(name);
    }

    if actions.reset_working_state {
        if is_checked_out(graph, target)? {
            graph.reset_working_state(&created.id)?;
            info!(commit = %created.id, "reset working state");
            report.reset = true;
        } else {
            info!(%target, "target is not checked out, leaving working state alone");
        }
    }

    Ok(report)
}

/// Whether `target` is `HEAD` or the branch `HEAD` points at.
pub fn is_checked_out<G: CommitGraph + ?Sized>(graph: &G, target: &str) -> Result<bool, EngineError> {
    let name = match ref_to_update(graph, target) {
        Ok(name) => name,
        Err(EngineError::UnmovableTarget { .. }) => return Ok(false),
        Err(err) => return Err(err),
    };
    if name == "HEAD" {
        return Ok(true);
    }
    Ok(graph.read_symbolic_ref("HEAD")?.as_deref() == Some(name.as_str()))
}

/// The ref that `target` names for the purpose of moving it.
///
/// A symbolic ref resolves to the ref it points at, so `HEAD` on a branch
/// moves the branch. A detached `HEAD` or a full `refs/...` name is used as
/// is. A short name maps to `refs/heads/<name>` when that branch exists.
pub fn ref_to_update<G: CommitGraph + ?Sized>(graph: &G, target: &str) -> Result<String, EngineError> {
    if let Some(pointee) = graph.read_symbolic_ref(target)? {
        return Ok(pointee);
    }
    if target == "HEAD" || target.starts_with("refs/") {
        return Ok(target.to_string());
    }

    let branch = format!("refs/heads/{}", target);
    if graph.resolve(&branch)?.is_some() {
        Ok(branch)
    } else {
        Err(EngineError::UnmovableTarget {
            target: target.to_string(),
        })
    }
}

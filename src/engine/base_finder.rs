//! engine::base_finder
//!
//! Finds, for N refs, one commit per ref such that all N commits have the
//! same tree and each lies in the ancestry of its ref.
//!
//! # Why not merge-base
//!
//! When histories diverge through rebases or cherry-picks there is often no
//! useful merge ancestor, yet both sides still passed through identical
//! content states. Those tree-identical commits make a better baseline for
//! comparing the two histories.
//!
//! # Algorithm
//!
//! One [`SearchLane`] per ref, each a FIFO of commits seeded with the ref's
//! commit plus a map from tree id to the first commit in that lane seen with
//! it. Lanes are stepped round-robin, one commit per lane per pass:
//!
//! 1. Dequeue the front commit and record its tree (first seen wins).
//! 2. If every lane has now recorded that tree, return each lane's entry.
//! 3. Otherwise enqueue the commit's parents, in parent order.
//!
//! A pass in which every queue was empty ends the search with no match.
//!
//! The interleaving is part of the contract: when several shared trees exist,
//! the one returned is the first to converge under exactly this stepping
//! order, not necessarily the shallowest. There is no visited set; a commit
//! reachable along several paths is queued once per path.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use super::{resolve_commit, EngineError};
use crate::core::types::Oid;
use crate::graph::{CommitGraph, GraphCommit};

/// Per-ref search state.
#[derive(Debug)]
pub struct SearchLane {
    queue: VecDeque<Oid>,
    /// Tree id -> first commit in this lane found with that tree.
    seen: HashMap<Oid, GraphCommit>,
}

impl SearchLane {
    /// Start a lane at `start`.
    pub fn new(start: &GraphCommit) -> Self {
        Self {
            queue: VecDeque::from([start.id.clone()]),
            seen: HashMap::new(),
        }
    }

    /// Record `commit` under its tree unless the tree was already seen.
    fn record(&mut self, commit: &GraphCommit) {
        self.seen
            .entry(commit.tree.clone())
            .or_insert_with(|| commit.clone());
    }

    /// First commit seen in this lane with the given tree.
    pub fn first_with_tree(&self, tree: &Oid) -> Option<&GraphCommit> {
        self.seen.get(tree)
    }
}

/// Resolve each ref and search for tree-identical bases.
///
/// Returns one commit per ref, in input order.
///
/// # Errors
///
/// - [`EngineError::InvalidReference`] if any ref does not resolve
/// - [`EngineError::Graph`] if the histories share no tree
pub fn find_treesame_bases<G, S>(graph: &G, refs: &[S]) -> Result<Vec<GraphCommit>, EngineError>
where
    G: CommitGraph + ?Sized,
    S: AsRef<str>,
{
    let starts = refs
        .iter()
        .map(|r| resolve_commit(graph, r.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    search(graph, &starts)?.ok_or_else(|| EngineError::Graph {
        refs: refs.iter().map(|r| r.as_ref().to_string()).collect(),
    })
}

/// Run the lane search from already-resolved start commits.
///
/// Returns `Ok(None)` when every lane is exhausted without a match.
pub fn search<G>(graph: &G, starts: &[GraphCommit]) -> Result<Option<Vec<GraphCommit>>, EngineError>
where
    G: CommitGraph + ?Sized,
{
    let mut lanes: Vec<SearchLane> = starts.iter().map(SearchLane::new).collect();
    let mut steps = 0usize;

    loop {
        let mut any_active = false;

        for index in 0..lanes.len() {
            let Some(oid) = lanes[index].queue.pop_front() else {
                continue;
            };
            any_active = true;
            steps += 1;

            let commit = graph.commit(&oid)?;
            lanes[index].record(&commit);
            debug!(
                lane = index,
                commit = commit.short_id(),
                tree = commit.tree.short(Oid::SHORT_LEN),
                "base finder step"
            );

            if let Some(found) = converged(&lanes, &commit.tree) {
                debug!(steps, tree = %commit.tree, "lanes converged");
                return Ok(Some(found));
            }

            lanes[index].queue.extend(commit.parents);
        }

        if !any_active {
            debug!(steps, "all lanes exhausted");
            return Ok(None);
        }
    }
}

/// Each lane's entry for `tree`, if every lane has one.
fn converged(lanes: &[SearchLane], tree: &Oid) -> Option<Vec<GraphCommit>> {
    lanes
        .iter()
        .map(|lane| lane.first_with_tree(tree).cloned())
        .collect()
}

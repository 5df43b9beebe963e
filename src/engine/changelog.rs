//! engine::changelog
//!
//! Computes which commits one ref has that another lacks, and renders the
//! difference as release-note lines.
//!
//! # Strategies
//!
//! - [`ChangelogStyle::Treesame`]: find tree-identical baselines with the
//!   [`base_finder`](super::base_finder), then take each side's range above
//!   its baseline.
//! - [`ChangelogStyle::ChangeId`]: take each side's range above the merge
//!   base and keep the commits whose `Change-Id` value the other side lacks.
//!
//! # Output
//!
//! ```text
//!   * [-abc1234] Removed change
//!   * [+def5678] Added change
//! ```
//!
//! Removed entries come first, oldest first; added entries follow in range
//! order (newest first). A summary present on both sides is treated as the
//! same change moved between histories and suppressed unless duplicates are
//! kept.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use super::base_finder;
use super::{resolve_commit, EngineError};
use crate::core::config::ChangelogStyle;
use crate::core::trailers::ChangeId;
use crate::graph::{CommitGraph, GraphCommit};

/// Options for [`Changelog::format`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Show commits whose summary appears on both sides.
    pub keep_duplicates: bool,
}

/// The commits exclusive to each side of a comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Changelog {
    /// New-side commits, newest first.
    pub added: Vec<GraphCommit>,
    /// Old-side commits, oldest first.
    pub removed: Vec<GraphCommit>,
}

impl Changelog {
    /// Compare `old` against `new` using the given strategy.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidReference`] if either ref does not resolve
    /// - [`EngineError::Graph`] if the treesame strategy finds no baseline
    pub fn compute<G: CommitGraph + ?Sized>(
        graph: &G,
        old: &str,
        new: &str,
        style: ChangelogStyle,
    ) -> Result<Self, EngineError> {
        let old_tip = resolve_commit(graph, old)?;
        let new_tip = resolve_commit(graph, new)?;

        let changelog = match style {
            ChangelogStyle::Treesame => Self::from_treesame_bases(graph, old, new, &old_tip, &new_tip)?,
            ChangelogStyle::ChangeId => Self::from_change_ids(graph, &old_tip, &new_tip)?,
        };

        debug!(
            %style,
            added = changelog.added.len(),
            removed = changelog.removed.len(),
            "computed changelog"
        );
        Ok(changelog)
    }

    fn from_treesame_bases<G: CommitGraph + ?Sized>(
        graph: &G,
        old: &str,
        new: &str,
        old_tip: &GraphCommit,
        new_tip: &GraphCommit,
    ) -> Result<Self, EngineError> {
        let starts = [old_tip.clone(), new_tip.clone()];
        let bases = base_finder::search(graph, &starts)?.ok_or_else(|| EngineError::Graph {
            refs: vec![old.to_string(), new.to_string()],
        })?;
        let (old_base, new_base) = (&bases[0], &bases[1]);

        let added = graph.commits_between(Some(&new_base.id), &new_tip.id)?;
        let mut removed = graph.commits_between(Some(&old_base.id), &old_tip.id)?;
        removed.reverse();

        Ok(Self { added, removed })
    }

    fn from_change_ids<G: CommitGraph + ?Sized>(
        graph: &G,
        old_tip: &GraphCommit,
        new_tip: &GraphCommit,
    ) -> Result<Self, EngineError> {
        let base = graph.merge_base(&old_tip.id, &new_tip.id)?;

        let tagged = |tip: &GraphCommit| -> Result<Vec<(Option<ChangeId>, GraphCommit)>, EngineError> {
            Ok(graph
                .commits_between(base.as_ref(), &tip.id)?
                .into_iter()
                .map(|c| (c.change_id(), c))
                .collect())
        };
        let old_commits = tagged(old_tip)?;
        let new_commits = tagged(new_tip)?;

        // "No change id" is a value in its own right and takes part in the
        // set difference like any other.
        let old_ids: HashSet<&Option<ChangeId>> = old_commits.iter().map(|(id, _)| id).collect();
        let new_ids: HashSet<&Option<ChangeId>> = new_commits.iter().map(|(id, _)| id).collect();

        let added = new_commits
            .iter()
            .filter(|(id, _)| !old_ids.contains(id))
            .map(|(_, c)| c.clone())
            .collect();
        let removed = old_commits
            .iter()
            .rev()
            .filter(|(id, _)| !new_ids.contains(id))
            .map(|(_, c)| c.clone())
            .collect();

        Ok(Self { added, removed })
    }

    /// True when neither side has exclusive commits.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Summaries present on both sides.
    pub fn duplicate_summaries(&self) -> HashSet<&str> {
        let added: HashSet<&str> = self.added.iter().map(GraphCommit::summary).collect();
        self.removed
            .iter()
            .map(GraphCommit::summary)
            .filter(|s| added.contains(s))
            .collect()
    }

    /// The changelog as individual lines, each ending in a newline.
    pub fn lines(&self, options: FormatOptions) -> Vec<String> {
        let suppressed = if options.keep_duplicates {
            HashSet::new()
        } else {
            self.duplicate_summaries()
        };

        let removed = self.removed.iter().map(|c| ('-', c));
        let added = self.added.iter().map(|c| ('+', c));

        removed
            .chain(added)
            .filter(|(_, c)| !suppressed.contains(c.summary()))
            .map(|(sign, c)| format!("  * [{}{}] {}\n", sign, c.short_id(), c.summary()))
            .collect()
    }

    /// The changelog as one string.
    pub fn format(&self, options: FormatOptions) -> String {
        self.lines(options).concat()
    }

    /// Keep only commits that change a path starting with `subdir`, compared
    /// with their first parent. Root commits are compared with the empty
    /// tree.
    ///
    /// Filtering is idempotent. On error the changelog is left unchanged.
    pub fn filter<G: CommitGraph + ?Sized>(&mut self, graph: &G, subdir: &str) -> Result<(), EngineError> {
        let removed = retain_touching(graph, &self.removed, subdir)?;
        let added = retain_touching(graph, &self.added, subdir)?;
        self.removed = removed;
        self.added = added;
        Ok(())
    }
}

fn retain_touching<G: CommitGraph + ?Sized>(
    graph: &G,
    commits: &[GraphCommit],
    subdir: &str,
) -> Result<Vec<GraphCommit>, EngineError> {
    let mut kept = Vec::with_capacity(commits.len());
    for commit in commits {
        if touches_subdir(graph, commit, subdir)? {
            kept.push(commit.clone());
        }
    }
    Ok(kept)
}

/// Whether `commit` changes any path with the given prefix.
pub fn touches_subdir<G: CommitGraph + ?Sized>(
    graph: &G,
    commit: &GraphCommit,
    subdir: &str,
) -> Result<bool, EngineError> {
    let paths = graph.changed_paths(&commit.id, commit.first_parent())?;
    Ok(paths.iter().any(|path| path.starts_with(subdir)))
}

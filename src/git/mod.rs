//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. All repository reads and writes
//! flow through [`Git`], which implements [`crate::graph::CommitGraph`]. No
//! other module should import `git2`, and nothing shells out to the git CLI.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Revision resolution and commit snapshots
//! - Ancestry queries (ranges, merge-base)
//! - Tree diffs (changed path names)
//! - Raw commit object writes and ref updates
//! - Repository config reads (`user.name`, `user.email`)
//! - Forcing the working state to a commit
//!
//! # Invariants
//!
//! - No other module calls git2 directly
//! - All operations return strong types (`Oid`, `GraphCommit`)

mod interface;

pub use interface::{Git, GitError};

//! graph
//!
//! The commit graph seam between the engines and a repository.
//!
//! # Modules
//!
//! - [`traits`] - The [`CommitGraph`] trait and [`GraphCommit`] snapshots
//! - [`mock`] - In-memory implementation for deterministic tests
//!
//! The production implementation is [`crate::git::Git`].

pub mod mock;
pub mod traits;

pub use traits::{CommitGraph, GraphCommit};

//! treesame - changelogs across rewritten histories, and treesame commits
//!
//! Two histories that were rebased or cherry-picked apart often share no
//! useful merge base, yet both still passed through identical content
//! states. This crate finds those tree-identical commits and uses them as a
//! baseline for listing what each side added or removed. It can also write
//! "treesame" commits: a commit that takes one ref's tree verbatim on top of
//! another ref's history.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Base finder, changelog engine, and commit synthesizer
//! - [`graph`] - The [`graph::CommitGraph`] seam and an in-memory mock
//! - [`git`] - git2-backed implementation of the commit graph
//! - [`core`] - Domain types, trailers, commit serialization, config
//! - [`ui`] - User-facing output
//!
//! # Invariants
//!
//! 1. Engines only reach a repository through [`graph::CommitGraph`]
//! 2. A synthesized commit's object is written before any ref names it
//! 3. Nothing but `treesame commit` writes to the repository

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod graph;
pub mod ui;

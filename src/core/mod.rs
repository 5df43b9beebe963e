//! core
//!
//! Core domain types, schemas, and pure logic.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Oid
//! - [`trailers`] - Summary lines, `Change-Id` and `Treesame-Commit-Id`
//! - [`commit`] - Signatures and raw commit serialization
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Nothing here touches a repository

pub mod commit;
pub mod config;
pub mod trailers;
pub mod types;

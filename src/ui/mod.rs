//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! Command results and user-facing messages go through this module so the
//! quiet flag is honored in one place. Diagnostics go through `tracing`.

pub mod output;

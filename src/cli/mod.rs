//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the log subscriber
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, opens the
//! repository, layers flags over config, and hands off to
//! [`crate::engine`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use crate::engine;
use anyhow::Result;
use tracing::Level;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.debug);

    let ctx = engine::Context {
        cwd: cli.cwd.clone(),
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx)
}

/// Logs go to stderr so stdout stays parseable.
fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

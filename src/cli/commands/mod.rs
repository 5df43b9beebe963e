//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens the repository and loads config
//! 2. Layers command-line flags over config
//! 3. Calls the engine to execute the command
//! 4. Formats and displays output

mod bases;
mod changelog;
mod commit;
mod completion;
mod config_cmd;

// Re-export command functions for testing and direct invocation
pub use bases::bases;
pub use changelog::{changelog, ChangelogArgs};
pub use commit::{commit, CommitArgs};
pub use completion::completion;
pub use config_cmd::list as config_list;

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::args::{Command, ConfigAction};
use crate::core::config::Config;
use crate::engine::identity::IdentityOverrides;
use crate::engine::Context;
use crate::git::Git;
use crate::ui::output::{self, Verbosity};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Changelog {
            old,
            new,
            subdir,
            style,
            keep_duplicates,
            json,
        } => changelog::changelog(
            ctx,
            &ChangelogArgs {
                old,
                new,
                subdir,
                style: style.map(Into::into),
                keep_duplicates,
                json,
            },
        ),
        Command::Commit {
            source,
            merge,
            force,
            onto,
            message,
            no_update_ref,
            no_reset,
            author_name,
            author_email,
            committer_name,
            committer_email,
        } => commit::commit(
            ctx,
            &CommitArgs {
                source,
                onto,
                merge,
                force,
                message,
                no_update_ref,
                no_reset,
                identity: IdentityOverrides {
                    author_name,
                    author_email,
                    committer_name,
                    committer_email,
                },
            },
        ),
        Command::Bases { refs } => bases::bases(ctx, &refs),
        Command::Config { action } => match action {
            ConfigAction::List => config_cmd::list(ctx),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Directory the command runs in.
fn working_dir(ctx: &Context) -> Result<PathBuf> {
    match &ctx.cwd {
        Some(cwd) => Ok(cwd.clone()),
        None => std::env::current_dir().context("Failed to determine current directory"),
    }
}

/// Open the repository containing the working directory.
fn open_repo(ctx: &Context) -> Result<Git> {
    let cwd = working_dir(ctx)?;
    Git::open(&cwd).context("Failed to open repository")
}

/// Load config for `git`, reporting any warnings.
fn load_config(git: &Git, verbosity: Verbosity) -> Result<Config> {
    let result = Config::load(Some(git.git_dir())).context("Failed to load config")?;
    for warning in &result.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            verbosity,
        );
    }
    Ok(result.config)
}

fn verbosity(ctx: &Context) -> Verbosity {
    Verbosity::from_quiet(ctx.quiet)
}

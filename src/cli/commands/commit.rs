//! commit command - Create a treesame commit and apply post-actions

use anyhow::{Context as _, Result};
use chrono::Local;

use super::{load_config, open_repo, verbosity};
use crate::engine::identity::IdentityOverrides;
use crate::engine::treesame::{self, PostActions, TreesameOutcome, TreesameRequest};
use crate::engine::Context;
use crate::ui::output;

/// Arguments for [`commit`], after clap parsing.
#[derive(Debug, Clone)]
pub struct CommitArgs {
    pub source: String,
    pub onto: String,
    pub merge: bool,
    pub force: bool,
    pub message: Option<String>,
    pub no_update_ref: bool,
    pub no_reset: bool,
    pub identity: IdentityOverrides,
}

/// Create a commit with the tree of `args.source` on top of `args.onto`.
pub fn commit(ctx: &Context, args: &CommitArgs) -> Result<()> {
    let verbosity = verbosity(ctx);
    let git = open_repo(ctx)?;
    let config = load_config(&git, verbosity)?;

    let request = TreesameRequest {
        source: args.source.clone(),
        target: args.onto.clone(),
        merge: args.merge,
        force: args.force,
        message: args.message.clone(),
    };

    let outcome = treesame::synthesize(&git, &request, &args.identity, Local::now().fixed_offset())
        .with_context(|| format!("Failed to create treesame commit of {}", args.source))?;

    let created = match outcome {
        TreesameOutcome::Unchanged { .. } => {
            output::print("nothing to do", verbosity);
            return Ok(());
        }
        TreesameOutcome::Created(created) => created,
    };

    let actions = PostActions {
        update_ref: config.update_ref() && !args.no_update_ref,
        reset_working_state: config.reset_working_state() && !args.no_reset,
    };
    let report = treesame::apply_post_actions(&git, &args.onto, &created, actions)
        .with_context(|| format!("Created {} but failed to update {}", created.id, args.onto))?;

    if let Some(refname) = &report.moved {
        tracing::debug!(%refname, "moved target");
    }
    if actions.reset_working_state && !report.reset {
        output::warn(
            format!("{} is not checked out; working tree left unchanged", args.onto),
            verbosity,
        );
    }
    println!("{}", created.id);
    Ok(())
}

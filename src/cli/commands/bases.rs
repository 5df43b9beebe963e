//! bases command - Show tree-identical base commits for several refs

use anyhow::{Context as _, Result};

use super::open_repo;
use crate::engine::base_finder::find_treesame_bases;
use crate::engine::Context;

/// Print one `<ref> <commit-id>` line per ref.
pub fn bases(ctx: &Context, refs: &[String]) -> Result<()> {
    let git = open_repo(ctx)?;
    let found = find_treesame_bases(&git, refs).context("Failed to find treesame bases")?;

    for (name, commit) in refs.iter().zip(&found) {
        println!("{} {}", name, commit.id);
    }
    Ok(())
}

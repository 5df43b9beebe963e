//! changelog command - List commits added and removed between two refs

use anyhow::{Context as _, Result};
use serde::Serialize;

use super::{load_config, open_repo, verbosity};
use crate::core::config::ChangelogStyle;
use crate::engine::changelog::{Changelog, FormatOptions};
use crate::engine::Context;
use crate::graph::GraphCommit;
use crate::ui::output;

/// Arguments for [`changelog`], after clap parsing.
#[derive(Debug, Clone)]
pub struct ChangelogArgs {
    pub old: String,
    pub new: String,
    pub subdir: Option<String>,
    /// Overrides the configured style when set.
    pub style: Option<ChangelogStyle>,
    pub keep_duplicates: bool,
    pub json: bool,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    id: &'a str,
    summary: &'a str,
}

#[derive(Serialize)]
struct JsonChangelog<'a> {
    style: ChangelogStyle,
    added: Vec<JsonEntry<'a>>,
    removed: Vec<JsonEntry<'a>>,
}

fn entries<'a>(commits: &'a [GraphCommit], hidden: &std::collections::HashSet<&str>) -> Vec<JsonEntry<'a>> {
    commits
        .iter()
        .filter(|c| !hidden.contains(c.summary()))
        .map(|c| JsonEntry {
            id: c.id.as_str(),
            summary: c.summary(),
        })
        .collect()
}

/// Print the changelog between `args.old` and `args.new`.
pub fn changelog(ctx: &Context, args: &ChangelogArgs) -> Result<()> {
    let verbosity = verbosity(ctx);
    let git = open_repo(ctx)?;
    let config = load_config(&git, verbosity)?;

    let style = args.style.unwrap_or_else(|| config.changelog_style());
    let options = FormatOptions {
        keep_duplicates: args.keep_duplicates || config.keep_duplicates(),
    };

    let mut log = Changelog::compute(&git, &args.old, &args.new, style)
        .with_context(|| format!("Failed to compute changelog {}..{}", args.old, args.new))?;

    if let Some(subdir) = &args.subdir {
        log.filter(&git, subdir)
            .with_context(|| format!("Failed to filter changelog by '{}'", subdir))?;
    }

    if args.json {
        let hidden = if options.keep_duplicates {
            Default::default()
        } else {
            log.duplicate_summaries()
        };
        output::print_json(&JsonChangelog {
            style,
            added: entries(&log.added, &hidden),
            removed: entries(&log.removed, &hidden),
        })?;
        return Ok(());
    }

    output::print_raw(&log.format(options));
    Ok(())
}

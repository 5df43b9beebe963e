//! config command - Show effective configuration

use anyhow::Result;

use super::{load_config, open_repo, verbosity};
use crate::engine::Context;
use crate::ui::output;

/// List all configuration values with precedence applied.
pub fn list(ctx: &Context) -> Result<()> {
    let verbosity = verbosity(ctx);
    let git = open_repo(ctx)?;
    let config = load_config(&git, verbosity)?;

    let loaded_from = |path: Option<&std::path::Path>| {
        path.map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    };

    let pairs = [
        ("changelog.style", config.changelog_style().to_string()),
        ("changelog.keep_duplicates", config.keep_duplicates().to_string()),
        ("commit.update_ref", config.update_ref().to_string()),
        (
            "commit.reset_working_state",
            config.reset_working_state().to_string(),
        ),
        ("global file", loaded_from(config.global_config_loaded_from())),
        ("repo file", loaded_from(config.repo_config_loaded_from())),
    ];
    println!("{}", output::format_pairs(&pairs));
    Ok(())
}

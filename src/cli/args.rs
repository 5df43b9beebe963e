//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::ChangelogStyle;

/// Changelogs across rewritten histories, and treesame commits
#[derive(Parser, Debug)]
#[command(name = "treesame")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if treesame was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List commits added and removed between two refs
    #[command(
        name = "changelog",
        long_about = "List commits added and removed between two refs.\n\n\
            By default the comparison starts from the first pair of commits, one \
            in each history, that have identical trees. This finds a sensible \
            baseline even when one side was rebased or cherry-picked and the two \
            histories share no merge base. With --style change-id the merge base \
            is used instead and commits are matched by their Change-Id trailer.\n\n\
            Removed commits are listed first (oldest first), then added commits \
            (newest first). A summary that appears on both sides is hidden unless \
            --keep-duplicates is given.",
        after_help = "\
WORKFLOW EXAMPLES:
    # What changed between two releases
    treesame changelog v1.0 v1.1

    # Only commits touching the docs directory
    treesame changelog v1.0 v1.1 docs/

    # Match commits by Change-Id (Gerrit-style histories)
    treesame changelog --style change-id origin/stable origin/main

    # Machine-readable output
    treesame changelog v1.0 v1.1 --json"
    )]
    Changelog {
        /// The older ref
        old: String,

        /// The newer ref
        new: String,

        /// Only list commits changing paths under this prefix
        subdir: Option<String>,

        /// Baseline strategy (default from config, else treesame)
        #[arg(long, value_enum)]
        style: Option<StyleArg>,

        /// Also list commits whose summary appears on both sides
        #[arg(long)]
        keep_duplicates: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a commit with another ref's tree
    #[command(
        name = "commit",
        long_about = "Create a commit whose tree is the tree of <SOURCE>.\n\n\
            The new commit's first parent is --onto (HEAD by default). With --merge \
            the source commit is recorded as a second parent. The message ends with \
            a Treesame-Commit-Id trailer naming the source commit.\n\n\
            Nothing is written when the source and target trees already match, \
            unless --force is given. After writing, the target ref is moved to the \
            new commit and the index and working tree are reset to it. Both steps \
            can be turned off here or in config.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Make HEAD's content match another branch, keeping HEAD's history
    treesame commit origin/release

    # Record the source as a merge parent
    treesame commit --merge origin/release

    # Write the commit without touching refs or the working tree
    treesame commit origin/release --no-update-ref --no-reset

WARNING:
    The working tree reset discards uncommitted changes."
    )]
    Commit {
        /// Ref whose tree the new commit takes
        source: String,

        /// Add the source commit as a second parent
        #[arg(long)]
        merge: bool,

        /// Create the commit even if the trees already match
        #[arg(long)]
        force: bool,

        /// First parent of the new commit
        #[arg(long, value_name = "REF", default_value = "HEAD")]
        onto: String,

        /// Commit message (a trailer is always appended)
        #[arg(short, long)]
        message: Option<String>,

        /// Do not move the target ref
        #[arg(long)]
        no_update_ref: bool,

        /// Do not reset the index and working tree
        #[arg(long)]
        no_reset: bool,

        /// Author name (falls back to user.name)
        #[arg(long, env = "GIT_AUTHOR_NAME")]
        author_name: Option<String>,

        /// Author email (falls back to user.email)
        #[arg(long, env = "GIT_AUTHOR_EMAIL")]
        author_email: Option<String>,

        /// Committer name (falls back to user.name)
        #[arg(long, env = "GIT_COMMITTER_NAME")]
        committer_name: Option<String>,

        /// Committer email (falls back to user.email)
        #[arg(long, env = "GIT_COMMITTER_EMAIL")]
        committer_email: Option<String>,
    },

    /// Find tree-identical base commits for several refs
    #[command(
        name = "bases",
        long_about = "Find, for each ref, an ancestor commit such that all of them have \
            the same tree.\n\n\
            Histories are walked breadth-first in lock step, one commit per ref at a \
            time, and the first tree every walk has reached wins.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Where did a rebased branch and its original last agree?
    treesame bases feature origin/feature

    # Three-way
    treesame bases main stable legacy"
    )]
    Bases {
        /// Refs to search from (two or more)
        #[arg(required = true, num_args = 2..)]
        refs: Vec<String>,
    },

    /// Show configuration
    #[command(
        name = "config",
        long_about = "Show the effective configuration.\n\n\
            Global settings are read from $TREESAME_CONFIG, \
            $XDG_CONFIG_HOME/treesame/config.toml or ~/.treesame/config.toml. \
            Repository settings in .git/treesame/config.toml override them.",
        after_help = "\
WORKFLOW EXAMPLES:
    # List all configuration values
    treesame config list"
    )]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    treesame completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    treesame completion zsh >> ~/.zshrc

    # Fish
    treesame completion fish > ~/.config/fish/completions/treesame.fish

    # PowerShell
    treesame completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// List all configuration values
    List,
}

/// Changelog baseline strategy
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleArg {
    /// Tree-identical baselines
    Treesame,
    /// Merge base plus Change-Id matching
    ChangeId,
}

impl From<StyleArg> for ChangelogStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Treesame => ChangelogStyle::Treesame,
            StyleArg::ChangeId => ChangelogStyle::ChangeId,
        }
    }
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn changelog_args() {
        let cli = Cli::try_parse_from([
            "treesame",
            "changelog",
            "v1",
            "v2",
            "docs/",
            "--style",
            "change-id",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Changelog {
                old,
                new,
                subdir,
                style,
                keep_duplicates,
                json,
            } => {
                assert_eq!(old, "v1");
                assert_eq!(new, "v2");
                assert_eq!(subdir.as_deref(), Some("docs/"));
                assert_eq!(style, Some(StyleArg::ChangeId));
                assert!(!keep_duplicates);
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn commit_defaults_onto_head() {
        let cli = Cli::try_parse_from(["treesame", "commit", "release", "--merge"]).unwrap();
        match cli.command {
            Command::Commit {
                source,
                onto,
                merge,
                force,
                no_update_ref,
                no_reset,
                ..
            } => {
                assert_eq!(source, "release");
                assert_eq!(onto, "HEAD");
                assert!(merge);
                assert!(!force);
                assert!(!no_update_ref);
                assert!(!no_reset);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn bases_needs_two_refs() {
        assert!(Cli::try_parse_from(["treesame", "bases", "main"]).is_err());
        assert!(Cli::try_parse_from(["treesame", "bases", "main", "stable"]).is_ok());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["treesame", "bases", "a", "b", "--debug", "-q"]).unwrap();
        assert!(cli.debug);
        assert!(cli.quiet);
    }

    #[test]
    fn style_arg_converts() {
        assert_eq!(ChangelogStyle::from(StyleArg::Treesame), ChangelogStyle::Treesame);
        assert_eq!(ChangelogStyle::from(StyleArg::ChangeId), ChangelogStyle::ChangeId);
    }
}

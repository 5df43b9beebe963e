//! core::config::schema
//!
//! Configuration schema types.
//!
//! The global and repo files share one schema; any field left out of the
//! repo file falls through to the global file and then to the default.
//!
//! ```toml
//! [changelog]
//! style = "treesame"
//! keep_duplicates = false
//!
//! [commit]
//! update_ref = true
//! reset_working_state = true
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// How the changelog picks its baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangelogStyle {
    /// Tree-identical commits found by the base finder.
    #[default]
    Treesame,
    /// Merge base, with commits matched by `Change-Id`.
    ChangeId,
}

impl ChangelogStyle {
    pub const ALL: [ChangelogStyle; 2] = [ChangelogStyle::Treesame, ChangelogStyle::ChangeId];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangelogStyle::Treesame => "treesame",
            ChangelogStyle::ChangeId => "change-id",
        }
    }
}

impl fmt::Display for ChangelogStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangelogStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| {
                ConfigError::InvalidValue(format!(
                    "invalid changelog style '{}', must be one of: treesame, change-id",
                    s
                ))
            })
    }
}

/// Contents of one config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub changelog: Option<ChangelogConfig>,
    pub commit: Option<CommitConfig>,
}

/// `[changelog]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ChangelogConfig {
    /// Baseline strategy
    pub style: Option<ChangelogStyle>,

    /// Show commits whose summary appears on both sides
    pub keep_duplicates: Option<bool>,
}

/// `[commit]` table, for `treesame commit`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CommitConfig {
    /// Move the target ref to the new commit
    pub update_ref: Option<bool>,

    /// Force index and working tree to the new commit
    pub reset_working_state: Option<bool>,
}

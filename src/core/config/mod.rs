//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! There are two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$TREESAME_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/treesame/config.toml`
//! 3. `~/.treesame/config.toml`
//!
//! # Repo Config Location
//!
//! `<git-dir>/treesame/config.toml`. A stray `<git-dir>/treesame.toml` is
//! ignored with a warning.
//!
//! # Example
//!
//! ```no_run
//! use treesame::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/path/to/repo/.git"))).unwrap();
//! let config = result.config;
//!
//! println!("Style: {}", config.changelog_style());
//! println!("Update ref: {}", config.update_ref());
//! ```

pub mod schema;

pub use schema::{ChangelogConfig, ChangelogStyle, CommitConfig, FileConfig};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence automatically: repo over global over default.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: FileConfig,
    /// Repository configuration (if in a repo)
    pub repo: Option<FileConfig>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the repo config file (if loaded)
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `git_dir` is provided, also loads repo-specific config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed.
    /// Missing config files are not an error (defaults are used).
    pub fn load(git_dir: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let global_path = Self::find_global();
        Self::load_from(global_path.as_deref(), git_dir)
    }

    /// Load from an explicit global file (if any) and git directory.
    pub fn load_from(
        global_path: Option<&Path>,
        git_dir: Option<&Path>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let global = match global_path {
            Some(path) => Self::read_file(path)?,
            None => FileConfig::default(),
        };

        let (repo, repo_path) = match git_dir {
            Some(dir) => Self::load_repo(dir, &mut warnings)?,
            None => (None, None),
        };

        debug!(
            global = ?global_path,
            repo = ?repo_path,
            "loaded configuration"
        );

        Ok(ConfigLoadResult {
            config: Config {
                global,
                repo,
                global_path: global_path.map(Path::to_path_buf),
                repo_path,
            },
            warnings,
        })
    }

    /// First existing global config file.
    fn find_global() -> Option<PathBuf> {
        // 1. Check $TREESAME_CONFIG
        if let Ok(path) = std::env::var("TREESAME_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/treesame/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("treesame/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.treesame/config.toml
        Self::global_config_path().ok().filter(|path| path.exists())
    }

    fn load_repo(
        git_dir: &Path,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigError> {
        let canonical = Self::repo_config_path(git_dir);

        let misplaced = git_dir.join("treesame.toml");
        if misplaced.exists() {
            warnings.push(ConfigWarning {
                message: format!("Ignoring config file. Please move it to '{}'", canonical.display()),
                path: misplaced,
            });
        }

        if canonical.exists() {
            let config = Self::read_file(&canonical)?;
            return Ok((Some(config), Some(canonical)));
        }

        Ok((None, None))
    }

    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical path for global config.
    ///
    /// Returns `~/.treesame/config.toml`.
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".treesame/config.toml"))
    }

    /// Get the path for repo config inside a git directory.
    pub fn repo_config_path(git_dir: &Path) -> PathBuf {
        git_dir.join("treesame/config.toml")
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    fn layered<T>(&self, pick: impl Fn(&FileConfig) -> Option<T>) -> Option<T> {
        self.repo.as_ref().and_then(&pick).or_else(|| pick(&self.global))
    }

    /// Changelog strategy.
    ///
    /// Defaults to [`ChangelogStyle::Treesame`].
    pub fn changelog_style(&self) -> ChangelogStyle {
        self.layered(|c| c.changelog.as_ref().and_then(|s| s.style))
            .unwrap_or_default()
    }

    /// Defaults to `false`.
    pub fn keep_duplicates(&self) -> bool {
        self.layered(|c| c.changelog.as_ref().and_then(|s| s.keep_duplicates))
            .unwrap_or(false)
    }

    /// Whether `treesame commit` moves the target ref.
    ///
    /// Defaults to `true`.
    pub fn update_ref(&self) -> bool {
        self.layered(|c| c.commit.as_ref().and_then(|s| s.update_ref))
            .unwrap_or(true)
    }

    /// Whether `treesame commit` forces the working state.
    ///
    /// Defaults to `true`.
    pub fn reset_working_state(&self) -> bool {
        self.layered(|c| c.commit.as_ref().and_then(|s| s.reset_working_state))
            .unwrap_or(true)
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_repo_config(git_dir: &Path, contents: &str) {
        let path = Config::repo_config_path(git_dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn load_empty_defaults() {
        let result = Config::load_from(None, None).unwrap();
        let config = result.config;

        assert_eq!(config.changelog_style(), ChangelogStyle::Treesame);
        assert!(!config.keep_duplicates());
        assert!(config.update_ref());
        assert!(config.reset_working_state());
        assert!(config.global_config_loaded_from().is_none());
    }

    #[test]
    fn load_global_file() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
            [changelog]
            style = "change-id"
            "#,
        )
        .unwrap();

        let result = Config::load_from(Some(&config_path), None).unwrap();
        assert_eq!(result.config.changelog_style(), ChangelogStyle::ChangeId);
        assert_eq!(result.config.global_config_loaded_from(), Some(config_path.as_path()));
    }

    #[test]
    fn load_repo_config() {
        let temp = TempDir::new().unwrap();
        write_repo_config(
            temp.path(),
            r#"
            [commit]
            update_ref = false
            reset_working_state = false
            "#,
        );

        let result = Config::load_from(None, Some(temp.path())).unwrap();
        let config = result.config;

        assert!(!config.update_ref());
        assert!(!config.reset_working_state());
        assert!(config.repo_config_loaded_from().is_some());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn misplaced_repo_file_warns() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("treesame.toml"), "[commit]\nupdate_ref = false\n").unwrap();

        let result = Config::load_from(None, Some(temp.path())).unwrap();

        assert!(result.config.update_ref());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].message.contains("Ignoring"));
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        write_repo_config(temp.path(), "trunk = \"main\"\n");

        let result = Config::load_from(None, Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn unreadable_global_is_error() {
        let temp = TempDir::new().unwrap();
        let result = Config::load_from(Some(temp.path()), None);
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn precedence_repo_overrides_global() {
        let config = Config {
            global: FileConfig {
                changelog: Some(ChangelogConfig {
                    style: Some(ChangelogStyle::ChangeId),
                    keep_duplicates: Some(true),
                }),
                commit: None,
            },
            repo: Some(FileConfig {
                changelog: Some(ChangelogConfig {
                    style: Some(ChangelogStyle::Treesame),
                    keep_duplicates: None,
                }),
                commit: None,
            }),
            global_path: None,
            repo_path: None,
        };

        assert_eq!(config.changelog_style(), ChangelogStyle::Treesame);
        // unset in repo, so global applies
        assert!(config.keep_duplicates());
    }
}

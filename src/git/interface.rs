//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to all Git operations. The
//! `Git` struct implements [`CommitGraph`], which is all the changelog and
//! treesame engines ever see of a repository.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::RefNotFound`]: Requested ref does not exist
//! - [`GitError::ObjectNotFound`]: Requested object does not exist
//! - [`GitError::BareRepo`]: Operation needs a working directory
//!
//! # Example
//!
//! ```ignore
//! use treesame::git::Git;
//! use treesame::graph::CommitGraph;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let head = git.resolve("HEAD")?.expect("HEAD is born");
//! println!("HEAD is at {} ({})", head.short_id(), head.summary());
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{Oid, TypeError};
use crate::graph::{CommitGraph, GraphCommit};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("operation requires a working directory, but the repository is bare")]
    BareRepo,

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Name is not a full ref name (`HEAD` or `refs/...`).
    #[error("invalid ref name: {name}")]
    InvalidRefName {
        /// The rejected name
        name: String,
    },

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => {
                if context.starts_with("refs/") || context == "HEAD" {
                    GitError::RefNotFound {
                        refname: context.to_string(),
                    }
                } else {
                    GitError::ObjectNotFound {
                        oid: context.to_string(),
                    }
                }
            }
            git2::ErrorCode::InvalidSpec => GitError::InvalidOid {
                oid: context.to_string(),
            },
            git2::ErrorCode::Locked => GitError::AccessError {
                message: format!("repository is locked: {}", err.message()),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => GitError::ObjectNotFound {
                oid: err.message().to_string(),
            },
            git2::ErrorCode::InvalidSpec => GitError::InvalidOid {
                oid: err.message().to_string(),
            },
            _ => GitError::Internal {
                message: err.message().to_string(),
            },
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
        }
    }
}

/// The Git interface.
///
/// This is the **single point of interaction** with Git. No other module
/// imports `git2` directly.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening
    // =========================================================================

    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover` to find the repository root,
    /// so `path` can be any directory within the repository. Bare
    /// repositories are accepted; only [`CommitGraph::reset_working_state`]
    /// needs a working directory.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        Ok(Self { repo })
    }

    /// Get direct access to the .git directory path.
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    // =========================================================================
    // Conversions
    // =========================================================================

    fn to_git2(oid: &Oid) -> Result<git2::Oid, GitError> {
        git2::Oid::from_str(oid.as_str()).map_err(|e| GitError::from_git2(e, oid.as_str()))
    }

    fn find_commit(&self, oid: &Oid) -> Result<git2::Commit<'_>, GitError> {
        self.repo
            .find_commit(Self::to_git2(oid)?)
            .map_err(|e| GitError::from_git2(e, oid.as_str()))
    }

    fn snapshot(commit: &git2::Commit<'_>) -> Result<GraphCommit, GitError> {
        let parents = commit
            .parent_ids()
            .map(|id| Oid::new(id.to_string()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GraphCommit {
            id: Oid::new(commit.id().to_string())?,
            parents,
            tree: Oid::new(commit.tree_id().to_string())?,
            message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
        })
    }

    /// Resolve the commit `HEAD` points at, if `HEAD` is born.
    fn head_commit_id(&self) -> Option<git2::Oid> {
        self.repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok())
            .map(|commit| commit.id())
    }
}

impl CommitGraph for Git {
    fn resolve(&self, rev: &str) -> Result<Option<GraphCommit>, GitError> {
        let object = match self.repo.revparse_single(rev) {
            Ok(object) => object,
            Err(e)
                if matches!(
                    e.code(),
                    git2::ErrorCode::NotFound
                        | git2::ErrorCode::InvalidSpec
                        | git2::ErrorCode::Ambiguous
                        | git2::ErrorCode::UnbornBranch
                ) =>
            {
                return Ok(None)
            }
            Err(e) => return Err(GitError::from_git2(e, rev)),
        };

        // Tags peel through to their commit; trees and blobs name no commit.
        match object.peel_to_commit() {
            Ok(commit) => Self::snapshot(&commit).map(Some),
            Err(_) => Ok(None),
        }
    }

    fn commit(&self, oid: &Oid) -> Result<GraphCommit, GitError> {
        Self::snapshot(&self.find_commit(oid)?)
    }

    fn commits_between(&self, from: Option<&Oid>, to: &Oid) -> Result<Vec<GraphCommit>, GitError> {
        let mut revwalk = self.repo.revwalk().map_err(|e| GitError::Internal {
            message: e.message().to_string(),
        })?;
        revwalk
            .set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
            .map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })?;

        revwalk
            .push(Self::to_git2(to)?)
            .map_err(|e| GitError::from_git2(e, to.as_str()))?;
        if let Some(from) = from {
            revwalk
                .hide(Self::to_git2(from)?)
                .map_err(|e| GitError::from_git2(e, from.as_str()))?;
        }

        let mut commits = Vec::new();
        for id in revwalk {
            let id = id.map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })?;
            let commit = self
                .repo
                .find_commit(id)
                .map_err(|e| GitError::from_git2(e, &id.to_string()))?;
            commits.push(Self::snapshot(&commit)?);
        }

        Ok(commits)
    }

    fn merge_base(&self, a: &Oid, b: &Oid) -> Result<Option<Oid>, GitError> {
        match self.repo.merge_base(Self::to_git2(a)?, Self::to_git2(b)?) {
            Ok(oid) => Ok(Some(Oid::new(oid.to_string())?)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::Internal {
                message: e.message().to_string(),
            }),
        }
    }

    fn changed_paths(&self, commit: &Oid, other: Option<&Oid>) -> Result<BTreeSet<String>, GitError> {
        let new_tree = self.find_commit(commit)?.tree()?;
        let old_tree = match other {
            Some(other) => Some(self.find_commit(other)?.tree()?),
            None => None,
        };

        let diff = self
            .repo
            .diff_tree_to_tree(old_tree.as_ref(), Some(&new_tree), None)
            .map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })?;

        let mut paths = BTreeSet::new();
        for delta in diff.deltas() {
            for file in [delta.old_file(), delta.new_file()] {
                if let Some(path) = file.path() {
                    paths.insert(path.to_string_lossy().into_owned());
                }
            }
        }

        Ok(paths)
    }

    fn write_raw_object(&self, data: &[u8]) -> Result<Oid, GitError> {
        let odb = self.repo.odb().map_err(|e| GitError::AccessError {
            message: e.message().to_string(),
        })?;
        let id = odb
            .write(git2::ObjectType::Commit, data)
            .map_err(|e| GitError::AccessError {
                message: e.message().to_string(),
            })?;

        Ok(Oid::new(id.to_string())?)
    }

    fn read_symbolic_ref(&self, name: &str) -> Result<Option<String>, GitError> {
        // Short names like `main` are not ref names to libgit2.
        if !git2::Reference::is_valid_name(name) {
            return Ok(None);
        }

        match self.repo.find_reference(name) {
            Ok(reference) => Ok(reference.symbolic_target().map(String::from)),
            Err(e) if matches!(e.code(), git2::ErrorCode::NotFound | git2::ErrorCode::InvalidSpec) => {
                Ok(None)
            }
            Err(e) => Err(GitError::from_git2(e, name)),
        }
    }

    fn write_ref(&self, name: &str, oid: &Oid, log_message: &str) -> Result<(), GitError> {
        if !git2::Reference::is_valid_name(name) {
            return Err(GitError::InvalidRefName {
                name: name.to_string(),
            });
        }
        let target = Self::to_git2(oid)?;

        if name == "HEAD" {
            return self
                .repo
                .set_head_detached(target)
                .map_err(|e| GitError::from_git2(e, name));
        }

        self.repo
            .reference(name, target, true, log_message)
            .map_err(|e| GitError::from_git2(e, name))?;

        Ok(())
    }

    fn config_value(&self, key: &str) -> Result<Option<String>, GitError> {
        let config = self.repo.config().map_err(|e| GitError::Internal {
            message: e.message().to_string(),
        })?;

        match config.get_string(key) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::Internal {
                message: format!("{}: {}", key, e.message()),
            }),
        }
    }

    fn reset_working_state(&self, oid: &Oid) -> Result<(), GitError> {
        if self.repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        let target = Self::to_git2(oid)?;
        let object = self
            .repo
            .find_object(target, None)
            .map_err(|e| GitError::from_git2(e, oid.as_str()))?;

        if self.head_commit_id() == Some(target) {
            // HEAD already names this commit, so a hard reset leaves refs alone
            // and also clears files the old index still tracked.
            self.repo
                .reset(&object, git2::ResetType::Hard, None)
                .map_err(|e| GitError::from_git2(e, oid.as_str()))
        } else {
            let mut checkout = git2::build::CheckoutBuilder::new();
            checkout.force();
            self.repo
                .checkout_tree(&object, Some(&mut checkout))
                .map_err(|e| GitError::from_git2(e, oid.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod git_error {
        use super::*;

        #[test]
        fn error_variants_constructible() {
            let _ = GitError::NotARepo {
                path: PathBuf::from("/tmp"),
            };
            let _ = GitError::BareRepo;
            let _ = GitError::RefNotFound {
                refname: "refs/heads/main".to_string(),
            };
            let _ = GitError::ObjectNotFound {
                oid: "abc123".to_string(),
            };
            let _ = GitError::InvalidOid {
                oid: "not-hex".to_string(),
            };
            let _ = GitError::AccessError {
                message: "locked".to_string(),
            };
            let _ = GitError::Internal {
                message: "oops".to_string(),
            };
        }

        #[test]
        fn error_display_formatting() {
            let err = GitError::RefNotFound {
                refname: "refs/heads/main".to_string(),
            };
            assert_eq!(err.to_string(), "ref not found: refs/heads/main");
        }

        #[test]
        fn type_error_converts() {
            let err: GitError = TypeError::InvalidOid("bad".to_string()).into();
            assert!(matches!(err, GitError::InvalidOid { .. }));
        }

        #[test]
        fn not_found_with_ref_context() {
            let raw = git2::Error::new(
                git2::ErrorCode::NotFound,
                git2::ErrorClass::Reference,
                "missing",
            );
            let err = GitError::from_git2(raw, "refs/heads/gone");
            assert!(matches!(err, GitError::RefNotFound { .. }));
        }

        #[test]
        fn not_found_with_object_context() {
            let raw = git2::Error::new(
                git2::ErrorCode::NotFound,
                git2::ErrorClass::Odb,
                "missing",
            );
            let err = GitError::from_git2(raw, "abc123");
            assert!(matches!(err, GitError::ObjectNotFound { .. }));
        }
    }
}

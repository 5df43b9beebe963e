//! Shared fixtures for integration tests that need a real repository.

#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use treesame::core::types::Oid;
use treesame::git::Git;

/// A throwaway repository with one commit (`README.md`) on `main`.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");

        run_git(dir.path(), &["init", "-b", "main"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);
        // Prevent git from opening editors during tests
        run_git(dir.path(), &["config", "core.editor", "true"]);

        std::fs::write(dir.path().join("README.md"), "# Test Repo\n").unwrap();
        run_git(dir.path(), &["add", "README.md"]);
        run_git(dir.path(), &["commit", "-m", "Initial commit"]);

        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn git(&self) -> Git {
        Git::open(self.path()).expect("failed to open test repo")
    }

    /// Write a file and commit it. Each message part becomes one paragraph.
    pub fn commit_file(&self, path: &str, content: &str, message: &[&str]) -> Oid {
        let full = self.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
        run_git(self.path(), &["add", path]);

        let mut args = vec!["commit"];
        for part in message {
            args.extend(["-m", part]);
        }
        run_git(self.path(), &args);
        self.rev_parse("HEAD")
    }

    /// Create and switch to `name` starting at `start`.
    pub fn checkout_new(&self, name: &str, start: &str) {
        run_git(self.path(), &["checkout", "-q", "-b", name, start]);
    }

    pub fn checkout(&self, name: &str) {
        run_git(self.path(), &["checkout", "-q", name]);
    }

    pub fn rev_parse(&self, rev: &str) -> Oid {
        Oid::new(self.run(&["rev-parse", rev]).trim()).unwrap()
    }

    /// Run git in the repository and return stdout.
    pub fn run(&self, args: &[&str]) -> String {
        git_stdout(self.path(), args)
    }
}

/// Run a git command in the given directory.
pub fn run_git(dir: &Path, args: &[&str]) {
    git_stdout(dir, args);
}

/// Run a git command and return its stdout.
pub fn git_stdout(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8(output.stdout).unwrap()
}

/// Two histories that diverged through a rewrite of their shared base.
///
/// ```text
/// old:  root -> base -> old-1 -> old-2
/// new:  root -> base' -> new-1
/// ```
///
/// `base` and `base'` have identical trees but different ids. Every commit
/// carries a `Change-Id`; `base` and `base'` share one.
pub struct Diverged {
    pub repo: TestRepo,
    pub base: Oid,
    pub rewritten_base: Oid,
}

impl Diverged {
    pub fn new() -> Self {
        let repo = TestRepo::new();
        let root = repo.rev_parse("HEAD");

        repo.checkout_new("old", root.as_str());
        let base = repo.commit_file("lib/core.rs", "core v1\n", &["Add core", "Change-Id: Ibase"]);
        repo.commit_file("docs/old.md", "old\n", &["Document old API", "Change-Id: Iold1"]);
        repo.commit_file("src/old.rs", "old\n", &["Old implementation", "Change-Id: Iold2"]);

        repo.checkout_new("new", root.as_str());
        let rewritten_base =
            repo.commit_file("lib/core.rs", "core v1\n", &["Add core (reworded)", "Change-Id: Ibase"]);
        repo.commit_file("src/new.rs", "new\n", &["New implementation", "Change-Id: Inew1"]);

        repo.checkout("main");
        Self {
            repo,
            base,
            rewritten_base,
        }
    }
}

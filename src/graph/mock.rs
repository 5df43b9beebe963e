//! graph::mock
//!
//! In-memory commit graph for deterministic testing.
//!
//! # Design
//!
//! The mock graph is content-addressed like a real object store: tree ids are
//! hashes of their file listing and commit ids are hashes of the serialized
//! commit. Two commits with the same files therefore share a tree id, which is
//! exactly what the base finder looks for.
//!
//! Commits are stamped with a sequence number so that otherwise identical
//! commits still get distinct ids, and so that range queries can return
//! children before parents.
//!
//! # Example
//!
//! ```
//! use treesame::graph::mock::MockGraph;
//! use treesame::graph::CommitGraph;
//!
//! let graph = MockGraph::new();
//! let root = graph.add_commit(&[], &[("README.md", "hello")], "Initial commit");
//! let next = graph.add_commit(&[&root], &[("src/lib.rs", "fn main() {}")], "Add lib");
//! graph.set_branch("main", &next);
//!
//! let head = graph.resolve("HEAD").unwrap().unwrap();
//! assert_eq!(head.id, next);
//! assert_eq!(head.summary(), "Add lib");
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::DateTime;
use sha2::{Digest, Sha256};

use super::traits::{CommitGraph, GraphCommit};
use crate::core::commit::{RawCommit, Signature};
use crate::core::types::Oid;
use crate::git::GitError;

/// File listing of a tree: path -> content.
type Files = BTreeMap<String, String>;

/// Mock commit graph for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockGraph {
    inner: Arc<Mutex<MockGraphInner>>,
}

#[derive(Debug)]
enum RefTarget {
    Direct(Oid),
    Symbolic(String),
}

#[derive(Debug)]
struct MockGraphInner {
    /// Commits by id, with the sequence number they were created at.
    commits: HashMap<Oid, (u64, GraphCommit)>,
    trees: HashMap<Oid, Files>,
    refs: BTreeMap<String, RefTarget>,
    config: HashMap<String, String>,
    next_seq: u64,
    /// Commit the index and working files were last forced to.
    working_state: Option<Oid>,
    /// Objects persisted through `write_raw_object`, in write order.
    written: Vec<Oid>,
    /// Operation to fail on (for testing error paths).
    fail_on: Option<FailOn>,
}

/// Which operation should fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailOn {
    WriteRawObject,
    WriteRef,
    ResetWorkingState,
}

impl Default for MockGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGraph {
    /// Create an empty graph whose `HEAD` points at the unborn `main` branch.
    pub fn new() -> Self {
        let mut refs = BTreeMap::new();
        refs.insert(
            "HEAD".to_string(),
            RefTarget::Symbolic("refs/heads/main".to_string()),
        );

        Self {
            inner: Arc::new(Mutex::new(MockGraphInner {
                commits: HashMap::new(),
                trees: HashMap::new(),
                refs,
                config: HashMap::new(),
                next_seq: 0,
                working_state: None,
                written: Vec::new(),
                fail_on: None,
            })),
        }
    }

    /// Create a graph with `user.name` and `user.email` configured.
    pub fn with_identity(name: &str, email: &str) -> Self {
        let graph = Self::new();
        graph.set_config("user.name", name);
        graph.set_config("user.email", email);
        graph
    }

    fn state(&self) -> MutexGuard<'_, MockGraphInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // =========================================================================
    // Fixture Builders
    // =========================================================================

    /// Create a commit whose tree is the first parent's tree with `changes`
    /// applied on top.
    pub fn add_commit(&self, parents: &[&Oid], changes: &[(&str, &str)], message: &str) -> Oid {
        let mut files = parents
            .first()
            .map(|p| self.files_of(p))
            .unwrap_or_default();
        for (path, content) in changes {
            files.insert(path.to_string(), content.to_string());
        }
        self.insert_commit(parents, files, message)
    }

    /// Create a commit whose tree is exactly `files`, regardless of parents.
    pub fn add_snapshot(&self, parents: &[&Oid], files: &[(&str, &str)], message: &str) -> Oid {
        let files = files
            .iter()
            .map(|(p, c)| (p.to_string(), c.to_string()))
            .collect();
        self.insert_commit(parents, files, message)
    }

    fn files_of(&self, commit: &Oid) -> Files {
        let state = self.state();
        state
            .commits
            .get(commit)
            .and_then(|(_, c)| state.trees.get(&c.tree))
            .cloned()
            .unwrap_or_default()
    }

    fn insert_commit(&self, parents: &[&Oid], files: Files, message: &str) -> Oid {
        let mut state = self.state();
        let tree = store_tree(&mut state, files);

        let seq = state.next_seq;
        state.next_seq += 1;

        let when = DateTime::from_timestamp(1_700_000_000 + seq as i64, 0)
            .unwrap_or(DateTime::UNIX_EPOCH)
            .fixed_offset();
        let sig = Signature::new("Mock Author", "mock@example.com", when);
        let raw = RawCommit {
            tree: tree.clone(),
            parents: parents.iter().map(|p| (*p).clone()).collect(),
            author: sig.clone(),
            committer: sig,
            message: message.to_string(),
        };

        let id = hash_object("commit", &raw.serialize());
        let commit = GraphCommit {
            id: id.clone(),
            parents: raw.parents,
            tree,
            message: raw.message,
        };
        state.commits.insert(id.clone(), (seq, commit));
        id
    }

    /// Point `refs/heads/<name>` at a commit.
    pub fn set_branch(&self, name: &str, oid: &Oid) {
        self.set_ref(&format!("refs/heads/{}", name), oid);
    }

    /// Point a ref at a commit.
    pub fn set_ref(&self, name: &str, oid: &Oid) {
        self.state()
            .refs
            .insert(name.to_string(), RefTarget::Direct(oid.clone()));
    }

    /// Make `name` a symbolic ref to `target`.
    pub fn set_symbolic_ref(&self, name: &str, target: &str) {
        self.state()
            .refs
            .insert(name.to_string(), RefTarget::Symbolic(target.to_string()));
    }

    pub fn set_config(&self, key: &str, value: &str) {
        self.state()
            .config
            .insert(key.to_string(), value.to_string());
    }

    /// Configure an operation to fail.
    pub fn fail_on(&self, op: FailOn) {
        self.state().fail_on = Some(op);
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Commit a ref currently resolves to.
    pub fn ref_target(&self, name: &str) -> Option<Oid> {
        resolve_ref(&self.state(), name, 0)
    }

    /// Commit the working state was last forced to.
    pub fn working_state(&self) -> Option<Oid> {
        self.state().working_state.clone()
    }

    /// Objects persisted through `write_raw_object`.
    pub fn written_objects(&self) -> Vec<Oid> {
        self.state().written.clone()
    }

    fn check_fail(&self, op: FailOn) -> Result<(), GitError> {
        if self.state().fail_on.as_ref() == Some(&op) {
            return Err(GitError::Internal {
                message: format!("injected failure: {:?}", op),
            });
        }
        Ok(())
    }
}

fn hash_object(kind: &str, data: &[u8]) -> Oid {
    let mut hasher = Sha256::new();
    hasher.update(format!("{} {}\0", kind, data.len()).as_bytes());
    hasher.update(data);
    let digest = hex::encode(hasher.finalize());
    Oid::new(&digest[..40]).expect("40 hex characters form a valid oid")
}

fn store_tree(state: &mut MockGraphInner, files: Files) -> Oid {
    let mut listing = Vec::new();
    for (path, content) in &files {
        listing.extend_from_slice(path.as_bytes());
        listing.push(0);
        listing.extend_from_slice(content.as_bytes());
        listing.push(b'\n');
    }
    let id = hash_object("tree", &listing);
    state.trees.entry(id.clone()).or_insert(files);
    id
}

fn resolve_ref(state: &MockGraphInner, name: &str, depth: usize) -> Option<Oid> {
    if depth > 5 {
        return None;
    }
    match state.refs.get(name)? {
        RefTarget::Direct(oid) => Some(oid.clone()),
        RefTarget::Symbolic(target) => resolve_ref(state, target, depth + 1),
    }
}

fn ancestors(state: &MockGraphInner, start: &Oid) -> HashSet<Oid> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([start.clone()]);
    while let Some(oid) = queue.pop_front() {
        if !seen.insert(oid.clone()) {
            continue;
        }
        if let Some((_, commit)) = state.commits.get(&oid) {
            queue.extend(commit.parents.iter().cloned());
        }
    }
    seen
}

fn lookup(state: &MockGraphInner, oid: &Oid) -> Result<GraphCommit, GitError> {
    state
        .commits
        .get(oid)
        .map(|(_, c)| c.clone())
        .ok_or_else(|| GitError::ObjectNotFound {
            oid: oid.to_string(),
        })
}

fn parse_raw_commit(data: &[u8]) -> Result<(Oid, Vec<Oid>, String), GitError> {
    let text = std::str::from_utf8(data).map_err(|_| GitError::Internal {
        message: "commit object is not valid UTF-8".to_string(),
    })?;
    let (headers, message) = text.split_once("\n\n").ok_or_else(|| GitError::Internal {
        message: "commit object has no message separator".to_string(),
    })?;

    let mut tree = None;
    let mut parents = Vec::new();
    for line in headers.lines() {
        if let Some(value) = line.strip_prefix("tree ") {
            tree = Some(Oid::new(value)?);
        } else if let Some(value) = line.strip_prefix("parent ") {
            parents.push(Oid::new(value)?);
        }
    }

    let tree = tree.ok_or_else(|| GitError::Internal {
        message: "commit object has no tree".to_string(),
    })?;
    Ok((tree, parents, message.to_string()))
}

impl CommitGraph for MockGraph {
    fn resolve(&self, rev: &str) -> Result<Option<GraphCommit>, GitError> {
        let state = self.state();

        let by_ref = resolve_ref(&state, rev, 0)
            .or_else(|| resolve_ref(&state, &format!("refs/heads/{}", rev), 0))
            .or_else(|| resolve_ref(&state, &format!("refs/tags/{}", rev), 0));

        let oid = match by_ref {
            Some(oid) => oid,
            None => match Oid::new(rev) {
                Ok(oid) if state.commits.contains_key(&oid) => oid,
                _ => return Ok(None),
            },
        };

        lookup(&state, &oid).map(Some)
    }

    fn commit(&self, oid: &Oid) -> Result<GraphCommit, GitError> {
        lookup(&self.state(), oid)
    }

    fn commits_between(&self, from: Option<&Oid>, to: &Oid) -> Result<Vec<GraphCommit>, GitError> {
        let state = self.state();
        lookup(&state, to)?;

        let hidden = match from {
            Some(from) => {
                lookup(&state, from)?;
                ancestors(&state, from)
            }
            None => HashSet::new(),
        };

        let mut range: Vec<(u64, GraphCommit)> = ancestors(&state, to)
            .difference(&hidden)
            .filter_map(|oid| state.commits.get(oid).cloned())
            .collect();
        range.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(range.into_iter().map(|(_, c)| c).collect())
    }

    fn merge_base(&self, a: &Oid, b: &Oid) -> Result<Option<Oid>, GitError> {
        let state = self.state();
        lookup(&state, a)?;
        lookup(&state, b)?;

        let from_a = ancestors(&state, a);
        let common: Vec<Oid> = ancestors(&state, b)
            .into_iter()
            .filter(|oid| from_a.contains(oid))
            .collect();

        // Best common ancestors are not reachable from any other common ancestor.
        let mut best: Vec<(u64, Oid)> = common
            .iter()
            .filter(|candidate| {
                !common
                    .iter()
                    .any(|other| other != *candidate && ancestors(&state, other).contains(*candidate))
            })
            .filter_map(|oid| state.commits.get(oid).map(|(seq, _)| (*seq, oid.clone())))
            .collect();
        best.sort();

        Ok(best.pop().map(|(_, oid)| oid))
    }

    fn changed_paths(&self, commit: &Oid, other: Option<&Oid>) -> Result<BTreeSet<String>, GitError> {
        let state = self.state();
        let files_of = |oid: &Oid| -> Result<Files, GitError> {
            let commit = lookup(&state, oid)?;
            state
                .trees
                .get(&commit.tree)
                .cloned()
                .ok_or_else(|| GitError::ObjectNotFound {
                    oid: commit.tree.to_string(),
                })
        };

        let new = files_of(commit)?;
        let old = match other {
            Some(other) => files_of(other)?,
            None => Files::new(),
        };

        Ok(new
            .keys()
            .chain(old.keys())
            .filter(|path| new.get(*path) != old.get(*path))
            .cloned()
            .collect())
    }

    fn write_raw_object(&self, data: &[u8]) -> Result<Oid, GitError> {
        self.check_fail(FailOn::WriteRawObject)?;
        let (tree, parents, message) = parse_raw_commit(data)?;

        let mut state = self.state();
        let id = hash_object("commit", data);
        let seq = state.next_seq;
        state.next_seq += 1;
        state.commits.insert(
            id.clone(),
            (
                seq,
                GraphCommit {
                    id: id.clone(),
                    parents,
                    tree,
                    message,
                },
            ),
        );
        state.written.push(id.clone());
        Ok(id)
    }

    fn read_symbolic_ref(&self, name: &str) -> Result<Option<String>, GitError> {
        if !is_ref_name(name) {
            return Ok(None);
        }
        Ok(match self.state().refs.get(name) {
            Some(RefTarget::Symbolic(target)) => Some(target.clone()),
            _ => None,
        })
    }

    fn write_ref(&self, name: &str, oid: &Oid, _log_message: &str) -> Result<(), GitError> {
        self.check_fail(FailOn::WriteRef)?;
        if !is_ref_name(name) {
            return Err(GitError::InvalidRefName {
                name: name.to_string(),
            });
        }
        self.set_ref(name, oid);
        Ok(())
    }

    fn config_value(&self, key: &str) -> Result<Option<String>, GitError> {
        Ok(self.state().config.get(key).cloned())
    }

    fn reset_working_state(&self, oid: &Oid) -> Result<(), GitError> {
        self.check_fail(FailOn::ResetWorkingState)?;
        let mut state = self.state();
        lookup(&state, oid)?;
        state.working_state = Some(oid.clone());
        Ok(())
    }
}

/// Whether libgit2 would accept `name` as a reference name: a full
/// `refs/...` path or a one-level all-caps name like `HEAD`.
fn is_ref_name(name: &str) -> bool {
    match name.strip_prefix("refs/") {
        Some(rest) => {
            !rest.is_empty()
                && !rest.ends_with('/')
                && !name.contains("..")
                && !name.contains("//")
                && !name.chars().any(|c| c.is_ascii_whitespace() || c.is_ascii_control())
        }
        None => !name.is_empty() && name.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
    }
}

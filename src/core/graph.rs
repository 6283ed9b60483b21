//! core::graph
//!
//! Commit graph representation and ancestry walks.
//!
//! # Architecture
//!
//! The commit graph is a DAG where:
//! - Nodes are commits, keyed by their content hash
//! - Edges point from child to parent (stored as `Commit::parent`)
//! - Roots are commits without a parent
//!
//! Commits are stored in an arena with a separate insertion order, so
//! iteration is stable across amend (remove + insert) and serialization.
//!
//! # Invariants
//!
//! - Hashes are unique within the graph
//! - Walks never loop: every walk is bounded by the number of commits

use std::collections::HashMap;

use super::commit::Commit;
use super::types::CommitHash;

/// The set of commits known to a repository.
#[derive(Debug, Clone, Default)]
pub struct CommitGraph {
    commits: HashMap<CommitHash, Commit>,
    order: Vec<CommitHash>,
}

impl CommitGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a commit.
    ///
    /// Returns `false` (and keeps the existing entry) if a commit with the
    /// same hash is already present.
    pub fn insert(&mut self, commit: Commit) -> bool {
        if self.commits.contains_key(&commit.hash) {
            return false;
        }
        self.order.push(commit.hash.clone());
        self.commits.insert(commit.hash.clone(), commit);
        true
    }

    /// Remove a commit by hash.
    pub fn remove(&mut self, hash: &CommitHash) -> Option<Commit> {
        let removed = self.commits.remove(hash)?;
        self.order.retain(|h| h != hash);
        Some(removed)
    }

    pub fn get(&self, hash: &CommitHash) -> Option<&Commit> {
        self.commits.get(hash)
    }

    /// Look up a commit by a raw hash string.
    pub fn get_str(&self, hash: &str) -> Option<&Commit> {
        let hash = CommitHash::new(hash).ok()?;
        self.commits.get(&hash)
    }

    pub fn contains(&self, hash: &CommitHash) -> bool {
        self.commits.contains_key(hash)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate commits in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Commit> {
        self.order.iter().filter_map(|h| self.commits.get(h))
    }

    /// All commits whose hash starts with `prefix` (case-insensitive).
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<&Commit> {
        self.iter().filter(|c| c.hash.has_prefix(prefix)).collect()
    }

    /// Whether any commit names `hash` as its parent.
    pub fn has_children(&self, hash: &CommitHash) -> bool {
        self.iter().any(|c| c.parent.as_ref() == Some(hash))
    }

    /// The parent of a commit, if present in the graph.
    pub fn parent_of(&self, commit: &Commit) -> Option<&Commit> {
        commit.parent.as_ref().and_then(|p| self.commits.get(p))
    }

    /// Walk parent links backward from `from`.
    ///
    /// Without `to`, succeeds when a root commit is reached and returns the
    /// full path `from ..= root`. With `to`, succeeds only if `to` is
    /// reached and returns `from ..= to`. Returns `None` when the walk
    /// ends elsewhere ("not an ancestor"), including when a parent link
    /// points outside the graph.
    ///
    /// # Example
    ///
    /// ```
    /// use objrepo::core::commit::Commit;
    /// use objrepo::core::graph::CommitGraph;
    /// use objrepo::core::types::CommitHash;
    ///
    /// fn commit(hash: &str, parent: Option<&str>) -> Commit {
    ///     Commit {
    ///         hash: CommitHash::new(hash).unwrap(),
    ///         tree: String::new(),
    ///         message: String::new(),
    ///         author: String::new(),
    ///         parent: parent.map(|p| CommitHash::new(p).unwrap()),
    ///         changes: vec![],
    ///         timestamp: chrono::Utc::now(),
    ///     }
    /// }
    ///
    /// let mut graph = CommitGraph::new();
    /// graph.insert(commit("a1", None));
    /// graph.insert(commit("b2", Some("a1")));
    /// graph.insert(commit("c3", Some("b2")));
    ///
    /// let c3 = CommitHash::new("c3").unwrap();
    /// let b2 = CommitHash::new("b2").unwrap();
    /// assert_eq!(graph.map_path(&c3, None).unwrap().len(), 3);
    /// assert_eq!(graph.map_path(&c3, Some(&b2)).unwrap().len(), 2);
    /// assert!(graph.map_path(&b2, Some(&c3)).is_none());
    /// ```
    pub fn map_path(&self, from: &CommitHash, to: Option<&CommitHash>) -> Option<Vec<&Commit>> {
        let mut path = Vec::new();
        let mut current = self.commits.get(from);

        while let Some(commit) = current {
            // bounded walk, a malformed graph cannot trap us in a cycle
            if path.len() > self.commits.len() {
                return None;
            }
            path.push(commit);
            match to {
                Some(target) if &commit.hash == target => return Some(path),
                None if commit.parent.is_none() => return Some(path),
                _ => {}
            }
            current = self.parent_of(commit);
        }

        None
    }

    /// Whether `ancestor` is reachable from `descendant` through parent links.
    /// A commit is its own ancestor.
    pub fn is_ancestor(&self, ancestor: &CommitHash, descendant: &CommitHash) -> bool {
        self.map_path(descendant, Some(ancestor)).is_some()
    }

    /// Commits from `from` back to the first one without a reachable
    /// parent, newest first. Unlike [`map_path`](Self::map_path) this never
    /// fails; it stops wherever the chain ends.
    pub fn walk(&self, from: &CommitHash) -> Vec<&Commit> {
        let mut out = Vec::new();
        let mut current = self.commits.get(from);
        while let Some(commit) = current {
            if out.len() >= self.commits.len() {
                break;
            }
            out.push(commit);
            current = self.parent_of(commit);
        }
        out
    }
}

impl FromIterator<Commit> for CommitGraph {
    fn from_iter<I: IntoIterator<Item = Commit>>(iter: I) -> Self {
        let mut graph = Self::new();
        for commit in iter {
            graph.insert(commit);
        }
        graph
    }
}

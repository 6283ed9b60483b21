//! repo::resolve
//!
//! Revision resolution.
//!
//! A revision ("shaish") is a ref key, a ref display name, or a full or
//! abbreviated commit hash. Refs win over hashes:
//!
//! 1. exact key (`HEAD`, `refs/heads/main`)
//! 2. `refs/heads/<expr>`, then `refs/tags/<expr>`
//! 3. a ref whose display name is `expr`
//! 4. a unique hash prefix

use tracing::trace;

use super::error::ResolutionError;
use super::refs::RefTable;
use super::Repository;
use crate::core::commit::Commit;
use crate::core::graph::CommitGraph;
use crate::core::types::{HEAD, HEADS_PREFIX, TAGS_PREFIX};

/// A resolved revision.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub commit: Commit,
    /// Whether resolution went through a ref (a detached HEAD does not count).
    pub through_ref: bool,
    /// The ref key that holds the commit hash, when `through_ref` is set.
    pub ref_key: Option<String>,
}

fn find_ref_key(refs: &RefTable, expr: &str) -> Option<String> {
    if refs.contains(expr) {
        return Some(expr.to_string());
    }
    for prefix in [HEADS_PREFIX, TAGS_PREFIX] {
        let key = format!("{prefix}{expr}");
        if refs.contains(&key) {
            return Some(key);
        }
    }
    refs.iter()
        .find(|(_, r)| r.name == expr)
        .map(|(k, _)| k.clone())
}

/// Resolve `expr` against a ref table and commit set.
///
/// # Errors
///
/// - `UnresolvableRef` if `expr` names a ref whose chain ends without a commit
/// - `NoMatch` if no ref and no commit hash matches
/// - `AmbiguousMatch` if the hash prefix matches several commits
pub fn resolve(
    refs: &RefTable,
    commits: &CommitGraph,
    expr: &str,
) -> Result<Resolved, ResolutionError> {
    if let Some(start) = find_ref_key(refs, expr) {
        let mut key = start;
        // each hop visits a distinct key, so the table size bounds the chain
        for _ in 0..=refs.len() {
            let reference = refs
                .get(&key)
                .ok_or_else(|| ResolutionError::UnresolvableRef(expr.to_string()))?;
            if reference.is_symbolic() {
                let next = reference.target();
                if !refs.contains(next) {
                    return Err(ResolutionError::UnresolvableRef(expr.to_string()));
                }
                trace!(from = %key, to = %next, "following symbolic ref");
                key = next.to_string();
                continue;
            }
            let commit = commits
                .get_str(&reference.value)
                .ok_or_else(|| ResolutionError::UnresolvableRef(expr.to_string()))?;
            let through_ref = key != HEAD;
            trace!(expr, ref_key = %key, hash = %commit.hash, "resolved through ref");
            return Ok(Resolved {
                commit: commit.clone(),
                through_ref,
                ref_key: through_ref.then_some(key),
            });
        }
        return Err(ResolutionError::UnresolvableRef(expr.to_string()));
    }

    if expr.is_empty() || !expr.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ResolutionError::NoMatch(expr.to_string()));
    }

    let matches = commits.find_by_prefix(expr);
    match matches.as_slice() {
        [] => Err(ResolutionError::NoMatch(expr.to_string())),
        [commit] => {
            trace!(expr, hash = %commit.hash, "resolved hash prefix");
            Ok(Resolved {
                commit: (*commit).clone(),
                through_ref: false,
                ref_key: None,
            })
        }
        many => Err(ResolutionError::AmbiguousMatch {
            prefix: expr.to_string(),
            candidates: many.iter().map(|c| c.hash.clone()).collect(),
        }),
    }
}

impl Repository {
    /// Resolve a revision expression to a commit.
    ///
    /// # Example
    ///
    /// ```
    /// # tokio_test::block_on(async {
    /// use objrepo::Repository;
    /// use serde_json::json;
    ///
    /// let mut repo = Repository::new(json!({}));
    /// repo.data_mut()["name"] = json!("x");
    /// let hash = repo.commit("first", "me <me@example.com>", false).await.unwrap();
    ///
    /// assert_eq!(repo.shaish_to_commit("main").unwrap().commit.hash, hash);
    /// assert_eq!(repo.shaish_to_commit(hash.short(6)).unwrap().commit.hash, hash);
    /// # });
    /// ```
    pub fn shaish_to_commit(&self, expr: &str) -> Result<Resolved, ResolutionError> {
        resolve(&self.refs, &self.commits, expr)
    }

    /// The commit HEAD resolves to, or `None` while unborn.
    pub fn commit_at_head(&self) -> Option<&Commit> {
        let resolved = resolve(&self.refs, &self.commits, HEAD).ok()?;
        self.commits.get(&resolved.commit.hash)
    }
}

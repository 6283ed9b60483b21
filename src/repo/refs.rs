//! repo::refs
//!
//! The reference table.
//!
//! Keys are `HEAD`, `refs/heads/<branch>` and `refs/tags/<tag>`. HEAD is
//! either symbolic (`ref: refs/heads/main`, attached) or a direct commit
//! hash (detached). The table is ordered by key so that iteration, and
//! therefore `cherry` and serialized histories, are deterministic.

use std::collections::BTreeMap;

use super::error::RefError;
use crate::core::types::{self, CommitHash, Reference, HEAD, HEADS_PREFIX};

/// Where HEAD currently points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    /// HEAD names a ref key, which may not exist yet (unborn branch).
    Attached(String),
    /// HEAD holds a commit hash directly.
    Detached(String),
}

/// What a ref is moved to.
#[derive(Debug, Clone, Copy)]
pub enum RefTarget<'a> {
    /// Another ref key (symbolic).
    Key(&'a str),
    /// A commit (direct).
    Commit(&'a CommitHash),
}

/// Ref key to [`Reference`] mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefTable {
    refs: BTreeMap<String, Reference>,
}

impl RefTable {
    /// A table holding only HEAD, attached to a branch that does not exist.
    pub fn unborn(default_branch: &str) -> Self {
        let mut refs = BTreeMap::new();
        refs.insert(
            HEAD.to_string(),
            Reference::symbolic(HEAD, &format!("{HEADS_PREFIX}{default_branch}")),
        );
        Self { refs }
    }

    pub fn get(&self, key: &str) -> Option<&Reference> {
        self.refs.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.refs.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Reference)> {
        self.refs.iter()
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, Reference> {
        &self.refs
    }

    /// HEAD's value with any indirection marker stripped: a ref key when
    /// attached, a commit hash when detached.
    pub fn head(&self) -> Result<&str, RefError> {
        self.refs
            .get(HEAD)
            .map(Reference::target)
            .ok_or(RefError::Unreachable)
    }

    pub fn head_state(&self) -> Result<HeadState, RefError> {
        let head = self.refs.get(HEAD).ok_or(RefError::Unreachable)?;
        let target = head.target().to_string();
        Ok(if head.is_symbolic() {
            HeadState::Attached(target)
        } else {
            HeadState::Detached(target)
        })
    }

    /// The value of `key` with indirection stripped, if set.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.refs
            .get(key)
            .map(Reference::target)
            .filter(|v| !v.is_empty())
    }

    /// The checked-out branch's display name, or `HEAD` when detached or
    /// attached to a branch that has no commit yet.
    pub fn branch(&self) -> Result<&str, RefError> {
        match self.refs.get(HEAD).ok_or(RefError::Unreachable)? {
            head if head.is_symbolic() && self.refs.contains_key(head.target()) => {
                Ok(types::short_name(head.target()))
            }
            _ => Ok(HEAD),
        }
    }

    /// Create `key` or overwrite its value.
    pub fn move_ref(&mut self, key: &str, target: RefTarget<'_>) {
        let value = match target {
            RefTarget::Key(k) => format!("{}{k}", types::SYMBOLIC_PREFIX),
            RefTarget::Commit(hash) => hash.as_str().to_string(),
        };
        match self.refs.get_mut(key) {
            Some(existing) => existing.value = value,
            None => {
                self.refs.insert(
                    key.to_string(),
                    Reference {
                        name: types::short_name(key).to_string(),
                        value,
                    },
                );
            }
        }
    }

    /// Insert a new entry. Returns `false` if the key already exists.
    pub fn insert(&mut self, key: &str, reference: Reference) -> bool {
        if self.refs.contains_key(key) {
            return false;
        }
        self.refs.insert(key.to_string(), reference);
        true
    }

    /// Keys whose value is exactly `hash` (direct refs only).
    pub fn keys_at(&self, hash: &CommitHash) -> Vec<String> {
        self.refs
            .iter()
            .filter(|(_, r)| !r.is_symbolic() && r.value.eq_ignore_ascii_case(hash.as_str()))
            .map(|(k, _)| k.clone())
            .collect()
    }
}

impl From<BTreeMap<String, Reference>> for RefTable {
    fn from(refs: BTreeMap<String, Reference>) -> Self {
        Self { refs }
    }
}

impl From<RefTable> for BTreeMap<String, Reference> {
    fn from(table: RefTable) -> Self {
        table.refs
    }
}

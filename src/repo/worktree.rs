//! repo::worktree
//!
//! Working-tree transitions: checkout, branch and tag creation, reset and
//! fast-forward merge.
//!
//! # HEAD States
//!
//! HEAD is either attached to a ref (which may not exist yet) or detached
//! at a commit. Checking out a branch or a tag attaches; checking out a
//! hash detaches.
//!
//! # Ordering
//!
//! Every transition decodes the target tree before touching refs, and moves
//! the document last, so a failure leaves refs, commits and the document
//! as they were.

use tracing::debug;

use super::error::{MergeError, RefError, RepositoryError};
use super::history::History;
use super::refs::RefTarget;
use super::Repository;
use crate::core::commit::Commit;
use crate::core::types::{
    self, BranchName, CommitHash, Reference, RefName, TagName, TypeError, HEAD,
};

/// Reset mode.
///
/// Both modes move the document to the target unless
/// `reset.soft_keeps_data` is configured, in which case `Soft` keeps the
/// document and leaves its differences to the target pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResetMode {
    Soft,
    #[default]
    Hard,
}

/// What to merge into the checked-out branch.
#[derive(Debug, Clone)]
pub enum MergeSource {
    /// A revision expression.
    Shaish(String),
    /// Another repository's history. Not supported.
    History(History),
}

impl From<&str> for MergeSource {
    fn from(s: &str) -> Self {
        MergeSource::Shaish(s.to_string())
    }
}

impl From<String> for MergeSource {
    fn from(s: String) -> Self {
        MergeSource::Shaish(s)
    }
}

impl From<&CommitHash> for MergeSource {
    fn from(hash: &CommitHash) -> Self {
        MergeSource::Shaish(hash.as_str().to_string())
    }
}

impl From<History> for MergeSource {
    fn from(history: History) -> Self {
        MergeSource::History(history)
    }
}

fn branch_name(name: &str) -> Result<BranchName, RefError> {
    BranchName::new(name).map_err(|e| match e {
        TypeError::InvalidBranchName(n) => RefError::InvalidName(n),
        other => RefError::InvalidName(other.to_string()),
    })
}

impl Repository {
    /// Check out a revision, or create and attach a branch.
    ///
    /// With `create_branch`, `shaish` is the new branch's name: the branch
    /// is created at the HEAD commit (or left unborn if there is none) and
    /// HEAD attaches to it. The document is not touched.
    ///
    /// Otherwise `shaish` is resolved and the document moves to its tree.
    /// HEAD attaches to the ref the revision went through, and detaches
    /// for hashes.
    ///
    /// # Errors
    ///
    /// - `InvalidName` / `AlreadyExists` when creating a branch
    /// - any `ResolutionError` for the revision
    /// - `Codec` if the target tree cannot be decoded
    pub async fn checkout(
        &mut self,
        shaish: &str,
        create_branch: bool,
    ) -> Result<(), RepositoryError> {
        if create_branch {
            let name = branch_name(shaish)?;
            let key = RefName::for_branch(&name);
            if self.refs.contains(key.as_str()) {
                return Err(RefError::AlreadyExists {
                    kind: "branch",
                    name: name.to_string(),
                }
                .into());
            }
            if let Some(hash) = self.commit_at_head().map(|c| c.hash.clone()) {
                self.refs
                    .insert(key.as_str(), Reference::direct(name.as_str(), &hash));
            }
            self.refs.move_ref(HEAD, RefTarget::Key(key.as_str()));
            debug!(ref_key = %key, "switched to a new branch");
            return Ok(());
        }

        let resolved = self.shaish_to_commit(shaish)?;
        let target = self.codec.deserialize(&resolved.commit.tree).await?;
        match resolved.ref_key.as_deref() {
            Some(key) => self.refs.move_ref(HEAD, RefTarget::Key(key)),
            None => self
                .refs
                .move_ref(HEAD, RefTarget::Commit(&resolved.commit.hash)),
        }
        self.move_data(target);
        debug!(
            hash = %self.abbrev(&resolved.commit.hash),
            ref_key = ?resolved.ref_key,
            "checked out"
        );
        Ok(())
    }

    /// Create a branch at the HEAD commit and return its ref key.
    ///
    /// HEAD stays where it is.
    ///
    /// # Errors
    ///
    /// - `InvalidName` if `name` is not a valid branch name
    /// - `AlreadyExists` if the branch exists
    /// - `NotAValidObjectName` if HEAD has no commit yet
    pub fn create_branch(&mut self, name: &str) -> Result<String, RepositoryError> {
        let name = branch_name(name)?;
        let key = RefName::for_branch(&name);
        if self.refs.contains(key.as_str()) {
            return Err(RefError::AlreadyExists {
                kind: "branch",
                name: name.to_string(),
            }
            .into());
        }
        let hash = self.head_commit_hash().ok_or_else(|| {
            let head = self.refs.head().unwrap_or(HEAD);
            RefError::NotAValidObjectName(types::short_name(head).to_string())
        })?;
        self.refs
            .insert(key.as_str(), Reference::direct(name.as_str(), &hash));
        debug!(ref_key = %key, hash = %self.abbrev(&hash), "created branch");
        Ok(key.into())
    }

    /// Tag the HEAD commit and return the tag's ref key.
    ///
    /// # Errors
    ///
    /// - `InvalidTagName` if `name` is not a valid ref component
    /// - `AlreadyExists` if the tag exists
    /// - `HeadUnresolvable` if HEAD has no commit yet
    pub fn tag(&mut self, name: &str) -> Result<String, RepositoryError> {
        let tag = TagName::new(name).map_err(|_| RefError::InvalidTagName(name.to_string()))?;
        let key = RefName::for_tag(&tag);
        if self.refs.contains(key.as_str()) {
            return Err(RefError::AlreadyExists {
                kind: "tag",
                name: tag.to_string(),
            }
            .into());
        }
        let hash = self.head_commit_hash().ok_or(RefError::HeadUnresolvable)?;
        self.refs
            .insert(key.as_str(), Reference::direct(tag.as_str(), &hash));
        debug!(ref_key = %key, hash = %self.abbrev(&hash), "created tag");
        Ok(key.into())
    }

    /// Reset to a revision (default `HEAD`).
    ///
    /// Every branch ref that pointed at the old HEAD commit moves to the
    /// target, as does a detached HEAD. Tags never move.
    pub async fn reset(
        &mut self,
        mode: ResetMode,
        shaish: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let resolved = self.shaish_to_commit(shaish.unwrap_or(HEAD))?;
        let target_hash = resolved.commit.hash.clone();
        let target = self.codec.deserialize(&resolved.commit.tree).await?;

        match self.head_commit_hash() {
            Some(old) => {
                for key in self.refs.keys_at(&old) {
                    if key == HEAD || types::is_branch_key(&key) {
                        self.refs.move_ref(&key, RefTarget::Commit(&target_hash));
                    }
                }
            }
            None => self.advance_active_ref(&target_hash)?,
        }

        if mode == ResetMode::Soft && self.config.reset.soft_keeps_data {
            self.checkpoint = target;
        } else {
            self.move_data(target);
        }
        debug!(hash = %self.abbrev(&target_hash), ?mode, "reset");
        Ok(())
    }

    /// Fast-forward the checked-out ref to `source` and return the new
    /// HEAD commit hash.
    ///
    /// # Errors
    ///
    /// - `NotImplemented` for [`MergeSource::History`]
    /// - `Unreachable` if HEAD has no commit yet
    /// - `AlreadyUpToDate` if `source` is the HEAD commit
    /// - `DivergentMerge` if the HEAD commit is not an ancestor of `source`
    pub async fn merge(
        &mut self,
        source: impl Into<MergeSource>,
    ) -> Result<CommitHash, RepositoryError> {
        let shaish = match source.into() {
            MergeSource::Shaish(s) => s,
            MergeSource::History(_) => return Err(MergeError::NotImplemented("History").into()),
        };
        let head = self.head_commit_hash().ok_or(RefError::Unreachable)?;
        let source = self.shaish_to_commit(&shaish)?.commit;

        if head == source.hash {
            return Err(MergeError::AlreadyUpToDate.into());
        }
        if !self.commits.is_ancestor(&head, &source.hash) {
            return Err(MergeError::DivergentMerge.into());
        }

        self.fast_forward(&source).await?;
        debug!(hash = %self.abbrev(&source.hash), "fast-forward merge");
        Ok(source.hash)
    }

    async fn fast_forward(&mut self, to: &Commit) -> Result<(), RepositoryError> {
        let target = self.codec.deserialize(&to.tree).await?;
        self.advance_active_ref(&to.hash)?;
        self.move_data(target);
        Ok(())
    }

    fn head_commit_hash(&self) -> Option<CommitHash> {
        self.commit_at_head().map(|c| c.hash.clone())
    }
}

//! repo::commit
//!
//! Plain and amended commits.
//!
//! # Amend
//!
//! Amending replaces the HEAD commit rather than building on it: the new
//! commit takes the old one's parent, and its `changes` are the old
//! commit's changes followed by everything pending since. The old commit
//! leaves the graph unless another ref or a child commit still points at it.

use chrono::{SubsecRound, Utc};
use tracing::debug;

use super::error::{CommitError, RepositoryError};
use super::Repository;
use crate::codec::CommitHashContent;
use crate::core::commit::Commit;
use crate::core::types::CommitHash;
use crate::patch;

impl Repository {
    /// Record the pending changes as a new commit and return its hash.
    ///
    /// # Errors
    ///
    /// - `NothingToAmend` if `amend` is set and HEAD has no commit
    /// - `NoChanges` if nothing is pending on a plain commit, or if an
    ///   amend keeps the amended commit's message
    /// - `Codec` if hashing or tree serialization fails; no ref or commit
    ///   is touched in that case
    pub async fn commit(
        &mut self,
        message: &str,
        author: &str,
        amend: bool,
    ) -> Result<CommitHash, RepositoryError> {
        let head = self.commit_at_head().cloned();
        let amended = match (amend, head.as_ref()) {
            (true, None) => return Err(CommitError::NothingToAmend.into()),
            (true, Some(commit)) => Some(commit.clone()),
            (false, _) => None,
        };
        let parent = match &amended {
            Some(old) => old.parent.clone(),
            None => head.map(|c| c.hash),
        };

        let pending = patch::diff(&self.checkpoint, &self.data);
        match &amended {
            None if pending.is_empty() => return Err(CommitError::NoChanges.into()),
            Some(old) if old.message == message => return Err(CommitError::NoChanges.into()),
            _ => {}
        }

        let changes = match &amended {
            Some(old) => old.changes.iter().cloned().chain(pending).collect(),
            None => pending,
        };
        let timestamp = Utc::now().trunc_subsecs(3);

        let hash = self
            .hasher
            .hash(&CommitHashContent {
                message,
                author,
                changes: &changes,
                parent_ref: parent.as_ref(),
                timestamp,
            })
            .await?;
        let tree = self.codec.serialize(&self.data).await?;

        let change_count = changes.len();
        self.commits.insert(Commit {
            hash: hash.clone(),
            tree,
            message: message.to_string(),
            author: author.to_string(),
            parent,
            changes,
            timestamp,
        });
        self.advance_active_ref(&hash)?;
        if let Some(old) = &amended {
            self.retire(&old.hash);
        }
        self.checkpoint = self.data.clone();

        debug!(
            hash = %self.abbrev(&hash),
            changes = change_count,
            amend,
            "committed"
        );
        Ok(hash)
    }

    /// Drop an amended commit unless something still points at it.
    fn retire(&mut self, hash: &CommitHash) {
        let referenced = !self.refs.keys_at(hash).is_empty() || self.commits.has_children(hash);
        if referenced {
            debug!(hash = %self.abbrev(hash), "amended commit still referenced, keeping it");
            return;
        }
        self.commits.remove(hash);
    }
}

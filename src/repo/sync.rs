//! repo::sync
//!
//! The remote snapshot and the pending ("cherry") set.
//!
//! The remote is the history a repository was constructed from, frozen.
//! [`Repository::cherry`] reports what a push would have to transmit:
//! every ref (except HEAD) that is new or moved since the snapshot, and
//! the commits those refs reach that the remote does not have.

use std::collections::{BTreeMap, HashSet};

use tracing::trace;

use super::Repository;
use crate::core::commit::Commit;
use crate::core::types::{CommitHash, Reference, HEAD};

/// Commits and ref updates present locally but absent from the remote.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cherry {
    /// Pending commits, each listed once, newest first per ref.
    pub commits: Vec<Commit>,
    /// Refs that are new or moved, keyed by ref key.
    pub refs: BTreeMap<String, Reference>,
}

impl Cherry {
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty() && self.refs.is_empty()
    }
}

impl Repository {
    /// The ref table frozen at construction, or `None` without a history.
    pub fn remote(&self) -> Option<&BTreeMap<String, Reference>> {
        self.remote.as_ref().map(|r| &r.refs)
    }

    /// Compute the pending set against the remote snapshot.
    ///
    /// For a ref with no remote counterpart, every commit from it back to
    /// the root is collected. For a moved ref, only the commits between the
    /// local and the remote value are. Commits the remote already has are
    /// never collected. Refs that do not point at a known commit are
    /// reported without commits.
    pub fn cherry(&self) -> Cherry {
        let empty = HashSet::new();
        let remote_refs = self.remote.as_ref().map(|r| &r.refs);
        let remote_commits = self.remote.as_ref().map_or(&empty, |r| &r.commits);

        let mut out = Cherry::default();
        let mut collected: HashSet<CommitHash> = HashSet::new();

        for (key, reference) in self.refs.iter() {
            if key == HEAD {
                continue;
            }
            let remote = remote_refs.and_then(|refs| refs.get(key));
            if remote.is_some_and(|r| r.value == reference.value) {
                continue;
            }
            out.refs.insert(key.clone(), reference.clone());

            let Some(local) = self.commits.get_str(&reference.value) else {
                continue;
            };
            let upstream = remote.and_then(|r| self.commits.get_str(&r.value));
            let path = match upstream {
                Some(upstream) => self.commits.map_path(&local.hash, Some(&upstream.hash)),
                // remote value unknown locally, so everything back to the root
                None => self.commits.map_path(&local.hash, None),
            };
            let Some(path) = path else {
                trace!(ref_key = %key, "remote value is not an ancestor, no commits collected");
                continue;
            };

            for commit in path {
                if remote_commits.contains(&commit.hash) || !collected.insert(commit.hash.clone()) {
                    continue;
                }
                out.commits.push(commit.clone());
            }
        }

        out
    }
}

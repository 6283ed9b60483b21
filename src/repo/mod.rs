//! repo
//!
//! The repository engine.
//!
//! # Architecture
//!
//! A [`Repository`] owns:
//! - the tracked document, mutated in place and never replaced
//! - a [`RefTable`] (HEAD, branches, tags)
//! - a [`CommitGraph`] holding every known commit
//! - a frozen remote snapshot captured from the construction-time history
//! - the construction-time document and a checkpoint snapshot
//!
//! Pending changes are observed by diffing the checkpoint against the live
//! document. The checkpoint resets on commit, checkout, reset and merge.
//!
//! # Modules
//!
//! - [`refs`] - Reference table and HEAD state
//! - [`resolve`] - Revision resolution
//! - [`commit`] - Plain and amended commits
//! - [`worktree`] - Checkout, branch, tag, reset and merge
//! - [`status`] - Status, diff and patch apply
//! - [`sync`] - Remote snapshot and pending set
//! - [`history`] - Logs and the persisted history form
//!
//! # Example
//!
//! ```
//! # tokio_test::block_on(async {
//! use objrepo::{History, Repository, RepositoryOptions};
//! use serde_json::json;
//!
//! let mut repo = Repository::new(json!({"nested": []}));
//! repo.data_mut()["name"] = json!("first");
//! repo.commit("initial", "User name <name@domain.com>", false).await.unwrap();
//!
//! let history: History = repo.get_history();
//! let restored = Repository::open(json!({}), RepositoryOptions::new().with_history(history))
//!     .await
//!     .unwrap();
//! assert_eq!(restored.data(), repo.data());
//! # });
//! ```

pub mod commit;
pub mod error;
pub mod history;
pub mod refs;
pub mod resolve;
pub mod status;
pub mod sync;
pub mod worktree;

pub use error::{CommitError, MergeError, RefError, RepositoryError, ResolutionError};
pub use history::History;
pub use refs::{HeadState, RefTable, RefTarget};
pub use resolve::Resolved;
pub use sync::Cherry;
pub use worktree::{MergeSource, ResetMode};

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::codec::{CommitHasher, DeflateCodec, Sha256Hasher, TreeCodec};
use crate::core::config::RepositoryConfig;
use crate::core::graph::CommitGraph;
use crate::core::types::{CommitHash, RefName, Reference, HEAD};
use crate::patch;

/// Construction options for [`Repository::open`].
#[derive(Clone, Default)]
pub struct RepositoryOptions {
    history: Option<History>,
    codec: Option<Arc<dyn TreeCodec>>,
    hasher: Option<Arc<dyn CommitHasher>>,
    config: RepositoryConfig,
}

impl RepositoryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from (and snapshot as remote) an existing history.
    pub fn with_history(mut self, history: History) -> Self {
        self.history = Some(history);
        self
    }

    /// Override the tree codec. Default: [`DeflateCodec`].
    pub fn with_codec(mut self, codec: Arc<dyn TreeCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Override the commit hasher. Default: [`Sha256Hasher`].
    pub fn with_hasher(mut self, hasher: Arc<dyn CommitHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    pub fn with_config(mut self, config: RepositoryConfig) -> Self {
        self.config = config;
        self
    }
}

/// The remote state frozen at construction.
#[derive(Debug, Clone)]
pub(crate) struct RemoteSnapshot {
    pub(crate) refs: BTreeMap<String, Reference>,
    pub(crate) commits: HashSet<CommitHash>,
}

impl RemoteSnapshot {
    fn from_history(history: &History) -> Self {
        Self {
            refs: history.refs.clone(),
            commits: history.commits.iter().map(|c| c.hash.clone()).collect(),
        }
    }
}

/// A version-controlled JSON document.
pub struct Repository {
    data: Value,
    original: Value,
    checkpoint: Value,
    refs: RefTable,
    commits: CommitGraph,
    remote: Option<RemoteSnapshot>,
    codec: Arc<dyn TreeCodec>,
    hasher: Arc<dyn CommitHasher>,
    config: RepositoryConfig,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("head", &self.refs.head().ok())
            .field("refs", &self.refs.len())
            .field("commits", &self.commits.len())
            .field("has_remote", &self.remote.is_some())
            .finish()
    }
}

impl Repository {
    /// An unborn repository with default strategies and configuration.
    ///
    /// HEAD is attached to `refs/heads/main`, which does not exist until
    /// the first commit.
    pub fn new(data: Value) -> Self {
        let config = RepositoryConfig::default();
        let codec = Arc::new(DeflateCodec::new(config.tree.compression_level));
        Self::unborn(data, codec, Arc::new(Sha256Hasher), config)
    }

    fn unborn(
        data: Value,
        codec: Arc<dyn TreeCodec>,
        hasher: Arc<dyn CommitHasher>,
        config: RepositoryConfig,
    ) -> Self {
        Self {
            original: data.clone(),
            checkpoint: data.clone(),
            data,
            refs: RefTable::unborn(&config.default_branch),
            commits: CommitGraph::new(),
            remote: None,
            codec,
            hasher,
            config,
        }
    }

    /// Build a repository from options.
    ///
    /// With a history, refs and commits are copied, the remote snapshot is
    /// frozen from the same history, and `data` is moved to the commit at
    /// HEAD before this returns.
    ///
    /// # Errors
    ///
    /// - `Config` if the configuration does not validate
    /// - `Ref(Unreachable)` if the history has no HEAD
    /// - `Type(InvalidRefName)` if a history ref key is malformed
    /// - `Codec` if the HEAD commit's tree cannot be decoded
    pub async fn open(data: Value, options: RepositoryOptions) -> Result<Self, RepositoryError> {
        let RepositoryOptions {
            history,
            codec,
            hasher,
            config,
        } = options;
        config.validate()?;

        let codec = codec
            .unwrap_or_else(|| Arc::new(DeflateCodec::new(config.tree.compression_level)));
        let hasher = hasher.unwrap_or_else(|| Arc::new(Sha256Hasher));

        let Some(history) = history else {
            return Ok(Self::unborn(data, codec, hasher, config));
        };
        if !history.refs.contains_key(HEAD) {
            return Err(RefError::Unreachable.into());
        }
        for key in history.refs.keys() {
            RefName::new(key.as_str())?;
        }

        let remote = RemoteSnapshot::from_history(&history);
        let History { refs, commits } = history;
        let mut repo = Self {
            original: data.clone(),
            checkpoint: data.clone(),
            data,
            refs: RefTable::from(refs),
            commits: commits.into_iter().collect(),
            remote: Some(remote),
            codec,
            hasher,
            config,
        };

        if let Some(tree) = repo.commit_at_head().map(|c| c.tree.clone()) {
            let target = repo.codec.deserialize(&tree).await?;
            repo.move_data(target);
        }
        debug!(
            refs = repo.refs.len(),
            commits = repo.commits.len(),
            head = ?repo.refs.head().ok(),
            "repository restored from history"
        );
        Ok(repo)
    }

    /// A returned repository has always finished reconstruction.
    pub fn is_ready(&self) -> bool {
        true
    }

    /// The tracked document.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Mutable access to the tracked document. Mutations show up in
    /// `status()` and are recorded by the next `commit()`.
    pub fn data_mut(&mut self) -> &mut Value {
        &mut self.data
    }

    /// The document as it was passed to the constructor.
    pub fn original(&self) -> &Value {
        &self.original
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Every commit known to the repository, reachable or not.
    pub fn commits(&self) -> &CommitGraph {
        &self.commits
    }

    /// The full ref table.
    pub fn refs(&self) -> &RefTable {
        &self.refs
    }

    /// HEAD's value with indirection stripped.
    pub fn head(&self) -> Result<String, RefError> {
        self.refs.head().map(str::to_string)
    }

    /// The commit hash (or ref key) `key` holds, if set.
    pub fn ref_value(&self, key: &str) -> Option<String> {
        self.refs.value(key).map(str::to_string)
    }

    /// The checked-out branch name, or `"HEAD"` when detached or unborn.
    pub fn branch(&self) -> Result<String, RefError> {
        self.refs.branch().map(str::to_string)
    }

    /// Point the active ref at `hash`: the attached branch, or HEAD itself
    /// when detached.
    fn advance_active_ref(&mut self, hash: &CommitHash) -> Result<(), RefError> {
        match self.refs.head_state()? {
            HeadState::Attached(key) => self.refs.move_ref(&key, RefTarget::Commit(hash)),
            HeadState::Detached(_) => self.refs.move_ref(HEAD, RefTarget::Commit(hash)),
        }
        Ok(())
    }

    /// Move the document to `target` in place and reset the checkpoint.
    fn move_data(&mut self, target: Value) {
        let ops = patch::diff(&self.data, &target);
        if !ops.is_empty() {
            if let Err(err) = patch::apply(&mut self.data, &ops) {
                warn!(%err, "structural move failed, replacing document");
                self.data = target.clone();
            }
        }
        self.checkpoint = target;
    }

    fn abbrev<'a>(&self, hash: &'a CommitHash) -> &'a str {
        hash.short(self.config.log.abbrev_len)
    }
}

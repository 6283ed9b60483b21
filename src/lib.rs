//! objrepo - Embeddable version control for structured in-memory documents
//!
//! objrepo tracks the history of a JSON document the way Git tracks a
//! file tree: a DAG of content-addressed commits reachable through
//! branches, tags and a movable HEAD, with JSON Patch as the unit of change
//! and fast-forward as the only merge strategy. Everything lives in memory;
//! [`History`] is the persisted form.
//!
//! # Architecture
//!
//! - [`core`] - Domain types, naming rules, commit graph, configuration
//! - [`patch`] - JSON Patch diff, validate, apply and revert
//! - [`codec`] - Tree serialization and commit hashing strategies
//! - [`repo`] - The repository engine
//!
//! # Correctness Invariants
//!
//! 1. HEAD is present in every ref table
//! 2. A commit's hash is the digest of its message, author, changes, parent
//!    and timestamp
//! 3. Failed operations leave refs and commits untouched; the document is
//!    moved last
//! 4. Reading status never clears pending changes
//!
//! # Example
//!
//! ```
//! # tokio_test::block_on(async {
//! use objrepo::Repository;
//! use serde_json::json;
//!
//! let mut repo = Repository::new(json!({"nested": []}));
//! assert_eq!(repo.branch().unwrap(), "HEAD");
//!
//! repo.data_mut()["name"] = json!("my first process template");
//! let first = repo.commit("header data", "User name <name@domain.com>", false).await.unwrap();
//! assert_eq!(repo.head().unwrap(), "refs/heads/main");
//!
//! repo.data_mut()["nested"] = json!([{"name": "first step"}]);
//! repo.commit("first step", "User name <name@domain.com>", false).await.unwrap();
//!
//! repo.checkout(first.as_str(), false).await.unwrap();
//! assert_eq!(repo.branch().unwrap(), "HEAD");
//! assert_eq!(repo.data()["nested"], json!([]));
//! # });
//! ```

pub mod codec;
pub mod core;
pub mod patch;
pub mod repo;

pub use crate::core::commit::Commit;
pub use crate::core::config::RepositoryConfig;
pub use crate::core::types::{CommitHash, Reference};
pub use crate::patch::Operation;
pub use crate::repo::{
    Cherry, History, MergeSource, Repository, RepositoryError, RepositoryOptions, ResetMode,
};

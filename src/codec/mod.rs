//! codec
//!
//! Tree serialization and commit hashing strategies.
//!
//! # Strategies
//!
//! Both concerns are late-bound behind traits so that embedding applications
//! can override them (e.g. to preserve rich types, or to hash with a
//! platform primitive that completes asynchronously):
//!
//! - [`TreeCodec`] - document ↔ tree string. Default: [`DeflateCodec`]
//! - [`CommitHasher`] - commit content → [`CommitHash`]. Default: [`Sha256Hasher`]
//!
//! Both traits are async; the repository awaits them on every commit,
//! checkout, reset, merge, diff and status.
//!
//! # Modules
//!
//! - [`tree`] - Tree codecs
//! - [`hash`] - Canonical commit encoding and hashers
//! - [`size`] - Encoded-size helpers

pub mod hash;
pub mod size;
pub mod tree;

pub use hash::{canonical_json, CommitHashContent, Sha256Hasher};
pub use tree::{DeflateCodec, JsonCodec};

use serde_json::Value;
use thiserror::Error;

use crate::core::types::CommitHash;

/// Errors from tree encoding and hashing.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode tree: {0}")]
    Encode(String),

    #[error("failed to decode tree: {0}")]
    Decode(String),

    #[error("failed to hash commit: {0}")]
    Hash(String),
}

/// Serializes a document into the opaque tree string stored in commits.
///
/// Implementations must be lossless for the documents they accept:
/// `deserialize(serialize(doc)) == doc`.
#[async_trait::async_trait]
pub trait TreeCodec: Send + Sync {
    /// Encode a document as a tree string.
    async fn serialize(&self, document: &Value) -> Result<String, CodecError>;

    /// Decode a tree string back into a document.
    async fn deserialize(&self, tree: &str) -> Result<Value, CodecError>;
}

/// Computes the content address of a commit.
///
/// Implementations must be deterministic and must return a hex digest.
#[async_trait::async_trait]
pub trait CommitHasher: Send + Sync {
    async fn hash(&self, content: &CommitHashContent<'_>) -> Result<CommitHash, CodecError>;
}

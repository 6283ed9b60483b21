//! repo::error
//!
//! Error types for repository operations.
//!
//! Messages mirror git's wording where git has an equivalent failure, so
//! that embedding CLIs can surface them unchanged.

use thiserror::Error;

use crate::codec::CodecError;
use crate::core::config::ConfigError;
use crate::core::types::{CommitHash, TypeError};
use crate::patch::PatchError;

/// Errors from the reference table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefError {
    /// HEAD is missing from the ref table.
    #[error("unreachable: ref HEAD not available")]
    Unreachable,

    #[error("invalid ref name")]
    InvalidName(String),

    #[error("fatal: '{0}' is not a valid tag name")]
    InvalidTagName(String),

    /// A branch was requested while HEAD has no commit yet.
    #[error("fatal: not a valid object name: '{0}'")]
    NotAValidObjectName(String),

    /// A tag was requested while HEAD has no commit yet.
    #[error("fatal: failed to resolve 'HEAD' as a valid ref.")]
    HeadUnresolvable,

    #[error("fatal: a {kind} named '{name}' already exists")]
    AlreadyExists { kind: &'static str, name: String },
}

/// Errors from turning a revision expression into a commit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("pathspec '{0}' did not match any known refs")]
    NoMatch(String),

    #[error("fatal: ambiguous argument '{prefix}': matches {} commits", candidates.len())]
    AmbiguousMatch {
        prefix: String,
        candidates: Vec<CommitHash>,
    },

    /// The expression named a ref whose target does not point to a commit.
    #[error("fatal: ref '{0}' does not point to a commit")]
    UnresolvableRef(String),
}

/// Errors from creating commits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommitError {
    #[error("no commit to amend")]
    NothingToAmend,

    #[error("no changes to commit")]
    NoChanges,
}

/// Errors from merging.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("fatal: source type ({0}) not implemented")]
    NotImplemented(&'static str),

    #[error("already up to date")]
    AlreadyUpToDate,

    #[error("fatal: refusing to merge divergent histories, only fast-forward merges are supported")]
    DivergentMerge,
}

/// Any repository failure.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Ref(#[from] RefError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Type(#[from] TypeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn git_wording() {
        assert_eq!(
            ResolutionError::NoMatch("main".into()).to_string(),
            "pathspec 'main' did not match any known refs"
        );
        assert_eq!(
            RefError::NotAValidObjectName("main".into()).to_string(),
            "fatal: not a valid object name: 'main'"
        );
        assert_eq!(
            RefError::AlreadyExists {
                kind: "branch",
                name: "x".into()
            }
            .to_string(),
            "fatal: a branch named 'x' already exists"
        );
    }

    #[test]
    fn aggregate_is_transparent() {
        let err: RepositoryError = CommitError::NoChanges.into();
        assert_eq!(err.to_string(), "no changes to commit");
        assert!(matches!(err, RepositoryError::Commit(CommitError::NoChanges)));
    }
}

//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`BranchName`] - Validated branch short-name
//! - [`TagName`] - Validated tag short-name
//! - [`CommitHash`] - Content address of a commit (hex digest)
//! - [`RefName`] - Ref key (`HEAD`, `refs/heads/<b>`, `refs/tags/<t>`)
//! - [`Reference`] - A ref table entry, direct or symbolic
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use objrepo::core::types::{BranchName, CommitHash, RefName};
//!
//! let branch = BranchName::new("feature/my-branch").unwrap();
//! let hash = CommitHash::new("ABC123def4567890").unwrap();
//! let refname = RefName::for_branch(&branch);
//!
//! assert_eq!(refname.as_str(), "refs/heads/feature/my-branch");
//! assert_eq!(hash.as_str(), "abc123def4567890");
//! assert!(BranchName::new("invalid..name").is_err());
//! assert!(CommitHash::new("not-a-sha").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::naming::{is_valid_branch_name, is_valid_ref_name};

/// Key of the HEAD reference.
pub const HEAD: &str = "HEAD";

/// Prefix of local branch ref keys.
pub const HEADS_PREFIX: &str = "refs/heads/";

/// Prefix of tag ref keys.
pub const TAGS_PREFIX: &str = "refs/tags/";

/// Prefix marking a symbolic ref value (`ref: refs/heads/main`).
pub const SYMBOLIC_PREFIX: &str = "ref: ";

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid ref name")]
    InvalidBranchName(String),

    #[error("fatal: '{0}' is not a valid tag name")]
    InvalidTagName(String),

    #[error("invalid commit hash: {0}")]
    InvalidHash(String),

    #[error("invalid ref name: {0}")]
    InvalidRefName(String),
}

/// A validated branch short-name.
///
/// # Example
///
/// ```
/// use objrepo::core::types::BranchName;
///
/// let name = BranchName::new("new_feature").unwrap();
/// assert_eq!(name.as_str(), "new_feature");
///
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new("-foo").is_err());
/// assert!(BranchName::new("HEAD").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates the refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if !is_valid_branch_name(&name) {
            return Err(TypeError::InvalidBranchName(name));
        }
        Ok(Self(name))
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated tag short-name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(String);

impl TagName {
    /// Create a new validated tag name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidTagName` if the name violates the refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if !is_valid_ref_name(&name, true) {
            return Err(TypeError::InvalidTagName(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The content address of a commit.
///
/// Hashes are hex digests, normalized to lowercase. Any length is accepted
/// so that custom [`CommitHasher`](crate::codec::CommitHasher) strategies
/// can pick their own digest size.
///
/// # Example
///
/// ```
/// use objrepo::core::types::CommitHash;
///
/// let hash = CommitHash::new("ABC123DEF4567890").unwrap();
/// assert_eq!(hash.as_str(), "abc123def4567890");
/// assert_eq!(hash.short(7), "abc123d");
/// assert!(hash.has_prefix("abc1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitHash(String);

impl CommitHash {
    /// Create a new validated commit hash.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidHash` if the string is empty or not hexadecimal.
    pub fn new(hash: impl Into<String>) -> Result<Self, TypeError> {
        let hash = hash.into().to_ascii_lowercase();
        if hash.is_empty() {
            return Err(TypeError::InvalidHash("commit hash cannot be empty".into()));
        }
        if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidHash(format!(
                "'{hash}' is not hexadecimal"
            )));
        }
        Ok(Self(hash))
    }

    /// Get an abbreviated form of the hash.
    ///
    /// Returns the first `len` characters, or the full hash if shorter.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    /// Check whether this hash starts with `prefix` (case-insensitive).
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.len() >= prefix.len() && self.0[..prefix.len()].eq_ignore_ascii_case(prefix)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CommitHash {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CommitHash> for String {
    fn from(hash: CommitHash) -> Self {
        hash.0
    }
}

impl AsRef<str> for CommitHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A ref key.
///
/// # Example
///
/// ```
/// use objrepo::core::types::{BranchName, RefName, TagName};
///
/// let branch = BranchName::new("feature/foo").unwrap();
/// let refname = RefName::for_branch(&branch);
/// assert_eq!(refname.as_str(), "refs/heads/feature/foo");
/// assert_eq!(refname.short_name(), "feature/foo");
///
/// let tag = RefName::for_tag(&TagName::new("v1.0.0").unwrap());
/// assert_eq!(tag.as_str(), "refs/tags/v1.0.0");
/// assert!(RefName::new("refs/heads/bad..name").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefName(String);

impl RefName {
    /// Create a new validated ref key.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRefName` unless the key is `HEAD` or a
    /// multi-level name satisfying the refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name != HEAD && !is_valid_ref_name(&name, false) {
            return Err(TypeError::InvalidRefName(name));
        }
        Ok(Self(name))
    }

    /// Create a ref key for a branch (`refs/heads/<branch>`).
    pub fn for_branch(branch: &BranchName) -> Self {
        Self(format!("{HEADS_PREFIX}{}", branch.as_str()))
    }

    /// Create a ref key for a tag (`refs/tags/<tag>`).
    pub fn for_tag(tag: &TagName) -> Self {
        Self(format!("{TAGS_PREFIX}{}", tag.as_str()))
    }

    /// The display name: the key without its `refs/heads/` or `refs/tags/`
    /// prefix, or the last path component for other namespaces.
    pub fn short_name(&self) -> &str {
        short_name(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<RefName> for String {
    fn from(name: RefName) -> Self {
        name.0
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a raw ref key lives under `refs/heads/`.
pub fn is_branch_key(key: &str) -> bool {
    key.starts_with(HEADS_PREFIX)
}

/// Display name for a raw ref key.
pub fn short_name(key: &str) -> &str {
    if let Some(rest) = key
        .strip_prefix(HEADS_PREFIX)
        .or_else(|| key.strip_prefix(TAGS_PREFIX))
    {
        return rest;
    }
    key.rsplit('/').next().unwrap_or(key)
}

/// One entry of the ref table.
///
/// `value` is either a commit hash or a symbolic pointer of the form
/// `ref: <key>`.
///
/// # Example
///
/// ```
/// use objrepo::core::types::Reference;
///
/// let head = Reference::symbolic("HEAD", "refs/heads/main");
/// assert_eq!(head.value, "ref: refs/heads/main");
/// assert!(head.is_symbolic());
/// assert_eq!(head.target(), "refs/heads/main");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Display name (`HEAD`, `main`, `v1.0.0`)
    pub name: String,
    /// Commit hash or `ref: <key>`
    pub value: String,
}

impl Reference {
    /// A reference pointing directly at a commit.
    pub fn direct(name: impl Into<String>, hash: &CommitHash) -> Self {
        Self {
            name: name.into(),
            value: hash.as_str().to_string(),
        }
    }

    /// A reference pointing at another ref key.
    pub fn symbolic(name: impl Into<String>, key: &str) -> Self {
        Self {
            name: name.into(),
            value: format!("{SYMBOLIC_PREFIX}{key}"),
        }
    }

    pub fn is_symbolic(&self) -> bool {
        self.value.starts_with(SYMBOLIC_PREFIX)
    }

    /// The value with any `ref: ` indirection marker stripped.
    pub fn target(&self) -> &str {
        strip_symbolic(&self.value)
    }
}

/// Strip the `ref: ` marker from a ref value.
pub fn strip_symbolic(value: &str) -> &str {
    value.strip_prefix(SYMBOLIC_PREFIX).unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod branch_name {
        use super::*;

        #[test]
        fn valid_branch_names() {
            assert!(BranchName::new("main").is_ok());
            assert!(BranchName::new("new_feature").is_ok());
            assert!(BranchName::new("feature/foo").is_ok());
        }

        #[test]
        fn invalid_names_share_one_message() {
            for name in ["", "-foo", "HEAD"] {
                let err = BranchName::new(name).unwrap_err();
                assert_eq!(err.to_string(), "invalid ref name");
            }
        }

        #[test]
        fn serde_roundtrip() {
            let name = BranchName::new("feature/test").unwrap();
            let json = serde_json::to_string(&name).unwrap();
            let parsed: BranchName = serde_json::from_str(&json).unwrap();
            assert_eq!(name, parsed);
        }

        #[test]
        fn serde_rejects_invalid() {
            assert!(serde_json::from_str::<BranchName>("\"a..b\"").is_err());
        }
    }

    mod tag_name {
        use super::*;

        #[test]
        fn whitespace_rejected_with_git_message() {
            let err = TagName::new("first release").unwrap_err();
            assert_eq!(
                err.to_string(),
                "fatal: 'first release' is not a valid tag name"
            );
        }

        #[test]
        fn semver_accepted() {
            assert_eq!(TagName::new("v1.0.0").unwrap().as_str(), "v1.0.0");
        }
    }

    mod commit_hash {
        use super::*;

        #[test]
        fn normalizes_to_lowercase() {
            let hash = CommitHash::new("ABCDEF").unwrap();
            assert_eq!(hash.as_str(), "abcdef");
        }

        #[test]
        fn rejects_empty_and_non_hex() {
            assert!(CommitHash::new("").is_err());
            assert!(CommitHash::new("xyz").is_err());
            assert!(CommitHash::new("ref: refs/heads/main").is_err());
        }

        #[test]
        fn short_form() {
            let hash = CommitHash::new("abc123def456").unwrap();
            assert_eq!(hash.short(4), "abc1");
            assert_eq!(hash.short(100), hash.as_str());
        }

        #[test]
        fn prefix_is_case_insensitive() {
            let hash = CommitHash::new("abc123").unwrap();
            assert!(hash.has_prefix("ABC"));
            assert!(hash.has_prefix(""));
            assert!(!hash.has_prefix("abd"));
            assert!(!hash.has_prefix("abc1234"));
        }
    }

    mod ref_name {
        use super::*;

        #[test]
        fn head_is_accepted() {
            assert_eq!(RefName::new("HEAD").unwrap().as_str(), HEAD);
        }

        #[test]
        fn one_level_keys_rejected() {
            assert!(RefName::new("main").is_err());
        }

        #[test]
        fn short_names() {
            assert_eq!(short_name("refs/heads/feature/foo"), "feature/foo");
            assert_eq!(short_name("refs/tags/v1"), "v1");
            assert_eq!(short_name("refs/remotes/origin/main"), "main");
            assert_eq!(short_name("HEAD"), "HEAD");
        }

        #[test]
        fn namespace_checks() {
            let branch = RefName::new("refs/heads/main").unwrap();
            assert!(is_branch_key(branch.as_str()));
            let tag = RefName::new("refs/tags/v1").unwrap();
            assert!(!is_branch_key(tag.as_str()));
        }
    }

    mod reference {
        use super::*;

        #[test]
        fn direct_reference() {
            let hash = CommitHash::new("abc123").unwrap();
            let r = Reference::direct("main", &hash);
            assert!(!r.is_symbolic());
            assert_eq!(r.target(), "abc123");
        }

        #[test]
        fn serde_shape() {
            let r = Reference::symbolic("HEAD", "refs/heads/main");
            let json = serde_json::to_value(&r).unwrap();
            assert_eq!(
                json,
                serde_json::json!({"name": "HEAD", "value": "ref: refs/heads/main"})
            );
        }
    }
}

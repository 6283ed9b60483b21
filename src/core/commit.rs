//! core::commit
//!
//! The commit record.
//!
//! A commit stores a full snapshot of the document (`tree`), not a delta.
//! `changes` is the structural diff that produced it and is kept for
//! display only; reconstruction always goes through `tree`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::CommitHash;
use crate::patch::Operation;

/// A content-addressed commit.
///
/// # Example
///
/// ```
/// use objrepo::core::commit::Commit;
/// use objrepo::core::types::CommitHash;
///
/// let commit = Commit {
///     hash: CommitHash::new("0123456789abcdef").unwrap(),
///     tree: String::new(),
///     message: "initial".into(),
///     author: "User name <name@domain.com>".into(),
///     parent: None,
///     changes: vec![],
///     timestamp: chrono::Utc::now(),
/// };
/// assert!(commit.is_root());
/// assert_eq!(commit.short_hash(8), "01234567");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: CommitHash,
    /// Serialized snapshot, codec specific
    pub tree: String,
    pub message: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<CommitHash>,
    #[serde(default)]
    pub changes: Vec<Operation>,
    pub timestamp: DateTime<Utc>,
}

impl Commit {
    /// Whether this commit has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Abbreviated hash for display.
    pub fn short_hash(&self, len: usize) -> &str {
        self.hash.short(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serde_shape() {
        let value = json!({
            "hash": "ABCDEF",
            "tree": "e30=",
            "message": "m",
            "author": "a",
            "changes": [{"op": "add", "path": "/x", "value": 1}],
            "timestamp": "2024-05-01T12:00:00.123Z"
        });
        let commit: Commit = serde_json::from_value(value).unwrap();
        assert_eq!(commit.hash.as_str(), "abcdef");
        assert!(commit.is_root());
        assert_eq!(commit.changes.len(), 1);

        let back = serde_json::to_value(&commit).unwrap();
        assert!(back.get("parent").is_none());
        assert_eq!(back["timestamp"], json!("2024-05-01T12:00:00.123Z"));
    }

    #[test]
    fn rejects_non_hex_hash() {
        let value = json!({
            "hash": "not-hex",
            "tree": "",
            "message": "m",
            "author": "a",
            "timestamp": "2024-05-01T12:00:00Z"
        });
        assert!(serde_json::from_value::<Commit>(value).is_err());
    }
}

//! codec::hash
//!
//! Canonical commit encoding and the default SHA-256 hasher.
//!
//! # Canonical Encoding
//!
//! The hashed content is `{message, author, changes, parentRef, timestamp}`.
//! Before hashing, every object is converted recursively into an array of
//! `[key, value]` pairs sorted by key, and the result is serialized as
//! compact JSON. Key order in the input therefore never affects the hash.
//! Timestamps are encoded as RFC 3339 with millisecond precision.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::{CodecError, CommitHasher};
use crate::core::types::CommitHash;
use crate::patch::Operation;

/// The fields a commit hash is computed over.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitHashContent<'a> {
    pub message: &'a str,
    pub author: &'a str,
    pub changes: &'a [Operation],
    pub parent_ref: Option<&'a CommitHash>,
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: DateTime<Utc>,
}

fn serialize_millis<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Convert objects into key-sorted `[key, value]` arrays, recursively.
fn sorted_by_key(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Array(
                entries
                    .into_iter()
                    .map(|(k, v)| Value::Array(vec![Value::String(k.clone()), sorted_by_key(v)]))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted_by_key).collect()),
        other => other.clone(),
    }
}

/// The canonical, key-order-independent JSON encoding of a value.
///
/// # Example
///
/// ```
/// use objrepo::codec::canonical_json;
/// use serde_json::json;
///
/// assert_eq!(canonical_json(&json!({"b": 1, "a": [{"d": 2, "c": 3}]})),
///            r#"[["a",[[["c",3],["d",2]]]],["b",1]]"#);
/// ```
pub fn canonical_json(value: &Value) -> String {
    sorted_by_key(value).to_string()
}

/// SHA-256 over the canonical encoding, hex encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Sha256Hasher {
    /// Synchronous digest, shared by the async trait impl.
    pub fn digest(&self, content: &CommitHashContent<'_>) -> Result<CommitHash, CodecError> {
        let value = serde_json::to_value(content).map_err(|e| CodecError::Hash(e.to_string()))?;
        let mut hasher = Sha256::new();
        hasher.update(canonical_json(&value).as_bytes());
        CommitHash::new(hex::encode(hasher.finalize())).map_err(|e| CodecError::Hash(e.to_string()))
    }
}

#[async_trait::async_trait]
impl CommitHasher for Sha256Hasher {
    async fn hash(&self, content: &CommitHashContent<'_>) -> Result<CommitHash, CodecError> {
        self.digest(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn changes() -> Vec<Operation> {
        vec![Operation::Add {
            path: "/name".into(),
            value: json!("x"),
        }]
    }

    #[test]
    fn canonical_encoding_is_key_order_independent() {
        let a: Value = serde_json::from_str(r#"{"x": 1, "y": {"b": 2, "a": 1}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"y": {"a": 1, "b": 2}, "x": 1}"#).unwrap();
        assert_eq!(canonical_json(&a), canonical_json(&b));
    }

    #[test]
    fn content_shape() {
        let changes = changes();
        let content = CommitHashContent {
            message: "m",
            author: "a",
            changes: &changes,
            parent_ref: None,
            timestamp: ts(),
        };
        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(value["parentRef"], Value::Null);
        assert_eq!(value["timestamp"], json!("2024-05-01T12:00:00.000Z"));
    }

    #[test]
    fn digest_is_deterministic_sha256_hex() {
        let changes = changes();
        let content = CommitHashContent {
            message: "m",
            author: "a",
            changes: &changes,
            parent_ref: None,
            timestamp: ts(),
        };
        let h1 = Sha256Hasher.digest(&content).unwrap();
        let h2 = Sha256Hasher.digest(&content).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1.as_str().len(), 64);
    }

    #[test]
    fn every_field_affects_the_digest() {
        let changes = changes();
        let parent = CommitHash::new("abcdef").unwrap();
        let base = CommitHashContent {
            message: "m",
            author: "a",
            changes: &changes,
            parent_ref: None,
            timestamp: ts(),
        };
        let h = Sha256Hasher.digest(&base).unwrap();

        let variants = [
            CommitHashContent {
                message: "other",
                ..base.clone()
            },
            CommitHashContent {
                author: "other",
                ..base.clone()
            },
            CommitHashContent {
                changes: &[],
                ..base.clone()
            },
            CommitHashContent {
                parent_ref: Some(&parent),
                ..base.clone()
            },
            CommitHashContent {
                timestamp: ts() + chrono::Duration::milliseconds(1),
                ..base.clone()
            },
        ];
        for variant in variants {
            assert_ne!(Sha256Hasher.digest(&variant).unwrap(), h);
        }
    }
}

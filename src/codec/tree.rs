//! codec::tree
//!
//! Tree codecs.
//!
//! The default [`DeflateCodec`] stores a tree as gzip-compressed JSON,
//! base64-encoded so it can travel inside a JSON `History`.
//! [`JsonCodec`] stores plain JSON and is handy for debugging.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::Value;

use super::{CodecError, TreeCodec};

/// Default compression level.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Gzip + base64 JSON tree codec.
///
/// # Example
///
/// ```
/// use objrepo::codec::DeflateCodec;
/// use serde_json::json;
///
/// let codec = DeflateCodec::default();
/// let doc = json!({"name": "x"});
/// let tree = codec.encode(&doc).unwrap();
/// assert_eq!(codec.decode(&tree).unwrap(), doc);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DeflateCodec {
    level: u32,
}

impl DeflateCodec {
    /// Create a codec with the given compression level (0-9).
    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(9),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Synchronous encode, shared by the async trait impl.
    pub fn encode(&self, document: &Value) -> Result<String, CodecError> {
        let json = serde_json::to_vec(document).map_err(|e| CodecError::Encode(e.to_string()))?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::new(self.level));
        encoder
            .write_all(&json)
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        let compressed = encoder
            .finish()
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        Ok(STANDARD.encode(compressed))
    }

    /// Synchronous decode, shared by the async trait impl.
    pub fn decode(&self, tree: &str) -> Result<Value, CodecError> {
        let compressed = STANDARD
            .decode(tree)
            .map_err(|e| CodecError::Decode(format!("invalid base64: {e}")))?;
        let mut json = Vec::new();
        GzDecoder::new(compressed.as_slice())
            .read_to_end(&mut json)
            .map_err(|e| CodecError::Decode(format!("invalid gzip stream: {e}")))?;
        serde_json::from_slice(&json).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

impl Default for DeflateCodec {
    fn default() -> Self {
        Self::new(DEFAULT_COMPRESSION_LEVEL)
    }
}

#[async_trait::async_trait]
impl TreeCodec for DeflateCodec {
    async fn serialize(&self, document: &Value) -> Result<String, CodecError> {
        self.encode(document)
    }

    async fn deserialize(&self, tree: &str) -> Result<Value, CodecError> {
        self.decode(tree)
    }
}

/// Plain JSON tree codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[async_trait::async_trait]
impl TreeCodec for JsonCodec {
    async fn serialize(&self, document: &Value) -> Result<String, CodecError> {
        serde_json::to_string(document).map_err(|e| CodecError::Encode(e.to_string()))
    }

    async fn deserialize(&self, tree: &str) -> Result<Value, CodecError> {
        serde_json::from_str(tree).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

//! codec::size
//!
//! Encoded-size helpers for documents and tree strings.
//!
//! Sizes are measured on the UTF-8 bytes of a document's compact JSON
//! encoding. Kilobytes and megabytes are decimal (1 kB = 1000 bytes).

use serde_json::Value;

/// Something whose encoded size can be measured.
pub trait Measure {
    fn byte_len(&self) -> usize;
}

impl Measure for Value {
    fn byte_len(&self) -> usize {
        // Display for Value is the compact JSON encoding
        self.to_string().len()
    }
}

impl Measure for str {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl Measure for String {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

/// Size in bytes.
///
/// # Example
///
/// ```
/// use objrepo::codec::size::{size_in_bytes, size_in_kilobytes};
/// use serde_json::json;
///
/// assert_eq!(size_in_bytes(&json!({"a": 1})), 7);
/// assert_eq!(size_in_kilobytes("x".repeat(1500).as_str()), 1.5);
/// ```
pub fn size_in_bytes<T: Measure + ?Sized>(item: &T) -> usize {
    item.byte_len()
}

pub fn size_in_kilobytes<T: Measure + ?Sized>(item: &T) -> f64 {
    size_in_bytes(item) as f64 / 1000.0
}

pub fn size_in_megabytes<T: Measure + ?Sized>(item: &T) -> f64 {
    size_in_kilobytes(item) / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_size_uses_compact_json() {
        let doc = json!({"name": "ü"});
        // {"name":"ü"} with a two-byte character
        assert_eq!(size_in_bytes(&doc), 13);
    }

    #[test]
    fn string_sizes() {
        let s = "x".repeat(2_500_000);
        assert_eq!(size_in_bytes(s.as_str()), 2_500_000);
        assert_eq!(size_in_kilobytes(&s), 2500.0);
        assert_eq!(size_in_megabytes(&s), 2.5);
    }
}

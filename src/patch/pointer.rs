//! patch::pointer
//!
//! JSON Pointer (RFC 6901) parsing and escaping.

/// Escape a single reference token (`~` → `~0`, `/` → `~1`).
pub fn escape(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Unescape a single reference token.
pub fn unescape(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Split a pointer into unescaped reference tokens.
///
/// The empty pointer addresses the whole document and yields no tokens.
/// Returns `None` when the pointer is non-empty and does not start with `/`.
///
/// # Example
///
/// ```
/// use objrepo::patch::pointer::parse;
///
/// assert_eq!(parse(""), Some(vec![]));
/// assert_eq!(parse("/a/0"), Some(vec!["a".to_string(), "0".to_string()]));
/// assert_eq!(parse("/a~1b/c~0d"), Some(vec!["a/b".to_string(), "c~d".to_string()]));
/// assert_eq!(parse("a"), None);
/// ```
pub fn parse(pointer: &str) -> Option<Vec<String>> {
    if pointer.is_empty() {
        return Some(Vec::new());
    }
    let rest = pointer.strip_prefix('/')?;
    Some(rest.split('/').map(unescape).collect())
}

/// Join tokens into a pointer.
pub fn compile<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|t| format!("/{}", escape(t.as_ref())))
        .collect()
}

/// Append one token to an existing pointer.
pub fn child(pointer: &str, token: &str) -> String {
    format!("{pointer}/{}", escape(token))
}

/// Parse an array index token.
///
/// Only canonical decimal indices are accepted (`0`, `12`; not `01`, `+1`).
pub fn array_index(token: &str) -> Option<usize> {
    if token.is_empty() || (token.len() > 1 && token.starts_with('0')) {
        return None;
    }
    if !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

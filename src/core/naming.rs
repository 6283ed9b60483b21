//! core::naming
//!
//! Reference naming rules and validation.
//!
//! # Rules
//!
//! Names follow Git's `check-ref-format` rules:
//! - Cannot be empty, cannot be exactly `@`
//! - No component may start with `.`, no `..`, `//`, `@{`
//! - Cannot start or end with `/`, cannot end with `.`
//! - No component may end with `.lock`
//! - No ASCII control characters, spaces, or any of `~ ^ : ? * [ \`
//!
//! Branch names additionally cannot start with `-` and cannot be `HEAD`.

/// Characters that may never appear in a ref name.
const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];

/// Check a ref name against Git's refname rules.
///
/// When `onelevel` is false the name must contain at least one `/`
/// (e.g. `refs/heads/main`); one-level names such as `main` are only
/// accepted with `onelevel` set.
///
/// # Example
///
/// ```
/// use objrepo::core::naming::is_valid_ref_name;
///
/// assert!(is_valid_ref_name("main", true));
/// assert!(!is_valid_ref_name("main", false));
/// assert!(is_valid_ref_name("refs/heads/main", false));
/// assert!(!is_valid_ref_name("bad..name", true));
/// ```
pub fn is_valid_ref_name(name: &str, onelevel: bool) -> bool {
    if name.is_empty() || name == "@" {
        return false;
    }
    if name.starts_with('/') || name.ends_with('/') || name.ends_with('.') {
        return false;
    }
    if name.contains("..") || name.contains("//") || name.contains("@{") {
        return false;
    }
    if name
        .chars()
        .any(|c| c.is_ascii_control() || INVALID_CHARS.contains(&c))
    {
        return false;
    }
    for component in name.split('/') {
        if component.starts_with('.') || component.ends_with(".lock") {
            return false;
        }
    }
    onelevel || name.contains('/')
}

/// Check a branch short-name (the part after `refs/heads/`).
///
/// # Example
///
/// ```
/// use objrepo::core::naming::is_valid_branch_name;
///
/// assert!(is_valid_branch_name("new_feature"));
/// assert!(is_valid_branch_name("feature/login"));
/// assert!(!is_valid_branch_name("-foo"));
/// assert!(!is_valid_branch_name("HEAD"));
/// ```
pub fn is_valid_branch_name(name: &str) -> bool {
    is_valid_ref_name(name, true) && !name.starts_with('-') && name != "HEAD"
}

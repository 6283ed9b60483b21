//! core::author
//!
//! Author string parsing.
//!
//! Commits store the author verbatim. Renderers that need a name and an
//! address split it with [`Author::parse`], which understands:
//! - `Name <email@domain>`
//! - `Name @handle`
//! - `email@domain`
//! - anything else as a bare name

use thiserror::Error;

/// Errors from author parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthorError {
    #[error("author not provided")]
    Empty,
}

/// An author split into its display name and contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    /// E-mail address or `@handle`; empty when the author string has none.
    pub email: String,
}

impl Author {
    /// Parse an author string.
    ///
    /// # Example
    ///
    /// ```
    /// use objrepo::core::author::Author;
    ///
    /// let a = Author::parse("User name <name@domain.com>").unwrap();
    /// assert_eq!(a.name, "User name");
    /// assert_eq!(a.email, "name@domain.com");
    ///
    /// let a = Author::parse("author @handle").unwrap();
    /// assert_eq!(a.email, "@handle");
    /// ```
    pub fn parse(author: &str) -> Result<Self, AuthorError> {
        if author.is_empty() {
            return Err(AuthorError::Empty);
        }
        if let Some((name, rest)) = author.split_once(" <") {
            return Ok(Self {
                name: name.to_string(),
                email: rest.replacen('>', "", 1),
            });
        }
        if let Some((name, handle)) = author.split_once(" @") {
            return Ok(Self {
                name: name.to_string(),
                email: format!("@{handle}"),
            });
        }
        if looks_like_email(author) {
            return Ok(Self {
                name: String::new(),
                email: author.to_string(),
            });
        }
        Ok(Self {
            name: author.to_string(),
            email: String::new(),
        })
    }
}

/// A loose `local@domain.tld` check.
fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || s.chars().any(char::is_whitespace) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() > 1
        && labels.iter().all(|l| {
            !l.is_empty()
                && !l.starts_with('-')
                && !l.ends_with('-')
                && l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(s: &str) -> (String, String) {
        let a = Author::parse(s).unwrap();
        (a.name, a.email)
    }

    #[test]
    fn name_and_email() {
        assert_eq!(
            parts("author <email@domain.info>"),
            ("author".into(), "email@domain.info".into())
        );
        assert_eq!(
            parts("author with space <email@domain.info>"),
            ("author with space".into(), "email@domain.info".into())
        );
    }

    #[test]
    fn name_and_handle() {
        assert_eq!(parts("author @handle"), ("author".into(), "@handle".into()));
        assert_eq!(
            parts("author with space @handle"),
            ("author with space".into(), "@handle".into())
        );
    }

    #[test]
    fn bare_email() {
        assert_eq!(
            parts("email@domain.info"),
            (String::new(), "email@domain.info".into())
        );
    }

    #[test]
    fn bare_handle_is_a_name() {
        assert_eq!(parts("@handle"), ("@handle".into(), String::new()));
    }

    #[test]
    fn empty_author() {
        assert_eq!(Author::parse(""), Err(AuthorError::Empty));
        assert_eq!(AuthorError::Empty.to_string(), "author not provided");
    }
}

//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! A repository is configured by a single [`RepositoryConfig`]. Embedding
//! applications usually build one in code or load it from TOML; every
//! field has a default, so an empty file is a valid configuration.
//!
//! # Sources
//!
//! - [`RepositoryConfig::from_toml_str`] parses an in-memory document
//! - [`RepositoryConfig::load`] reads a file
//! - [`RepositoryConfig::from_env`] reads the file named by `$OBJREPO_CONFIG`,
//!   falling back to defaults when unset
//!
//! All three validate after parsing.
//!
//! # Example
//!
//! ```
//! use objrepo::core::config::RepositoryConfig;
//!
//! let config = RepositoryConfig::from_toml_str(r#"
//!     default_branch = "trunk"
//!
//!     [log]
//!     abbrev_len = 12
//! "#).unwrap();
//!
//! assert_eq!(config.default_branch, "trunk");
//! assert_eq!(config.log.abbrev_len, 12);
//! assert_eq!(config.tree.compression_level, 6);
//! ```

pub mod schema;

pub use schema::{LogConfig, RepositoryConfig, ResetConfig, TreeConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "OBJREPO_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

impl RepositoryConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for malformed TOML or unknown
    /// fields, `ConfigError::InvalidValue` for out-of-range values.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Self::parse(contents, Path::new("<inline>"))
    }

    /// Read, parse and validate a config file.
    ///
    /// # Errors
    ///
    /// Unlike [`from_env`](Self::from_env), a missing file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&contents, path)
    }

    /// Load the file named by `$OBJREPO_CONFIG`.
    ///
    /// Returns the defaults if the variable is unset or names a file that
    /// does not exist.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading repository config");
                return Self::load(&path);
            }
            tracing::warn!(path = %path.display(), "{CONFIG_ENV} names a missing file, using defaults");
        }
        Ok(Self::default())
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

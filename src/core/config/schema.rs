//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing to ensure they conform to
//! expected formats (e.g., `default_branch` must be a valid branch name).

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::codec::tree::DEFAULT_COMPRESSION_LEVEL;
use crate::core::types::BranchName;

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// default_branch = "main"
///
/// [tree]
/// compression_level = 6
///
/// [reset]
/// soft_keeps_data = false
///
/// [log]
/// abbrev_len = 8
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Branch HEAD attaches to in an unborn repository
    pub default_branch: String,

    /// Tree codec settings
    pub tree: TreeConfig,

    /// Reset behavior
    pub reset: ResetConfig,

    /// Log formatting
    pub log: LogConfig,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            default_branch: "main".to_string(),
            tree: TreeConfig::default(),
            reset: ResetConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl RepositoryConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        BranchName::new(&self.default_branch).map_err(|e| {
            ConfigError::InvalidValue(format!(
                "invalid default branch name '{}': {}",
                self.default_branch, e
            ))
        })?;
        self.tree.validate()?;
        self.log.validate()?;
        Ok(())
    }
}

/// Tree codec settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TreeConfig {
    /// Deflate level for the default codec (0-9)
    pub compression_level: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl TreeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compression_level > 9 {
            return Err(ConfigError::InvalidValue(format!(
                "compression_level must be between 0 and 9, got {}",
                self.compression_level
            )));
        }
        Ok(())
    }
}

/// Reset behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ResetConfig {
    /// When set, a soft reset keeps the document and leaves its differences
    /// to the target pending. By default both modes move the document.
    pub soft_keeps_data: bool,
}

/// Log formatting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Abbreviated hash length
    pub abbrev_len: usize,
}

impl LogConfig {
    /// Allowed range for `abbrev_len`.
    pub const ABBREV_RANGE: std::ops::RangeInclusive<usize> = 4..=64;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !Self::ABBREV_RANGE.contains(&self.abbrev_len) {
            return Err(ConfigError::InvalidValue(format!(
                "abbrev_len must be between {} and {}, got {}",
                Self::ABBREV_RANGE.start(),
                Self::ABBREV_RANGE.end(),
                self.abbrev_len
            )));
        }
        Ok(())
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { abbrev_len: 8 }
    }
}

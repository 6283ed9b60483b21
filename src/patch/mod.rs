//! patch
//!
//! Structural diff and patch over JSON documents (RFC 6902 JSON Patch,
//! RFC 6901 JSON Pointer).
//!
//! # Modules
//!
//! - [`pointer`] - JSON Pointer parsing and escaping
//! - [`diff`] - Compute the patch turning one document into another
//! - [`apply`] - Validate and apply a patch in place
//! - [`revert`] - Compute the inverse of a patch
//!
//! # Example
//!
//! ```
//! use objrepo::patch::{self, Operation};
//! use serde_json::json;
//!
//! let from = json!({"name": "a", "tags": ["x"]});
//! let to = json!({"name": "b", "tags": ["x", "y"]});
//!
//! let ops = patch::diff(&from, &to);
//! assert_eq!(ops.len(), 2);
//!
//! let mut doc = from.clone();
//! patch::apply(&mut doc, &ops).unwrap();
//! assert_eq!(doc, to);
//! ```

pub mod apply;
pub mod diff;
pub mod pointer;
pub mod revert;

pub use apply::{apply, validate};
pub use diff::diff;
pub use revert::revert;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The kind of a patch operation, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OpKind::Add => "add",
            OpKind::Remove => "remove",
            OpKind::Replace => "replace",
            OpKind::Move => "move",
            OpKind::Copy => "copy",
            OpKind::Test => "test",
        };
        f.write_str(s)
    }
}

/// A single JSON Patch operation.
///
/// Serializes in the RFC 6902 wire shape, e.g.
/// `{"op": "replace", "path": "/name", "value": "x"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

impl Operation {
    /// The target pointer of the operation.
    pub fn path(&self) -> &str {
        match self {
            Operation::Add { path, .. }
            | Operation::Remove { path }
            | Operation::Replace { path, .. }
            | Operation::Move { path, .. }
            | Operation::Copy { path, .. }
            | Operation::Test { path, .. } => path,
        }
    }

    pub fn kind(&self) -> OpKind {
        match self {
            Operation::Add { .. } => OpKind::Add,
            Operation::Remove { .. } => OpKind::Remove,
            Operation::Replace { .. } => OpKind::Replace,
            Operation::Move { .. } => OpKind::Move,
            Operation::Copy { .. } => OpKind::Copy,
            Operation::Test { .. } => OpKind::Test,
        }
    }
}

/// Errors from patch validation and application.
///
/// `op_index` is the position of the failing operation in the patch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("operation {op_index} ({op}): path '{path}' cannot be resolved")]
    PathUnresolvable {
        op_index: usize,
        op: OpKind,
        path: String,
    },

    #[error("operation {op_index} ({op}): from path '{from}' cannot be resolved")]
    FromUnresolvable {
        op_index: usize,
        op: OpKind,
        from: String,
    },

    #[error("operation {op_index} (add): cannot add at '{path}', parent does not exist")]
    CannotAdd { op_index: usize, path: String },

    #[error("operation {op_index} ({op}): array index out of bounds at '{path}'")]
    IndexOutOfBounds {
        op_index: usize,
        op: OpKind,
        path: String,
    },

    #[error("operation {op_index} (test): value at '{path}' does not match")]
    TestFailed { op_index: usize, path: String },

    #[error("operation {op_index} (move): cannot move '{from}' into its own child '{path}'")]
    MoveIntoDescendant {
        op_index: usize,
        from: String,
        path: String,
    },

    #[error("operation {op_index}: invalid JSON pointer '{pointer}'")]
    InvalidPointer { op_index: usize, pointer: String },
}

impl PatchError {
    /// Position of the failing operation.
    pub fn op_index(&self) -> usize {
        match self {
            PatchError::PathUnresolvable { op_index, .. }
            | PatchError::FromUnresolvable { op_index, .. }
            | PatchError::CannotAdd { op_index, .. }
            | PatchError::IndexOutOfBounds { op_index, .. }
            | PatchError::TestFailed { op_index, .. }
            | PatchError::MoveIntoDescendant { op_index, .. }
            | PatchError::InvalidPointer { op_index, .. } => *op_index,
        }
    }
}

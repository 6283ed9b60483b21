//! patch::revert
//!
//! Inverse patches.
//!
//! Each operation is inverted against the state the document is in just
//! before that operation runs, so patches whose operations depend on each
//! other invert correctly. Inverses are emitted last-operation-first.

use serde_json::Value;

use super::apply::{apply, resolve};
use super::pointer;
use super::{Operation, PatchError};

/// Compute the patch that undoes `ops` when applied to `document`.
///
/// Applying `ops` to `document` and then the returned patch yields
/// `document` again.
///
/// # Errors
///
/// Fails with the underlying [`PatchError`] if `ops` does not apply to
/// `document`.
///
/// # Example
///
/// ```
/// use objrepo::patch::{self, Operation};
/// use serde_json::json;
///
/// let doc = json!({"name": "before"});
/// let ops = vec![Operation::Replace { path: "/name".into(), value: json!("after") }];
/// let undo = patch::revert(&doc, &ops).unwrap();
///
/// let mut changed = doc.clone();
/// patch::apply(&mut changed, &ops).unwrap();
/// patch::apply(&mut changed, &undo).unwrap();
/// assert_eq!(changed, doc);
/// ```
pub fn revert(document: &Value, ops: &[Operation]) -> Result<Vec<Operation>, PatchError> {
    let mut working = document.clone();
    let mut inverse: Vec<Operation> = Vec::new();

    for (op_index, op) in ops.iter().enumerate() {
        let mut after = working.clone();
        apply(&mut after, std::slice::from_ref(op)).map_err(|e| reindex(e, op_index))?;
        let mut undo = invert_one(&working, &after, op, op_index)?;
        undo.append(&mut inverse);
        inverse = undo;
        working = after;
    }

    Ok(inverse)
}

fn reindex(err: PatchError, index: usize) -> PatchError {
    match err {
        PatchError::PathUnresolvable { op, path, .. } => PatchError::PathUnresolvable {
            op_index: index,
            op,
            path,
        },
        PatchError::FromUnresolvable { op, from, .. } => PatchError::FromUnresolvable {
            op_index: index,
            op,
            from,
        },
        PatchError::CannotAdd { path, .. } => PatchError::CannotAdd {
            op_index: index,
            path,
        },
        PatchError::IndexOutOfBounds { op, path, .. } => PatchError::IndexOutOfBounds {
            op_index: index,
            op,
            path,
        },
        PatchError::TestFailed { path, .. } => PatchError::TestFailed {
            op_index: index,
            path,
        },
        PatchError::MoveIntoDescendant { from, path, .. } => PatchError::MoveIntoDescendant {
            op_index: index,
            from,
            path,
        },
        PatchError::InvalidPointer { pointer, .. } => PatchError::InvalidPointer {
            op_index: index,
            pointer,
        },
    }
}

fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    resolve(doc, &pointer::parse(path)?)
}

/// The parent container of `path` and the last token, if both exist.
fn parent_of<'a>(doc: &'a Value, path: &str) -> Option<(&'a Value, String)> {
    let mut tokens = pointer::parse(path)?;
    let last = tokens.pop()?;
    Some((resolve(doc, &tokens)?, last))
}

fn is_array_item(doc: &Value, path: &str) -> bool {
    matches!(parent_of(doc, path), Some((Value::Array(_), _)))
}

/// Resolve a trailing `-` (array append) to the index the value landed at.
fn concrete_path(after: &Value, path: &str) -> String {
    match parent_of(after, path) {
        Some((Value::Array(items), last)) if last == "-" && !items.is_empty() => {
            pointer::child(parent_path(path), &(items.len() - 1).to_string())
        }
        _ => path.to_string(),
    }
}

/// Undo for writing a value at `path` (`add` or `copy`).
fn invert_write(doc: &Value, after: &Value, path: &str) -> Vec<Operation> {
    let landed = concrete_path(after, path);
    match lookup(doc, &landed) {
        _ if is_array_item(after, &landed) => vec![Operation::Remove { path: landed }],
        Some(old) => vec![Operation::Replace {
            path: landed,
            value: old.clone(),
        }],
        None => vec![Operation::Remove { path: landed }],
    }
}

fn parent_path(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

fn invert_one(
    doc: &Value,
    after: &Value,
    op: &Operation,
    op_index: usize,
) -> Result<Vec<Operation>, PatchError> {
    let missing = |path: &str| PatchError::PathUnresolvable {
        op_index,
        op: op.kind(),
        path: path.to_string(),
    };
    let undo = match op {
        Operation::Add { path, .. } | Operation::Copy { path, .. } => invert_write(doc, after, path),
        Operation::Remove { path } => vec![Operation::Add {
            path: path.clone(),
            value: lookup(doc, path).cloned().ok_or_else(|| missing(path))?,
        }],
        Operation::Replace { path, .. } => vec![Operation::Replace {
            path: path.clone(),
            value: lookup(doc, path).cloned().ok_or_else(|| missing(path))?,
        }],
        Operation::Move { from, path } => {
            if from.starts_with(&format!("{path}/")) {
                // the child replaced its own ancestor
                vec![Operation::Replace {
                    path: path.clone(),
                    value: lookup(doc, path).cloned().ok_or_else(|| missing(path))?,
                }]
            } else {
                let mut undo = vec![Operation::Move {
                    from: concrete_path(after, path),
                    path: from.clone(),
                }];
                if !is_array_item(doc, path) {
                    if let Some(old) = lookup(doc, path) {
                        undo.push(Operation::Add {
                            path: path.clone(),
                            value: old.clone(),
                        });
                    }
                }
                undo
            }
        }
        Operation::Test { .. } => Vec::new(),
    };
    Ok(undo)
}

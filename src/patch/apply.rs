//! patch::apply
//!
//! Validation and in-place application of patches.
//!
//! # Semantics
//!
//! - `add` inserts into objects (overwriting) and arrays (shifting, `-` appends);
//!   the parent must exist
//! - `remove`, `replace` and `test` require the target to exist
//! - `move` and `copy` require `from` to exist; a value cannot be moved into
//!   its own child
//!
//! [`apply`] mutates in order and stops at the first failing operation, so
//! callers that need all-or-nothing behavior run [`validate`] first.

use serde_json::Value;

use super::pointer;
use super::{OpKind, Operation, PatchError};

/// Apply `ops` to `doc` in place.
///
/// # Errors
///
/// Returns the first failing operation's error. Operations before it have
/// already been applied.
pub fn apply(doc: &mut Value, ops: &[Operation]) -> Result<(), PatchError> {
    for (op_index, op) in ops.iter().enumerate() {
        apply_one(doc, op, op_index)?;
    }
    Ok(())
}

/// Check that `ops` would apply cleanly to `doc` without touching it.
pub fn validate(doc: &Value, ops: &[Operation]) -> Result<(), PatchError> {
    let mut scratch = doc.clone();
    apply(&mut scratch, ops)
}

fn apply_one(doc: &mut Value, op: &Operation, op_index: usize) -> Result<(), PatchError> {
    match op {
        Operation::Add { path, value } => add(doc, path, value.clone(), op_index),
        Operation::Remove { path } => remove(doc, path, OpKind::Remove, op_index).map(|_| ()),
        Operation::Replace { path, value } => {
            let tokens = tokens(path, op_index)?;
            let target = resolve_mut(doc, &tokens).ok_or_else(|| PatchError::PathUnresolvable {
                op_index,
                op: OpKind::Replace,
                path: path.clone(),
            })?;
            *target = value.clone();
            Ok(())
        }
        Operation::Move { from, path } => {
            if path.starts_with(&format!("{from}/")) {
                return Err(PatchError::MoveIntoDescendant {
                    op_index,
                    from: from.clone(),
                    path: path.clone(),
                });
            }
            let value = remove(doc, from, OpKind::Move, op_index).map_err(|err| match err {
                PatchError::PathUnresolvable { .. } => PatchError::FromUnresolvable {
                    op_index,
                    op: OpKind::Move,
                    from: from.clone(),
                },
                other => other,
            })?;
            add(doc, path, value, op_index)
        }
        Operation::Copy { from, path } => {
            let from_tokens = tokens(from, op_index)?;
            let value = resolve(doc, &from_tokens)
                .cloned()
                .ok_or_else(|| PatchError::FromUnresolvable {
                    op_index,
                    op: OpKind::Copy,
                    from: from.clone(),
                })?;
            add(doc, path, value, op_index)
        }
        Operation::Test { path, value } => {
            let tokens = tokens(path, op_index)?;
            let current = resolve(doc, &tokens).ok_or_else(|| PatchError::PathUnresolvable {
                op_index,
                op: OpKind::Test,
                path: path.clone(),
            })?;
            if current != value {
                return Err(PatchError::TestFailed {
                    op_index,
                    path: path.clone(),
                });
            }
            Ok(())
        }
    }
}

fn tokens(pointer: &str, op_index: usize) -> Result<Vec<String>, PatchError> {
    pointer::parse(pointer).ok_or_else(|| PatchError::InvalidPointer {
        op_index,
        pointer: pointer.to_string(),
    })
}

pub(crate) fn resolve<'a>(mut current: &'a Value, tokens: &[String]) -> Option<&'a Value> {
    for token in tokens {
        current = match current {
            Value::Object(map) => map.get(token)?,
            Value::Array(items) => items.get(pointer::array_index(token)?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn resolve_mut<'a>(mut current: &'a mut Value, tokens: &[String]) -> Option<&'a mut Value> {
    for token in tokens {
        current = match current {
            Value::Object(map) => map.get_mut(token)?,
            Value::Array(items) => items.get_mut(pointer::array_index(token)?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn add(doc: &mut Value, path: &str, value: Value, op_index: usize) -> Result<(), PatchError> {
    let mut tokens = tokens(path, op_index)?;
    let Some(last) = tokens.pop() else {
        *doc = value;
        return Ok(());
    };
    let cannot_add = || PatchError::CannotAdd {
        op_index,
        path: path.to_string(),
    };
    match resolve_mut(doc, &tokens).ok_or_else(cannot_add)? {
        Value::Object(map) => {
            map.insert(last, value);
            Ok(())
        }
        Value::Array(items) => {
            if last == "-" {
                items.push(value);
                return Ok(());
            }
            match pointer::array_index(&last) {
                Some(index) if index <= items.len() => {
                    items.insert(index, value);
                    Ok(())
                }
                _ => Err(PatchError::IndexOutOfBounds {
                    op_index,
                    op: OpKind::Add,
                    path: path.to_string(),
                }),
            }
        }
        _ => Err(cannot_add()),
    }
}

fn remove(doc: &mut Value, path: &str, op: OpKind, op_index: usize) -> Result<Value, PatchError> {
    let mut tokens = tokens(path, op_index)?;
    let Some(last) = tokens.pop() else {
        return Ok(std::mem::take(doc));
    };
    let unresolvable = || PatchError::PathUnresolvable {
        op_index,
        op,
        path: path.to_string(),
    };
    match resolve_mut(doc, &tokens).ok_or_else(unresolvable)? {
        Value::Object(map) => map.remove(&last).ok_or_else(unresolvable),
        Value::Array(items) => match pointer::array_index(&last) {
            Some(index) if index < items.len() => Ok(items.remove(index)),
            _ => Err(unresolvable()),
        },
        _ => Err(unresolvable()),
    }
}

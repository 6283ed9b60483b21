//! patch::diff
//!
//! Structural comparison of two documents.
//!
//! # Algorithm
//!
//! Containers of the same kind (object/object, array/array) are compared
//! key by key; array indices are treated as keys. Keys are visited from
//! last to first so that removals from arrays stay valid when the patch is
//! applied in order. Keys present only in the target are added afterwards
//! in ascending order. A value whose kind changes is replaced wholesale.

use serde_json::Value;

use super::pointer;
use super::Operation;

/// Compute the patch turning `from` into `to`.
///
/// Applying the result to `from` yields a document equal to `to`.
///
/// # Example
///
/// ```
/// use objrepo::patch::{diff, Operation};
/// use serde_json::json;
///
/// let ops = diff(&json!({"a": 1, "b": 2}), &json!({"a": 1}));
/// assert_eq!(ops, vec![Operation::Remove { path: "/b".into() }]);
/// ```
pub fn diff(from: &Value, to: &Value) -> Vec<Operation> {
    let mut ops = Vec::new();
    if same_container_kind(from, to) {
        generate(from, to, "", &mut ops);
    } else if from != to {
        ops.push(Operation::Replace {
            path: String::new(),
            value: to.clone(),
        });
    }
    ops
}

fn same_container_kind(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::Object(_), Value::Object(_)) | (Value::Array(_), Value::Array(_))
    )
}

fn keys(value: &Value) -> Vec<String> {
    match value {
        Value::Object(map) => map.keys().cloned().collect(),
        Value::Array(items) => (0..items.len()).map(|i| i.to_string()).collect(),
        _ => Vec::new(),
    }
}

fn child<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn generate(old: &Value, new: &Value, path: &str, ops: &mut Vec<Operation>) {
    let old_keys = keys(old);
    let new_keys = keys(new);
    let mut deleted = false;

    for key in old_keys.iter().rev() {
        let child_path = pointer::child(path, key);
        let Some(old_val) = child(old, key) else {
            continue;
        };
        match child(new, key) {
            Some(new_val) if same_container_kind(old_val, new_val) => {
                generate(old_val, new_val, &child_path, ops);
            }
            Some(new_val) => {
                if old_val != new_val {
                    ops.push(Operation::Replace {
                        path: child_path,
                        value: new_val.clone(),
                    });
                }
            }
            None => {
                ops.push(Operation::Remove { path: child_path });
                deleted = true;
            }
        }
    }

    if !deleted && new_keys.len() == old_keys.len() {
        return;
    }

    for key in &new_keys {
        if child(old, key).is_none() {
            if let Some(value) = child(new, key) {
                ops.push(Operation::Add {
                    path: pointer::child(path, key),
                    value: value.clone(),
                });
            }
        }
    }
}

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use objrepo::{Commit, Repository};
use serde_json::{json, Value};

pub const TEST_AUTHOR: &str = "User name <name@domain.com>";

/// Install a test subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// An empty process template.
pub fn complex_object() -> Value {
    json!({"nested": []})
}

/// An unborn repository tracking [`complex_object`].
pub fn baseline() -> Repository {
    init_tracing();
    Repository::new(complex_object())
}

/// Fill in the header fields. Returns the number of change entries.
pub fn update_header_data(doc: &mut Value) -> usize {
    doc["uuid"] = json!(uuid::Uuid::new_v4().to_string());
    doc["name"] = json!("my first process template");
    doc["description"] = json!("now we have a description");
    3
}

/// Add the first nested step and rename it. The list must be empty, so
/// the whole step lands as a single change entry.
pub fn add_one_step(doc: &mut Value) -> usize {
    let nested = doc["nested"]
        .as_array_mut()
        .expect("nested must be an array");
    assert!(nested.is_empty(), "add_one_step expects an empty step list");
    nested.push(json!({
        "uuid": uuid::Uuid::new_v4().to_string(),
        "name": "first name",
    }));
    nested[0]["name"] = json!("new name");
    1
}

pub fn sum_changes(commits: &[Commit]) -> usize {
    commits.iter().map(|c| c.changes.len()).sum()
}

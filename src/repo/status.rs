//! repo::status
//!
//! Pending changes, historical diffs and direct patch application.

use serde_json::Value;
use tracing::{debug, warn};

use super::error::RepositoryError;
use super::Repository;
use crate::patch::{self, OpKind, Operation, PatchError};

impl Repository {
    /// Changes between the HEAD commit and the live document.
    ///
    /// While unborn, changes since construction. Reading status never
    /// clears pending changes.
    pub async fn status(&self) -> Result<Vec<Operation>, RepositoryError> {
        let Some(head) = self.commit_at_head() else {
            return Ok(patch::diff(&self.original, &self.data));
        };
        let tree = self.codec.deserialize(&head.tree).await?;
        Ok(patch::diff(&tree, &self.data))
    }

    /// The patch turning revision `from` into revision `to`, or into the
    /// live document when `to` is `None`.
    pub async fn diff(
        &self,
        from: &str,
        to: Option<&str>,
    ) -> Result<Vec<Operation>, RepositoryError> {
        let from = self.shaish_to_commit(from)?.commit;
        let source = self.codec.deserialize(&from.tree).await?;
        let target = match to {
            Some(to) => {
                let to = self.shaish_to_commit(to)?.commit;
                self.codec.deserialize(&to.tree).await?
            }
            None => return Ok(patch::diff(&source, &self.data)),
        };
        Ok(patch::diff(&source, &target))
    }

    /// Apply a patch to the live document.
    ///
    /// The patch is validated first. Two unresolvable-path failures are
    /// tolerated: a `replace` of a missing value is retried as `add`, and a
    /// `remove` of a missing value is dropped since the document already
    /// lacks it. Any other failure is returned and the document is left
    /// untouched. Applied changes become pending.
    pub fn apply(&mut self, ops: &[Operation]) -> Result<(), PatchError> {
        let ops = tolerate(&self.data, ops.to_vec())?;
        patch::apply(&mut self.data, &ops)?;
        debug!(operations = ops.len(), "applied patch");
        Ok(())
    }
}

/// Rewrite `ops` until it validates against `doc`.
fn tolerate(doc: &Value, mut ops: Vec<Operation>) -> Result<Vec<Operation>, PatchError> {
    // every retry either turns a replace into an add or drops an op
    loop {
        let err = match patch::validate(doc, &ops) {
            Ok(()) => return Ok(ops),
            Err(err) => err,
        };
        let (op_index, kind) = match &err {
            PatchError::PathUnresolvable { op_index, op, .. } => (*op_index, *op),
            _ => return Err(err),
        };
        match (kind, ops.get(op_index).cloned()) {
            (OpKind::Replace, Some(Operation::Replace { path, value })) => {
                warn!(%path, op_index, "replace target missing, retrying as add");
                ops[op_index] = Operation::Add { path, value };
            }
            (OpKind::Remove, Some(Operation::Remove { path })) => {
                warn!(%path, op_index, "remove target already absent, skipping");
                ops.remove(op_index);
            }
            _ => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const AUTHOR: &str = "User name <name@domain.com>";

    mod status {
        use super::*;

        #[tokio::test]
        async fn unborn_status_diffs_against_original() {
            let mut repo = Repository::new(json!({"nested": []}));
            repo.data_mut()["name"] = json!("x");
            let status = repo.status().await.unwrap();
            assert_eq!(
                status,
                vec![Operation::Add {
                    path: "/name".into(),
                    value: json!("x")
                }]
            );
        }

        #[tokio::test]
        async fn status_is_idempotent() {
            let mut repo = Repository::new(json!({}));
            repo.data_mut()["a"] = json!(1);
            repo.commit("first", AUTHOR, false).await.unwrap();
            repo.data_mut()["a"] = json!(2);

            let first = repo.status().await.unwrap();
            let second = repo.status().await.unwrap();
            assert_eq!(first.len(), 1);
            assert_eq!(first, second);
        }
    }

    mod diff {
        use super::*;

        #[tokio::test]
        async fn between_commits_and_against_live() {
            let mut repo = Repository::new(json!({}));
            repo.data_mut()["a"] = json!(1);
            let first = repo.commit("first", AUTHOR, false).await.unwrap();
            repo.data_mut()["b"] = json!(2);
            let second = repo.commit("second", AUTHOR, false).await.unwrap();
            repo.data_mut()["c"] = json!(3);

            let between = repo.diff(first.as_str(), Some(second.as_str())).await.unwrap();
            assert_eq!(between.len(), 1);
            assert_eq!(between[0].path(), "/b");

            let live = repo.diff(first.as_str(), None).await.unwrap();
            assert_eq!(live.len(), 2);
        }

        #[tokio::test]
        async fn unknown_revision() {
            let repo = Repository::new(json!({}));
            assert!(matches!(
                repo.diff("nope", None).await,
                Err(RepositoryError::Resolution(_))
            ));
        }
    }

    mod apply {
        use super::*;

        #[test]
        fn replace_of_missing_value_becomes_add() {
            let mut repo = Repository::new(json!({"entity": {}}));
            repo.apply(&[Operation::Replace {
                path: "/entity/x".into(),
                value: json!("something"),
            }])
            .unwrap();
            assert_eq!(repo.data(), &json!({"entity": {"x": "something"}}));
        }

        #[test]
        fn remove_of_missing_value_is_skipped() {
            let mut repo = Repository::new(json!({"entity": {}}));
            repo.apply(&[
                Operation::Remove {
                    path: "/entity/reason".into(),
                },
                Operation::Add {
                    path: "/entity/ok".into(),
                    value: json!(true),
                },
            ])
            .unwrap();
            assert_eq!(repo.data(), &json!({"entity": {"ok": true}}));
        }

        #[test]
        fn other_failures_leave_document_untouched() {
            let mut repo = Repository::new(json!({"a": 1}));
            let err = repo
                .apply(&[
                    Operation::Add {
                        path: "/b".into(),
                        value: json!(2),
                    },
                    Operation::Test {
                        path: "/a".into(),
                        value: json!(5),
                    },
                ])
                .unwrap_err();
            assert!(matches!(err, PatchError::TestFailed { op_index: 1, .. }));
            assert_eq!(repo.data(), &json!({"a": 1}));
        }

        #[tokio::test]
        async fn applied_changes_are_pending() {
            let mut repo = Repository::new(json!({}));
            repo.apply(&[Operation::Add {
                path: "/a".into(),
                value: json!(1),
            }])
            .unwrap();
            assert_eq!(repo.status().await.unwrap().len(), 1);
            repo.commit("applied", AUTHOR, false).await.unwrap();
        }
    }
}

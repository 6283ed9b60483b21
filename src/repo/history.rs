//! repo::history
//!
//! Logs and the persisted history form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Repository;
use crate::core::commit::Commit;
use crate::core::types::Reference;

/// The transfer form of a repository.
///
/// `commits` runs root-first along the path reachable from HEAD. This is
/// the only representation meant to be persisted or sent elsewhere.
///
/// # Example
///
/// ```
/// use objrepo::History;
///
/// let history: History = serde_json::from_str(r#"{
///     "refs": {"HEAD": {"name": "HEAD", "value": "ref: refs/heads/main"}},
///     "commits": []
/// }"#).unwrap();
/// assert_eq!(history.refs["HEAD"].value, "ref: refs/heads/main");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub refs: BTreeMap<String, Reference>,
    #[serde(default)]
    pub commits: Vec<Commit>,
}

impl History {
    /// Total number of change entries across all commits.
    pub fn change_count(&self) -> usize {
        self.commits.iter().map(|c| c.changes.len()).sum()
    }
}

impl Repository {
    /// Commits from HEAD following parent links, newest first, at most
    /// `limit` of them.
    pub fn logs(&self, limit: Option<usize>) -> Vec<&Commit> {
        let Some(head) = self.commit_at_head() else {
            return Vec::new();
        };
        let mut commits = self.commits.walk(&head.hash);
        if let Some(limit) = limit {
            commits.truncate(limit);
        }
        commits
    }

    /// All refs plus the commits reachable from HEAD, root first.
    pub fn get_history(&self) -> History {
        let mut commits: Vec<Commit> = self.logs(None).into_iter().cloned().collect();
        commits.reverse();
        History {
            refs: self.refs.as_map().clone(),
            commits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const AUTHOR: &str = "User name <name@domain.com>";

    async fn three_commits() -> Repository {
        let mut repo = Repository::new(json!({}));
        for (i, message) in ["one", "two", "three"].into_iter().enumerate() {
            repo.data_mut()[message] = json!(i);
            repo.commit(message, AUTHOR, false).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn logs_are_newest_first() {
        let repo = three_commits().await;
        let messages: Vec<&str> = repo.logs(None).iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["three", "two", "one"]);
        assert_eq!(repo.logs(Some(2)).len(), 2);
        assert!(repo.logs(Some(0)).is_empty());
    }

    #[test]
    fn unborn_logs_are_empty() {
        let repo = Repository::new(json!({}));
        assert!(repo.logs(None).is_empty());
        assert!(repo.get_history().commits.is_empty());
    }

    #[tokio::test]
    async fn history_is_root_first_and_follows_head() {
        let mut repo = three_commits().await;
        let history = repo.get_history();
        assert_eq!(history.commits[0].message, "one");
        assert_eq!(history.commits.len(), 3);
        assert_eq!(history.change_count(), 3);

        let second = history.commits[1].hash.clone();
        repo.checkout(second.as_str(), false).await.unwrap();
        assert_eq!(repo.get_history().commits.len(), 2);
        // the full set is unchanged
        assert_eq!(repo.commits().len(), 3);
    }

    #[tokio::test]
    async fn history_survives_json() {
        let repo = three_commits().await;
        let history = repo.get_history();
        let text = serde_json::to_string(&history).unwrap();
        let parsed: History = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, history);
    }
}

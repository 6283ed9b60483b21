//! Integration tests for history transfer, reconstruction and the pending set.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{add_one_step, baseline, complex_object, sum_changes, update_header_data, TEST_AUTHOR};
use objrepo::codec::{CodecError, CommitHashContent, CommitHasher, JsonCodec, Sha256Hasher};
use objrepo::{CommitHash, History, Repository, RepositoryConfig, RepositoryOptions};
use serde_json::{json, Value};

async fn two_commit_history() -> (Repository, History) {
    let mut repo = baseline();
    update_header_data(repo.data_mut());
    repo.commit("header data", TEST_AUTHOR, false).await.unwrap();
    add_one_step(repo.data_mut());
    repo.commit("first step", TEST_AUTHOR, false).await.unwrap();
    let history = repo.get_history();
    (repo, history)
}

async fn restore(history: History) -> Repository {
    Repository::open(complex_object(), RepositoryOptions::new().with_history(history))
        .await
        .unwrap()
}

mod reconstruction {
    use super::*;

    #[tokio::test]
    async fn restored_document_matches_origin() {
        let (origin, history) = two_commit_history().await;
        let restored = restore(history.clone()).await;

        assert!(restored.is_ready());
        assert_eq!(restored.data(), origin.data());
        assert_eq!(restored.original(), &complex_object());
        assert_eq!(restored.get_history(), history);
        assert_eq!(
            sum_changes(&restored.get_history().commits),
            sum_changes(&history.commits)
        );
        assert!(restored.status().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn history_survives_serialization() {
        let (origin, history) = two_commit_history().await;
        let text = serde_json::to_string(&history).unwrap();
        let parsed: History = serde_json::from_str(&text).unwrap();

        let restored = restore(parsed).await;
        assert_eq!(restored.data(), origin.data());
        assert_eq!(restored.head().unwrap(), "refs/heads/main");
        assert_eq!(restored.branch().unwrap(), "main");
    }

    #[tokio::test]
    async fn restored_repository_keeps_committing() {
        let (_, history) = two_commit_history().await;
        let mut repo = restore(history).await;

        repo.data_mut()["description"] = json!("after restore");
        repo.commit("third", TEST_AUTHOR, false).await.unwrap();

        let messages: Vec<&str> = repo.logs(None).iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["third", "first step", "header data"]);
    }

    #[tokio::test]
    async fn detached_history_restores_detached() {
        let (mut origin, _) = two_commit_history().await;
        let first = origin.get_history().commits[0].hash.clone();
        origin.checkout(first.as_str(), false).await.unwrap();

        let restored = restore(origin.get_history()).await;
        assert_eq!(restored.branch().unwrap(), "HEAD");
        assert_eq!(restored.head().unwrap(), first.as_str());
        assert_eq!(restored.data()["nested"], json!([]));
    }

    #[tokio::test]
    async fn history_without_commits_is_unborn() {
        let history: History = serde_json::from_value(json!({
            "refs": {"HEAD": {"name": "HEAD", "value": "ref: refs/heads/main"}}
        }))
        .unwrap();
        let repo = restore(history).await;
        assert!(repo.commit_at_head().is_none());
        assert_eq!(repo.data(), &complex_object());
    }
}

mod cherry {
    use super::*;

    #[tokio::test]
    async fn nothing_pending_after_restore() {
        let (_, history) = two_commit_history().await;
        let repo = restore(history).await;
        assert!(repo.cherry().is_empty());
    }

    #[tokio::test]
    async fn local_commit_is_pending() {
        let (_, history) = two_commit_history().await;
        let mut repo = restore(history).await;

        repo.data_mut()["name"] = json!("renamed");
        let hash = repo.commit("rename", TEST_AUTHOR, false).await.unwrap();

        let cherry = repo.cherry();
        assert_eq!(cherry.commits.len(), 1);
        assert_eq!(cherry.commits[0].hash, hash);
        assert_eq!(cherry.refs.len(), 1);
        assert_eq!(cherry.refs["refs/heads/main"].value, hash.as_str());
    }

    #[tokio::test]
    async fn new_branch_shares_pending_commits() {
        let (_, history) = two_commit_history().await;
        let mut repo = restore(history).await;

        repo.checkout("feature", true).await.unwrap();
        repo.data_mut()["name"] = json!("feature");
        repo.commit("feature work", TEST_AUTHOR, false).await.unwrap();

        let cherry = repo.cherry();
        // the remote already holds everything below the new commit
        assert_eq!(cherry.commits.len(), 1);
        assert_eq!(cherry.refs.keys().collect::<Vec<_>>(), vec!["refs/heads/feature"]);
    }

    #[tokio::test]
    async fn fresh_repository_pushes_everything() {
        let (repo, _) = two_commit_history().await;
        let cherry = repo.cherry();
        assert_eq!(cherry.commits.len(), 2);
        assert_eq!(sum_changes(&cherry.commits), 4);
    }
}

mod strategies {
    use super::*;

    /// Delegates to SHA-256 and counts invocations.
    #[derive(Default)]
    struct CountingHasher {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl CommitHasher for CountingHasher {
        async fn hash(&self, content: &CommitHashContent<'_>) -> Result<CommitHash, CodecError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Sha256Hasher.digest(content)
        }
    }

    #[tokio::test]
    async fn custom_codec_stores_plain_json_trees() {
        let mut repo = Repository::open(
            complex_object(),
            RepositoryOptions::new().with_codec(Arc::new(JsonCodec)),
        )
        .await
        .unwrap();
        update_header_data(repo.data_mut());
        repo.commit("header data", TEST_AUTHOR, false).await.unwrap();

        let tree: Value = serde_json::from_str(&repo.commit_at_head().unwrap().tree).unwrap();
        assert_eq!(&tree, repo.data());
    }

    #[tokio::test]
    async fn custom_hasher_is_used_for_every_commit() {
        let hasher = Arc::new(CountingHasher::default());
        let mut repo = Repository::open(
            complex_object(),
            RepositoryOptions::new().with_hasher(hasher.clone()),
        )
        .await
        .unwrap();

        update_header_data(repo.data_mut());
        repo.commit("header data", TEST_AUTHOR, false).await.unwrap();
        repo.data_mut()["name"] = json!("second");
        repo.commit("second", TEST_AUTHOR, false).await.unwrap();

        assert_eq!(hasher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn history_from_json_codec_needs_json_codec() {
        let mut origin = Repository::open(
            complex_object(),
            RepositoryOptions::new().with_codec(Arc::new(JsonCodec)),
        )
        .await
        .unwrap();
        update_header_data(origin.data_mut());
        origin.commit("header data", TEST_AUTHOR, false).await.unwrap();

        let restored = Repository::open(
            complex_object(),
            RepositoryOptions::new()
                .with_history(origin.get_history())
                .with_codec(Arc::new(JsonCodec)),
        )
        .await
        .unwrap();
        assert_eq!(restored.data(), origin.data());

        // the default codec cannot read plain JSON trees
        let err = Repository::open(
            complex_object(),
            RepositoryOptions::new().with_history(origin.get_history()),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().starts_with("failed to decode tree"));
    }

    #[tokio::test]
    async fn config_file_sets_default_branch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("objrepo.toml");
        std::fs::write(&path, "default_branch = \"trunk\"\n").unwrap();

        let config = RepositoryConfig::load(&path).unwrap();
        let mut repo = Repository::open(complex_object(), RepositoryOptions::new().with_config(config))
            .await
            .unwrap();
        update_header_data(repo.data_mut());
        repo.commit("header data", TEST_AUTHOR, false).await.unwrap();

        assert_eq!(repo.head().unwrap(), "refs/heads/trunk");
        assert_eq!(repo.branch().unwrap(), "trunk");
    }
}

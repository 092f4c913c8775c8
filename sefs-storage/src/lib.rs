//! SQLite-backed implementation of `sefs_core::traits::MetadataStore`.
//!
//! Two physical databases: a global one (settings — provider, credentials,
//! selected root folder) opened once for the daemon's lifetime, and a
//! per-root one (files, clusters, events) that `switch_root` swaps out
//! wholesale. Both use WAL journaling: a single mutex-guarded write
//! connection per database, plus a small pool of read-only connections that
//! may proceed concurrently with the writer.

mod codec;
mod migrations;
mod pool;
mod queries;
mod store;

pub use store::{replace_all_clusters, SqliteMetadataStore};

#[cfg(test)]
mod tests {
    use super::*;
    use sefs_core::models::{EventType, FileRecord, UNCATEGORISED_CLUSTER_ID};
    use sefs_core::traits::MetadataStore;
    use tempfile::tempdir;

    async fn open_store() -> (SqliteMetadataStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store =
            SqliteMetadataStore::open_global(&dir.path().join("global.db"), 2, 5_000).unwrap();
        store.switch_root(dir.path(), ".sefs.db").await.unwrap();
        (store, dir)
    }

    fn sample_file(original_path: &str, hash: &str) -> FileRecord {
        FileRecord {
            id: 0,
            original_path: original_path.to_string(),
            current_path: original_path.to_string(),
            filename: original_path.rsplit('/').next().unwrap().to_string(),
            content_hash: hash.to_string(),
            file_type: Some("txt".to_string()),
            size_bytes: 10,
            word_count: 2,
            page_count: 0,
            summary: Some("a summary".to_string()),
            embedding: Some(vec![0.1, 0.2, 0.3]),
            embed_model: Some("local/test".to_string()),
            cluster_id: UNCATEGORISED_CLUSTER_ID,
            umap_x: 0.0,
            umap_y: 0.0,
            created_at: chrono::Utc::now(),
            modified_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn upsert_then_get_by_path_round_trips_embedding() {
        let (store, _dir) = open_store().await;
        let id = store.upsert_file(&sample_file("/root/a.txt", "hash-a")).await.unwrap();
        let got = store.get_file_by_id(id).await.unwrap().unwrap();
        assert_eq!(got.embedding.unwrap(), vec![0.1, 0.2, 0.3]);
        assert_eq!(got.content_hash, "hash-a");
    }

    #[tokio::test]
    async fn upsert_on_same_original_path_updates_in_place() {
        let (store, _dir) = open_store().await;
        let id1 = store.upsert_file(&sample_file("/root/a.txt", "hash-a")).await.unwrap();
        let mut second = sample_file("/root/a.txt", "hash-b");
        second.filename = "renamed.txt".to_string();
        let id2 = store.upsert_file(&second).await.unwrap();
        assert_eq!(id1, id2);
        let all = store.get_all_files().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].content_hash, "hash-b");
    }

    #[tokio::test]
    async fn get_by_hash_finds_relocated_record() {
        let (store, _dir) = open_store().await;
        store.upsert_file(&sample_file("/root/a.txt", "hash-a")).await.unwrap();
        let found = store.get_file_by_hash("hash-a").await.unwrap();
        assert!(found.is_some());
        assert!(store.get_file_by_hash("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cluster_replace_is_atomic_and_visible_afterward() {
        let (store, _dir) = open_store().await;
        let c = sefs_core::models::ClusterRecord {
            id: 0,
            name: "docs".to_string(),
            description: None,
            folder_path: "/root/docs".to_string(),
            centroid: Some(vec![1.0, 2.0]),
            file_count: 1,
            created_at: chrono::Utc::now(),
        };
        replace_all_clusters(&store, &[c]).await.unwrap();
        let all = store.get_all_clusters().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "docs");

        replace_all_clusters(&store, &[]).await.unwrap();
        assert_eq!(store.get_all_clusters().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn events_are_returned_newest_first() {
        let (store, _dir) = open_store().await;
        store.add_event(None, EventType::ScanStart, None).await.unwrap();
        store.add_event(None, EventType::ScanComplete, Some("3 files")).await.unwrap();
        let recent = store.recent_events(10).await.unwrap();
        assert_eq!(recent[0].event_type, EventType::ScanComplete);
    }

    #[tokio::test]
    async fn settings_round_trip_through_global_store() {
        let (store, _dir) = open_store().await;
        store.set_setting("provider", "remote").await.unwrap();
        assert_eq!(store.get_setting("provider").await.unwrap().as_deref(), Some("remote"));
        assert_eq!(store.get_setting("missing").await.unwrap(), None);
        let all = store.get_all_settings().await.unwrap();
        assert_eq!(all.get("provider").map(String::as_str), Some("remote"));
    }

    #[tokio::test]
    async fn switch_root_opens_a_fresh_per_root_store() {
        let (store, _dir) = open_store().await;
        store.upsert_file(&sample_file("/root/a.txt", "hash-a")).await.unwrap();
        assert_eq!(store.get_all_files().await.unwrap().len(), 1);

        let other = tempdir().unwrap();
        store.switch_root(other.path(), ".sefs.db").await.unwrap();
        assert_eq!(store.get_all_files().await.unwrap().len(), 0);
    }
}

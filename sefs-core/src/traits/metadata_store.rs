use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::SefsResult;
use crate::models::{ClusterRecord, EventRecord, EventType, FileRecord};

/// Durable, single-writer, asynchronous metadata store. One implementation
/// backs both the per-root store (files/clusters/events) and the global
/// store (settings); `switch_root` only applies to the per-root half.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Close whatever per-root store is open and open/create the one
    /// inside `root_dir` (§3, §6 `switch_root`). Settings operations are
    /// unaffected — they always act on the global half.
    async fn switch_root(&self, root_dir: &Path, db_filename: &str) -> SefsResult<()>;

    // --- files ---
    async fn upsert_file(&self, file: &FileRecord) -> SefsResult<i64>;
    async fn get_file_by_id(&self, id: i64) -> SefsResult<Option<FileRecord>>;
    async fn get_file_by_path(&self, original_path: &str) -> SefsResult<Option<FileRecord>>;
    async fn get_file_by_current_path(&self, current_path: &str) -> SefsResult<Option<FileRecord>>;
    async fn get_file_by_hash(&self, content_hash: &str) -> SefsResult<Option<FileRecord>>;
    async fn get_all_files(&self) -> SefsResult<Vec<FileRecord>>;
    async fn update_file_paths(
        &self,
        id: i64,
        current_path: &str,
        filename: &str,
    ) -> SefsResult<()>;
    async fn update_file_embedding(
        &self,
        id: i64,
        embedding: &[f32],
        model_tag: &str,
    ) -> SefsResult<()>;
    async fn update_file_cluster(
        &self,
        id: i64,
        cluster_id: i64,
        umap_x: f64,
        umap_y: f64,
    ) -> SefsResult<()>;
    async fn bulk_update_clusters(
        &self,
        assignments: &[(i64, i64, f64, f64)],
    ) -> SefsResult<()>;
    async fn delete_file(&self, id: i64) -> SefsResult<()>;

    // --- clusters ---
    async fn clear_clusters(&self) -> SefsResult<()>;
    async fn upsert_cluster(&self, cluster: &ClusterRecord) -> SefsResult<()>;
    async fn get_all_clusters(&self) -> SefsResult<Vec<ClusterRecord>>;
    /// Clear then upsert the whole cluster set inside one transaction, so a
    /// full recluster never leaves readers looking at a half-cleared table.
    async fn replace_all_clusters(&self, clusters: &[ClusterRecord]) -> SefsResult<()>;

    // --- events ---
    async fn add_event(
        &self,
        file_id: Option<i64>,
        event_type: EventType,
        detail: Option<&str>,
    ) -> SefsResult<()>;
    async fn recent_events(&self, limit: usize) -> SefsResult<Vec<EventRecord>>;

    // --- settings (global store) ---
    async fn get_setting(&self, key: &str) -> SefsResult<Option<String>>;
    async fn set_setting(&self, key: &str, value: &str) -> SefsResult<()>;
    async fn get_all_settings(&self) -> SefsResult<HashMap<String, String>>;
}

#[async_trait]
impl<T: MetadataStore> MetadataStore for Arc<T> {
    async fn switch_root(&self, root_dir: &Path, db_filename: &str) -> SefsResult<()> {
        (**self).switch_root(root_dir, db_filename).await
    }
    async fn upsert_file(&self, file: &FileRecord) -> SefsResult<i64> {
        (**self).upsert_file(file).await
    }
    async fn get_file_by_id(&self, id: i64) -> SefsResult<Option<FileRecord>> {
        (**self).get_file_by_id(id).await
    }
    async fn get_file_by_path(&self, original_path: &str) -> SefsResult<Option<FileRecord>> {
        (**self).get_file_by_path(original_path).await
    }
    async fn get_file_by_current_path(&self, current_path: &str) -> SefsResult<Option<FileRecord>> {
        (**self).get_file_by_current_path(current_path).await
    }
    async fn get_file_by_hash(&self, content_hash: &str) -> SefsResult<Option<FileRecord>> {
        (**self).get_file_by_hash(content_hash).await
    }
    async fn get_all_files(&self) -> SefsResult<Vec<FileRecord>> {
        (**self).get_all_files().await
    }
    async fn update_file_paths(
        &self,
        id: i64,
        current_path: &str,
        filename: &str,
    ) -> SefsResult<()> {
        (**self).update_file_paths(id, current_path, filename).await
    }
    async fn update_file_embedding(
        &self,
        id: i64,
        embedding: &[f32],
        model_tag: &str,
    ) -> SefsResult<()> {
        (**self).update_file_embedding(id, embedding, model_tag).await
    }
    async fn update_file_cluster(
        &self,
        id: i64,
        cluster_id: i64,
        umap_x: f64,
        umap_y: f64,
    ) -> SefsResult<()> {
        (**self).update_file_cluster(id, cluster_id, umap_x, umap_y).await
    }
    async fn bulk_update_clusters(&self, assignments: &[(i64, i64, f64, f64)]) -> SefsResult<()> {
        (**self).bulk_update_clusters(assignments).await
    }
    async fn delete_file(&self, id: i64) -> SefsResult<()> {
        (**self).delete_file(id).await
    }
    async fn clear_clusters(&self) -> SefsResult<()> {
        (**self).clear_clusters().await
    }
    async fn upsert_cluster(&self, cluster: &ClusterRecord) -> SefsResult<()> {
        (**self).upsert_cluster(cluster).await
    }
    async fn get_all_clusters(&self) -> SefsResult<Vec<ClusterRecord>> {
        (**self).get_all_clusters().await
    }
    async fn replace_all_clusters(&self, clusters: &[ClusterRecord]) -> SefsResult<()> {
        (**self).replace_all_clusters(clusters).await
    }
    async fn add_event(
        &self,
        file_id: Option<i64>,
        event_type: EventType,
        detail: Option<&str>,
    ) -> SefsResult<()> {
        (**self).add_event(file_id, event_type, detail).await
    }
    async fn recent_events(&self, limit: usize) -> SefsResult<Vec<EventRecord>> {
        (**self).recent_events(limit).await
    }
    async fn get_setting(&self, key: &str) -> SefsResult<Option<String>> {
        (**self).get_setting(key).await
    }
    async fn set_setting(&self, key: &str, value: &str) -> SefsResult<()> {
        (**self).set_setting(key, value).await
    }
    async fn get_all_settings(&self) -> SefsResult<HashMap<String, String>> {
        (**self).get_all_settings().await
    }
}

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use sefs_core::errors::{ExtractorError, SefsResult};
use sefs_core::models::{EventType, FileRecord, UNCATEGORISED_CLUSTER_ID};
use sefs_core::traits::{EmbeddingProvider, Extracted, Extractor, MetadataStore};
use sefs_observability::StageKind;

use crate::pipeline::Pipeline;

/// What `process_file` actually did, so callers (the watcher sink, the
/// scan loop) can decide whether an incremental assignment is worth
/// attempting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Added(i64),
    Modified(i64),
    Unchanged(i64),
}

impl IngestOutcome {
    pub fn file_id(self) -> i64 {
        match self {
            IngestOutcome::Added(id) | IngestOutcome::Modified(id) | IngestOutcome::Unchanged(id) => id,
        }
    }
}

impl Pipeline {
    /// Ingest a single file at `path` (§4.8). Looked up by `current_path`,
    /// not `original_path` — `original_path` is the immutable first-sighted
    /// stamp, and a literal lookup on it would miss every record that has
    /// since been relocated by a prior sync pass or user move.
    pub async fn process_file(&self, path: &Path) -> SefsResult<IngestOutcome> {
        if !path.exists() || !self.extractor.is_supported(path) {
            return Err(ExtractorError::Unsupported {
                path: path.display().to_string(),
            }
            .into());
        }

        let path_str = path.display().to_string();
        self.emit(EventType::ProcessingStart, None, Some(path_str.clone())).await;

        let extract_start = Instant::now();
        let extracted = self.extractor.extract(path)?;
        self.record_stage(StageKind::Extraction, extract_start.elapsed().as_secs_f64() * 1000.0);
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path_str.clone());

        if let Some(existing) = self.store.get_file_by_current_path(&path_str).await? {
            let outcome = self.handle_hit(existing, extracted, &path_str, &filename).await?;
            self.record_file_processed();
            return Ok(outcome);
        }

        if let Some(owner) = self.store.get_file_by_hash(&extracted.content_hash).await? {
            self.store.update_file_paths(owner.id, &path_str, &filename).await?;
            self.emit(
                EventType::FileModified,
                Some(owner.id),
                Some(format!("relocated to {path_str}")),
            )
            .await;
            self.record_file_processed();
            return Ok(IngestOutcome::Modified(owner.id));
        }

        let embedding = self.embed_with_metrics(&extracted.text).await?;
        let summary = self.embedder.generate_summary(&extracted.text).await?;
        let now = Utc::now();
        let record = FileRecord {
            id: 0,
            original_path: path_str.clone(),
            current_path: path_str.clone(),
            filename,
            content_hash: extracted.content_hash,
            file_type: extracted.file_type,
            size_bytes: extracted.size_bytes,
            word_count: extracted.word_count,
            page_count: extracted.page_count,
            summary: Some(summary),
            embedding: Some(embedding),
            embed_model: Some(self.embedder.current_model_tag()),
            cluster_id: UNCATEGORISED_CLUSTER_ID,
            umap_x: 0.0,
            umap_y: 0.0,
            created_at: now,
            modified_at: now,
        };
        let id = self.store.upsert_file(&record).await?;
        self.emit(EventType::FileAdded, Some(id), Some(path_str)).await;
        self.record_file_processed();
        Ok(IngestOutcome::Added(id))
    }

    /// Time an embedding call and record it under §4.13's `embedding`
    /// stage; also logs a degradation event when the provider degraded to
    /// an all-zero vector rather than a real embedding.
    async fn embed_with_metrics(&self, text: &str) -> SefsResult<Vec<f32>> {
        let start = Instant::now();
        let embedding = self.embedder.get_embedding(text).await?;
        self.record_stage(StageKind::Embedding, start.elapsed().as_secs_f64() * 1000.0);
        if !embedding.is_empty() && embedding.iter().all(|x| *x == 0.0) {
            self.record_degradation(
                "embedding_adapter",
                "provider call failed or unhealthy",
                "zero vector",
            );
        }
        Ok(embedding)
    }

    async fn handle_hit(
        &self,
        existing: FileRecord,
        extracted: Extracted,
        path_str: &str,
        filename: &str,
    ) -> SefsResult<IngestOutcome> {
        let id = existing.id;

        if existing.content_hash != extracted.content_hash {
            let embedding = self.embed_with_metrics(&extracted.text).await?;
            let summary = self.embedder.generate_summary(&extracted.text).await?;
            let updated = FileRecord {
                current_path: path_str.to_string(),
                filename: filename.to_string(),
                content_hash: extracted.content_hash,
                file_type: extracted.file_type,
                size_bytes: extracted.size_bytes,
                word_count: extracted.word_count,
                page_count: extracted.page_count,
                summary: Some(summary),
                embedding: Some(embedding),
                embed_model: Some(self.embedder.current_model_tag()),
                modified_at: Utc::now(),
                ..existing
            };
            self.store.upsert_file(&updated).await?;
        } else if !existing.has_embedding() {
            let embedding = self.embed_with_metrics(&extracted.text).await?;
            let summary = self.embedder.generate_summary(&extracted.text).await?;
            let updated = FileRecord {
                current_path: path_str.to_string(),
                filename: filename.to_string(),
                summary: Some(summary),
                embedding: Some(embedding),
                embed_model: Some(self.embedder.current_model_tag()),
                modified_at: Utc::now(),
                ..existing
            };
            self.store.upsert_file(&updated).await?;
        } else if existing.current_path != path_str || existing.filename != filename {
            self.store.update_file_paths(id, path_str, filename).await?;
        } else {
            return Ok(IngestOutcome::Unchanged(id));
        }

        self.emit(EventType::FileModified, Some(id), Some(path_str.to_string())).await;
        Ok(IngestOutcome::Modified(id))
    }

    /// Remove the record for `path` (§4.8). Two checks stand between "this
    /// path vanished" and "delete the record": a duplicate-hash record
    /// whose own current path still resolves (someone already relocated
    /// this content under a different record), or this record's current
    /// path differing from the deleted one and still resolving (this
    /// record was itself relocated before the delete arrived — should
    /// only be possible via a race, since the watcher's flush already
    /// orders the rename's Changed half first; kept as defense-in-depth).
    pub async fn remove_file(&self, path: &Path) -> SefsResult<bool> {
        let path_str = path.display().to_string();
        let Some(record) = self.store.get_file_by_current_path(&path_str).await? else {
            return Ok(false);
        };

        if let Some(owner) = self.store.get_file_by_hash(&record.content_hash).await? {
            if owner.id != record.id && Path::new(&owner.current_path).exists() {
                return Ok(false);
            }
        }
        if record.current_path != path_str && Path::new(&record.current_path).exists() {
            return Ok(false);
        }

        self.store.delete_file(record.id).await?;
        self.emit(EventType::FileRemoved, Some(record.id), Some(path_str)).await;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use sefs_core::errors::SefsResult;
    use sefs_core::models::{ClusterRecord, EventRecord, EventType};
    use sefs_core::traits::{EventBus, NullEventBus};
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct MemStore {
        files: Mutex<Vec<FileRecord>>,
        next_id: Mutex<i64>,
    }

    #[async_trait]
    impl MetadataStore for MemStore {
        async fn upsert_file(&self, file: &FileRecord) -> SefsResult<i64> {
            let mut files = self.files.lock().await;
            if let Some(existing) = files.iter_mut().find(|f| f.original_path == file.original_path) {
                let id = existing.id;
                *existing = file.clone();
                existing.id = id;
                return Ok(id);
            }
            let mut next_id = self.next_id.lock().await;
            *next_id += 1;
            let mut new_file = file.clone();
            new_file.id = *next_id;
            files.push(new_file);
            Ok(*next_id)
        }
        async fn get_file_by_id(&self, id: i64) -> SefsResult<Option<FileRecord>> {
            Ok(self.files.lock().await.iter().find(|f| f.id == id).cloned())
        }
        async fn get_file_by_path(&self, original_path: &str) -> SefsResult<Option<FileRecord>> {
            Ok(self.files.lock().await.iter().find(|f| f.original_path == original_path).cloned())
        }
        async fn get_file_by_current_path(&self, current_path: &str) -> SefsResult<Option<FileRecord>> {
            Ok(self.files.lock().await.iter().find(|f| f.current_path == current_path).cloned())
        }
        async fn get_file_by_hash(&self, content_hash: &str) -> SefsResult<Option<FileRecord>> {
            Ok(self.files.lock().await.iter().find(|f| f.content_hash == content_hash).cloned())
        }
        async fn get_all_files(&self) -> SefsResult<Vec<FileRecord>> {
            Ok(self.files.lock().await.clone())
        }
        async fn update_file_paths(&self, id: i64, current_path: &str, filename: &str) -> SefsResult<()> {
            let mut files = self.files.lock().await;
            if let Some(f) = files.iter_mut().find(|f| f.id == id) {
                f.current_path = current_path.to_string();
                f.filename = filename.to_string();
            }
            Ok(())
        }
        async fn update_file_embedding(&self, _id: i64, _embedding: &[f32], _model_tag: &str) -> SefsResult<()> {
            Ok(())
        }
        async fn update_file_cluster(&self, id: i64, cluster_id: i64, umap_x: f64, umap_y: f64) -> SefsResult<()> {
            let mut files = self.files.lock().await;
            if let Some(f) = files.iter_mut().find(|f| f.id == id) {
                f.cluster_id = cluster_id;
                f.umap_x = umap_x;
                f.umap_y = umap_y;
            }
            Ok(())
        }
        async fn bulk_update_clusters(&self, _assignments: &[(i64, i64, f64, f64)]) -> SefsResult<()> {
            Ok(())
        }
        async fn delete_file(&self, id: i64) -> SefsResult<()> {
            self.files.lock().await.retain(|f| f.id != id);
            Ok(())
        }
        async fn clear_clusters(&self) -> SefsResult<()> {
            Ok(())
        }
        async fn upsert_cluster(&self, _cluster: &ClusterRecord) -> SefsResult<()> {
            Ok(())
        }
        async fn get_all_clusters(&self) -> SefsResult<Vec<ClusterRecord>> {
            Ok(Vec::new())
        }
        async fn replace_all_clusters(&self, _clusters: &[ClusterRecord]) -> SefsResult<()> {
            Ok(())
        }
        async fn add_event(&self, _file_id: Option<i64>, _event_type: EventType, _detail: Option<&str>) -> SefsResult<()> {
            Ok(())
        }
        async fn recent_events(&self, _limit: usize) -> SefsResult<Vec<EventRecord>> {
            Ok(Vec::new())
        }
        async fn get_setting(&self, _key: &str) -> SefsResult<Option<String>> {
            Ok(None)
        }
        async fn set_setting(&self, _key: &str, _value: &str) -> SefsResult<()> {
            Ok(())
        }
        async fn get_all_settings(&self) -> SefsResult<HashMap<String, String>> {
            Ok(HashMap::new())
        }
    }

    struct StubExtractor;

    impl Extractor for StubExtractor {
        fn is_supported(&self, _path: &Path) -> bool {
            true
        }
        fn extract(&self, path: &Path) -> SefsResult<Extracted> {
            let bytes = std::fs::read(path)?;
            let hash = format!("{:x}", sha2::Sha256::digest(&bytes));
            let text = String::from_utf8_lossy(&bytes).to_string();
            Ok(Extracted {
                word_count: text.split_whitespace().count() as u32,
                page_count: 1,
                file_type: Some("txt".to_string()),
                content_hash: hash,
                size_bytes: bytes.len() as u64,
                text,
            })
        }
    }

    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn get_embedding(&self, _text: &str) -> SefsResult<Vec<f32>> {
            Ok(vec![1.0, 0.0, 0.0])
        }
        async fn generate_summary(&self, text: &str) -> SefsResult<String> {
            Ok(text.chars().take(20).collect())
        }
        fn current_model_tag(&self) -> String {
            "stub/v1".to_string()
        }
        fn expected_dim(&self) -> usize {
            3
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    use sha2::Digest;

    fn test_pipeline(dir: &std::path::Path) -> Pipeline {
        let lock = sefs_sync::SyncLock::new();
        let recently_synced = sefs_sync::RecentlySyncedSet::new(std::time::Duration::from_secs(5));
        let sync_engine = sefs_sync::SyncEngine::new(dir.to_path_buf(), lock, recently_synced)
            .with_settle(std::time::Duration::from_millis(1));
        Pipeline::new(
            dir.to_path_buf(),
            Arc::new(MemStore::default()),
            Arc::new(StubExtractor),
            Arc::new(StubEmbedder),
            Arc::new(sync_engine),
            Arc::new(NullEventBus) as Arc<dyn EventBus>,
            sefs_core::config::ClusterConfig::default(),
        )
    }

    #[tokio::test]
    async fn new_file_is_added_with_embedding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, b"hello world").unwrap();

        let pipeline = test_pipeline(dir.path());
        let outcome = pipeline.process_file(&path).await.unwrap();
        assert!(matches!(outcome, IngestOutcome::Added(_)));
    }

    #[tokio::test]
    async fn reprocessing_unchanged_file_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, b"hello world").unwrap();

        let pipeline = test_pipeline(dir.path());
        let first = pipeline.process_file(&path).await.unwrap();
        let second = pipeline.process_file(&path).await.unwrap();
        assert_eq!(first.file_id(), second.file_id());
        assert!(matches!(second, IngestOutcome::Unchanged(_)));
    }

    #[tokio::test]
    async fn moving_a_file_relocates_the_same_record() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("a.txt");
        std::fs::write(&original, b"hello world").unwrap();

        let pipeline = test_pipeline(dir.path());
        let added = pipeline.process_file(&original).await.unwrap();

        let moved = dir.path().join("b.txt");
        std::fs::rename(&original, &moved).unwrap();

        let outcome = pipeline.process_file(&moved).await.unwrap();
        assert_eq!(outcome.file_id(), added.file_id());
        assert!(matches!(outcome, IngestOutcome::Modified(_)));

        let removed = pipeline.remove_file(&original).await.unwrap();
        assert!(!removed, "the old path must not delete the relocated record");
    }

    #[tokio::test]
    async fn deleting_untracked_path_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(dir.path());
        let removed = pipeline.remove_file(&dir.path().join("never.txt")).await.unwrap();
        assert!(!removed);
    }
}

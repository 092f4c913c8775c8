use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sefs_core::config::{defaults, ClusterConfig, SchedulerConfig};
use sefs_core::errors::{ProviderError, SefsResult};
use sefs_core::models::{ClusterRecord, EventRecord, FileRecord};
use sefs_core::traits::{EmbeddingProvider, EventBus, Extractor, MetadataStore};
use sefs_observability::{DegradationTracker, MetricsCollector};
use sefs_pipeline::{BroadcastEventBus, Pipeline, PipelineIngestionSink, ReclusterScheduler};
use sefs_sync::{RecentlySyncedSet, SyncEngine, SyncLock};
use sefs_watcher::RootWatcher;
use tokio::sync::{mpsc, RwLock};

use crate::dto::{ChatEvent, MetricsResponse, RescanResponse, SearchHit, StatusResponse};

/// Everything the (out-of-scope) REST/WebSocket layer calls into (§6),
/// expressed as signatures only — no transport, no wire codec. One
/// instance owns the active root's `Pipeline`, `ReclusterScheduler`, and
/// filesystem watcher; `switch_root` replaces all three by constructing a
/// fresh set rather than mutating the running ones in place, matching
/// §3's "switching roots is a database swap" note.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    async fn status(&self) -> SefsResult<StatusResponse>;
    async fn list_files(&self) -> SefsResult<Vec<FileRecord>>;
    async fn list_clusters(&self) -> SefsResult<Vec<ClusterRecord>>;
    async fn list_events(&self, limit: usize) -> SefsResult<Vec<EventRecord>>;
    async fn semantic_search(&self, query: &str, limit: usize) -> SefsResult<Vec<SearchHit>>;
    async fn related(&self, file_id: i64, limit: usize) -> SefsResult<Vec<SearchHit>>;
    async fn rescan(&self) -> SefsResult<RescanResponse>;
    async fn switch_root(&self, new_path: &Path) -> SefsResult<()>;
    async fn get_settings(&self) -> SefsResult<std::collections::HashMap<String, String>>;
    async fn save_settings(&self, settings: std::collections::HashMap<String, String>) -> SefsResult<()>;
    async fn metrics(&self) -> SefsResult<MetricsResponse>;
    fn subscribe(&self) -> mpsc::UnboundedReceiver<serde_json::Value>;
}

/// The part of the control plane that is wholesale replaced by
/// `switch_root`: the active root path, its pipeline and scheduler, and
/// the watcher task keeping them fed. Dropping `watcher` stops it.
struct ActiveRoot {
    root: PathBuf,
    pipeline: Arc<Pipeline>,
    scheduler: Arc<ReclusterScheduler>,
    watcher: RootWatcher,
}

/// Concrete control plane. `store`, `embedder`, `extractor`, `bus`, and
/// `metrics` are shared across roots; `active` is the per-root bundle that
/// `switch_root` tears down and rebuilds.
pub struct SefsControlPlane {
    active: RwLock<ActiveRoot>,
    store: Arc<dyn MetadataStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    extractor: Arc<dyn Extractor>,
    bus: Arc<BroadcastEventBus>,
    metrics: Arc<MetricsCollector>,
    degradation: Arc<DegradationTracker>,
    sync_lock: Arc<SyncLock>,
    recently_synced: Arc<RecentlySyncedSet>,
    sync_settle: Duration,
    watcher_debounce: Duration,
    cluster_config: ClusterConfig,
    scheduler_config: SchedulerConfig,
    db_filename: String,
    search_embed_timeout: Duration,
}

impl SefsControlPlane {
    /// Build the control plane already pointed at `root`: opens the
    /// per-root store, runs an initial full scan, and starts the watcher,
    /// exactly the sequence `switch_root` repeats later.
    #[allow(clippy::too_many_arguments)]
    pub async fn new(
        root: PathBuf,
        store: Arc<dyn MetadataStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        extractor: Arc<dyn Extractor>,
        bus: Arc<BroadcastEventBus>,
        metrics: Arc<MetricsCollector>,
        cluster_config: ClusterConfig,
        scheduler_config: SchedulerConfig,
        sync_settle: Duration,
        watcher_debounce: Duration,
        recently_synced_ttl: Duration,
        db_filename: String,
    ) -> SefsResult<Self> {
        let sync_lock = SyncLock::new();
        let recently_synced = RecentlySyncedSet::new(recently_synced_ttl);
        let degradation = Arc::new(DegradationTracker::new());
        store.switch_root(&root, &db_filename).await?;
        let active = Self::build_active_root(
            root,
            &store,
            &embedder,
            &extractor,
            &bus,
            &metrics,
            &degradation,
            &cluster_config,
            &scheduler_config,
            &sync_lock,
            &recently_synced,
            sync_settle,
            watcher_debounce,
        )
        .await?;
        Ok(Self {
            active: RwLock::new(active),
            store,
            embedder,
            extractor,
            bus,
            metrics,
            degradation,
            sync_lock,
            recently_synced,
            sync_settle,
            watcher_debounce,
            cluster_config,
            scheduler_config,
            db_filename,
            search_embed_timeout: Duration::from_secs(defaults::DEFAULT_SEARCH_EMBED_TIMEOUT_SECS),
        })
    }

    #[allow(clippy::too_many_arguments)]
    async fn build_active_root(
        root: PathBuf,
        store: &Arc<dyn MetadataStore>,
        embedder: &Arc<dyn EmbeddingProvider>,
        extractor: &Arc<dyn Extractor>,
        bus: &Arc<BroadcastEventBus>,
        metrics: &Arc<MetricsCollector>,
        degradation: &Arc<DegradationTracker>,
        cluster_config: &ClusterConfig,
        scheduler_config: &SchedulerConfig,
        sync_lock: &Arc<SyncLock>,
        recently_synced: &Arc<RecentlySyncedSet>,
        sync_settle: Duration,
        watcher_debounce: Duration,
    ) -> SefsResult<ActiveRoot> {
        let sync_engine = SyncEngine::new(root.clone(), sync_lock.clone(), recently_synced.clone())
            .with_settle(sync_settle);
        let pipeline = Arc::new(
            Pipeline::new(
                root.clone(),
                store.clone(),
                extractor.clone(),
                embedder.clone(),
                Arc::new(sync_engine),
                bus.clone() as Arc<dyn EventBus>,
                cluster_config.clone(),
            )
            .with_metrics(metrics.clone())
            .with_degradation_tracker(degradation.clone()),
        );
        pipeline.full_scan().await?;
        let scheduler = ReclusterScheduler::new(pipeline.clone(), scheduler_config);
        let sink = Arc::new(PipelineIngestionSink::new(pipeline.clone(), scheduler.clone()));
        let watcher = RootWatcher::spawn(
            root.clone(),
            extractor.clone(),
            sync_lock.clone(),
            recently_synced.clone(),
            sink,
            watcher_debounce,
        )?;
        Ok(ActiveRoot {
            root,
            pipeline,
            scheduler,
            watcher,
        })
    }

    async fn embed_query(&self, query: &str) -> SefsResult<Vec<f32>> {
        match tokio::time::timeout(self.search_embed_timeout, self.embedder.get_embedding(query)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                provider: self.embedder.current_model_tag(),
                timeout_secs: self.search_embed_timeout.as_secs(),
            }
            .into()),
        }
    }

    fn rank_against(files: &[FileRecord], query_vec: &[f32], limit: usize, exclude_id: Option<i64>) -> Vec<SearchHit> {
        let mut scored: Vec<SearchHit> = files
            .iter()
            .filter(|f| Some(f.id) != exclude_id)
            .filter_map(|f| {
                let embedding = f.embedding.as_ref()?;
                if !embedding.iter().any(|x| *x != 0.0) {
                    return None;
                }
                Some(SearchHit {
                    file_id: f.id,
                    filename: f.filename.clone(),
                    cluster_id: f.cluster_id,
                    score: sefs_cluster::similarity::cosine_similarity(query_vec, embedding),
                })
            })
            .collect();
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        scored
    }
}

#[async_trait]
impl ControlPlane for SefsControlPlane {
    async fn status(&self) -> SefsResult<StatusResponse> {
        let files = self.store.get_all_files().await?;
        let clusters = self.store.get_all_clusters().await?;
        let root = self.active.read().await.root.display().to_string();
        Ok(StatusResponse {
            root,
            file_count: files.len(),
            cluster_count: clusters.len(),
        })
    }

    async fn list_files(&self) -> SefsResult<Vec<FileRecord>> {
        self.store.get_all_files().await
    }

    async fn list_clusters(&self) -> SefsResult<Vec<ClusterRecord>> {
        self.store.get_all_clusters().await
    }

    async fn list_events(&self, limit: usize) -> SefsResult<Vec<EventRecord>> {
        self.store.recent_events(limit).await
    }

    async fn semantic_search(&self, query: &str, limit: usize) -> SefsResult<Vec<SearchHit>> {
        let query_vec = self.embed_query(query).await?;
        let files = self.store.get_all_files().await?;
        Ok(Self::rank_against(&files, &query_vec, limit, None))
    }

    async fn related(&self, file_id: i64, limit: usize) -> SefsResult<Vec<SearchHit>> {
        let files = self.store.get_all_files().await?;
        let Some(subject) = files.iter().find(|f| f.id == file_id) else {
            return Ok(Vec::new());
        };
        let Some(embedding) = subject.embedding.clone() else {
            return Ok(Vec::new());
        };
        Ok(Self::rank_against(&files, &embedding, limit, Some(file_id)))
    }

    async fn rescan(&self) -> SefsResult<RescanResponse> {
        let files_processed = self.active.read().await.pipeline.full_scan().await?;
        Ok(RescanResponse { files_processed })
    }

    /// Stop the running watcher, point the store at `new_path`, run a full
    /// scan, and start a fresh watcher over it (§6 `switch_root`): the
    /// "stop-watcher → switch-db → full-scan → restart-watcher" sequence.
    async fn switch_root(&self, new_path: &Path) -> SefsResult<()> {
        self.bus.broadcast(serde_json::json!({
            "type": "root_switching",
            "file_id": null,
            "detail": new_path.display().to_string(),
        }));
        let mut guard = self.active.write().await;
        self.store.switch_root(new_path, &self.db_filename).await?;
        let fresh = Self::build_active_root(
            new_path.to_path_buf(),
            &self.store,
            &self.embedder,
            &self.extractor,
            &self.bus,
            &self.metrics,
            &self.degradation,
            &self.cluster_config,
            &self.scheduler_config,
            &self.sync_lock,
            &self.recently_synced,
            self.sync_settle,
            self.watcher_debounce,
        )
        .await?;
        *guard = fresh;
        drop(guard);
        self.bus.broadcast(serde_json::json!({
            "type": "root_switched",
            "file_id": null,
            "detail": new_path.display().to_string(),
        }));
        Ok(())
    }

    async fn get_settings(&self) -> SefsResult<std::collections::HashMap<String, String>> {
        self.store.get_all_settings().await
    }

    async fn save_settings(&self, settings: std::collections::HashMap<String, String>) -> SefsResult<()> {
        for (key, value) in settings {
            self.store.set_setting(&key, &value).await?;
        }
        Ok(())
    }

    async fn metrics(&self) -> SefsResult<MetricsResponse> {
        let summary = self.metrics.summary();
        Ok(MetricsResponse {
            avg_extraction_ms: summary.avg_extraction_ms,
            avg_embedding_ms: summary.avg_embedding_ms,
            avg_clustering_ms: summary.avg_clustering_ms,
            last_clustering_ms: summary.last_clustering_ms,
            total_files_processed: summary.total_files_processed,
            provider_available: self.embedder.is_available(),
            degraded_event_count: self.degradation.events().len(),
        })
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<serde_json::Value> {
        self.bus.subscribe()
    }
}

/// Best-effort RAG chat (§6). Prompt assembly against a hosted LLM is
/// out of scope (§1); this stage only does the in-scope part — retrieve
/// relevant files by semantic search — and then emits a typed `error`
/// event instead of a fabricated completion when no real provider is
/// wired in.
pub async fn rag_chat(
    control_plane: &dyn ControlPlane,
    message: &str,
    sources_limit: usize,
) -> Vec<ChatEvent> {
    let mut events = Vec::new();
    match control_plane.semantic_search(message, sources_limit).await {
        Ok(hits) => events.push(ChatEvent::Sources { hits }),
        Err(e) => {
            events.push(ChatEvent::Error {
                message: format!("retrieval failed: {e}"),
            });
            return events;
        }
    }
    events.push(ChatEvent::Error {
        message: "no chat-capable LLM provider is wired in".to_string(),
    });
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use sefs_core::config::ClusterConfig;
    use sefs_core::errors::SefsResult as Result_;
    use sefs_core::models::{EventType, UNCATEGORISED_CLUSTER_ID};
    use sefs_core::traits::{Extracted, Extractor};
    use std::path::Path;

    #[derive(Default)]
    struct MemStore {
        files: tokio::sync::Mutex<Vec<FileRecord>>,
    }

    #[async_trait]
    impl MetadataStore for MemStore {
        async fn upsert_file(&self, file: &FileRecord) -> Result_<i64> {
            self.files.lock().await.push(file.clone());
            Ok(file.id)
        }
        async fn get_file_by_id(&self, id: i64) -> Result_<Option<FileRecord>> {
            Ok(self.files.lock().await.iter().find(|f| f.id == id).cloned())
        }
        async fn get_file_by_path(&self, _p: &str) -> Result_<Option<FileRecord>> {
            Ok(None)
        }
        async fn get_file_by_current_path(&self, _p: &str) -> Result_<Option<FileRecord>> {
            Ok(None)
        }
        async fn get_file_by_hash(&self, _h: &str) -> Result_<Option<FileRecord>> {
            Ok(None)
        }
        async fn get_all_files(&self) -> Result_<Vec<FileRecord>> {
            Ok(self.files.lock().await.clone())
        }
        async fn update_file_paths(&self, _id: i64, _c: &str, _f: &str) -> Result_<()> {
            Ok(())
        }
        async fn update_file_embedding(&self, _id: i64, _e: &[f32], _m: &str) -> Result_<()> {
            Ok(())
        }
        async fn update_file_cluster(&self, _id: i64, _c: i64, _x: f64, _y: f64) -> Result_<()> {
            Ok(())
        }
        async fn bulk_update_clusters(&self, _a: &[(i64, i64, f64, f64)]) -> Result_<()> {
            Ok(())
        }
        async fn delete_file(&self, _id: i64) -> Result_<()> {
            Ok(())
        }
        async fn clear_clusters(&self) -> Result_<()> {
            Ok(())
        }
        async fn upsert_cluster(&self, _c: &ClusterRecord) -> Result_<()> {
            Ok(())
        }
        async fn get_all_clusters(&self) -> Result_<Vec<ClusterRecord>> {
            Ok(Vec::new())
        }
        async fn replace_all_clusters(&self, _c: &[ClusterRecord]) -> Result_<()> {
            Ok(())
        }
        async fn add_event(&self, _f: Option<i64>, _t: EventType, _d: Option<&str>) -> Result_<()> {
            Ok(())
        }
        async fn recent_events(&self, _limit: usize) -> Result_<Vec<EventRecord>> {
            Ok(Vec::new())
        }
        async fn get_setting(&self, _k: &str) -> Result_<Option<String>> {
            Ok(None)
        }
        async fn set_setting(&self, _k: &str, _v: &str) -> Result_<()> {
            Ok(())
        }
        async fn get_all_settings(&self) -> Result_<std::collections::HashMap<String, String>> {
            Ok(std::collections::HashMap::new())
        }
        async fn switch_root(&self, _root_dir: &Path, _db_filename: &str) -> Result_<()> {
            Ok(())
        }
    }

    struct StubExtractor;
    impl Extractor for StubExtractor {
        fn is_supported(&self, _path: &Path) -> bool {
            true
        }
        fn extract(&self, _path: &Path) -> Result_<Extracted> {
            Ok(Extracted::default())
        }
    }

    struct StubEmbedder;
    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn get_embedding(&self, text: &str) -> Result_<Vec<f32>> {
            if text.contains("dog") {
                Ok(vec![1.0, 0.0])
            } else {
                Ok(vec![0.0, 1.0])
            }
        }
        async fn generate_summary(&self, _text: &str) -> Result_<String> {
            Ok(String::new())
        }
        fn current_model_tag(&self) -> String {
            "stub/v1".to_string()
        }
        fn expected_dim(&self) -> usize {
            2
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    fn file(id: i64, embedding: Vec<f32>) -> FileRecord {
        let now = chrono::Utc::now();
        FileRecord {
            id,
            original_path: format!("/root/{id}.txt"),
            current_path: format!("/root/{id}.txt"),
            filename: format!("{id}.txt"),
            content_hash: format!("hash{id}"),
            file_type: Some("txt".to_string()),
            size_bytes: 10,
            word_count: 2,
            page_count: 0,
            summary: Some("s".to_string()),
            embedding: Some(embedding),
            embed_model: Some("stub/v1".to_string()),
            cluster_id: UNCATEGORISED_CLUSTER_ID,
            umap_x: 0.0,
            umap_y: 0.0,
            created_at: now,
            modified_at: now,
        }
    }

    async fn control_plane(dir: &Path, store: Arc<MemStore>) -> SefsControlPlane {
        SefsControlPlane::new(
            dir.to_path_buf(),
            store as Arc<dyn MetadataStore>,
            Arc::new(StubEmbedder) as Arc<dyn EmbeddingProvider>,
            Arc::new(StubExtractor) as Arc<dyn Extractor>,
            Arc::new(BroadcastEventBus::new()),
            Arc::new(MetricsCollector::default()),
            ClusterConfig::default(),
            sefs_core::config::SchedulerConfig::default(),
            Duration::from_millis(1),
            Duration::from_millis(1),
            Duration::from_secs(5),
            ".sefs.db".to_string(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn status_reports_file_and_cluster_counts() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemStore::default());
        store.upsert_file(&file(1, vec![1.0, 0.0])).await.unwrap();
        let cp = control_plane(dir.path(), store).await;
        let status = cp.status().await.unwrap();
        assert_eq!(status.file_count, 1);
        assert_eq!(status.cluster_count, 0);
    }

    #[tokio::test]
    async fn semantic_search_ranks_by_cosine_similarity() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemStore::default());
        store.upsert_file(&file(1, vec![1.0, 0.0])).await.unwrap();
        store.upsert_file(&file(2, vec![0.0, 1.0])).await.unwrap();
        let cp = control_plane(dir.path(), store).await;

        let hits = cp.semantic_search("dog barks", 10).await.unwrap();
        assert_eq!(hits[0].file_id, 1);
        assert!(hits[0].score > hits[1].score);
    }

    #[tokio::test]
    async fn related_excludes_the_subject_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemStore::default());
        store.upsert_file(&file(1, vec![1.0, 0.0])).await.unwrap();
        store.upsert_file(&file(2, vec![0.9, 0.1])).await.unwrap();
        let cp = control_plane(dir.path(), store).await;

        let hits = cp.related(1, 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].file_id, 2);
    }

    #[tokio::test]
    async fn rag_chat_reports_retrieval_then_a_no_llm_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemStore::default());
        store.upsert_file(&file(1, vec![1.0, 0.0])).await.unwrap();
        let cp = control_plane(dir.path(), store).await;

        let events = rag_chat(&cp, "dog", 5).await;
        assert!(matches!(events[0], ChatEvent::Sources { .. }));
        assert!(matches!(events[1], ChatEvent::Error { .. }));
    }

    #[tokio::test]
    async fn switch_root_points_the_control_plane_at_a_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let store = Arc::new(MemStore::default());
        let cp = control_plane(dir.path(), store).await;

        cp.switch_root(other.path()).await.unwrap();

        let status = cp.status().await.unwrap();
        assert_eq!(status.root, other.path().display().to_string());
    }
}

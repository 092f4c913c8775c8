use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use sefs_core::config::SchedulerConfig;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;

use crate::pipeline::Pipeline;

/// Debounce + cooldown orchestrator for full reclusters (§4.11). Owns the
/// execution lock the sync engine runs under by construction — a recluster
/// and an incremental assign never interleave, since both reach the sync
/// engine only through paths this scheduler or the pipeline itself gate.
pub struct ReclusterScheduler {
    pipeline: Arc<Pipeline>,
    debounce: Duration,
    cooldown: Duration,
    pending: AtomicBool,
    running: AtomicBool,
    timer: AsyncMutex<Option<JoinHandle<()>>>,
    execute_lock: AsyncMutex<()>,
    last_completed: AsyncMutex<Option<Instant>>,
}

impl ReclusterScheduler {
    pub fn new(pipeline: Arc<Pipeline>, config: &SchedulerConfig) -> Arc<Self> {
        Arc::new(Self {
            pipeline,
            debounce: Duration::from_millis(config.debounce_ms),
            cooldown: Duration::from_millis(config.cooldown_ms),
            pending: AtomicBool::new(false),
            running: AtomicBool::new(false),
            timer: AsyncMutex::new(None),
            execute_lock: AsyncMutex::new(()),
            last_completed: AsyncMutex::new(None),
        })
    }

    /// Whether a full recluster is currently executing. Exposed so callers
    /// on the incremental-assign path can make the same "don't collide with
    /// a recluster" judgment the sync engine's lock already enforces at the
    /// filesystem level.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Mark a recluster as wanted, cancel any outstanding debounce timer,
    /// and arm a new one. Calling this repeatedly in quick succession keeps
    /// pushing the actual run back, exactly like the watcher's own
    /// per-path debounce.
    pub async fn request(self: &Arc<Self>) {
        self.pending.store(true, Ordering::SeqCst);

        let mut timer = self.timer.lock().await;
        if let Some(handle) = timer.take() {
            handle.abort();
        }

        let this = Arc::clone(self);
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(this.debounce).await;
            this.execute().await;
        }));
    }

    async fn execute(self: Arc<Self>) {
        let _guard = self.execute_lock.lock().await;
        self.running.store(true, Ordering::Release);

        while self.pending.swap(false, Ordering::SeqCst) {
            let within_cooldown = {
                let last = self.last_completed.lock().await;
                last.map(|t| t.elapsed() < self.cooldown).unwrap_or(false)
            };
            if within_cooldown {
                tracing::debug!("recluster request skipped: within cooldown window");
                continue;
            }

            match self.pipeline.full_recluster().await {
                Ok(summary) => tracing::info!(
                    files = summary.files_processed,
                    clusters = summary.clusters_produced,
                    moves = summary.moves_performed,
                    "full recluster completed"
                ),
                Err(e) => tracing::warn!(error = %e, "full recluster failed"),
            }
            *self.last_completed.lock().await = Some(Instant::now());
        }

        self.running.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sefs_core::config::ClusterConfig;
    use sefs_core::traits::{EmbeddingProvider, EventBus, Extracted, Extractor, NullEventBus};
    use std::path::Path;
    use std::sync::atomic::AtomicUsize;

    struct CountingExtractor;
    impl Extractor for CountingExtractor {
        fn is_supported(&self, _path: &Path) -> bool {
            true
        }
        fn extract(&self, _path: &Path) -> sefs_core::errors::SefsResult<Extracted> {
            Ok(Extracted::default())
        }
    }

    struct NoopEmbedder;
    #[async_trait::async_trait]
    impl EmbeddingProvider for NoopEmbedder {
        async fn get_embedding(&self, _text: &str) -> sefs_core::errors::SefsResult<Vec<f32>> {
            Ok(vec![])
        }
        async fn generate_summary(&self, _text: &str) -> sefs_core::errors::SefsResult<String> {
            Ok(String::new())
        }
        fn current_model_tag(&self) -> String {
            "stub/v1".to_string()
        }
        fn expected_dim(&self) -> usize {
            0
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    #[derive(Default)]
    struct MemStore {
        recluster_calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl sefs_core::traits::MetadataStore for MemStore {
        async fn upsert_file(&self, _file: &sefs_core::models::FileRecord) -> sefs_core::errors::SefsResult<i64> {
            Ok(1)
        }
        async fn get_file_by_id(&self, _id: i64) -> sefs_core::errors::SefsResult<Option<sefs_core::models::FileRecord>> {
            Ok(None)
        }
        async fn get_file_by_path(&self, _p: &str) -> sefs_core::errors::SefsResult<Option<sefs_core::models::FileRecord>> {
            Ok(None)
        }
        async fn get_file_by_current_path(&self, _p: &str) -> sefs_core::errors::SefsResult<Option<sefs_core::models::FileRecord>> {
            Ok(None)
        }
        async fn get_file_by_hash(&self, _h: &str) -> sefs_core::errors::SefsResult<Option<sefs_core::models::FileRecord>> {
            Ok(None)
        }
        async fn get_all_files(&self) -> sefs_core::errors::SefsResult<Vec<sefs_core::models::FileRecord>> {
            self.recluster_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
        async fn update_file_paths(&self, _id: i64, _c: &str, _f: &str) -> sefs_core::errors::SefsResult<()> {
            Ok(())
        }
        async fn update_file_embedding(&self, _id: i64, _e: &[f32], _m: &str) -> sefs_core::errors::SefsResult<()> {
            Ok(())
        }
        async fn update_file_cluster(&self, _id: i64, _c: i64, _x: f64, _y: f64) -> sefs_core::errors::SefsResult<()> {
            Ok(())
        }
        async fn bulk_update_clusters(&self, _a: &[(i64, i64, f64, f64)]) -> sefs_core::errors::SefsResult<()> {
            Ok(())
        }
        async fn delete_file(&self, _id: i64) -> sefs_core::errors::SefsResult<()> {
            Ok(())
        }
        async fn clear_clusters(&self) -> sefs_core::errors::SefsResult<()> {
            Ok(())
        }
        async fn upsert_cluster(&self, _c: &sefs_core::models::ClusterRecord) -> sefs_core::errors::SefsResult<()> {
            Ok(())
        }
        async fn get_all_clusters(&self) -> sefs_core::errors::SefsResult<Vec<sefs_core::models::ClusterRecord>> {
            Ok(Vec::new())
        }
        async fn replace_all_clusters(&self, _c: &[sefs_core::models::ClusterRecord]) -> sefs_core::errors::SefsResult<()> {
            Ok(())
        }
        async fn add_event(
            &self,
            _f: Option<i64>,
            _t: sefs_core::models::EventType,
            _d: Option<&str>,
        ) -> sefs_core::errors::SefsResult<()> {
            Ok(())
        }
        async fn recent_events(&self, _limit: usize) -> sefs_core::errors::SefsResult<Vec<sefs_core::models::EventRecord>> {
            Ok(Vec::new())
        }
        async fn get_setting(&self, _k: &str) -> sefs_core::errors::SefsResult<Option<String>> {
            Ok(None)
        }
        async fn set_setting(&self, _k: &str, _v: &str) -> sefs_core::errors::SefsResult<()> {
            Ok(())
        }
        async fn get_all_settings(&self) -> sefs_core::errors::SefsResult<std::collections::HashMap<String, String>> {
            Ok(std::collections::HashMap::new())
        }
    }

    fn test_pipeline(dir: &Path) -> Arc<Pipeline> {
        let lock = sefs_sync::SyncLock::new();
        let recently_synced = sefs_sync::RecentlySyncedSet::new(Duration::from_secs(5));
        let sync_engine = sefs_sync::SyncEngine::new(dir.to_path_buf(), lock, recently_synced)
            .with_settle(Duration::from_millis(1));
        Arc::new(Pipeline::new(
            dir.to_path_buf(),
            Arc::new(MemStore::default()),
            Arc::new(CountingExtractor),
            Arc::new(NoopEmbedder),
            Arc::new(sync_engine),
            Arc::new(NullEventBus) as Arc<dyn EventBus>,
            ClusterConfig::default(),
        ))
    }

    #[tokio::test]
    async fn rapid_requests_collapse_into_a_single_run() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(dir.path());
        let scheduler = ReclusterScheduler::new(
            pipeline,
            &SchedulerConfig {
                debounce_ms: 20,
                cooldown_ms: 0,
            },
        );

        for _ in 0..5 {
            scheduler.request().await;
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn cooldown_skips_a_run_that_arrives_too_soon() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(dir.path());
        let scheduler = ReclusterScheduler::new(
            pipeline,
            &SchedulerConfig {
                debounce_ms: 5,
                cooldown_ms: 5_000,
            },
        );

        scheduler.request().await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        scheduler.request().await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(!scheduler.is_running());
    }
}

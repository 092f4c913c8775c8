use std::path::PathBuf;
use std::sync::Arc;

use sefs_core::config::ClusterConfig;
use sefs_core::models::{DegradationEvent, EventType};
use sefs_core::traits::{EmbeddingProvider, EventBus, Extractor, MetadataStore};
use sefs_observability::{DegradationTracker, MetricsCollector};
use sefs_sync::SyncEngine;
use serde_json::json;

/// Owns everything a single root's worth of ingestion, clustering, and
/// sync needs. One instance per active root; swapping roots means
/// building a new one, not mutating this one in place.
pub struct Pipeline {
    pub(crate) root: PathBuf,
    pub(crate) store: Arc<dyn MetadataStore>,
    pub(crate) extractor: Arc<dyn Extractor>,
    pub(crate) embedder: Arc<dyn EmbeddingProvider>,
    pub(crate) sync_engine: Arc<SyncEngine>,
    pub(crate) bus: Arc<dyn EventBus>,
    pub(crate) cluster_config: ClusterConfig,
    pub(crate) metrics: Option<Arc<MetricsCollector>>,
    pub(crate) degradation: Option<Arc<DegradationTracker>>,
}

impl Pipeline {
    pub fn new(
        root: PathBuf,
        store: Arc<dyn MetadataStore>,
        extractor: Arc<dyn Extractor>,
        embedder: Arc<dyn EmbeddingProvider>,
        sync_engine: Arc<SyncEngine>,
        bus: Arc<dyn EventBus>,
        cluster_config: ClusterConfig,
    ) -> Self {
        Self {
            root,
            store,
            extractor,
            embedder,
            sync_engine,
            bus,
            cluster_config,
            metrics: None,
            degradation: None,
        }
    }

    /// Attach a shared pipeline-stage metrics collector (§4.13). Optional:
    /// tests and one-off tooling may construct a `Pipeline` without one.
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Attach a shared degradation-event tracker (§4.13, §7).
    pub fn with_degradation_tracker(mut self, tracker: Arc<DegradationTracker>) -> Self {
        self.degradation = Some(tracker);
        self
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    pub(crate) fn record_stage(&self, stage: sefs_observability::StageKind, duration_ms: f64) {
        if let Some(metrics) = &self.metrics {
            metrics.record_stage(stage, duration_ms);
        }
    }

    pub(crate) fn record_file_processed(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.record_file_processed();
        }
    }

    pub(crate) fn record_degradation(&self, component: &str, failure: &str, fallback_used: &str) {
        if let Some(tracker) = &self.degradation {
            tracker.record(DegradationEvent {
                component: component.to_string(),
                failure: failure.to_string(),
                fallback_used: fallback_used.to_string(),
                timestamp: chrono::Utc::now(),
            });
        }
    }

    /// Persist an event and broadcast it. Persistence failures are logged
    /// and swallowed — a missed row in the events table must never abort
    /// the operation that triggered it.
    pub(crate) async fn emit(&self, event_type: EventType, file_id: Option<i64>, detail: Option<String>) {
        if let Err(e) = self.store.add_event(file_id, event_type, detail.as_deref()).await {
            tracing::warn!(error = %e, event = event_type.as_str(), "failed to persist event");
        }
        self.bus
            .broadcast(json!({
                "type": event_type.as_str(),
                "file_id": file_id,
                "detail": detail,
            }))
            .await;
    }
}

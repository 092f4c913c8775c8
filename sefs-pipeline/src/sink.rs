use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use sefs_watcher::IngestionSink;

use crate::pipeline::Pipeline;
use crate::scheduler::ReclusterScheduler;

/// Bridges a flushed watcher batch to the pipeline (§4.8, §4.10). A
/// successful ingest that doesn't land incrementally always falls back to
/// requesting a full recluster; a successful incremental placement still
/// requests one, since the scheduler's debounce+cooldown — not this sink —
/// is what keeps that cheap in the common case.
pub struct PipelineIngestionSink {
    pipeline: Arc<Pipeline>,
    scheduler: Arc<ReclusterScheduler>,
}

impl PipelineIngestionSink {
    pub fn new(pipeline: Arc<Pipeline>, scheduler: Arc<ReclusterScheduler>) -> Self {
        Self { pipeline, scheduler }
    }
}

#[async_trait]
impl IngestionSink for PipelineIngestionSink {
    async fn on_change(&self, path: PathBuf) {
        let outcome = match self.pipeline.process_file(&path).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ingestion failed for watcher change");
                return;
            }
        };

        let placed = match self.pipeline.try_incremental_assign(outcome.file_id()).await {
            Ok(placed) => placed,
            Err(e) => {
                tracing::warn!(file_id = outcome.file_id(), error = %e, "incremental assignment failed");
                false
            }
        };
        if !placed {
            tracing::debug!(file_id = outcome.file_id(), "incremental assignment declined, requesting full recluster");
        }
        self.scheduler.request().await;
    }

    async fn on_delete(&self, path: PathBuf) {
        match self.pipeline.remove_file(&path).await {
            Ok(true) => self.scheduler.request().await,
            Ok(false) => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "removal failed for watcher delete"),
        }
    }
}

use std::path::PathBuf;

use async_trait::async_trait;

/// The pipeline-facing callback surface a flushed batch is dispatched to.
/// Individual callback failures are the sink's problem to log and
/// swallow — the watcher never aborts a batch because one callback erred.
#[async_trait]
pub trait IngestionSink: Send + Sync {
    async fn on_change(&self, path: PathBuf);
    async fn on_delete(&self, path: PathBuf);
}

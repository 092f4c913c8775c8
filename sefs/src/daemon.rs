use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use sefs_api::SefsControlPlane;
use sefs_core::config::SefsConfig;
use sefs_core::traits::{EmbeddingProvider, Extractor, MetadataStore};
use sefs_embeddings::EmbeddingEngine;
use sefs_extractor::FileExtractor;
use sefs_observability::{init_tracing, MetricsCollector};
use sefs_pipeline::BroadcastEventBus;
use sefs_storage::SqliteMetadataStore;

/// Load config, open the global store, switch into the configured root,
/// and hand back a ready control plane with the watcher already running.
pub async fn start(config_path: Option<&Path>) -> anyhow::Result<Arc<SefsControlPlane>> {
    let mut config = SefsConfig::load(config_path)?;
    init_tracing(&config.observability);

    let data_dir = global_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let global_db_path = data_dir.join(&config.storage.global_db_filename);
    let store: Arc<dyn MetadataStore> = Arc::new(SqliteMetadataStore::open_global(
        &global_db_path,
        config.storage.read_pool_size,
        config.storage.busy_timeout_ms,
    )?);

    let stored_settings = store.get_all_settings().await?;
    config.apply_stored_settings(&stored_settings);

    let root = expand_home(&config.root.root_folder);
    std::fs::create_dir_all(&root)?;

    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(EmbeddingEngine::new(&config.embedding));
    let extractor: Arc<dyn Extractor> = Arc::new(FileExtractor::new());
    let bus = Arc::new(BroadcastEventBus::new());
    let metrics = Arc::new(MetricsCollector::new(config.observability.metrics_ring_capacity));

    let control_plane = SefsControlPlane::new(
        root.clone(),
        store,
        embedder,
        extractor,
        bus,
        metrics,
        config.cluster.clone(),
        config.scheduler.clone(),
        Duration::from_millis(config.sync.settle_ms),
        Duration::from_millis(config.watcher.debounce_ms),
        Duration::from_millis(config.sync.recently_synced_ttl_ms),
        config.storage.root_db_filename.clone(),
    )
    .await?;

    tracing::info!(root = %root.display(), "sefs daemon started");
    Ok(Arc::new(control_plane))
}

/// Directory holding the global settings database, outside any watched
/// root so switching roots never touches it.
fn global_data_dir() -> PathBuf {
    match std::env::var("SEFS_DATA_DIR") {
        Ok(v) => PathBuf::from(v),
        Err(_) => home_dir()
            .map(|h| h.join(".local/share/sefs"))
            .unwrap_or_else(|| PathBuf::from(".sefs-data")),
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand a single leading `~` the way shells do; `RootConfig`'s default
/// (`~/sefs_root`) and any operator-provided path both go through this.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_home_rewrites_a_leading_tilde() {
        std::env::set_var("HOME", "/home/tester");
        assert_eq!(expand_home("~/sefs_root"), PathBuf::from("/home/tester/sefs_root"));
    }

    #[test]
    fn expand_home_leaves_absolute_paths_untouched() {
        assert_eq!(expand_home("/var/sefs"), PathBuf::from("/var/sefs"));
    }
}

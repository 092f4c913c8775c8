mod cluster_config;
pub mod defaults;
mod embedding_config;
mod observability_config;
mod root_config;
mod scheduler_config;
mod storage_config;
mod sync_config;
mod watcher_config;

pub use cluster_config::ClusterConfig;
pub use embedding_config::{EmbeddingConfig, ProviderKind};
pub use observability_config::ObservabilityConfig;
pub use root_config::RootConfig;
pub use scheduler_config::SchedulerConfig;
pub use storage_config::StorageConfig;
pub use sync_config::SyncConfig;
pub use watcher_config::WatcherConfig;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::SefsResult;

/// The daemon's full configuration, assembled by layering (in increasing
/// priority): compiled-in defaults, an optional TOML file, environment
/// variables, then values loaded from the global settings store at startup.
/// The last layer is applied by the storage crate once it can open the
/// settings table; this struct only covers the first three.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SefsConfig {
    pub root: RootConfig,
    pub watcher: WatcherConfig,
    pub scheduler: SchedulerConfig,
    pub sync: SyncConfig,
    pub embedding: EmbeddingConfig,
    pub cluster: ClusterConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl SefsConfig {
    /// Load defaults, overlay an optional TOML config file, then overlay
    /// a small set of environment variables that operators commonly set
    /// without editing a file.
    pub fn load(config_path: Option<&Path>) -> SefsResult<Self> {
        let mut config = match config_path {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(path)?;
                toml::from_str(&raw)
                    .map_err(|e| crate::errors::SefsError::Config(e.to_string()))?
            }
            _ => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SEFS_ROOT_FOLDER") {
            self.root.root_folder = v;
        }
        if let Ok(v) = std::env::var("SEFS_HOST") {
            self.root.host = v;
        }
        if let Ok(v) = std::env::var("SEFS_PORT") {
            if let Ok(port) = v.parse() {
                self.root.port = port;
            }
        }
        if let Ok(v) = std::env::var("SEFS_PROVIDER") {
            self.embedding.provider = match v.to_lowercase().as_str() {
                "remote" => ProviderKind::Remote,
                _ => ProviderKind::Local,
            };
        }
        if let Ok(v) = std::env::var("SEFS_REMOTE_API_KEY") {
            self.embedding.remote_api_key = v;
        }
        if let Ok(v) = std::env::var("SEFS_LOG_LEVEL") {
            self.observability.log_level = v;
        }
    }

    /// Merge persisted settings-store values (loaded by sefs-storage at
    /// startup) on top of the file+env layers. Unknown keys are ignored.
    pub fn apply_stored_settings(&mut self, stored: &std::collections::HashMap<String, String>) {
        if let Some(v) = stored.get("provider") {
            self.embedding.provider = match v.to_lowercase().as_str() {
                "remote" => ProviderKind::Remote,
                _ => ProviderKind::Local,
            };
        }
        if let Some(v) = stored.get("remote_api_key") {
            self.embedding.remote_api_key = v.clone();
        }
        if let Some(v) = stored.get("remote_embed_model") {
            self.embedding.remote_embed_model = v.clone();
        }
        if let Some(v) = stored.get("remote_llm_model") {
            self.embedding.remote_llm_model = v.clone();
        }
        if let Some(v) = stored.get("local_host") {
            self.embedding.local_host = v.clone();
        }
        if let Some(v) = stored.get("local_embed_model") {
            self.embedding.local_embed_model = v.clone();
        }
        if let Some(v) = stored.get("local_llm_model") {
            self.embedding.local_llm_model = v.clone();
        }
        if let Some(v) = stored.get("root_folder") {
            self.root.root_folder = v.clone();
        }
    }
}

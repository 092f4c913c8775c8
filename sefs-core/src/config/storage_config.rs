use serde::{Deserialize, Serialize};

use super::defaults;

/// Metadata store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Filename of the per-root store, created inside the watched root.
    pub root_db_filename: String,
    /// Filename of the global store (provider/settings), next to the binary's data dir.
    pub global_db_filename: String,
    /// Number of read-only connections in the read pool.
    pub read_pool_size: usize,
    pub busy_timeout_ms: u32,
    pub recent_events_default_limit: usize,
    pub recent_events_max_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_db_filename: defaults::DEFAULT_ROOT_DB_FILENAME.to_string(),
            global_db_filename: defaults::DEFAULT_GLOBAL_DB_FILENAME.to_string(),
            read_pool_size: defaults::DEFAULT_READ_POOL_SIZE,
            busy_timeout_ms: defaults::DEFAULT_BUSY_TIMEOUT_MS,
            recent_events_default_limit: defaults::DEFAULT_RECENT_EVENTS_LIMIT,
            recent_events_max_limit: defaults::DEFAULT_RECENT_EVENTS_MAX,
        }
    }
}

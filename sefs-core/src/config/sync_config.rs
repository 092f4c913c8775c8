use serde::{Deserialize, Serialize};

use super::defaults;

/// Sync engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// How long the sync lock is held after the last move, to absorb late
    /// filesystem notifications.
    pub settle_ms: u64,
    /// TTL for entries in the recently-synced path shield.
    pub recently_synced_ttl_ms: u64,
    /// Folder name used for noise/uncategorised files.
    pub uncategorised_folder: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            settle_ms: defaults::DEFAULT_SYNC_SETTLE_MS,
            recently_synced_ttl_ms: defaults::DEFAULT_RECENTLY_SYNCED_TTL_MS,
            uncategorised_folder: defaults::DEFAULT_UNCATEGORISED_FOLDER.to_string(),
        }
    }
}

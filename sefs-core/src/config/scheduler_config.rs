use serde::{Deserialize, Serialize};

use super::defaults;

/// Recluster scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Delay after the last `request()` before a recluster actually runs.
    pub debounce_ms: u64,
    /// Minimum gap between two consecutive reclusters.
    pub cooldown_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: defaults::DEFAULT_RECLUSTER_DEBOUNCE_MS,
            cooldown_ms: defaults::DEFAULT_RECLUSTER_COOLDOWN_MS,
        }
    }
}

use serde::{Deserialize, Serialize};

use super::defaults;

/// Observability subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub log_level: String,
    /// Log output format: "pretty" or "json".
    pub log_format: String,
    /// Ring buffer capacity for pipeline stage duration samples.
    pub metrics_ring_capacity: usize,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: defaults::DEFAULT_LOG_FORMAT.to_string(),
            metrics_ring_capacity: defaults::DEFAULT_METRICS_RING_CAPACITY,
        }
    }
}

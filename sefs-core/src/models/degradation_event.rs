use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Recorded whenever a subsystem falls back to a lower-quality path: an
/// embedding call returning a zero vector, a namer falling back to keyword
/// extraction, a dimension that had to be padded or truncated.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DegradationEvent {
    pub component: String,
    pub failure: String,
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}

/// Snapshot of whether the active embedding/LLM provider answered its last call.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthReport {
    pub provider: String,
    pub available: bool,
    pub checked_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Event types emitted onto the bus. `kind()` gives the wire tag used in the
/// `type` field of a broadcast and in the `events` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ProcessingStart,
    FileAdded,
    FileModified,
    FileRemoved,
    ReclusteringStart,
    ReclusteringEnd,
    ScanStart,
    ScanComplete,
    ReembeddingStart,
    ReembeddingEnd,
    RootSwitching,
    RootSwitched,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ProcessingStart => "processing_start",
            EventType::FileAdded => "file_added",
            EventType::FileModified => "file_modified",
            EventType::FileRemoved => "file_removed",
            EventType::ReclusteringStart => "reclustering_start",
            EventType::ReclusteringEnd => "reclustering_end",
            EventType::ScanStart => "scan_start",
            EventType::ScanComplete => "scan_complete",
            EventType::ReembeddingStart => "reembedding_start",
            EventType::ReembeddingEnd => "reembedding_end",
            EventType::RootSwitching => "root_switching",
            EventType::RootSwitched => "root_switched",
        }
    }
}

/// An append-only log entry persisted in the per-root store.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EventRecord {
    pub id: i64,
    pub file_id: Option<i64>,
    pub event_type: EventType,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

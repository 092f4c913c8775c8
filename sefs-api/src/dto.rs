//! Wire-agnostic DTOs for the control-plane surface (§6). These are the
//! shapes the (out-of-scope) REST/WebSocket layer serializes; `ts-rs`
//! exports them to the frontend's TypeScript types the same way the core
//! models already do.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Response to the `status` op.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusResponse {
    pub root: String,
    pub file_count: usize,
    pub cluster_count: usize,
}

/// Input to `semantic_search`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SearchQuery {
    pub query: String,
    pub limit: usize,
}

/// One ranked hit from `semantic_search` or `related`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SearchHit {
    pub file_id: i64,
    pub filename: String,
    pub cluster_id: i64,
    pub score: f64,
}

/// Response to `rescan`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RescanResponse {
    pub files_processed: usize,
}

/// Input to `switch_root`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SwitchRootRequest {
    pub new_path: String,
}

/// Response to `metrics` (§4.13).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MetricsResponse {
    pub avg_extraction_ms: f64,
    pub avg_embedding_ms: f64,
    pub avg_clustering_ms: f64,
    pub last_clustering_ms: Option<f64>,
    pub total_files_processed: u64,
    pub provider_available: bool,
    pub degraded_event_count: usize,
}

/// One SSE event emitted by `RAG-chat` (§6): `sources` carries the
/// retrieved context, `token` is an incremental completion chunk, `done`
/// terminates the stream, `error` surfaces a failure instead of silently
/// truncating the response.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum ChatEvent {
    Sources { hits: Vec<SearchHit> },
    Token { text: String },
    Done,
    Error { message: String },
}

/// Input to `RAG-chat`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatRequest {
    pub message: String,
}

/// A bus event as framed over the (out-of-scope) SSE/WebSocket transport:
/// `data: <json>\n\n` per §6, where `<json>` is this struct.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StreamEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub file_id: Option<i64>,
    pub detail: Option<String>,
    pub at: DateTime<Utc>,
}

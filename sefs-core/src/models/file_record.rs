use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Sentinel cluster id for files that don't meet the similarity threshold to
/// any other cluster ("Uncategorised" / "Noise").
pub const UNCATEGORISED_CLUSTER_ID: i64 = -1;

/// One tracked file. `original_path` is unique; `content_hash` is the stable
/// identity used to disambiguate a user-initiated move from a delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FileRecord {
    pub id: i64,
    pub original_path: String,
    pub current_path: String,
    pub filename: String,
    pub content_hash: String,
    pub file_type: Option<String>,
    pub size_bytes: u64,
    pub word_count: u32,
    pub page_count: u32,
    pub summary: Option<String>,
    #[ts(skip)]
    pub embedding: Option<Vec<f32>>,
    pub embed_model: Option<String>,
    pub cluster_id: i64,
    pub umap_x: f64,
    pub umap_y: f64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl FileRecord {
    /// Whether this record carries a usable (non-empty, non-all-zero) embedding.
    pub fn has_embedding(&self) -> bool {
        matches!(&self.embedding, Some(v) if v.iter().any(|x| *x != 0.0))
    }
}

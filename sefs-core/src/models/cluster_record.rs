use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::file_record::UNCATEGORISED_CLUSTER_ID;

/// One cluster. The folder basename under the root always equals `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClusterRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub folder_path: String,
    #[ts(skip)]
    pub centroid: Option<Vec<f32>>,
    pub file_count: usize,
    pub created_at: DateTime<Utc>,
}

impl ClusterRecord {
    pub fn is_uncategorised(&self) -> bool {
        self.id == UNCATEGORISED_CLUSTER_ID
    }
}

use serde::{Deserialize, Serialize};

use super::defaults;

/// Clustering policy configuration. The threshold values here are tuning
/// parameters, not structural invariants of the algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Below this many embedded files, clustering is skipped (fixed layout).
    pub min_files_for_clustering: usize,
    /// At or below this count, use agglomerative clustering instead of
    /// density-based clustering.
    pub small_collection_threshold: usize,
    /// Average-linkage cosine-distance cut for agglomerative clustering.
    pub agglomerative_distance_threshold: f64,
    /// Minimum cosine similarity for smart noise reassignment and for
    /// incremental single-file assignment.
    pub noise_similarity_threshold: f64,
    pub hdbscan_min_cluster_size: usize,
    pub hdbscan_min_samples: usize,
    pub umap_min_dist: f64,
    pub umap_max_neighbors: usize,
    /// 2D coordinates are rescaled to [-bound, bound] on both axes.
    pub projection_bound: f64,
    pub max_representative_texts: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            min_files_for_clustering: defaults::DEFAULT_MIN_FILES_FOR_CLUSTERING,
            small_collection_threshold: defaults::DEFAULT_SMALL_COLLECTION_THRESHOLD,
            agglomerative_distance_threshold: defaults::DEFAULT_AGGLOMERATIVE_DISTANCE_THRESHOLD,
            noise_similarity_threshold: defaults::DEFAULT_NOISE_SIMILARITY_THRESHOLD,
            hdbscan_min_cluster_size: defaults::DEFAULT_HDBSCAN_MIN_CLUSTER_SIZE,
            hdbscan_min_samples: defaults::DEFAULT_HDBSCAN_MIN_SAMPLES,
            umap_min_dist: defaults::DEFAULT_UMAP_MIN_DIST,
            umap_max_neighbors: defaults::DEFAULT_UMAP_MAX_NEIGHBORS,
            projection_bound: defaults::DEFAULT_PROJECTION_BOUND,
            max_representative_texts: defaults::DEFAULT_MAX_REPRESENTATIVE_TEXTS,
        }
    }
}

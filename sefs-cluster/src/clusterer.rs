//! Top-level clustering policy (§4.4): fixed layout for tiny collections,
//! agglomerative for small ones, density-based for larger ones with a
//! fallback to agglomerative, then smart noise reassignment and a 2D
//! projection for visualization.

use std::collections::HashMap;

use sefs_core::config::defaults;

use crate::similarity::centroid;
use crate::{agglomerative, density, noise, projection};

/// Cluster assignments plus a 2D visualization coordinate per input row.
/// `labels[i]` is a non-negative cluster id or `-1` for noise; `coords[i]`
/// is always within `[-400, 400]` on both axes.
#[derive(Debug, Clone)]
pub struct ClusterOutput {
    pub labels: Vec<i64>,
    pub coords: Vec<(f64, f64)>,
}

/// Cluster `embeddings` (one row per file, dimension-uniform) per the
/// policy in §4.4. Callers are expected to have already dropped fewer
/// than the clustering floor down to the trivial-layout paths that live
/// outside this function (a single file, zero files); this function
/// handles everything from `N >= 1` upward but the N < 3 fixed-layout
/// branch is still applied here for N in {1, 2}.
pub fn cluster(embeddings: &[Vec<f32>]) -> ClusterOutput {
    let n = embeddings.len();
    if n == 0 {
        return ClusterOutput {
            labels: Vec::new(),
            coords: Vec::new(),
        };
    }
    if n < defaults::DEFAULT_MIN_FILES_FOR_CLUSTERING {
        return fixed_layout(n);
    }

    let mut labels = if n <= defaults::DEFAULT_SMALL_COLLECTION_THRESHOLD {
        agglomerative::cluster(embeddings, defaults::DEFAULT_AGGLOMERATIVE_DISTANCE_THRESHOLD)
    } else {
        density::cluster(embeddings)
            .unwrap_or_else(|| agglomerative::cluster(embeddings, defaults::DEFAULT_AGGLOMERATIVE_DISTANCE_THRESHOLD))
    };

    noise::reassign(embeddings, &mut labels);

    let coords = projection::project(embeddings);
    ClusterOutput { labels, coords }
}

/// N=1: a single point at the origin. N=2: two points on a line through
/// the origin. Both receive label 0 (there is exactly one cluster).
fn fixed_layout(n: usize) -> ClusterOutput {
    let coords = match n {
        1 => vec![(0.0, 0.0)],
        2 => vec![(-200.0, 0.0), (200.0, 0.0)],
        _ => unreachable!("fixed_layout is only called for n < 3"),
    };
    ClusterOutput {
        labels: vec![0; n],
        coords,
    }
}

/// Arithmetic-mean centroid per non-noise label, grouped from `embeddings`
/// and `labels` (parallel arrays). Noise (`-1`) is excluded.
pub fn centroids_by_label(embeddings: &[Vec<f32>], labels: &[i64]) -> HashMap<i64, Vec<f32>> {
    let mut members: HashMap<i64, Vec<&Vec<f32>>> = HashMap::new();
    for (emb, &label) in embeddings.iter().zip(labels.iter()) {
        if label >= 0 {
            members.entry(label).or_default().push(emb);
        }
    }
    members
        .into_iter()
        .map(|(label, vecs)| (label, centroid(&vecs)))
        .collect()
}

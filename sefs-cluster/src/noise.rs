//! Smart noise reassignment: pull noise points into an existing cluster
//! when they're similar enough to its centroid, rather than leaving every
//! borderline point uncategorised.

use std::collections::HashMap;

use sefs_core::config::defaults;

use crate::similarity::{centroid, cosine_similarity};

/// For each point labeled `-1`, compute the centroid of every non-noise
/// cluster and reassign the point to the nearest one if the cosine
/// similarity is at least the noise-assignment threshold. Mutates `labels`
/// in place.
pub fn reassign(embeddings: &[Vec<f32>], labels: &mut [i64]) {
    let mut members: HashMap<i64, Vec<&Vec<f32>>> = HashMap::new();
    for (emb, &label) in embeddings.iter().zip(labels.iter()) {
        if label >= 0 {
            members.entry(label).or_default().push(emb);
        }
    }
    if members.is_empty() {
        return;
    }

    let centroids: HashMap<i64, Vec<f32>> = members
        .into_iter()
        .map(|(label, vecs)| (label, centroid(&vecs)))
        .collect();

    for (emb, label) in embeddings.iter().zip(labels.iter_mut()) {
        if *label >= 0 {
            continue;
        }
        let mut best: Option<(i64, f64)> = None;
        for (&cand_label, cand_centroid) in &centroids {
            let sim = cosine_similarity(emb, cand_centroid);
            if best.map(|(_, s)| sim > s).unwrap_or(true) {
                best = Some((cand_label, sim));
            }
        }
        if let Some((cand_label, sim)) = best {
            if sim >= defaults::DEFAULT_NOISE_SIMILARITY_THRESHOLD {
                *label = cand_label;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_point_close_to_a_cluster_is_absorbed() {
        let embeddings = vec![
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![0.99, 0.01], // noise, but nearly identical to the cluster above
        ];
        let mut labels = vec![0, 0, -1];
        reassign(&embeddings, &mut labels);
        assert_eq!(labels[2], 0);
    }

    #[test]
    fn noise_point_far_from_everything_stays_noise() {
        let embeddings = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];
        let mut labels = vec![0, 0, -1];
        reassign(&embeddings, &mut labels);
        assert_eq!(labels[2], -1);
    }

    #[test]
    fn no_clusters_leaves_noise_untouched() {
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let mut labels = vec![-1, -1];
        reassign(&embeddings, &mut labels);
        assert_eq!(labels, vec![-1, -1]);
    }
}

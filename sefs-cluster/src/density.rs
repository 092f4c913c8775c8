//! Density-based clustering for larger collections via the `hdbscan` crate,
//! grounded on the phase-2 consolidation clustering pass: L2-normalize so
//! Euclidean distance ranks the same as cosine similarity, then hand the
//! matrix to `Hdbscan`.

use hdbscan::{Hdbscan, HdbscanHyperParams};

use sefs_core::config::defaults;

/// Run HDBSCAN on L2-normalized embeddings. Returns `None` if the crate
/// itself fails (degenerate input) or if every point came back as noise —
/// both cases fall back to the agglomerative pass on the caller's side.
pub fn cluster(embeddings: &[Vec<f32>]) -> Option<Vec<i64>> {
    let normalized: Vec<Vec<f64>> = embeddings.iter().map(|v| l2_normalize(v)).collect();

    let hyper_params = HdbscanHyperParams::builder()
        .min_cluster_size(defaults::DEFAULT_HDBSCAN_MIN_CLUSTER_SIZE)
        .min_samples(defaults::DEFAULT_HDBSCAN_MIN_SAMPLES)
        .build();

    let clusterer = Hdbscan::new(&normalized, hyper_params);
    let labels = clusterer.cluster().ok()?;

    if labels.iter().all(|&l| l < 0) {
        return None;
    }

    Some(labels.into_iter().map(|l| l as i64).collect())
}

fn l2_normalize(v: &[f32]) -> Vec<f64> {
    let norm: f64 = v.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm < f64::EPSILON {
        return vec![0.0; v.len()];
    }
    v.iter().map(|x| *x as f64 / norm).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_vector_normalizes_without_panicking() {
        assert_eq!(l2_normalize(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn normalized_vector_has_unit_length() {
        let n = l2_normalize(&[3.0, 4.0]);
        let len = (n[0] * n[0] + n[1] * n[1]).sqrt();
        assert!((len - 1.0).abs() < 1e-9);
    }
}

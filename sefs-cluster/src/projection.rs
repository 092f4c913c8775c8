//! 2D projection for visualization only — never fed back into cluster
//! assignment. Primary path is a force-directed layout seeded from
//! pairwise cosine similarity (a neighborhood-preserving approximation of
//! UMAP, since no UMAP crate is in the dependency stack); falls back to
//! 2-component PCA via power iteration when the force layout can't
//! converge (too few points for a neighbor graph, or a degenerate input).

use sefs_core::config::defaults;

use crate::similarity::cosine_similarity;

/// Project `embeddings` to 2D coordinates, rescaled per-axis to
/// `[-DEFAULT_PROJECTION_BOUND, DEFAULT_PROJECTION_BOUND]`.
pub fn project(embeddings: &[Vec<f32>]) -> Vec<(f64, f64)> {
    let n = embeddings.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![(0.0, 0.0)];
    }

    let raw = force_directed(embeddings).unwrap_or_else(|| pca_2d(embeddings));
    rescale(raw)
}

/// A lightweight force-directed layout: nodes attract proportionally to
/// cosine similarity (nearest neighbors first) and repel otherwise,
/// relaxed over a fixed number of iterations from a deterministic
/// circular initial layout. Returns `None` if there are too few neighbors
/// to form a meaningful graph.
fn force_directed(embeddings: &[Vec<f32>]) -> Option<Vec<(f64, f64)>> {
    let n = embeddings.len();
    let k = defaults::DEFAULT_UMAP_MAX_NEIGHBORS.min(n.saturating_sub(1));
    if k == 0 {
        return None;
    }

    let mut sims = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let s = cosine_similarity(&embeddings[i], &embeddings[j]);
            sims[i][j] = s;
            sims[j][i] = s;
        }
    }

    // Deterministic circular seed layout.
    let mut pos: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            (theta.cos(), theta.sin())
        })
        .collect();

    let min_dist = defaults::DEFAULT_UMAP_MIN_DIST;
    const ITERATIONS: usize = 50;
    const LEARNING_RATE: f64 = 0.05;

    for _ in 0..ITERATIONS {
        let mut forces = vec![(0.0f64, 0.0f64); n];
        for i in 0..n {
            // k nearest neighbors by similarity attract toward the target
            // distance implied by (1 - similarity); everyone else repels
            // softly so the layout doesn't collapse to a point.
            let mut neighbors: Vec<usize> = (0..n).filter(|&j| j != i).collect();
            neighbors.sort_by(|&a, &b| sims[i][b].partial_cmp(&sims[i][a]).unwrap());
            neighbors.truncate(k);

            for j in 0..n {
                if j == i {
                    continue;
                }
                let dx = pos[j].0 - pos[i].0;
                let dy = pos[j].1 - pos[i].1;
                let dist = (dx * dx + dy * dy).sqrt().max(1e-6);
                if neighbors.contains(&j) {
                    let target = (1.0 - sims[i][j]).max(min_dist);
                    let delta = dist - target;
                    forces[i].0 += delta * dx / dist;
                    forces[i].1 += delta * dy / dist;
                } else {
                    let repulsion = 1.0 / (dist * dist);
                    forces[i].0 -= repulsion * dx / dist;
                    forces[i].1 -= repulsion * dy / dist;
                }
            }
        }
        for i in 0..n {
            pos[i].0 += LEARNING_RATE * forces[i].0;
            pos[i].1 += LEARNING_RATE * forces[i].1;
        }
    }

    if pos.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return None;
    }
    Some(pos)
}

/// 2-component PCA via power iteration on the covariance matrix. Always
/// converges for n >= 2, used as the projector's fallback.
fn pca_2d(embeddings: &[Vec<f32>]) -> Vec<(f64, f64)> {
    let n = embeddings.len();
    let dim = embeddings[0].len();
    if dim == 0 {
        return vec![(0.0, 0.0); n];
    }

    let mean: Vec<f64> = (0..dim)
        .map(|d| embeddings.iter().map(|v| v[d] as f64).sum::<f64>() / n as f64)
        .collect();
    let centered: Vec<Vec<f64>> = embeddings
        .iter()
        .map(|v| v.iter().zip(&mean).map(|(x, m)| *x as f64 - m).collect())
        .collect();

    let pc1 = power_iteration(&centered, dim, None);
    let pc2 = power_iteration(&centered, dim, Some(&pc1));

    centered
        .iter()
        .map(|v| (dot(v, &pc1), dot(v, &pc2)))
        .collect()
}

fn power_iteration(centered: &[Vec<f64>], dim: usize, deflate_against: Option<&[f64]>) -> Vec<f64> {
    let mut vector = vec![1.0 / (dim as f64).sqrt(); dim];
    const ITERATIONS: usize = 100;

    for _ in 0..ITERATIONS {
        let mut next = vec![0.0; dim];
        for row in centered {
            let proj = dot(row, &vector);
            for (n, x) in next.iter_mut().zip(row.iter()) {
                *n += proj * x;
            }
        }
        if let Some(prior) = deflate_against {
            let overlap = dot(&next, prior);
            for (n, p) in next.iter_mut().zip(prior.iter()) {
                *n -= overlap * p;
            }
        }
        let norm = next.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm < 1e-12 {
            break;
        }
        vector = next.into_iter().map(|x| x / norm).collect();
    }
    vector
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Min-max rescale each axis independently to
/// `[-DEFAULT_PROJECTION_BOUND, DEFAULT_PROJECTION_BOUND]`. A constant
/// axis (min == max) maps to 0.
fn rescale(points: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    let bound = defaults::DEFAULT_PROJECTION_BOUND;
    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();

    let scale_axis = |values: &[f64], v: f64| -> f64 {
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if (max - min).abs() < f64::EPSILON {
            0.0
        } else {
            (v - min) / (max - min) * (2.0 * bound) - bound
        }
    };

    points
        .into_iter()
        .map(|(x, y)| (scale_axis(&xs, x), scale_axis(&ys, y)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_point_projects_to_origin() {
        assert_eq!(project(&[vec![1.0, 2.0, 3.0]]), vec![(0.0, 0.0)]);
    }

    #[test]
    fn coordinates_stay_within_bounds() {
        let embeddings: Vec<Vec<f32>> = (0..10)
            .map(|i| vec![i as f32, (i * 2) as f32, (10 - i) as f32])
            .collect();
        let coords = project(&embeddings);
        assert_eq!(coords.len(), 10);
        for (x, y) in coords {
            assert!(x >= -400.0001 && x <= 400.0001);
            assert!(y >= -400.0001 && y <= 400.0001);
        }
    }

    #[test]
    fn pca_handles_constant_dimension() {
        let embeddings = vec![vec![1.0, 5.0], vec![2.0, 5.0], vec![3.0, 5.0]];
        let coords = pca_2d(&embeddings);
        assert_eq!(coords.len(), 3);
        assert!(coords.iter().all(|(x, y)| x.is_finite() && y.is_finite()));
    }
}

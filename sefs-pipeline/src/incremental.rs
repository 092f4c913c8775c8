use std::collections::HashMap;

use rand::Rng;
use sefs_core::errors::SefsResult;
use sefs_core::models::{ClusterRecord, FileRecord};
use sefs_core::traits::reconcile_dim;
use sefs_sync::SyncPlanEntry;

use crate::pipeline::Pipeline;

impl Pipeline {
    /// Try to place `file_id` into an existing cluster without a full
    /// recluster (§4.10). Returns `false` when there are no real clusters
    /// yet, the file has no usable embedding, or the best candidate falls
    /// below the noise-assignment threshold — in every such case the
    /// caller falls back to requesting a full recluster instead.
    pub async fn try_incremental_assign(&self, file_id: i64) -> SefsResult<bool> {
        let clusters: Vec<ClusterRecord> = self
            .store
            .get_all_clusters()
            .await?
            .into_iter()
            .filter(|c| !c.is_uncategorised())
            .collect();
        if clusters.is_empty() {
            return Ok(false);
        }

        let Some(file) = self.store.get_file_by_id(file_id).await? else {
            return Ok(false);
        };
        let Some(embedding) = file.embedding.clone().filter(|e| e.iter().any(|x| *x != 0.0)) else {
            return Ok(false);
        };

        let all_files = self.store.get_all_files().await?;
        let mut members_by_cluster: HashMap<i64, Vec<&FileRecord>> = HashMap::new();
        for f in &all_files {
            if f.id != file_id && f.has_embedding() {
                members_by_cluster.entry(f.cluster_id).or_default().push(f);
            }
        }

        let mut best: Option<(&ClusterRecord, f64, Vec<&FileRecord>)> = None;
        for cluster in &clusters {
            let members = members_by_cluster.get(&cluster.id).cloned().unwrap_or_default();
            let live_centroid = if members.is_empty() {
                match &cluster.centroid {
                    Some(c) => c.clone(),
                    None => continue,
                }
            } else {
                let refs: Vec<&Vec<f32>> = members.iter().filter_map(|f| f.embedding.as_ref()).collect();
                sefs_cluster::similarity::centroid(&refs)
            };

            let reconciled = reconcile_dim(embedding.clone(), live_centroid.len());
            let similarity = sefs_cluster::similarity::cosine_similarity(&reconciled, &live_centroid);
            if best.as_ref().map(|(_, s, _)| similarity > *s).unwrap_or(true) {
                best = Some((cluster, similarity, members));
            }
        }

        let Some((cluster, similarity, members)) = best else {
            return Ok(false);
        };
        if similarity < self.cluster_config.noise_similarity_threshold {
            tracing::debug!(file_id, similarity, "incremental assignment below threshold");
            return Ok(false);
        }

        let (mean_x, mean_y) = if members.is_empty() {
            (0.0, 0.0)
        } else {
            let n = members.len() as f64;
            (
                members.iter().map(|f| f.umap_x).sum::<f64>() / n,
                members.iter().map(|f| f.umap_y).sum::<f64>() / n,
            )
        };
        let jitter = self.cluster_config.projection_bound * 0.02;
        let (x, y) = {
            let mut rng = rand::thread_rng();
            (mean_x + rng.gen_range(-jitter..=jitter), mean_y + rng.gen_range(-jitter..=jitter))
        };

        let mut names = HashMap::new();
        names.insert(cluster.id, cluster.name.clone());
        let plan = vec![SyncPlanEntry {
            file_id: file.id,
            current_path: Some(file.current_path.clone()),
            original_path: file.original_path.clone(),
            filename: file.filename.clone(),
            cluster_id: cluster.id,
        }];
        let results = self.sync_engine.sync_files_to_folders(&plan, &names).await;
        if let Some(result) = results.into_iter().find(|r| r.file_id == file.id) {
            self.store
                .update_file_paths(file.id, &result.new_path, &result.new_filename)
                .await?;
        }
        self.store.update_file_cluster(file.id, cluster.id, x, y).await?;

        let new_centroid = running_mean_centroid(cluster.centroid.as_deref(), cluster.file_count, &embedding);
        let updated = ClusterRecord {
            centroid: Some(new_centroid),
            file_count: cluster.file_count + 1,
            ..cluster.clone()
        };
        self.store.upsert_cluster(&updated).await?;

        tracing::info!(file_id, cluster_id = cluster.id, similarity, "incremental assignment placed file");
        Ok(true)
    }
}

fn running_mean_centroid(existing: Option<&[f32]>, existing_count: usize, new_vec: &[f32]) -> Vec<f32> {
    match existing {
        Some(centroid) if existing_count > 0 => {
            let reconciled = reconcile_dim(new_vec.to_vec(), centroid.len());
            let n = existing_count as f32;
            centroid
                .iter()
                .zip(reconciled.iter())
                .map(|(c, v)| (c * n + v) / (n + 1.0))
                .collect()
        }
        _ => new_vec.to_vec(),
    }
}

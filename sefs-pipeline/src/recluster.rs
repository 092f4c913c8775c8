use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use sefs_core::config::defaults;
use sefs_core::errors::SefsResult;
use sefs_core::models::{ClusterRecord, EventType, FileRecord, UNCATEGORISED_CLUSTER_ID};
use sefs_core::traits::reconcile_dim;
use sefs_observability::StageKind;
use sefs_sync::SyncPlanEntry;

use crate::pipeline::Pipeline;

/// Counts folded into the `reclustering_end` event (§4.9 step 12).
#[derive(Debug, Default, Clone, Copy)]
pub struct ReclusterSummary {
    pub files_processed: usize,
    pub clusters_produced: usize,
    pub moves_performed: usize,
}

impl Pipeline {
    /// Run the full recluster sequence: repair, dimension migration,
    /// cluster, name, atomically replace the cluster set, reassign every
    /// file, and sync the on-disk layout to match (§4.9).
    pub async fn full_recluster(&self) -> SefsResult<ReclusterSummary> {
        self.emit(EventType::ReclusteringStart, None, None).await;

        let repair_summary = self.repair().await?;

        let mut files = self.store.get_all_files().await?;
        files.retain(FileRecord::has_embedding);

        if files.len() < 2 {
            if let Some(only) = files.first() {
                self.write_single_file_cluster(only).await?;
            }
            let summary = ReclusterSummary {
                files_processed: files.len(),
                clusters_produced: if files.is_empty() { 0 } else { 1 },
                moves_performed: 0,
            };
            self.emit(
                EventType::ReclusteringEnd,
                None,
                Some(format!("files={} (below clustering floor)", summary.files_processed)),
            )
            .await;
            return Ok(summary);
        }

        let target_dim = self.embedder.expected_dim();
        let mut migrated = Vec::with_capacity(files.len());
        for file in files {
            if let Some(file) = self.reconcile_file_dimension(file, target_dim).await {
                migrated.push(file);
            }
        }
        if migrated.len() < 2 {
            let summary = ReclusterSummary {
                files_processed: migrated.len(),
                clusters_produced: 0,
                moves_performed: 0,
            };
            self.emit(
                EventType::ReclusteringEnd,
                None,
                Some("insufficient embeddings survived dimension migration".to_string()),
            )
            .await;
            return Ok(summary);
        }

        let embeddings: Vec<Vec<f32>> = migrated
            .iter()
            .map(|f| f.embedding.clone().expect("migrated files carry an embedding"))
            .collect();
        let cluster_start = Instant::now();
        let output = sefs_cluster::cluster(&embeddings);
        self.record_stage(StageKind::Clustering, cluster_start.elapsed().as_secs_f64() * 1000.0);
        let centroids = sefs_cluster::centroids_by_label(&embeddings, &output.labels);

        let mut members_by_label: HashMap<i64, Vec<usize>> = HashMap::new();
        for (idx, &label) in output.labels.iter().enumerate() {
            members_by_label.entry(label).or_default().push(idx);
        }

        let mut labels_sorted: Vec<i64> = members_by_label.keys().copied().collect();
        labels_sorted.sort_unstable();

        let mut cluster_records = Vec::new();
        let mut chosen_names = Vec::new();
        let mut noise_count = 0usize;

        for label in labels_sorted {
            let indices = &members_by_label[&label];
            if label < 0 {
                noise_count = indices.len();
                continue;
            }

            let texts: Vec<String> = indices
                .iter()
                .take(self.cluster_config.max_representative_texts)
                .map(|&i| self.representative_text(&migrated[i]))
                .collect();
            if !self.embedder.is_available() {
                self.record_degradation("namer", "active provider unavailable", "keyword fallback naming");
            }
            let name = sefs_cluster::name_cluster(&*self.embedder, &texts, &chosen_names).await;
            chosen_names.push(name.clone());

            cluster_records.push(ClusterRecord {
                id: label,
                folder_path: self.root.join(&name).display().to_string(),
                name,
                description: None,
                centroid: centroids.get(&label).cloned(),
                file_count: indices.len(),
                created_at: Utc::now(),
            });
        }

        if noise_count > 0 {
            let name = defaults::DEFAULT_UNCATEGORISED_FOLDER.to_string();
            cluster_records.push(ClusterRecord {
                id: UNCATEGORISED_CLUSTER_ID,
                folder_path: self.root.join(&name).display().to_string(),
                name,
                description: None,
                centroid: None,
                file_count: noise_count,
                created_at: Utc::now(),
            });
        }

        self.store.replace_all_clusters(&cluster_records).await?;

        let assignments: Vec<(i64, i64, f64, f64)> = migrated
            .iter()
            .zip(output.labels.iter())
            .zip(output.coords.iter())
            .map(|((file, &label), &(x, y))| (file.id, label, x, y))
            .collect();
        self.store.bulk_update_clusters(&assignments).await?;

        let plan: Vec<SyncPlanEntry> = migrated
            .iter()
            .zip(output.labels.iter())
            .map(|(file, &label)| SyncPlanEntry {
                file_id: file.id,
                current_path: Some(file.current_path.clone()),
                original_path: file.original_path.clone(),
                filename: file.filename.clone(),
                cluster_id: label,
            })
            .collect();
        let names: HashMap<i64, String> = cluster_records
            .iter()
            .filter(|c| !c.is_uncategorised())
            .map(|c| (c.id, c.name.clone()))
            .collect();

        let move_results = self.sync_engine.sync_files_to_folders(&plan, &names).await;
        for result in &move_results {
            self.store
                .update_file_paths(result.file_id, &result.new_path, &result.new_filename)
                .await?;
        }

        let summary = ReclusterSummary {
            files_processed: migrated.len(),
            clusters_produced: cluster_records.len(),
            moves_performed: move_results.len(),
        };
        self.emit(
            EventType::ReclusteringEnd,
            None,
            Some(format!(
                "files={} clusters={} moves={} duplicates_removed={} orphans_removed={}",
                summary.files_processed,
                summary.clusters_produced,
                summary.moves_performed,
                repair_summary.duplicates_removed,
                repair_summary.orphans_removed
            )),
        )
        .await;
        Ok(summary)
    }

    /// Walk `root` recursively, ingesting every supported file, then run
    /// one repair+recluster pass at the end (§4.9). Skips the daemon's own
    /// metadata file and hidden entries without even asking the extractor.
    pub async fn full_scan(&self) -> SefsResult<usize> {
        self.emit(EventType::ScanStart, None, None).await;

        let mut processed = 0usize;
        let mut stack = vec![self.root.clone()];
        while let Some(dir) = stack.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory during scan");
                    continue;
                }
            };

            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name().to_string_lossy().to_string();
                if name.starts_with('.') || name == defaults::DEFAULT_ROOT_DB_FILENAME {
                    continue;
                }
                let path = entry.path();
                let Ok(file_type) = entry.file_type().await else {
                    continue;
                };
                if file_type.is_dir() {
                    stack.push(path);
                    continue;
                }
                if !self.extractor.is_supported(&path) {
                    continue;
                }
                match self.process_file(&path).await {
                    Ok(_) => processed += 1,
                    Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to ingest file during scan"),
                }
            }
        }

        if let Err(e) = self.full_recluster().await {
            tracing::warn!(error = %e, "post-scan recluster failed");
        }
        self.emit(
            EventType::ScanComplete,
            None,
            Some(format!("files_processed={processed}")),
        )
        .await;
        Ok(processed)
    }

    async fn write_single_file_cluster(&self, file: &FileRecord) -> SefsResult<()> {
        let name = "General".to_string();
        let cluster = ClusterRecord {
            id: 0,
            folder_path: self.root.join(&name).display().to_string(),
            name: name.clone(),
            description: None,
            centroid: file.embedding.clone(),
            file_count: 1,
            created_at: Utc::now(),
        };
        self.store.replace_all_clusters(&[cluster]).await?;
        self.store.update_file_cluster(file.id, 0, 0.0, 0.0).await?;

        let mut names = HashMap::new();
        names.insert(0, name);
        let plan = vec![SyncPlanEntry {
            file_id: file.id,
            current_path: Some(file.current_path.clone()),
            original_path: file.original_path.clone(),
            filename: file.filename.clone(),
            cluster_id: 0,
        }];
        let results = self.sync_engine.sync_files_to_folders(&plan, &names).await;
        for result in results {
            self.store
                .update_file_paths(result.file_id, &result.new_path, &result.new_filename)
                .await?;
        }
        Ok(())
    }

    /// Re-embed `file` from its source text (or fall back to summary plus
    /// filename) when its stored embedding dimension no longer matches the
    /// active provider. Returns `None` if the result is still an all-zero
    /// vector after padding/truncation — such a file drops out of this
    /// recluster run entirely rather than polluting a centroid.
    async fn reconcile_file_dimension(&self, mut file: FileRecord, target_dim: usize) -> Option<FileRecord> {
        let current_dim = file.embedding.as_ref().map(Vec::len).unwrap_or(0);
        if current_dim == target_dim {
            return Some(file);
        }

        let path = Path::new(&file.current_path);
        let text = if path.exists() {
            self.extractor.extract(path).ok().map(|extracted| extracted.text)
        } else {
            None
        };
        let text = text.unwrap_or_else(|| format!("{} {}", file.summary.clone().unwrap_or_default(), file.filename));

        let new_embedding = match self.embedder.get_embedding(&text).await {
            Ok(v) if v.len() == target_dim => v,
            Ok(v) => {
                self.record_degradation(
                    "dimension_migration",
                    &format!("re-embed returned dim {} but expected {target_dim}", v.len()),
                    "pad/truncate",
                );
                reconcile_dim(v, target_dim)
            }
            Err(_) => {
                self.record_degradation(
                    "dimension_migration",
                    "re-embed call failed",
                    "pad/truncate stale vector",
                );
                reconcile_dim(file.embedding.clone().unwrap_or_default(), target_dim)
            }
        };
        if !new_embedding.iter().any(|x| *x != 0.0) {
            self.record_degradation("dimension_migration", "migrated vector is all-zero", "file dropped from this run");
            return None;
        }

        let model_tag = self.embedder.current_model_tag();
        if let Err(e) = self.store.update_file_embedding(file.id, &new_embedding, &model_tag).await {
            tracing::warn!(file_id = file.id, error = %e, "failed to persist migrated embedding");
        }
        file.embedding = Some(new_embedding);
        file.embed_model = Some(model_tag);
        Some(file)
    }

    /// Up to `max_representative_texts` samples per cluster: re-extracted
    /// from source when it still resolves, else summary plus filename.
    fn representative_text(&self, file: &FileRecord) -> String {
        let path = Path::new(&file.current_path);
        if path.exists() {
            if let Ok(extracted) = self.extractor.extract(path) {
                if !extracted.text.trim().is_empty() {
                    return extracted.text;
                }
            }
        }
        format!("{} {}", file.summary.clone().unwrap_or_default(), file.filename)
    }
}

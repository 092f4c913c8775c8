use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use sefs_core::config::defaults;
use sefs_core::models::UNCATEGORISED_CLUSTER_ID;

use crate::lock::SyncLock;
use crate::mover::move_atomic;
use crate::plan::{resolve_source, unique_target, SyncMoveResult, SyncPlanEntry};
use crate::recently_synced::RecentlySyncedSet;

/// Reconciles on-disk layout with a clustering result (§4.6).
pub struct SyncEngine {
    root: PathBuf,
    lock: Arc<SyncLock>,
    recently_synced: Arc<RecentlySyncedSet>,
    settle: Duration,
    uncategorised_folder: String,
}

impl SyncEngine {
    pub fn new(root: PathBuf, lock: Arc<SyncLock>, recently_synced: Arc<RecentlySyncedSet>) -> Self {
        Self {
            root,
            lock,
            recently_synced,
            settle: Duration::from_millis(defaults::DEFAULT_SYNC_SETTLE_MS),
            uncategorised_folder: defaults::DEFAULT_UNCATEGORISED_FOLDER.to_string(),
        }
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn lock_handle(&self) -> Arc<SyncLock> {
        self.lock.clone()
    }

    pub fn recently_synced_handle(&self) -> Arc<RecentlySyncedSet> {
        self.recently_synced.clone()
    }

    /// Run a full sync pass: ensure cluster folders exist, move every file
    /// in `plan` to the folder matching its cluster, clean up now-empty
    /// non-cluster subdirectories, then hold the lock for the settle
    /// window before releasing it. The settle sleep and lock release
    /// happen unconditionally, even if individual moves failed.
    pub async fn sync_files_to_folders(
        &self,
        plan: &[SyncPlanEntry],
        names: &HashMap<i64, String>,
    ) -> Vec<SyncMoveResult> {
        self.lock.acquire().await;
        let results = self.run_sync(plan, names).await;
        tokio::time::sleep(self.settle).await;
        self.lock.release();
        results
    }

    async fn run_sync(
        &self,
        plan: &[SyncPlanEntry],
        names: &HashMap<i64, String>,
    ) -> Vec<SyncMoveResult> {
        if let Err(e) = self.ensure_cluster_folders(names).await {
            tracing::warn!(error = %e, "failed to ensure cluster folders");
        }

        let mut results = Vec::new();
        for entry in plan {
            match self.sync_one(entry, names).await {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(file_id = entry.file_id, error = %e, "skipping file in sync pass");
                }
            }
        }

        if let Err(e) = self.cleanup_empty_dirs(names).await {
            tracing::warn!(error = %e, "failed to clean up empty directories");
        }

        results
    }

    async fn ensure_cluster_folders(&self, names: &HashMap<i64, String>) -> std::io::Result<()> {
        tokio::fs::create_dir_all(self.root.join(&self.uncategorised_folder)).await?;
        for name in names.values() {
            tokio::fs::create_dir_all(self.root.join(name)).await?;
        }
        Ok(())
    }

    /// Resolve, relocate, and record a single plan entry. Returns `Ok(None)`
    /// when the source already resolves to the target (no move needed).
    async fn sync_one(
        &self,
        entry: &SyncPlanEntry,
        names: &HashMap<i64, String>,
    ) -> sefs_core::errors::SefsResult<Option<SyncMoveResult>> {
        let Some(source) = resolve_source(entry, &self.root) else {
            tracing::warn!(file_id = entry.file_id, "no source path resolves, skipping");
            return Ok(None);
        };

        let cluster_folder = self.folder_name_for(entry.cluster_id, names);
        let target = self.root.join(&cluster_folder).join(&entry.filename);

        let canonical_source = source.canonicalize().unwrap_or_else(|_| source.clone());
        let canonical_target = target.canonicalize().unwrap_or_else(|_| target.clone());
        if canonical_source == canonical_target {
            return Ok(None);
        }

        let target = unique_target(&target);

        self.recently_synced.mark(&source);
        self.recently_synced.mark(&target);
        move_atomic(&source, &target).await?;

        Ok(Some(SyncMoveResult {
            file_id: entry.file_id,
            new_path: target.display().to_string(),
            new_filename: target
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| entry.filename.clone()),
        }))
    }

    fn folder_name_for(&self, cluster_id: i64, names: &HashMap<i64, String>) -> String {
        if cluster_id == UNCATEGORISED_CLUSTER_ID {
            return self.uncategorised_folder.clone();
        }
        names
            .get(&cluster_id)
            .cloned()
            .unwrap_or_else(|| self.uncategorised_folder.clone())
    }

    /// Remove empty subdirectories under root, except cluster folders
    /// themselves (a cluster that legitimately has zero members this run
    /// may still be repopulated by an incremental assign before the next
    /// full recluster prunes it).
    async fn cleanup_empty_dirs(&self, names: &HashMap<i64, String>) -> std::io::Result<()> {
        let mut protected: Vec<String> = names.values().cloned().collect();
        protected.push(self.uncategorised_folder.clone());

        let mut read_dir = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if protected.contains(&name) {
                continue;
            }
            if is_dir_empty(&path).await? {
                let _ = tokio::fs::remove_dir(&path).await;
            }
        }
        Ok(())
    }
}

async fn is_dir_empty(path: &Path) -> std::io::Result<bool> {
    let mut read_dir = tokio::fs::read_dir(path).await?;
    Ok(read_dir.next_entry().await?.is_none())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(root: PathBuf) -> SyncEngine {
        SyncEngine::new(root, SyncLock::new(), RecentlySyncedSet::new(Duration::from_secs(5)))
            .with_settle(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn moves_file_into_named_cluster_folder() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("notes.md");
        tokio::fs::write(&source, b"hello").await.unwrap();

        let plan = vec![SyncPlanEntry {
            file_id: 1,
            current_path: Some(source.display().to_string()),
            original_path: source.display().to_string(),
            filename: "notes.md".to_string(),
            cluster_id: 0,
        }];
        let mut names = HashMap::new();
        names.insert(0, "rust_notes".to_string());

        let eng = engine(dir.path().to_path_buf());
        let results = eng.sync_files_to_folders(&plan, &names).await;

        assert_eq!(results.len(), 1);
        assert!(dir.path().join("rust_notes").join("notes.md").exists());
        assert!(!source.exists());
    }

    #[tokio::test]
    async fn uncategorised_cluster_id_goes_to_uncategorised_folder() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("odd.txt");
        tokio::fs::write(&source, b"x").await.unwrap();

        let plan = vec![SyncPlanEntry {
            file_id: 2,
            current_path: Some(source.display().to_string()),
            original_path: source.display().to_string(),
            filename: "odd.txt".to_string(),
            cluster_id: UNCATEGORISED_CLUSTER_ID,
        }];
        let eng = engine(dir.path().to_path_buf());
        let results = eng.sync_files_to_folders(&plan, &HashMap::new()).await;

        assert_eq!(results.len(), 1);
        assert!(dir.path().join("Uncategorised").join("odd.txt").exists());
    }

    #[tokio::test]
    async fn missing_source_is_skipped_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let plan = vec![SyncPlanEntry {
            file_id: 3,
            current_path: None,
            original_path: dir.path().join("gone.txt").display().to_string(),
            filename: "gone.txt".to_string(),
            cluster_id: 0,
        }];
        let mut names = HashMap::new();
        names.insert(0, "cluster_a".to_string());

        let eng = engine(dir.path().to_path_buf());
        let results = eng.sync_files_to_folders(&plan, &names).await;
        assert!(results.is_empty());
    }
}

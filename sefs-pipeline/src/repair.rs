use std::collections::HashMap;
use std::path::Path;

use sefs_core::errors::SefsResult;
use sefs_core::models::FileRecord;

use crate::pipeline::Pipeline;

/// Counts from a single repair pass, folded into the `reclustering_end`
/// totals by the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct RepairSummary {
    pub duplicates_removed: usize,
    pub orphans_removed: usize,
}

impl Pipeline {
    /// Step 1 of the full recluster sequence (§4.9): collapse rows that
    /// share a (hash, filename) pair but have all gone missing on disk down
    /// to the most recently modified one, then drop whatever is left whose
    /// current and original paths are both gone.
    pub(crate) async fn repair(&self) -> SefsResult<RepairSummary> {
        let files = self.store.get_all_files().await?;
        let mut summary = RepairSummary::default();

        let mut groups: HashMap<(String, String), Vec<FileRecord>> = HashMap::new();
        for file in files {
            groups
                .entry((file.content_hash.clone(), file.filename.clone()))
                .or_default()
                .push(file);
        }

        for (_, mut group) in groups {
            if group.len() > 1 && group.iter().all(|f| !exists(&f.current_path)) {
                group.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
                for stale in group.drain(1..) {
                    self.store.delete_file(stale.id).await?;
                    summary.duplicates_removed += 1;
                }
            }

            for file in &group {
                if !exists(&file.current_path) && !exists(&file.original_path) {
                    self.store.delete_file(file.id).await?;
                    summary.orphans_removed += 1;
                }
            }
        }

        if summary.duplicates_removed > 0 || summary.orphans_removed > 0 {
            tracing::info!(
                duplicates = summary.duplicates_removed,
                orphans = summary.orphans_removed,
                "repair pass removed stale records"
            );
        }

        Ok(summary)
    }
}

fn exists(path: &str) -> bool {
    Path::new(path).exists()
}

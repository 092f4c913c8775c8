use std::path::{Path, PathBuf};

/// One file's inputs to a sync pass: where it might currently live, where
/// it was first sighted, its tracked filename, and the cluster it now
/// belongs to.
#[derive(Debug, Clone)]
pub struct SyncPlanEntry {
    pub file_id: i64,
    pub current_path: Option<String>,
    pub original_path: String,
    pub filename: String,
    pub cluster_id: i64,
}

/// The outcome of actually moving one file during a sync pass.
#[derive(Debug, Clone)]
pub struct SyncMoveResult {
    pub file_id: i64,
    pub new_path: String,
    pub new_filename: String,
}

/// Resolve the best existing source path for `entry`, in order:
/// current_path -> original_path -> root/filename. Returns `None` if none
/// of the three exists on disk.
pub fn resolve_source(entry: &SyncPlanEntry, root: &Path) -> Option<PathBuf> {
    let candidates = [
        entry.current_path.clone(),
        Some(entry.original_path.clone()),
        Some(root.join(&entry.filename).display().to_string()),
    ];
    candidates
        .into_iter()
        .flatten()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Append `_1`, `_2`, ... to `target`'s file stem until it doesn't already
/// exist on disk, mirroring the numbered-suffix collision rule used by
/// both the full sync pass and incremental single-file placement.
pub fn unique_target(target: &Path) -> PathBuf {
    if !target.exists() {
        return target.to_path_buf();
    }
    let parent = target.parent().unwrap_or_else(|| Path::new(""));
    let stem = target.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
    let ext = target.extension().and_then(|e| e.to_str());

    let mut suffix = 1;
    loop {
        let candidate_name = match ext {
            Some(ext) => format!("{stem}_{suffix}.{ext}"),
            None => format!("{stem}_{suffix}"),
        };
        let candidate = parent.join(candidate_name);
        if !candidate.exists() {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_source_prefers_current_path() {
        let dir = tempfile::tempdir().unwrap();
        let current = dir.path().join("current.txt");
        std::fs::write(&current, b"x").unwrap();

        let entry = SyncPlanEntry {
            file_id: 1,
            current_path: Some(current.display().to_string()),
            original_path: dir.path().join("original.txt").display().to_string(),
            filename: "original.txt".to_string(),
            cluster_id: 0,
        };
        assert_eq!(resolve_source(&entry, dir.path()), Some(current));
    }

    #[test]
    fn resolve_source_falls_back_to_root_filename() {
        let dir = tempfile::tempdir().unwrap();
        let at_root = dir.path().join("f.txt");
        std::fs::write(&at_root, b"x").unwrap();

        let entry = SyncPlanEntry {
            file_id: 1,
            current_path: Some(dir.path().join("missing1.txt").display().to_string()),
            original_path: dir.path().join("missing2.txt").display().to_string(),
            filename: "f.txt".to_string(),
            cluster_id: 0,
        };
        assert_eq!(resolve_source(&entry, dir.path()), Some(at_root));
    }

    #[test]
    fn resolve_source_returns_none_if_nothing_exists() {
        let dir = tempfile::tempdir().unwrap();
        let entry = SyncPlanEntry {
            file_id: 1,
            current_path: None,
            original_path: dir.path().join("gone.txt").display().to_string(),
            filename: "gone.txt".to_string(),
            cluster_id: 0,
        };
        assert_eq!(resolve_source(&entry, dir.path()), None);
    }

    #[test]
    fn unique_target_appends_numbered_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("notes.txt");
        std::fs::write(&target, b"x").unwrap();

        let unique = unique_target(&target);
        assert_eq!(unique, dir.path().join("notes_1.txt"));
    }

    #[test]
    fn unique_target_returns_original_if_free() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("fresh.txt");
        assert_eq!(unique_target(&target), target);
    }
}

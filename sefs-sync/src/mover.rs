use std::path::Path;

use sefs_core::errors::{SefsResult, SyncError};

/// Move `from` to `to`, atomically within the same filesystem; falls back
/// to copy-then-remove-original when the rename fails (e.g. across mount
/// points), since `std::io::ErrorKind` has no portable "cross-device"
/// variant to branch on ahead of time.
pub async fn move_atomic(from: &Path, to: &Path) -> SefsResult<()> {
    if let Some(parent) = to.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SyncError::FolderCreateFailed {
                path: parent.display().to_string(),
                reason: e.to_string(),
            })?;
    }

    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }

    tokio::fs::copy(from, to)
        .await
        .map_err(|e| SyncError::MoveFailed {
            from: from.display().to_string(),
            to: to.display().to_string(),
            reason: e.to_string(),
        })?;
    tokio::fs::remove_file(from)
        .await
        .map_err(|e| SyncError::MoveFailed {
            from: from.display().to_string(),
            to: to.display().to_string(),
            reason: e.to_string(),
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn moves_file_within_same_directory() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a.txt");
        let to = dir.path().join("sub").join("a.txt");
        tokio::fs::write(&from, b"hello").await.unwrap();

        move_atomic(&from, &to).await.unwrap();

        assert!(!from.exists());
        assert_eq!(tokio::fs::read_to_string(&to).await.unwrap(), "hello");
    }
}

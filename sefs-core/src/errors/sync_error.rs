/// On-disk layout reconciliation errors. A single file's failure is logged
/// and skipped; it never fails the whole sync batch.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("no source path resolves for file {file_id}")]
    MissingSource { file_id: i64 },

    #[error("failed to create cluster folder {path}: {reason}")]
    FolderCreateFailed { path: String, reason: String },

    #[error("failed to move {from} to {to}: {reason}")]
    MoveFailed {
        from: String,
        to: String,
        reason: String,
    },
}

/// Metadata store errors. Schema/open failures are fatal at startup; anything
/// encountered mid-run is logged by the caller and the triggering operation
/// is abandoned, not the process.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to open database at {path}: {reason}")]
    OpenFailed { path: String, reason: String },

    #[error("migration failed: {reason}")]
    MigrationFailed { reason: String },

    #[error("query failed: {reason}")]
    QueryFailed { reason: String },

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("no active per-root store (switch_root not yet completed)")]
    NoActiveRoot,
}

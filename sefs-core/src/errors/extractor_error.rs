/// Extractor subsystem errors. A failed extraction never aborts ingestion —
/// callers fall back to empty text, zero counts, and a stable hash.
#[derive(Debug, thiserror::Error)]
pub enum ExtractorError {
    #[error("file not found: {path}")]
    NotFound { path: String },

    #[error("unsupported file type: {path}")]
    Unsupported { path: String },

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("failed to parse {path} as {format}: {reason}")]
    ParseFailed {
        path: String,
        format: String,
        reason: String,
    },
}

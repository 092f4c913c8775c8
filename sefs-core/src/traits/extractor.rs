use std::path::Path;
use std::sync::Arc;

use crate::errors::SefsResult;

/// Result of extracting a single file. Extraction never fails outward —
/// a format error or unreadable file still produces an `Extracted` with
/// empty text and zero counts, as long as the hash could be computed.
#[derive(Debug, Clone, Default)]
pub struct Extracted {
    pub text: String,
    pub word_count: u32,
    pub page_count: u32,
    pub file_type: Option<String>,
    pub content_hash: String,
    pub size_bytes: u64,
}

/// File-format-aware text + hash + metadata extraction.
pub trait Extractor: Send + Sync {
    /// Whether `path` is one this extractor knows how to handle, based on
    /// suffix or a well-known extensionless basename.
    fn is_supported(&self, path: &Path) -> bool;

    /// Extract text and metadata from `path`. The hash is always computed
    /// from the raw bytes before any format-specific parsing is attempted,
    /// so a parse failure still yields a stable hash.
    fn extract(&self, path: &Path) -> SefsResult<Extracted>;
}

impl<T: Extractor> Extractor for Arc<T> {
    fn is_supported(&self, path: &Path) -> bool {
        (**self).is_supported(path)
    }

    fn extract(&self, path: &Path) -> SefsResult<Extracted> {
        (**self).extract(path)
    }
}

use std::fs;
use std::path::Path;

use sefs_core::errors::{ExtractorError, SefsResult};
use sefs_core::traits::{Extracted, Extractor};

use crate::dispatch::{self, FormatKind};
use crate::formats::{document, text};
use crate::hash::hash_bytes;

/// Dispatches to a format-specific extractor by extension or well-known
/// extensionless basename. Holds no state; safe to share behind an `Arc`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileExtractor;

impl FileExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for FileExtractor {
    fn is_supported(&self, path: &Path) -> bool {
        !dispatch::is_hidden_or_temp(path) && dispatch::classify(path).is_some()
    }

    fn extract(&self, path: &Path) -> SefsResult<Extracted> {
        let (kind, label) = dispatch::classify(path).ok_or_else(|| ExtractorError::Unsupported {
            path: path.display().to_string(),
        })?;

        let metadata = fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ExtractorError::NotFound {
                    path: path.display().to_string(),
                }
            } else {
                ExtractorError::ReadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            }
        })?;
        let size_bytes = metadata.len();

        let bytes = fs::read(path).map_err(|e| ExtractorError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let content_hash = hash_bytes(&bytes);

        let (text, word_count, page_count) = match kind {
            FormatKind::Text | FormatKind::Extensionless => text::extract(&bytes),
            FormatKind::Document => document::extract(&bytes, &label),
        };

        Ok(Extracted {
            text,
            word_count,
            page_count,
            file_type: Some(label),
            content_hash,
            size_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn extracts_plain_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        let mut f = fs::File::create(&path).unwrap();
        write!(f, "hello world from sefs").unwrap();

        let extractor = FileExtractor::new();
        assert!(extractor.is_supported(&path));
        let extracted = extractor.extract(&path).unwrap();
        assert_eq!(extracted.text, "hello world from sefs");
        assert_eq!(extracted.word_count, 4);
        assert_eq!(extracted.page_count, 0);
        assert_eq!(extracted.file_type.as_deref(), Some("md"));
        assert!(!extracted.content_hash.is_empty());
        assert_eq!(extracted.size_bytes, "hello world from sefs".len() as u64);
    }

    #[test]
    fn document_formats_degrade_to_empty_text_but_still_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        fs::write(&path, b"%PDF-1.4 fake bytes").unwrap();

        let extractor = FileExtractor::new();
        let extracted = extractor.extract(&path).unwrap();
        assert_eq!(extracted.text, "");
        assert_eq!(extracted.word_count, 0);
        assert!(!extracted.content_hash.is_empty());
        assert_eq!(extracted.file_type.as_deref(), Some("pdf"));
    }

    #[test]
    fn extensionless_well_known_basename_is_supported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Dockerfile");
        fs::write(&path, b"FROM rust:latest\n").unwrap();

        let extractor = FileExtractor::new();
        assert!(extractor.is_supported(&path));
        let extracted = extractor.extract(&path).unwrap();
        assert_eq!(extracted.file_type.as_deref(), Some("dockerfile"));
        assert_eq!(extracted.word_count, 2);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.exe");
        fs::write(&path, b"\x00\x01\x02").unwrap();

        let extractor = FileExtractor::new();
        assert!(!extractor.is_supported(&path));
        assert!(extractor.extract(&path).is_err());
    }

    #[test]
    fn missing_file_returns_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ghost.txt");

        let extractor = FileExtractor::new();
        let err = extractor.extract(&path).unwrap_err();
        assert!(matches!(
            err,
            sefs_core::errors::SefsError::Extractor(ExtractorError::NotFound { .. })
        ));
    }
}

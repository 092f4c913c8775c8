use std::path::Path;

/// Plain-text and source formats read directly as UTF-8 (lossy).
const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "markdown", "csv", "json", "html", "htm", "xml", "yaml", "yml", "toml", "ini",
    "log", "rst", "tex", "py", "rs", "js", "ts", "tsx", "jsx", "go", "java", "c", "h", "cpp",
    "hpp", "cs", "rb", "sh", "bash", "sql", "css", "scss",
];

/// Formats that need a dedicated binary-format library to extract text from;
/// that library set is an out-of-scope external collaborator (§1). These
/// names are still `is_supported` (so the file is ingested, hashed, and
/// tracked) but `extract` degrades to empty text for them — the same
/// never-fail contract as any other extraction failure.
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "docx", "pptx", "xlsx"];

/// Well-known extensionless basenames. Only a bare basename counts — a
/// suffixed variant like `Makefile.linux` is handled by suffix, not here.
const EXTENSIONLESS_BASENAMES: &[&str] = &["makefile", "dockerfile", "license", "readme"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Text,
    Document,
    Extensionless,
}

/// Classify `path` by extension or well-known extensionless basename.
/// Returns `None` for anything not in the supported set.
pub fn classify(path: &Path) -> Option<(FormatKind, String)> {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        let ext = ext.to_lowercase();
        if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            return Some((FormatKind::Text, ext));
        }
        if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
            return Some((FormatKind::Document, ext));
        }
        return None;
    }
    let basename = path.file_name()?.to_str()?.to_lowercase();
    if EXTENSIONLESS_BASENAMES.contains(&basename.as_str()) {
        return Some((FormatKind::Extensionless, basename));
    }
    None
}

pub fn is_hidden_or_temp(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.') || n.starts_with('~'))
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn recognizes_text_and_document_extensions() {
        assert_eq!(
            classify(&PathBuf::from("notes.md")),
            Some((FormatKind::Text, "md".to_string()))
        );
        assert_eq!(
            classify(&PathBuf::from("report.PDF")),
            Some((FormatKind::Document, "pdf".to_string()))
        );
    }

    #[test]
    fn recognizes_bare_extensionless_basenames_only() {
        assert_eq!(
            classify(&PathBuf::from("Makefile")),
            Some((FormatKind::Extensionless, "makefile".to_string()))
        );
        assert_eq!(classify(&PathBuf::from("Makefile.linux")), None);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        assert_eq!(classify(&PathBuf::from("binary.exe")), None);
    }

    #[test]
    fn hidden_and_temp_files_are_rejected() {
        assert!(is_hidden_or_temp(&PathBuf::from(".hidden.txt")));
        assert!(is_hidden_or_temp(&PathBuf::from("~backup.txt")));
        assert!(!is_hidden_or_temp(&PathBuf::from("visible.txt")));
    }
}

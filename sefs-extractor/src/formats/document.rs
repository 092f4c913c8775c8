/// PDF/DOCX/PPTX/XLSX parsing lives in a library set this crate doesn't
/// depend on (§1, out of scope). Until one is wired in, these formats
/// degrade the same way any other extraction failure does: empty text,
/// zero counts, still ingested under their stable content hash.
pub fn extract(_bytes: &[u8], _format: &str) -> (String, u32, u32) {
    (String::new(), 0, 0)
}

/// Extract from a UTF-8 (lossy) text/source file: the whole file is the
/// text; word count is a whitespace split; there's no notion of pages.
pub fn extract(bytes: &[u8]) -> (String, u32, u32) {
    let text = String::from_utf8_lossy(bytes).to_string();
    let word_count = text.split_whitespace().count() as u32;
    (text, word_count, 0)
}

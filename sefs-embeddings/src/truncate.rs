/// Truncate `text` to at most `budget` characters. Over budget, keep the
/// first half and the last half of the budget, joined by a separator that
/// makes the elision visible to the embedding model, rather than a plain
/// head cut that would discard everything after the opening.
pub fn head_tail_truncate(text: &str, budget: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= budget {
        return text.to_string();
    }
    let half = budget / 2;
    let head: String = chars[..half].iter().collect();
    let tail: String = chars[chars.len() - half..].iter().collect();
    format!("{head}\n...\n{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_under_budget_is_unchanged() {
        assert_eq!(head_tail_truncate("short", 100), "short");
    }

    #[test]
    fn text_over_budget_keeps_head_and_tail() {
        let text = "a".repeat(50) + &"b".repeat(50);
        let truncated = head_tail_truncate(&text, 40);
        assert!(truncated.starts_with("aaaa"));
        assert!(truncated.ends_with("bbbb"));
        assert!(truncated.contains("...\n"));
        assert!(truncated.len() < text.len());
    }
}

//! Cluster name generation (§4.5). Primary path asks the active LLM for a
//! short topic label; fallback extracts the most frequent non-stopword
//! tokens. Either path's output is sanitized to a filesystem-safe name and
//! disambiguated against names already chosen this run.

use std::collections::HashMap;

use sefs_core::config::defaults;
use sefs_core::traits::EmbeddingProvider;

use crate::stopwords::is_stopword;

const LLM_NAME_WORDS: usize = 4;

/// Produce a unique, filesystem-safe name for a cluster given up to
/// `DEFAULT_MAX_REPRESENTATIVE_TEXTS` representative texts and the names
/// already chosen earlier in this recluster run.
pub async fn name_cluster(
    provider: &dyn EmbeddingProvider,
    representative_texts: &[String],
    chosen_names: &[String],
) -> String {
    let candidate = if provider.is_available() {
        llm_candidate(provider, representative_texts).await
    } else {
        None
    };
    let candidate = candidate.unwrap_or_else(|| keyword_fallback(representative_texts));

    let sanitized = sanitize(&candidate);
    dedupe(sanitized, chosen_names)
}

async fn llm_candidate(provider: &dyn EmbeddingProvider, texts: &[String]) -> Option<String> {
    let joined = texts.join(" ");
    if joined.trim().is_empty() {
        return None;
    }
    let prompt = format!(
        "Give a short 2-4 word topic label for this content:\n{}",
        joined
    );
    match provider.generate_summary(&prompt).await {
        Ok(summary) if !summary.trim().is_empty() => {
            let words: Vec<&str> = summary.split_whitespace().take(LLM_NAME_WORDS).collect();
            Some(words.join("_"))
        }
        _ => None,
    }
}

fn keyword_fallback(texts: &[String]) -> String {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for text in texts {
        for raw in text.split(|c: char| !c.is_alphanumeric()) {
            let token = raw.to_lowercase();
            if token.chars().count() < 3 || is_stopword(&token) {
                continue;
            }
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    ranked
        .into_iter()
        .take(defaults::DEFAULT_NAME_KEYWORD_COUNT)
        .map(|(word, _)| word)
        .collect::<Vec<_>>()
        .join("_")
}

/// Strip quotes/periods, collapse whitespace and dashes to underscores,
/// drop anything not alphanumeric or underscore, trim to the max name
/// length, and strip leading/trailing underscores. Empty results fall
/// back to `"cluster"`.
fn sanitize(raw: &str) -> String {
    let no_quotes: String = raw.chars().filter(|c| *c != '"' && *c != '\'' && *c != '.').collect();
    let collapsed: String = no_quotes
        .chars()
        .map(|c| if c.is_whitespace() || c == '-' { '_' } else { c })
        .collect();
    let filtered: String = collapsed
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    let truncated: String = filtered.chars().take(defaults::DEFAULT_NAME_MAX_CHARS).collect();
    let trimmed = truncated.trim_matches('_').to_string();

    if trimmed.is_empty() {
        "cluster".to_string()
    } else {
        trimmed
    }
}

/// Append `_2`, `_3`, ... until `name` no longer collides with
/// `chosen_names`.
fn dedupe(name: String, chosen_names: &[String]) -> String {
    if !chosen_names.iter().any(|n| n == &name) {
        return name;
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{name}_{suffix}");
        if !chosen_names.iter().any(|n| n == &candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_punctuation_and_collapses_whitespace() {
        assert_eq!(sanitize("\"Rust - Notes.\""), "Rust_Notes");
    }

    #[test]
    fn sanitize_empty_result_falls_back_to_cluster() {
        assert_eq!(sanitize("---..."), "cluster");
    }

    #[test]
    fn sanitize_truncates_to_max_length() {
        let long = "a".repeat(100);
        assert_eq!(sanitize(&long).len(), defaults::DEFAULT_NAME_MAX_CHARS);
    }

    #[test]
    fn dedupe_appends_numeric_suffix_on_collision() {
        let chosen = vec!["notes".to_string(), "notes_2".to_string()];
        assert_eq!(dedupe("notes".to_string(), &chosen), "notes_3");
    }

    #[test]
    fn dedupe_leaves_unique_name_untouched() {
        let chosen = vec!["notes".to_string()];
        assert_eq!(dedupe("other".to_string(), &chosen), "other");
    }

    #[test]
    fn keyword_fallback_picks_frequent_non_stopwords() {
        let texts = vec!["rust rust rust async tokio async the and".to_string()];
        let name = keyword_fallback(&texts);
        assert!(name.contains("rust"));
    }
}

use serde::{Deserialize, Serialize};

use super::defaults;

/// Which embedding/LLM provider is active. Exactly one is active at a time;
/// there is no cross-provider fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Local,
    Remote,
}

impl Default for ProviderKind {
    fn default() -> Self {
        ProviderKind::Local
    }
}

/// Embedding/LLM subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Active provider.
    pub provider: ProviderKind,
    /// Local provider host (e.g. an Ollama-compatible endpoint).
    pub local_host: String,
    /// Local embedding model name.
    pub local_embed_model: String,
    /// Local chat/summary model name.
    pub local_llm_model: String,
    /// Remote provider API key. Never logged.
    pub remote_api_key: String,
    /// Remote embedding model name.
    pub remote_embed_model: String,
    /// Remote chat/summary model name.
    pub remote_llm_model: String,
    /// Character budget before head+tail truncation kicks in.
    pub max_embed_chars: usize,
    /// Max length of an LLM-generated summary.
    pub summary_max_chars: usize,
    /// Length of the fallback summary snippet on failure/short input.
    pub summary_fallback_chars: usize,
    /// Timeout for a single search-query embedding call.
    pub search_embed_timeout_secs: u64,
    /// Timeout for a provider health probe.
    pub provider_health_timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Local,
            local_host: "http://localhost:11434".to_string(),
            local_embed_model: "nomic-embed-text".to_string(),
            local_llm_model: "llama3.2".to_string(),
            remote_api_key: String::new(),
            remote_embed_model: "text-embedding-3-small".to_string(),
            remote_llm_model: "gpt-4o-mini".to_string(),
            max_embed_chars: defaults::DEFAULT_MAX_EMBED_CHARS,
            summary_max_chars: defaults::DEFAULT_SUMMARY_MAX_CHARS,
            summary_fallback_chars: defaults::DEFAULT_SUMMARY_FALLBACK_CHARS,
            search_embed_timeout_secs: defaults::DEFAULT_SEARCH_EMBED_TIMEOUT_SECS,
            provider_health_timeout_secs: defaults::DEFAULT_PROVIDER_HEALTH_TIMEOUT_SECS,
        }
    }
}

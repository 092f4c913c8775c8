use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sefs_core::config::{defaults, EmbeddingConfig, ProviderKind};
use sefs_core::errors::SefsResult;
use sefs_core::models::HealthReport;
use sefs_core::traits::{EmbeddingProvider, HealthReporter};

use crate::providers::{LocalProvider, RemoteProvider, RawProvider};
use crate::truncate::head_tail_truncate;

/// Wraps whichever `RawProvider` is active with the behavior that's common
/// to both providers (§4.2): character-budget truncation, zero-vector /
/// fallback-summary degradation on failure, health tracking, and dimension
/// bookkeeping for the local provider (whose output dimension isn't known
/// ahead of a call).
pub struct EmbeddingEngine {
    provider: Arc<dyn RawProvider>,
    provider_label: &'static str,
    max_embed_chars: usize,
    summary_max_chars: usize,
    summary_fallback_chars: usize,
    available: AtomicBool,
    observed_local_dim: AtomicUsize,
}

impl EmbeddingEngine {
    pub fn new(config: &EmbeddingConfig) -> Self {
        let (provider, provider_label): (Arc<dyn RawProvider>, &'static str) = match config.provider {
            ProviderKind::Local => (
                Arc::new(LocalProvider::new(
                    config.local_host.clone(),
                    config.local_embed_model.clone(),
                    config.local_llm_model.clone(),
                )),
                "local",
            ),
            ProviderKind::Remote => (
                Arc::new(RemoteProvider::new(
                    config.remote_api_key.clone(),
                    config.remote_embed_model.clone(),
                    config.remote_llm_model.clone(),
                )),
                "remote",
            ),
        };
        Self {
            provider,
            provider_label,
            max_embed_chars: config.max_embed_chars,
            summary_max_chars: config.summary_max_chars,
            summary_fallback_chars: config.summary_fallback_chars,
            available: AtomicBool::new(true),
            observed_local_dim: AtomicUsize::new(0),
        }
    }

    fn fallback_summary(&self, text: &str) -> String {
        let stripped = text.trim();
        let truncated: String = stripped.chars().take(self.summary_fallback_chars).collect();
        if stripped.chars().count() > self.summary_fallback_chars {
            format!("{truncated}...")
        } else {
            truncated
        }
    }
}

#[async_trait]
impl EmbeddingProvider for EmbeddingEngine {
    async fn get_embedding(&self, text: &str) -> SefsResult<Vec<f32>> {
        let truncated = head_tail_truncate(text, self.max_embed_chars);
        match self.provider.embed_raw(&truncated).await {
            Ok(vec) => {
                self.available.store(true, Ordering::Relaxed);
                if self.provider.known_dim().is_none() && !vec.is_empty() {
                    self.observed_local_dim.store(vec.len(), Ordering::Relaxed);
                }
                Ok(vec)
            }
            Err(e) => {
                tracing::warn!(provider = self.provider_label, error = %e, "embedding call failed, returning zero vector");
                self.available.store(false, Ordering::Relaxed);
                Ok(vec![0.0; self.expected_dim()])
            }
        }
    }

    async fn generate_summary(&self, text: &str) -> SefsResult<String> {
        if text.trim().chars().count() < 50 {
            return Ok(self.fallback_summary(text));
        }
        let truncated = head_tail_truncate(text, self.max_embed_chars);
        match self.provider.summarize_raw(&truncated).await {
            Ok(summary) => {
                self.available.store(true, Ordering::Relaxed);
                let capped: String = summary.chars().take(self.summary_max_chars).collect();
                Ok(capped)
            }
            Err(e) => {
                tracing::warn!(provider = self.provider_label, error = %e, "summary call failed, using fallback snippet");
                self.available.store(false, Ordering::Relaxed);
                Ok(self.fallback_summary(text))
            }
        }
    }

    fn current_model_tag(&self) -> String {
        self.provider.model_tag()
    }

    fn expected_dim(&self) -> usize {
        if let Some(dim) = self.provider.known_dim() {
            return dim;
        }
        let observed = self.observed_local_dim.load(Ordering::Relaxed);
        if observed > 0 {
            observed
        } else {
            defaults::DEFAULT_LOCAL_EMBED_DIM
        }
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}

impl HealthReporter for EmbeddingEngine {
    fn report(&self) -> HealthReport {
        HealthReport {
            provider: self.current_model_tag(),
            available: self.is_available(),
            checked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(provider: ProviderKind) -> EmbeddingConfig {
        EmbeddingConfig {
            provider,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn missing_remote_credentials_degrade_to_zero_vector() {
        let engine = EmbeddingEngine::new(&config_with(ProviderKind::Remote));
        let v = engine.get_embedding("hello world").await.unwrap();
        assert_eq!(v.len(), engine.expected_dim());
        assert!(v.iter().all(|x| *x == 0.0));
        assert!(!engine.is_available());
    }

    #[tokio::test]
    async fn short_text_summary_uses_fallback_without_calling_provider() {
        let engine = EmbeddingEngine::new(&config_with(ProviderKind::Remote));
        let summary = engine.generate_summary("short text").await.unwrap();
        assert_eq!(summary, "short text");
    }

    #[tokio::test]
    async fn long_text_fallback_summary_is_truncated_with_ellipsis() {
        let engine = EmbeddingEngine::new(&config_with(ProviderKind::Remote));
        let long_text = "word ".repeat(100);
        let summary = engine.generate_summary(&long_text).await.unwrap();
        assert!(summary.ends_with("..."));
        assert!(!engine.is_available());
    }

    #[test]
    fn remote_expected_dim_comes_from_known_model_table() {
        let engine = EmbeddingEngine::new(&config_with(ProviderKind::Remote));
        assert_eq!(engine.expected_dim(), 1536);
    }
}

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::SefsResult;

/// Provider-selectable embedding + summary generation. Exactly one
/// implementation is active at a time; there is no cross-provider fallback —
/// a failing provider returns a degraded result (zero vector, fallback
/// summary) rather than silently trying the other provider.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed `text`, truncating to the configured character budget first.
    /// On provider failure, returns a zero vector of `expected_dim()` length
    /// and marks the provider unhealthy for subsequent `is_available` calls.
    async fn get_embedding(&self, text: &str) -> SefsResult<Vec<f32>>;

    /// Short summary via the active LLM; falls back to a truncated snippet
    /// of `text` on failure or when `text` is too short to summarize.
    async fn generate_summary(&self, text: &str) -> SefsResult<String>;

    /// Canonical `provider/model` identifier stamped on every embedding
    /// this provider produces.
    fn current_model_tag(&self) -> String;

    /// Expected output dimension for the active provider and model.
    fn expected_dim(&self) -> usize;

    /// Last observed availability, without making a new network call.
    fn is_available(&self) -> bool;
}

#[async_trait]
impl<T: EmbeddingProvider> EmbeddingProvider for Arc<T> {
    async fn get_embedding(&self, text: &str) -> SefsResult<Vec<f32>> {
        (**self).get_embedding(text).await
    }

    async fn generate_summary(&self, text: &str) -> SefsResult<String> {
        (**self).generate_summary(text).await
    }

    fn current_model_tag(&self) -> String {
        (**self).current_model_tag()
    }

    fn expected_dim(&self) -> usize {
        (**self).expected_dim()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

/// Pad with trailing zeros or truncate `vec` to exactly `target_dim` entries.
/// Used for the last-resort dimension reconciliation called out in the
/// clusterer and incremental-assignment paths — never a substitute for the
/// pipeline's real dimension-migration re-embed.
pub fn reconcile_dim(mut vec: Vec<f32>, target_dim: usize) -> Vec<f32> {
    use std::cmp::Ordering;
    match vec.len().cmp(&target_dim) {
        Ordering::Less => {
            vec.resize(target_dim, 0.0);
            vec
        }
        Ordering::Greater => {
            vec.truncate(target_dim);
            vec
        }
        Ordering::Equal => vec,
    }
}

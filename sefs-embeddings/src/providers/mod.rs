mod local;
mod remote;

pub use local::LocalProvider;
pub use remote::RemoteProvider;

use async_trait::async_trait;
use sefs_core::errors::SefsResult;

/// The raw wire-level call each concrete provider makes. `EmbeddingEngine`
/// wraps whichever of these is active with the truncation, fallback, and
/// health-tracking behavior common to both (§4.2) — individual providers
/// only know how to talk to their backend.
#[async_trait]
pub trait RawProvider: Send + Sync {
    async fn embed_raw(&self, text: &str) -> SefsResult<Vec<f32>>;
    async fn summarize_raw(&self, text: &str) -> SefsResult<String>;
    fn model_tag(&self) -> String;
    /// Known output dimension ahead of any call, if the model is in a known
    /// table. `None` means the dimension is only discoverable by calling
    /// `embed_raw` once and observing the result.
    fn known_dim(&self) -> Option<usize>;
}

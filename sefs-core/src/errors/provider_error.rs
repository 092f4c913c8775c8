/// Embedding/LLM provider errors. Transient by nature — callers retry on the
/// next call rather than looping here.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider unavailable: {provider}")]
    Unavailable { provider: String },

    #[error("provider request failed: {provider}: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("provider timed out after {timeout_secs}s: {provider}")]
    Timeout { provider: String, timeout_secs: u64 },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("missing credentials for provider: {provider}")]
    MissingCredentials { provider: String },
}

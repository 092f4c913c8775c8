mod cluster_error;
mod extractor_error;
mod provider_error;
mod storage_error;
mod sync_error;

pub use cluster_error::ClusterError;
pub use extractor_error::ExtractorError;
pub use provider_error::ProviderError;
pub use storage_error::StorageError;
pub use sync_error::SyncError;

/// Top-level daemon error. Every subsystem error folds into this so the
/// pipeline and the bin crate can propagate with a single `?`.
#[derive(Debug, thiserror::Error)]
pub enum SefsError {
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SefsResult<T> = Result<T, SefsError>;

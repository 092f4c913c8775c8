/// Clustering and projection errors.
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("empty embedding matrix")]
    EmptyInput,

    #[error("ragged embedding matrix: row {index} has dimension {actual}, expected {expected}")]
    RaggedInput {
        index: usize,
        actual: usize,
        expected: usize,
    },

    #[error("density clustering failed: {reason}")]
    DensityClusteringFailed { reason: String },

    #[error("projection failed: {reason}")]
    ProjectionFailed { reason: String },
}

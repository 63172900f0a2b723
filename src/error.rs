//! Error types for the mlp-sgd library

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, MlpError>;

/// Every failure the library reports. Precondition violations are detected
/// at the public entry points before any computation runs.
#[derive(Error, Debug)]
pub enum MlpError {
    /// Fewer than two layer sizes, or a zero-width layer
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// A vector or matrix does not have the shape the network expects
    #[error("shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Batch size is zero or larger than the training set
    #[error("invalid batch configuration: batch size {batch_size} for {samples} samples")]
    InvalidBatchConfiguration { batch_size: usize, samples: usize },

    /// A data set with no samples was passed where samples are required
    #[error("empty data set passed to {0}")]
    EmptyDataSet(&'static str),

    /// Parallel input/target sequences of different lengths
    #[error("data set has {inputs} inputs but {targets} targets")]
    LengthMismatch { inputs: usize, targets: usize },

    /// Malformed IDX file or label
    #[error("format error: {0}")]
    Format(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

//! Error types for the projection engine.

use thiserror::Error;

/// Result type alias for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;

/// Errors that can occur when projecting a corpus.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// An entity's vector length differs from the first entity's.
    #[error("dimension mismatch at corpus position {position}: expected {expected}, got {actual}")]
    DimensionMismatch {
        position: usize,
        expected: usize,
        actual: usize,
    },

    /// A hyperparameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

//! Error types for the concept store.

use thiserror::Error;

use dmensions_embeddings::EntityId;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in the concept store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Concept text was empty after normalization.
    #[error("concept text is empty")]
    EmptyConcept,

    /// No concept with the given id.
    #[error("concept not found: {0}")]
    NotFound(EntityId),

    /// A stored vector blob is not a whole number of `f32`s.
    #[error("corrupt vector blob: {len} bytes is not a multiple of 4")]
    CorruptBlob { len: usize },

    /// The store document breaks a store invariant.
    #[error("invalid store document: {0}")]
    InvalidDocument(String),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Embedding generation error.
    #[error("embedding error: {0}")]
    Embedding(#[from] dmensions_embeddings::EmbeddingError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Base64 decoding error.
    #[error("blob decoding error: {0}")]
    Decode(#[from] base64::DecodeError),
}

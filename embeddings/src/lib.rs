//! # Embeddings
//!
//! Vector arithmetic, cosine similarity search, and embedding generation
//! for the Dmensions concept starfield.
//!
//! ## Features
//!
//! - **Vector Math**: Elementwise arithmetic, dot product, normalization
//! - **Similarity Search**: Score and rank a corpus against a query vector
//! - **Embedding Generation**: Convert concept text to dense vectors via Ollama
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings System                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider ──► Embedding ──► Entity                     │
//! │       │                    │            │                       │
//! │       ▼                    ▼            ▼                       │
//! │    Ollama             vector math   search / rank               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod entity;
pub mod error;
pub mod provider;
pub mod similarity;
pub mod vector;

pub use entity::{Entity, EntityId};
pub use error::{EmbeddingError, Result};
pub use provider::{
    EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, OllamaConfig, OllamaProvider,
};
pub use similarity::{SearchResult, find_top_k, rank_descending, search};
pub use vector::{ElementwiseOp, cosine_similarity, dot, magnitude, normalize};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

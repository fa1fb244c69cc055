//! # Concept Store
//!
//! Persistent storage for concepts and their embedding vectors.
//!
//! The store is the only component that talks to the embedding provider:
//! text goes in, and search and projection get uniform-length [`Entity`]
//! corpora out.
//!
//! ```text
//! text ──► normalize ──► EmbeddingProvider ──► Concept ──► concepts.json
//!                                                 │
//!                                                 ▼
//!                                         all_entities() ──► search / project
//! ```

pub mod blob;
pub mod concept;
pub mod error;
pub mod store;
pub mod vocabulary;

pub use blob::{blob_to_vector, vector_to_blob};
pub use concept::{Concept, normalize_content};
pub use error::{Result, StoreError};
pub use store::{ConceptStore, STORE_FILE};
pub use vocabulary::DEFAULT_VOCABULARY;

pub use dmensions_embeddings::Entity;

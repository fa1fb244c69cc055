//! Corpus entries shared by search and projection.

use serde::{Deserialize, Serialize};

use crate::Embedding;

/// Stable identifier of a stored concept.
pub type EntityId = i64;

/// A labelled embedding as handed over by the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier, stable across calls.
    pub id: EntityId,

    /// Human readable label (the concept text).
    pub label: String,

    /// The embedding vector.
    pub vector: Embedding,
}

impl Entity {
    /// Create a new entity.
    pub fn new(id: EntityId, label: impl Into<String>, vector: Embedding) -> Self {
        Self {
            id,
            label: label.into(),
            vector,
        }
    }

    /// Length of the embedding vector.
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dmensions_embeddings::{Embedding, Entity, EntityId};

use crate::blob;
use crate::error::Result;

/// A stored concept and its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct Concept {
    pub id: EntityId,
    pub content: String,
    pub vector: Embedding,
    pub created_at: DateTime<Utc>,
}

impl Concept {
    pub fn to_entity(&self) -> Entity {
        Entity::new(self.id, self.content.clone(), self.vector.clone())
    }
}

/// Trim surrounding whitespace and lowercase, so "  Fox" and "fox" are the
/// same concept.
pub fn normalize_content(text: &str) -> String {
    text.trim().to_lowercase()
}

/// On-disk form of a [`Concept`]; the vector is a base64 blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ConceptRecord {
    id: EntityId,
    content: String,
    vector: String,
    created_at: DateTime<Utc>,
}

impl From<&Concept> for ConceptRecord {
    fn from(concept: &Concept) -> Self {
        Self {
            id: concept.id,
            content: concept.content.clone(),
            vector: blob::encode(&concept.vector),
            created_at: concept.created_at,
        }
    }
}

impl ConceptRecord {
    pub(crate) fn into_concept(self) -> Result<Concept> {
        Ok(Concept {
            id: self.id,
            content: self.content,
            vector: blob::decode(&self.vector)?,
            created_at: self.created_at,
        })
    }
}

//! Similarity search over a corpus of entities.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{Entity, EntityId};
use crate::error::Result;
use crate::vector::cosine_similarity;

/// A similarity search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// ID of the matched entity.
    pub id: EntityId,

    /// Label of the matched entity.
    pub label: String,

    /// Cosine similarity to the query, in [-1, 1].
    pub similarity: f32,
}

impl SearchResult {
    /// Create a new search result.
    pub fn new(id: EntityId, label: impl Into<String>, similarity: f32) -> Self {
        Self {
            id,
            label: label.into(),
            similarity,
        }
    }
}

/// Score every entity in `corpus` against `query`.
///
/// Returns exactly one result per entity, in corpus order. Fails on the first
/// entity whose vector length differs from the query.
pub fn search(query: &[f32], corpus: &[Entity]) -> Result<Vec<SearchResult>> {
    let results = corpus
        .iter()
        .map(|entity| {
            let similarity = cosine_similarity(query, &entity.vector)?;
            Ok(SearchResult::new(entity.id, entity.label.clone(), similarity))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Scored {} entities against query", results.len());
    Ok(results)
}

/// Sort results by similarity, highest first.
///
/// The sort is stable: equal similarities keep their input order.
pub fn rank_descending(results: &mut [SearchResult]) {
    results.sort_by_key(|r| Reverse(OrderedFloat(r.similarity)));
}

/// Search, rank, and keep the `k` best results scoring at least `min_score`.
pub fn find_top_k(
    query: &[f32],
    corpus: &[Entity],
    k: usize,
    min_score: f32,
) -> Result<Vec<SearchResult>> {
    let mut results = search(query, corpus)?;
    results.retain(|r| r.similarity >= min_score);
    rank_descending(&mut results);
    results.truncate(k);
    Ok(results)
}

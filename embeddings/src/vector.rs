//! Elementwise vector arithmetic over embeddings.
//!
//! Every operation taking two vectors checks that they have the same length
//! and returns [`EmbeddingError::DimensionMismatch`] otherwise.

use serde::{Deserialize, Serialize};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Binary operation applied position-by-position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementwiseOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ElementwiseOp {
    fn apply(self, x: f32, y: f32) -> f32 {
        match self {
            Self::Add => x + y,
            Self::Subtract => x - y,
            Self::Multiply => x * y,
            Self::Divide => x / y,
        }
    }
}

fn check_dimensions(a: &[f32], b: &[f32]) -> Result<()> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}

/// Apply `op` to each pair of components of `a` and `b`.
///
/// Division follows IEEE semantics: a zero divisor yields an infinity or NaN
/// component rather than an error.
pub fn elementwise(op: ElementwiseOp, a: &[f32], b: &[f32]) -> Result<Embedding> {
    check_dimensions(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| op.apply(*x, *y)).collect())
}

pub fn add(a: &[f32], b: &[f32]) -> Result<Embedding> {
    elementwise(ElementwiseOp::Add, a, b)
}

pub fn subtract(a: &[f32], b: &[f32]) -> Result<Embedding> {
    elementwise(ElementwiseOp::Subtract, a, b)
}

pub fn multiply(a: &[f32], b: &[f32]) -> Result<Embedding> {
    elementwise(ElementwiseOp::Multiply, a, b)
}

pub fn divide(a: &[f32], b: &[f32]) -> Result<Embedding> {
    elementwise(ElementwiseOp::Divide, a, b)
}

/// Multiply every component by `factor`.
pub fn scale(v: &[f32], factor: f32) -> Embedding {
    v.iter().map(|x| x * factor).collect()
}

/// Sum of elementwise products.
pub fn dot(a: &[f32], b: &[f32]) -> Result<f32> {
    check_dimensions(a, b)?;
    Ok(dot_unchecked(a, b))
}

fn dot_unchecked(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Euclidean norm.
pub fn magnitude(v: &[f32]) -> f32 {
    dot_unchecked(v, v).sqrt()
}

/// Scale `v` to unit length.
///
/// A zero vector has no direction and is returned unchanged.
pub fn normalize(v: &[f32]) -> Embedding {
    let mag = magnitude(v);
    if mag == 0.0 {
        return v.to_vec();
    }
    v.iter().map(|x| x / mag).collect()
}

/// Compute the cosine similarity between two embeddings.
///
/// Returns a value between -1.0 and 1.0, where:
/// - 1.0 means identical direction
/// - 0.0 means orthogonal vectors
/// - -1.0 means opposite vectors
///
/// If either vector has zero magnitude the similarity is defined as 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    check_dimensions(a, b)?;

    let magnitude_a = magnitude(a);
    let magnitude_b = magnitude(b);
    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_unchecked(a, b) / (magnitude_a * magnitude_b))
}

/// Squared Euclidean distance between two embeddings, accumulated in `f64`.
pub fn squared_euclidean_distance(a: &[f32], b: &[f32]) -> Result<f64> {
    check_dimensions(a, b)?;
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| {
            let diff = f64::from(*x) - f64::from(*y);
            diff * diff
        })
        .sum())
}

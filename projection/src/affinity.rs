//! Pairwise affinity matrices.
//!
//! `P` captures neighbourhoods in the original embedding space and is built
//! once per projection. `Q` captures neighbourhoods in the current 2D layout
//! and is rebuilt every iteration. Both are indexed by corpus position and
//! have a zero diagonal.

use dmensions_embeddings::vector::squared_euclidean_distance;
use dmensions_embeddings::{EmbeddingError, Entity};

use crate::error::{ProjectionError, Result};
use crate::point::Point2D;

/// Dense square matrix stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct AffinityMatrix {
    n: usize,
    values: Vec<f64>,
}

impl AffinityMatrix {
    /// An `n x n` matrix of zeros.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            values: vec![0.0; n * n],
        }
    }

    /// Number of rows (and columns).
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    fn set(&mut self, i: usize, j: usize, value: f64) {
        self.values[i * self.n + j] = value;
    }

    /// One row as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    /// Sum of every entry.
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Divide every entry by `total`, treating a zero total as 1.
    fn normalize_by(&mut self, total: f64) {
        let total = if total == 0.0 { 1.0 } else { total };
        for value in &mut self.values {
            *value /= total;
        }
    }

    /// Whether `M[i][j]` and `M[j][i]` agree within `tolerance` everywhere.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        (0..self.n).all(|i| {
            (i + 1..self.n).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tolerance)
        })
    }
}

/// Build the joint probability matrix `P` from high-dimensional vectors.
///
/// Uses a Gaussian kernel with fixed bandwidth `sigma_squared`, symmetrizes
/// with `(raw[i][j] + raw[j][i]) / 2N` and normalizes the whole matrix to
/// sum to 1. Fails if any vector's length differs from the first one's.
pub fn high_dimensional(corpus: &[Entity], sigma_squared: f64) -> Result<AffinityMatrix> {
    let n = corpus.len();
    let two_sigma_squared = 2.0 * sigma_squared;

    let mut raw = AffinityMatrix::zeros(n);
    for i in 0..n {
        for j in 0..n {
            if i != j {
                let distance = squared_euclidean_distance(&corpus[i].vector, &corpus[j].vector)
                    .map_err(|e| mismatch_at(j, e))?;
                raw.set(i, j, (-distance / two_sigma_squared).exp());
            }
        }
    }

    let scale = 2.0 * n as f64;
    let mut p = AffinityMatrix::zeros(n);
    for i in 0..n {
        for j in 0..n {
            p.set(i, j, (raw.get(i, j) + raw.get(j, i)) / scale);
        }
    }

    let total = p.sum();
    p.normalize_by(total);
    Ok(p)
}

fn mismatch_at(position: usize, error: EmbeddingError) -> ProjectionError {
    match error {
        EmbeddingError::DimensionMismatch { expected, actual } => {
            ProjectionError::DimensionMismatch {
                position,
                expected,
                actual,
            }
        }
        other => ProjectionError::InvalidConfig(other.to_string()),
    }
}

/// Student-t affinities of the current low-dimensional layout.
#[derive(Debug, Clone)]
pub struct LowDimensional {
    /// Unnormalized kernel `1 / (1 + |y_i - y_j|^2)`.
    pub kernel: AffinityMatrix,

    /// `kernel` normalized to sum to 1.
    pub q: AffinityMatrix,
}

impl LowDimensional {
    pub fn compute(points: &[Point2D]) -> Self {
        let n = points.len();
        let mut kernel = AffinityMatrix::zeros(n);
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    kernel.set(i, j, 1.0 / (1.0 + points[i].squared_distance(&points[j])));
                }
            }
        }

        let mut q = kernel.clone();
        q.normalize_by(kernel.sum());
        Self { kernel, q }
    }
}

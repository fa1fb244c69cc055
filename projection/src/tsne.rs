//! Simplified t-SNE.
//!
//! Fixed-bandwidth Gaussian affinities in the input space, Student-t
//! affinities in the plane, plain gradient descent with a synchronous update.
//! There is no momentum, no early exaggeration and no early stopping.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use dmensions_embeddings::{Entity, EntityId};

use crate::affinity::{self, AffinityMatrix, LowDimensional};
use crate::config::TsneConfig;
use crate::error::{ProjectionError, Result};
use crate::point::Point2D;

/// Mapping from entity id to its projected coordinate.
pub type Projection = HashMap<EntityId, Point2D>;

/// Placement used when the corpus holds a single entity.
pub const SINGLE_ENTITY_POINT: Point2D = Point2D { x: 0.5, y: 0.5 };

/// Projects a corpus of embeddings onto the plane.
#[derive(Debug, Clone, Default)]
pub struct TsneProjector {
    config: TsneConfig,
}

impl TsneProjector {
    /// Create a projector with the given configuration.
    pub fn new(config: TsneConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TsneConfig {
        &self.config
    }

    /// Project every entity and key the result by entity id.
    pub fn project(&self, corpus: &[Entity]) -> Result<Projection> {
        let points = self.layout(corpus)?;
        Ok(corpus.iter().map(|e| e.id).zip(points).collect())
    }

    /// Project every entity and return the points in corpus order.
    ///
    /// An empty corpus yields no points and a single entity is placed at
    /// [`SINGLE_ENTITY_POINT`]; neither case looks at the configuration.
    pub fn layout(&self, corpus: &[Entity]) -> Result<Vec<Point2D>> {
        match corpus.len() {
            0 => return Ok(Vec::new()),
            1 => return Ok(vec![SINGLE_ENTITY_POINT]),
            _ => {}
        }

        self.config.validate()?;
        validate_dimensions(corpus)?;

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let points = initial_layout(corpus.len(), self.config.init_scale, &mut rng);

        self.descend(corpus, points)
    }

    /// Run the full gradient descent from the given starting layout.
    fn descend(&self, corpus: &[Entity], mut points: Vec<Point2D>) -> Result<Vec<Point2D>> {
        let n = corpus.len();
        info!(
            "Projecting {n} entities ({} iterations, learning rate {})",
            self.config.iterations, self.config.learning_rate
        );

        let p = affinity::high_dimensional(corpus, self.config.sigma_squared)?;
        debug!("High-dimensional affinities ready (sum {})", p.sum());

        let learning_rate = self.config.learning_rate;
        for iteration in 0..self.config.iterations {
            let low = LowDimensional::compute(&points);
            let gradients = self.gradients(&p, &low, &points);

            for (point, gradient) in points.iter_mut().zip(&gradients) {
                point.x -= learning_rate * gradient.x;
                point.y -= learning_rate * gradient.y;
            }

            if (iteration + 1) % 100 == 0 {
                debug!("Finished iteration {}", iteration + 1);
            }
        }

        info!("Projection of {n} entities complete");
        Ok(points)
    }

    fn gradients(
        &self,
        p: &AffinityMatrix,
        low: &LowDimensional,
        points: &[Point2D],
    ) -> Vec<Point2D> {
        if self.config.parallel {
            (0..points.len())
                .into_par_iter()
                .map(|i| gradient_at(i, p, low, points))
                .collect()
        } else {
            (0..points.len())
                .map(|i| gradient_at(i, p, low, points))
                .collect()
        }
    }
}

/// Project `corpus` with default settings apart from the iteration count and
/// learning rate.
pub fn project(corpus: &[Entity], iterations: usize, learning_rate: f64) -> Result<Projection> {
    TsneProjector::new(TsneConfig::new(iterations, learning_rate)).project(corpus)
}

fn validate_dimensions(corpus: &[Entity]) -> Result<()> {
    let Some(first) = corpus.first() else {
        return Ok(());
    };
    let expected = first.dimension();
    match corpus
        .iter()
        .enumerate()
        .find(|(_, entity)| entity.dimension() != expected)
    {
        Some((position, entity)) => Err(ProjectionError::DimensionMismatch {
            position,
            expected,
            actual: entity.dimension(),
        }),
        None => Ok(()),
    }
}

fn initial_layout(n: usize, scale: f64, rng: &mut StdRng) -> Vec<Point2D> {
    (0..n)
        .map(|_| Point2D::new(rng.random::<f64>() * scale, rng.random::<f64>() * scale))
        .collect()
}

/// `dC/dy_i = 4 * sum_j (p_ij - q_ij) * (1 + |y_i - y_j|^2)^-1 * (y_i - y_j)`
fn gradient_at(i: usize, p: &AffinityMatrix, low: &LowDimensional, points: &[Point2D]) -> Point2D {
    let mut gradient = Point2D::default();
    let p_row = p.row(i);
    let q_row = low.q.row(i);
    let kernel_row = low.kernel.row(i);
    let yi = points[i];

    for (j, yj) in points.iter().enumerate() {
        if i == j {
            continue;
        }
        let mult = 4.0 * (p_row[j] - q_row[j]) * kernel_row[j];
        gradient.x += mult * (yi.x - yj.x);
        gradient.y += mult * (yi.y - yj.y);
    }
    gradient
}

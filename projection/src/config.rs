//! Hyperparameters for the t-SNE projection.

use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, Result};

/// Configuration for a single projection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TsneConfig {
    /// Number of gradient descent iterations. Always run in full.
    pub iterations: usize,

    /// Step size applied to each gradient.
    pub learning_rate: f64,

    /// Fixed Gaussian bandwidth for the high-dimensional affinities.
    pub sigma_squared: f64,

    /// Upper bound of the uniform initial coordinates.
    pub init_scale: f64,

    /// Seed for the initial layout. `None` draws from OS entropy.
    pub seed: Option<u64>,

    /// Evaluate per-point gradients on the rayon thread pool.
    pub parallel: bool,
}

impl TsneConfig {
    /// Create a configuration with the given iteration count and learning rate.
    pub fn new(iterations: usize, learning_rate: f64) -> Self {
        Self {
            iterations,
            learning_rate,
            ..Self::default()
        }
    }

    /// Fix the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the Gaussian bandwidth.
    pub fn with_sigma_squared(mut self, sigma_squared: f64) -> Self {
        self.sigma_squared = sigma_squared;
        self
    }

    /// Set the initial coordinate scale.
    pub fn with_init_scale(mut self, init_scale: f64) -> Self {
        self.init_scale = init_scale;
        self
    }

    /// Enable or disable parallel gradient evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check that every hyperparameter is usable.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(ProjectionError::InvalidConfig(
                "iterations must be positive".to_string(),
            ));
        }
        positive("learning_rate", self.learning_rate)?;
        positive("sigma_squared", self.sigma_squared)?;
        positive("init_scale", self.init_scale)?;
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ProjectionError::InvalidConfig(format!(
            "{name} must be a positive finite number, got {value}"
        )))
    }
}

impl Default for TsneConfig {
    fn default() -> Self {
        Self {
            iterations: 500,
            learning_rate: 20.0,
            sigma_squared: 0.8,
            init_scale: 1e-4,
            seed: None,
            parallel: false,
        }
    }
}

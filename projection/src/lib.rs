//! # Projection
//!
//! Collapses a corpus of high-dimensional embeddings into a 2D layout where
//! geometric closeness approximates semantic closeness.
//!
//! ```text
//! Entity[] ──► P (Gaussian, fixed) ──┐
//!                                    ├──► gradient ──► Point2D[] ──► id → Point2D
//! Point2D[] ─► Q (Student-t) ────────┘       ▲              │
//!                                            └──────────────┘
//!                                             `iterations` times
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dmensions_projection::{TsneConfig, TsneProjector};
//!
//! let projector = TsneProjector::new(TsneConfig::new(500, 20.0).with_seed(42));
//! let layout = projector.project(&entities)?;
//! ```
//!
//! A projection is a synchronous O(N²)-per-iteration batch job with no
//! cancellation point. Callers on an async runtime should run it on a
//! blocking worker.

pub mod affinity;
pub mod bounds;
pub mod config;
pub mod error;
pub mod point;
pub mod tsne;

pub use bounds::Bounds;
pub use config::TsneConfig;
pub use error::{ProjectionError, Result};
pub use point::Point2D;
pub use tsne::{Projection, SINGLE_ENTITY_POINT, TsneProjector, project};

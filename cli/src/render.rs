//! Text rendering of search results and projected layouts.

use std::collections::HashSet;

use serde::Serialize;

use dmensions_embeddings::{Entity, EntityId, SearchResult};
use dmensions_projection::{Bounds, Point2D, Projection};

const STAR: char = '*';

/// One projected concept, as emitted by `dmensions project --json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedConcept {
    pub id: EntityId,
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// Pair every entity with its coordinate, in corpus order.
pub fn placed(corpus: &[Entity], projection: &Projection) -> Vec<PlacedConcept> {
    corpus
        .iter()
        .filter_map(|entity| {
            projection.get(&entity.id).map(|point| PlacedConcept {
                id: entity.id,
                label: entity.label.clone(),
                x: point.x,
                y: point.y,
            })
        })
        .collect()
}

/// Ranked search results, one per line.
pub fn search_table(results: &[SearchResult]) -> String {
    let width = results.iter().map(|r| r.label.len()).max().unwrap_or(0);
    results
        .iter()
        .map(|r| format!("{:<width$}  {:>7.4}", r.label, r.similarity))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Projected coordinates, one concept per line.
pub fn projection_table(concepts: &[PlacedConcept]) -> String {
    concepts
        .iter()
        .map(|c| format!("{:>5}  {:<24} {:>12.6} {:>12.6}", c.id, c.label, c.x, c.y))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A fixed-size character canvas for drawing a layout.
#[derive(Debug, Clone, Copy)]
pub struct Starfield {
    width: usize,
    height: usize,
}

impl Starfield {
    /// A canvas of `width` columns and `height` rows, each at least 1.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Draw each concept as a star followed by its label.
    ///
    /// The layout is stretched to fill the canvas. Labels are clipped at the
    /// right edge and never overwrite a star or an earlier label.
    pub fn draw(&self, concepts: &[PlacedConcept]) -> String {
        let mut grid = vec![vec![' '; self.width]; self.height];

        let points: Vec<Point2D> = concepts.iter().map(|c| Point2D::new(c.x, c.y)).collect();
        if let Some(bounds) = Bounds::of(&points) {
            let cells: Vec<(usize, usize)> = points.iter().map(|p| self.cell(&bounds, p)).collect();
            for &(row, col) in &cells {
                grid[row][col] = STAR;
            }

            let mut occupied: HashSet<(usize, usize)> = cells.iter().copied().collect();
            for (concept, &(row, col)) in concepts.iter().zip(&cells) {
                for (offset, ch) in concept.label.chars().enumerate() {
                    let c = col + 2 + offset;
                    if c >= self.width || occupied.contains(&(row, c)) {
                        break;
                    }
                    grid[row][c] = ch;
                    occupied.insert((row, c));
                }
            }
        }

        grid.into_iter()
            .map(|line| line.into_iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn cell(&self, bounds: &Bounds, point: &Point2D) -> (usize, usize) {
        let normalized = bounds.normalize(point);
        let col = (normalized.x * (self.width - 1) as f64).round() as usize;
        let row = (normalized.y * (self.height - 1) as f64).round() as usize;
        (row.min(self.height - 1), col.min(self.width - 1))
    }
}

//! Bounding box of a layout, used to fit a projection onto a viewport.

use serde::{Deserialize, Serialize};

use crate::point::Point2D;

/// Axis-aligned bounds of a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Bounds of `points`, or `None` if there are none.
    pub fn of<'a>(points: impl IntoIterator<Item = &'a Point2D>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let initial = Self {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(points.fold(initial, |b, p| Self {
            min_x: b.min_x.min(p.x),
            max_x: b.max_x.max(p.x),
            min_y: b.min_y.min(p.y),
            max_y: b.max_y.max(p.y),
        }))
    }

    /// Horizontal extent; a degenerate range counts as 1.
    pub fn width(&self) -> f64 {
        non_zero(self.max_x - self.min_x)
    }

    /// Vertical extent; a degenerate range counts as 1.
    pub fn height(&self) -> f64 {
        non_zero(self.max_y - self.min_y)
    }

    /// Map `point` into the unit square spanned by these bounds.
    pub fn normalize(&self, point: &Point2D) -> Point2D {
        Point2D::new(
            (point.x - self.min_x) / self.width(),
            (point.y - self.min_y) / self.height(),
        )
    }
}

fn non_zero(range: f64) -> f64 {
    if range == 0.0 { 1.0 } else { range }
}

//! Region model: the station boundary being traced and its host-facing value.
//!
//! `Region` is the editor's internal state machine. Its three variants make
//! the illegal combinations of the wire shape (a completed polygon with too
//! few points, a drawing polygon with none) unrepresentable once a value has
//! passed through [`Region::try_from`]. `Polygon` is the serialisable value
//! handed to and received from the host.
//!
//! Every mutator re-checks its own preconditions and reports whether it
//! changed anything; callers use that to decide whether to notify.

#[cfg(test)]
#[path = "region_test.rs"]
mod region_test;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_CLOSED_POINTS;
use crate::surface::Point;

/// Error returned when a host-supplied polygon cannot seed the editor.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegionError {
    /// A completed polygon must have at least three vertices.
    #[error("completed polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),
    /// A vertex is non-finite or outside the normalised `[0, 1]` range.
    #[error("point {index} is outside the normalised range: ({x}, {y})")]
    OutOfBounds { index: usize, x: f64, y: f64 },
}

/// A station boundary as stored by the host and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Vertices in drawing order, normalised to the image size.
    pub points: Vec<Point>,
    /// Whether the loop has been closed.
    pub completed: bool,
}

impl Polygon {
    /// Shoelace area in normalised units. Zero with fewer than three points.
    #[must_use]
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < MIN_CLOSED_POINTS {
            return 0.0;
        }
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice.abs() / 2.0
    }

    /// Average of the vertices, or `None` for an empty polygon.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn centroid(&self) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point::new(sx / n, sy / n))
    }

    /// Axis-aligned `(min, max)` corners, or `None` for an empty polygon.
    #[must_use]
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = self.points.first()?;
        let init = (*first, *first);
        Some(self.points.iter().fold(init, |(lo, hi), p| {
            (Point::new(lo.x.min(p.x), lo.y.min(p.y)), Point::new(hi.x.max(p.x), hi.y.max(p.y)))
        }))
    }

    /// Ray-casting point-in-polygon test. Open polygons contain nothing.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        if !self.completed || self.points.len() < MIN_CLOSED_POINTS {
            return false;
        }
        let mut inside = false;
        let mut j = self.points.len() - 1;
        for (i, vi) in self.points.iter().enumerate() {
            let vj = self.points[j];
            if (vi.y > p.y) != (vj.y > p.y) && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// Editing state of the station region.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Region {
    /// Nothing has been drawn.
    #[default]
    Empty,
    /// Points are being placed; the loop is still open. Holds at least one point.
    Drawing { points: Vec<Point> },
    /// The loop is closed; vertices may be dragged. Holds at least three points.
    Completed { points: Vec<Point> },
}

impl Region {
    /// Vertices in drawing order; empty for [`Region::Empty`].
    #[must_use]
    pub fn points(&self) -> &[Point] {
        match self {
            Self::Empty => &[],
            Self::Drawing { points } | Self::Completed { points } => points,
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Whether [`Region::close`] would succeed.
    #[must_use]
    pub fn can_close(&self) -> bool {
        matches!(self, Self::Drawing { points } if points.len() >= MIN_CLOSED_POINTS)
    }

    /// Append a vertex. Starts a new region when empty; refused once closed.
    pub fn push_point(&mut self, p: Point) -> bool {
        match self {
            Self::Empty => {
                *self = Self::Drawing { points: vec![p] };
                true
            }
            Self::Drawing { points } => {
                points.push(p);
                true
            }
            Self::Completed { .. } => false,
        }
    }

    /// Close the loop. Requires an open region with at least three points.
    pub fn close(&mut self) -> bool {
        if !self.can_close() {
            return false;
        }
        if let Self::Drawing { points } = std::mem::take(self) {
            *self = Self::Completed { points };
        }
        true
    }

    /// Remove the most recent vertex of an open region. Removing the last
    /// remaining vertex empties the region.
    pub fn undo(&mut self) -> bool {
        let Self::Drawing { points } = self else {
            return false;
        };
        points.pop();
        if points.is_empty() {
            *self = Self::Empty;
        }
        true
    }

    /// Discard the region. Returns `false` when it was already empty.
    pub fn clear(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        *self = Self::Empty;
        true
    }

    /// Reposition vertex `index` of a closed region.
    pub fn move_vertex(&mut self, index: usize, p: Point) -> bool {
        let Self::Completed { points } = self else {
            return false;
        };
        let Some(slot) = points.get_mut(index) else {
            return false;
        };
        *slot = p;
        true
    }

    /// Host-facing value; `None` for an empty region.
    #[must_use]
    pub fn to_polygon(&self) -> Option<Polygon> {
        match self {
            Self::Empty => None,
            Self::Drawing { points } => Some(Polygon { points: points.clone(), completed: false }),
            Self::Completed { points } => Some(Polygon { points: points.clone(), completed: true }),
        }
    }

    /// Build a region from an optional host-supplied polygon.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError`] when the polygon violates the region invariants.
    pub fn from_existing(polygon: Option<Polygon>) -> Result<Self, RegionError> {
        polygon.map_or(Ok(Self::Empty), Self::try_from)
    }
}

impl TryFrom<Polygon> for Region {
    type Error = RegionError;

    fn try_from(polygon: Polygon) -> Result<Self, Self::Error> {
        if let Some((index, p)) = polygon.points.iter().enumerate().find(|(_, p)| !p.is_normalized()) {
            return Err(RegionError::OutOfBounds { index, x: p.x, y: p.y });
        }
        if polygon.completed {
            if polygon.points.len() < MIN_CLOSED_POINTS {
                return Err(RegionError::TooFewPoints(polygon.points.len()));
            }
            return Ok(Self::Completed { points: polygon.points });
        }
        if polygon.points.is_empty() {
            return Ok(Self::Empty);
        }
        Ok(Self::Drawing { points: polygon.points })
    }
}

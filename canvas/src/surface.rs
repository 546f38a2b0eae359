#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use serde::{Deserialize, Serialize};

/// A point in either surface-pixel or normalised image space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`, in whatever space both points share.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Whether both coordinates are finite and inside `[0, 1]`.
    #[must_use]
    pub fn is_normalized(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// Displayed size of the background image on screen.
///
/// `width` / `height` are in CSS pixels. `dpr` is the device pixel ratio used
/// for the backing store; it never enters coordinate conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Default for Surface {
    fn default() -> Self {
        Self { width: 0.0, height: 0.0, dpr: 1.0 }
    }
}

impl Surface {
    #[must_use]
    pub fn new(width: f64, height: f64, dpr: f64) -> Self {
        Self { width, height, dpr }
    }

    /// Size a surface to `container_width`, keeping the image's natural aspect ratio.
    ///
    /// Falls back to a zero-height surface when the image has not loaded yet
    /// (natural size of zero).
    #[must_use]
    pub fn fit_width(container_width: f64, natural_width: f64, natural_height: f64, dpr: f64) -> Self {
        let width = container_width.max(0.0);
        let height = if natural_width > 0.0 && natural_height > 0.0 {
            width * natural_height / natural_width
        } else {
            0.0
        };
        Self { width, height, dpr: dpr.max(1.0) }
    }

    /// Whether the surface has a usable area for input and drawing.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Convert a normalised point to surface pixels.
    #[must_use]
    pub fn to_pixels(&self, norm: Point) -> Point {
        Point { x: norm.x * self.width, y: norm.y * self.height }
    }

    /// Convert a surface-pixel point to normalised coordinates, clamped into `[0, 1]`.
    ///
    /// Returns `None` when the surface has no area.
    #[must_use]
    pub fn to_normalized(&self, px: Point) -> Option<Point> {
        if !self.is_ready() {
            return None;
        }
        Some(Point {
            x: (px.x / self.width).clamp(0.0, 1.0),
            y: (px.y / self.height).clamp(0.0, 1.0),
        })
    }
}

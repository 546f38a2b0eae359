#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::surface::{Point, Surface};

/// Whether normalised `vertex` lies strictly within `radius_px` of `screen_pt`.
#[must_use]
pub fn within_radius(vertex: Point, screen_pt: Point, surface: &Surface, radius_px: f64) -> bool {
    surface.to_pixels(vertex).distance_to(screen_pt) < radius_px
}

/// Index of the vertex nearest to `screen_pt` within `radius_px`, if any.
#[must_use]
pub fn hit_vertex(points: &[Point], screen_pt: Point, surface: &Surface, radius_px: f64) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, surface.to_pixels(*p).distance_to(screen_pt)))
        .filter(|(_, d)| *d < radius_px)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Whether `screen_pt` would close the loop on an open region with `points`.
///
/// Requires `min_points` already placed; the close target is always the first vertex.
#[must_use]
pub fn hits_first_vertex(points: &[Point], screen_pt: Point, surface: &Surface, radius_px: f64, min_points: usize) -> bool {
    if points.len() < min_points {
        return false;
    }
    points
        .first()
        .is_some_and(|first| within_radius(*first, screen_pt, surface, radius_px))
}

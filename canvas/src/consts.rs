//! Shared numeric constants for the canvas crate.

// ── Region ──────────────────────────────────────────────────────

/// Fewest vertices a closed region may have.
pub const MIN_CLOSED_POINTS: usize = 3;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space radius in pixels for closing the loop and grabbing vertices.
pub const CLOSE_RADIUS_PX: f64 = 15.0;

// ── Rendering ───────────────────────────────────────────────────

/// Vertex marker radius while the region is still being drawn.
pub const VERTEX_RADIUS_PX: f64 = 5.0;

/// Vertex marker radius once the region is closed and draggable.
pub const COMPLETED_VERTEX_RADIUS_PX: f64 = 7.0;

/// Outline width drawn around draggable vertex markers.
pub const VERTEX_OUTLINE_PX: f64 = 2.0;

/// Segment stroke width.
pub const LINE_WIDTH_PX: f64 = 2.0;

/// Dash and gap length of the next-point preview segment.
pub const PREVIEW_DASH_PX: f64 = 5.0;

// ── Help ────────────────────────────────────────────────────────

/// Shown by the host while drawing mode is on.
pub const HELP_TEXT: &str =
    "Click to add points. Click the first point or double-click to close the region. Drag points to adjust.";

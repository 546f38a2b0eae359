//! Editor configuration parsed from host-supplied JSON.
//!
//! Every field has a default, so `{}` is a valid configuration and hosts
//! only spell out what they change.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    CLOSE_RADIUS_PX, COMPLETED_VERTEX_RADIUS_PX, LINE_WIDTH_PX, PREVIEW_DASH_PX, VERTEX_OUTLINE_PX, VERTEX_RADIUS_PX,
};

/// Error returned by [`SurfaceConfig::from_json`] and [`SurfaceConfig::validate`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The input is not valid JSON for this shape.
    #[error("failed to parse surface config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A length that must be a positive, finite number is not.
    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

/// Colours and sizes used when drawing the region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionStyle {
    /// Segment stroke colour.
    pub line_color: String,
    /// Fill colour of every vertex marker except the first.
    pub vertex_color: String,
    /// Fill colour of the first vertex marker (the close target).
    pub first_vertex_color: String,
    /// Outline colour around draggable vertex markers.
    pub outline_color: String,
    /// Interior tint of a closed region.
    pub fill_color: String,
    pub line_width: f64,
    pub vertex_radius_px: f64,
    pub completed_vertex_radius_px: f64,
    pub outline_width: f64,
    pub preview_dash_px: f64,
}

impl Default for RegionStyle {
    fn default() -> Self {
        Self {
            line_color: "#3B82F6".into(),
            vertex_color: "#3B82F6".into(),
            first_vertex_color: "#EF4444".into(),
            outline_color: "#FFFFFF".into(),
            fill_color: "rgba(59, 130, 246, 0.2)".into(),
            line_width: LINE_WIDTH_PX,
            vertex_radius_px: VERTEX_RADIUS_PX,
            completed_vertex_radius_px: COMPLETED_VERTEX_RADIUS_PX,
            outline_width: VERTEX_OUTLINE_PX,
            preview_dash_px: PREVIEW_DASH_PX,
        }
    }
}

/// Behaviour and appearance of the drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Hit radius in CSS pixels for closing the loop and grabbing vertices.
    pub close_radius_px: f64,
    /// Multiply the hit radius by the device pixel ratio.
    pub scale_radius_with_dpr: bool,
    pub style: RegionStyle,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self { close_radius_px: CLOSE_RADIUS_PX, scale_radius_with_dpr: false, style: RegionStyle::default() }
    }
}

impl SurfaceConfig {
    /// Parse and validate a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the JSON is malformed or a length is not positive.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every length is a positive, finite number.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPositive`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lengths = [
            ("close_radius_px", self.close_radius_px),
            ("style.line_width", self.style.line_width),
            ("style.vertex_radius_px", self.style.vertex_radius_px),
            ("style.completed_vertex_radius_px", self.style.completed_vertex_radius_px),
            ("style.outline_width", self.style.outline_width),
            ("style.preview_dash_px", self.style.preview_dash_px),
        ];
        for (field, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        Ok(())
    }

    /// Effective hit radius for a surface drawn at `dpr`.
    #[must_use]
    pub fn hit_radius_px(&self, dpr: f64) -> f64 {
        if self.scale_radius_with_dpr {
            self.close_radius_px * dpr.max(1.0)
        } else {
            self.close_radius_px
        }
    }
}

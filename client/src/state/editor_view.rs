//! Editor telemetry used by the toolbar and status line.
//!
//! ARCHITECTURE
//! ============
//! `StationEditor` owns the engine behind a `RefCell`, which Leptos cannot
//! track. After every dispatched event it publishes an [`EditorView`]
//! snapshot into a signal so buttons and labels re-render reactively.

#[cfg(test)]
#[path = "editor_view_test.rs"]
mod editor_view_test;

use station_canvas::config::SurfaceConfig;
use station_canvas::engine::EngineCore;
use station_canvas::region::{Polygon, Region};

/// Which stage of the region lifecycle the editor is in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegionPhase {
    #[default]
    Empty,
    Drawing,
    Closed,
}

/// Snapshot of the editor state consumed by chrome.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorView {
    pub phase: RegionPhase,
    pub point_count: usize,
    /// Share of the frame covered by a closed region, in `[0, 1]`.
    pub coverage: Option<f64>,
    pub drawing_mode: bool,
    pub can_complete: bool,
    pub can_undo: bool,
    pub can_clear: bool,
    pub help_text: Option<&'static str>,
}

impl EditorView {
    #[must_use]
    pub fn from_core(core: &EngineCore) -> Self {
        let region = core.region();
        let phase = match region {
            Region::Empty => RegionPhase::Empty,
            Region::Drawing { .. } => RegionPhase::Drawing,
            Region::Completed { .. } => RegionPhase::Closed,
        };
        let coverage = core.polygon().filter(|p| p.completed).map(|p| p.area());
        Self {
            phase,
            point_count: region.len(),
            coverage,
            drawing_mode: core.drawing_mode(),
            can_complete: core.can_complete(),
            can_undo: core.can_undo(),
            can_clear: core.can_clear(),
            help_text: core.help_text(),
        }
    }

    /// One-line summary for the status line.
    #[must_use]
    pub fn status_label(&self) -> String {
        let points = plural_points(self.point_count);
        match self.phase {
            RegionPhase::Empty => "No region drawn".to_owned(),
            RegionPhase::Drawing => format!("Drawing: {points}"),
            RegionPhase::Closed => match self.coverage {
                Some(share) => format!("Region closed: {points}, {:.1}% of frame", share * 100.0),
                None => format!("Region closed: {points}"),
            },
        }
    }
}

fn plural_points(n: usize) -> String {
    if n == 1 { "1 point".to_owned() } else { format!("{n} points") }
}

/// Build the engine state the editor starts from.
///
/// An invalid `config` is logged and replaced by the defaults. An invalid
/// `existing` polygon is logged and the editor starts empty.
#[must_use]
pub fn initial_core(config: SurfaceConfig, existing: Option<Polygon>, drawing_mode: bool) -> EngineCore {
    let config = match config.validate() {
        Ok(()) => config,
        Err(err) => {
            log::warn!("station editor using default config: {err}");
            SurfaceConfig::default()
        }
    };
    let mut core = EngineCore::new(config);
    if let Err(err) = core.load_polygon(existing) {
        log::warn!("station editor starting empty: {err}");
    }
    core.set_drawing_mode(drawing_mode);
    core
}

/// Swap in a polygon pushed by the host after mount.
///
/// Returns `true` when the region was replaced. A value equal to the current
/// region is skipped so an echo of our own `on_change` does not cancel a drag.
/// An invalid polygon is logged and the current region is kept.
pub fn replace_region(core: &mut EngineCore, next: Option<Polygon>) -> bool {
    if core.polygon() == next {
        return false;
    }
    match core.load_polygon(next) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("ignoring replacement station region: {err}");
            false
        }
    }
}

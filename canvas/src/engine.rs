use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::config::SurfaceConfig;
use crate::consts::{HELP_TEXT, MIN_CLOSED_POINTS};
use crate::hit;
use crate::input::{Button, InputState, Key, KeyCommand, Modifiers};
use crate::region::{Polygon, Region, RegionError};
use crate::render;
use crate::surface::{Point, Surface};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

const CURSOR_DEFAULT: &str = "default";
const CURSOR_CROSSHAIR: &str = "crosshair";
const CURSOR_CLOSE: &str = "pointer";
const CURSOR_GRAB: &str = "grab";
const CURSOR_GRABBING: &str = "grabbing";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The region was committed with a new value; `None` means no region.
    RegionChanged(Option<Polygon>),
    SetCursor(String),
    RenderNeeded,
}

/// Region editing state and gesture handling, independent of the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub region: Region,
    pub input: InputState,
    pub surface: Surface,
    pub config: SurfaceConfig,
    /// Whether pointer and keyboard handlers are live. Off means view-only.
    pub drawing_mode: bool,
    /// Last known pointer position in surface pixels, while over the surface.
    pub pointer: Option<Point>,
    cursor: &'static str,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(SurfaceConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            region: Region::Empty,
            input: InputState::Idle,
            surface: Surface::default(),
            config,
            drawing_mode: true,
            pointer: None,
            cursor: CURSOR_DEFAULT,
        }
    }

    // --- Host inputs ---

    /// Update surface dimensions (CSS pixels) and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.surface = Surface::new(width_css, height_css, dpr);
    }

    /// Replace the surface wholesale, e.g. after fitting it to the image.
    pub fn set_surface(&mut self, surface: Surface) {
        self.surface = surface;
    }

    /// Turn the interactive handlers on or off. Turning them off ends any drag.
    pub fn set_drawing_mode(&mut self, on: bool) -> Vec<Action> {
        self.drawing_mode = on;
        if !on {
            self.input = InputState::Idle;
        }
        let mut actions = vec![Action::RenderNeeded];
        self.sync_cursor(&mut actions);
        actions
    }

    /// Seed or replace the region from a host-held polygon.
    ///
    /// Any gesture in progress is dropped. No [`Action::RegionChanged`] is
    /// produced because the value came from the host.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError`] and leaves the current region untouched when
    /// the polygon violates the region invariants.
    pub fn load_polygon(&mut self, polygon: Option<Polygon>) -> Result<(), RegionError> {
        let region = Region::from_existing(polygon).inspect_err(|e| log::warn!("rejected station region: {e}"))?;
        log::debug!("loaded station region with {} points", region.len());
        self.region = region;
        self.input = InputState::Idle;
        Ok(())
    }

    // --- Commands ---

    /// Close the loop. No-op with fewer than three points or when already closed.
    pub fn complete(&mut self) -> Vec<Action> {
        if !self.region.close() {
            return Vec::new();
        }
        log::debug!("station region closed with {} points", self.region.len());
        self.committed()
    }

    /// Remove the last placed point of an open region.
    pub fn undo(&mut self) -> Vec<Action> {
        if !self.region.undo() {
            return Vec::new();
        }
        self.committed()
    }

    /// Discard the region. No-op when already empty.
    pub fn clear(&mut self) -> Vec<Action> {
        if !self.region.clear() {
            return Vec::new();
        }
        log::debug!("station region cleared");
        self.input = InputState::Idle;
        self.committed()
    }

    // --- Input events ---

    /// Click: append a point, or close the loop when landing on the first vertex.
    pub fn on_click(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if !self.accepts_input(button) {
            return Vec::new();
        }
        self.pointer = Some(screen_pt);
        let closes = self.region.is_drawing()
            && hit::hits_first_vertex(
                self.region.points(),
                screen_pt,
                &self.surface,
                self.hit_radius(),
                MIN_CLOSED_POINTS,
            );
        if closes {
            return self.complete();
        }
        let Some(norm) = self.surface.to_normalized(screen_pt) else {
            return Vec::new();
        };
        if !self.region.push_point(norm) {
            return Vec::new();
        }
        self.committed()
    }

    /// Double-click closes an open region with at least three points.
    pub fn on_double_click(&mut self, _screen_pt: Point, button: Button) -> Vec<Action> {
        if !self.accepts_input(button) {
            return Vec::new();
        }
        self.complete()
    }

    /// Pointer-down on a vertex of a closed region starts dragging it.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if !self.accepts_input(button) {
            return Vec::new();
        }
        self.pointer = Some(screen_pt);
        let Region::Completed { points } = &self.region else {
            return Vec::new();
        };
        let Some(index) = hit::hit_vertex(points, screen_pt, &self.surface, self.hit_radius()) else {
            return Vec::new();
        };
        self.input = InputState::DraggingVertex { index };
        let mut actions = vec![Action::RenderNeeded];
        self.sync_cursor(&mut actions);
        actions
    }

    /// Pointer-move: drag the active vertex, or refresh the next-point preview.
    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        self.pointer = Some(screen_pt);
        if !self.drawing_mode {
            return Vec::new();
        }
        if let InputState::DraggingVertex { index } = self.input {
            let moved = self
                .surface
                .to_normalized(screen_pt)
                .is_some_and(|norm| self.region.move_vertex(index, norm));
            if moved {
                return self.committed();
            }
            return Vec::new();
        }
        let mut actions = Vec::new();
        if self.region.is_drawing() {
            actions.push(Action::RenderNeeded);
        }
        self.sync_cursor(&mut actions);
        actions
    }

    /// Pointer-up ends a drag.
    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button) -> Vec<Action> {
        self.pointer = Some(screen_pt);
        self.end_drag()
    }

    /// Pointer leaving the surface ends a drag exactly like pointer-up and
    /// hides the preview segment.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.pointer = None;
        let mut actions = self.end_drag();
        if !actions.contains(&Action::RenderNeeded) {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Keyboard shortcuts: Enter completes, Backspace or Ctrl/Cmd+Z undoes.
    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        if !self.drawing_mode {
            return Vec::new();
        }
        match key.command(modifiers) {
            Some(KeyCommand::Complete) => self.complete(),
            Some(KeyCommand::Undo) => self.undo(),
            None => Vec::new(),
        }
    }

    // --- Queries ---

    /// The host-facing region value, `None` when nothing is drawn.
    #[must_use]
    pub fn polygon(&self) -> Option<Polygon> {
        self.region.to_polygon()
    }

    #[must_use]
    pub fn region(&self) -> &Region {
        &self.region
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.input.is_dragging()
    }

    #[must_use]
    pub fn drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    /// Interaction hint for the host to display while drawing mode is on.
    #[must_use]
    pub fn help_text(&self) -> Option<&'static str> {
        self.drawing_mode.then_some(HELP_TEXT)
    }

    #[must_use]
    pub fn can_complete(&self) -> bool {
        self.region.can_close()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.region.is_drawing()
    }

    #[must_use]
    pub fn can_clear(&self) -> bool {
        !self.region.is_empty()
    }

    /// CSS cursor last reported through [`Action::SetCursor`].
    #[must_use]
    pub fn cursor(&self) -> &'static str {
        self.cursor
    }

    /// Whether the dashed next-point preview should be drawn.
    #[must_use]
    pub fn shows_preview(&self) -> bool {
        self.drawing_mode && self.region.is_drawing() && self.pointer.is_some()
    }

    // --- Internals ---

    fn accepts_input(&self, button: Button) -> bool {
        self.drawing_mode && button == Button::Primary && self.surface.is_ready()
    }

    fn hit_radius(&self) -> f64 {
        self.config.hit_radius_px(self.surface.dpr)
    }

    fn end_drag(&mut self) -> Vec<Action> {
        if !self.input.is_dragging() {
            return Vec::new();
        }
        self.input = InputState::Idle;
        let mut actions = vec![Action::RenderNeeded];
        self.sync_cursor(&mut actions);
        actions
    }

    /// Actions for a committed region mutation.
    fn committed(&mut self) -> Vec<Action> {
        let mut actions = vec![Action::RegionChanged(self.region.to_polygon()), Action::RenderNeeded];
        self.sync_cursor(&mut actions);
        actions
    }

    fn cursor_at(&self, screen_pt: Option<Point>) -> &'static str {
        if !self.drawing_mode {
            return CURSOR_DEFAULT;
        }
        if self.input.is_dragging() {
            return CURSOR_GRABBING;
        }
        let radius = self.hit_radius();
        match &self.region {
            Region::Completed { points } => {
                if screen_pt.is_some_and(|p| hit::hit_vertex(points, p, &self.surface, radius).is_some()) {
                    CURSOR_GRAB
                } else {
                    CURSOR_DEFAULT
                }
            }
            Region::Drawing { points }
                if screen_pt
                    .is_some_and(|p| hit::hits_first_vertex(points, p, &self.surface, radius, MIN_CLOSED_POINTS)) =>
            {
                CURSOR_CLOSE
            }
            Region::Empty | Region::Drawing { .. } => CURSOR_CROSSHAIR,
        }
    }

    fn sync_cursor(&mut self, actions: &mut Vec<Action>) {
        let cursor = self.cursor_at(self.pointer);
        if cursor != self.cursor {
            self.cursor = cursor;
            actions.push(Action::SetCursor(cursor.to_owned()));
        }
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas
/// element and the background image.
pub struct Engine {
    canvas: HtmlCanvasElement,
    image: HtmlImageElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element, starting to
    /// load `image_url` as the background.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the image element cannot be created.
    pub fn new(canvas: HtmlCanvasElement, image_url: &str, config: SurfaceConfig) -> Result<Self, JsValue> {
        let image = HtmlImageElement::new()?;
        image.set_src(image_url);
        Ok(Self { canvas, image, core: EngineCore::new(config) })
    }

    /// The background image element, so the host can listen for `load`.
    #[must_use]
    pub fn image(&self) -> &HtmlImageElement {
        &self.image
    }

    /// Swap the background image. The region is kept; its coordinates are normalised.
    pub fn set_image_url(&mut self, image_url: &str) {
        self.image.set_src(image_url);
    }

    /// Whether the background image has finished loading.
    #[must_use]
    pub fn image_ready(&self) -> bool {
        self.image.complete() && self.image.natural_width() > 0
    }

    // --- Viewport ---

    /// Fit the surface to `container_width` CSS pixels using the image's
    /// natural aspect ratio, and size the canvas backing store for `dpr`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas style cannot be updated.
    pub fn resize(&mut self, container_width: f64, dpr: f64) -> Result<(), JsValue> {
        let surface = Surface::fit_width(
            container_width,
            f64::from(self.image.natural_width()),
            f64::from(self.image.natural_height()),
            dpr,
        );
        self.canvas.set_width(backing_px(surface.width, surface.dpr));
        self.canvas.set_height(backing_px(surface.height, surface.dpr));
        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", surface.width))?;
        style.set_property("height", &format!("{}px", surface.height))?;
        self.core.set_surface(surface);
        Ok(())
    }

    // --- Delegated host inputs ---

    pub fn set_drawing_mode(&mut self, on: bool) -> Vec<Action> {
        self.core.set_drawing_mode(on)
    }

    /// # Errors
    ///
    /// See [`EngineCore::load_polygon`].
    pub fn load_polygon(&mut self, polygon: Option<Polygon>) -> Result<(), RegionError> {
        self.core.load_polygon(polygon)
    }

    pub fn complete(&mut self) -> Vec<Action> {
        self.core.complete()
    }

    pub fn undo(&mut self) -> Vec<Action> {
        self.core.undo()
    }

    pub fn clear(&mut self) -> Vec<Action> {
        self.core.clear()
    }

    // --- Input events ---

    pub fn on_click(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_click(screen_pt, button)
    }

    pub fn on_double_click(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_double_click(screen_pt, button)
    }

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button)
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.core.on_pointer_leave()
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    /// Apply a CSS cursor reported through [`Action::SetCursor`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas style cannot be updated.
    pub fn set_cursor(&self, cursor: &str) -> Result<(), JsValue> {
        self.canvas.style().set_property("cursor", cursor)
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let Some(ctx) = self.canvas.get_context("2d")? else {
            return Err(JsValue::from_str("canvas 2d context unavailable"));
        };
        let ctx: CanvasRenderingContext2d = ctx.dyn_into()?;
        let core = &self.core;
        let pointer = if core.shows_preview() { core.pointer } else { None };
        render::draw(
            &ctx,
            self.image_ready().then_some(&self.image),
            &core.region,
            &core.surface,
            pointer,
            &core.config.style,
        )
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn polygon(&self) -> Option<Polygon> {
        self.core.polygon()
    }

    #[must_use]
    pub fn help_text(&self) -> Option<&'static str> {
        self.core.help_text()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn backing_px(css: f64, dpr: f64) -> u32 {
    (css * dpr).round().max(0.0) as u32
}

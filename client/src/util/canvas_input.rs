//! Canvas input mapping and pointer helper utilities.

#[cfg(test)]
#[path = "canvas_input_test.rs"]
mod canvas_input_test;

use station_canvas::input::{Key, KeyCommand, Modifiers};
#[cfg(feature = "hydrate")]
use station_canvas::surface::Point;

use crate::state::editor_view::EditorView;

/// Whether a `click` should reach the engine.
///
/// The browser fires `click` twice before `dblclick`; the second one carries
/// `detail == 2`. Dropping it means a double-click adds one vertex, then closes.
pub fn should_forward_click(detail: i32) -> bool {
    detail < 2
}

/// Keys the editor will act on, so the page does not also act on them.
///
/// Only shortcuts that change the region are consumed; Backspace on a closed
/// region, for example, is left to the page.
pub fn should_prevent_default_key(key: &str, modifiers: Modifiers, view: &EditorView) -> bool {
    if !view.drawing_mode {
        return false;
    }
    match Key(key.to_owned()).command(modifiers) {
        Some(KeyCommand::Complete) => view.can_complete,
        Some(KeyCommand::Undo) => view.can_undo,
        None => false,
    }
}

pub fn map_modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers { shift, ctrl, alt, meta }
}

/// Surface-pixel position of a mouse or pointer event on the canvas.
#[cfg(feature = "hydrate")]
pub fn event_point(ev: &leptos::ev::MouseEvent) -> Point {
    Point::new(f64::from(ev.offset_x()), f64::from(ev.offset_y()))
}

#[cfg(feature = "hydrate")]
pub fn event_modifiers(ev: &leptos::ev::KeyboardEvent) -> Modifiers {
    map_modifiers(ev.shift_key(), ev.ctrl_key(), ev.alt_key(), ev.meta_key())
}

//! Scene drawing: camera still, region tint, outline, preview, vertex markers.
//!
//! Reads region and surface state, writes pixels, mutates nothing else.
//! Canvas2D failures come back as `Err(JsValue)` for
//! [`crate::engine::Engine::render`] to surface to the host.

use std::f64::consts::TAU;

use js_sys::Array;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::config::RegionStyle;
use crate::consts::MIN_CLOSED_POINTS;
use crate::region::Region;
use crate::surface::{Point, Surface};

/// Draw the full scene: background, region fill, outline, preview, vertices.
///
/// `pointer` is the preview target in surface pixels; pass `None` to hide the
/// preview segment.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    image: Option<&HtmlImageElement>,
    region: &Region,
    surface: &Surface,
    pointer: Option<Point>,
    style: &RegionStyle,
) -> Result<(), JsValue> {
    // Layer 1: clear at device resolution.
    ctx.set_transform(surface.dpr, 0.0, 0.0, surface.dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, surface.width, surface.height);

    // Layer 2: background image scaled to the surface.
    if let Some(image) = image {
        ctx.draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, surface.width, surface.height)?;
    }

    let px: Vec<Point> = region.points().iter().map(|p| surface.to_pixels(*p)).collect();
    if px.is_empty() {
        return Ok(());
    }
    let completed = region.is_completed();

    // Layer 3: interior tint beneath the outline.
    if completed && px.len() >= MIN_CLOSED_POINTS {
        trace_path(ctx, &px, true);
        ctx.set_fill_style_str(&style.fill_color);
        ctx.fill();
    }

    // Layer 4: outline.
    ctx.set_stroke_style_str(&style.line_color);
    ctx.set_line_width(style.line_width);
    if px.len() > 1 {
        trace_path(ctx, &px, completed);
        ctx.stroke();
    }

    // Layer 5: next-point preview.
    if !completed {
        if let (Some(last), Some(target)) = (px.last(), pointer) {
            draw_preview(ctx, *last, target, style)?;
        }
    }

    // Layer 6: vertex markers.
    for (i, p) in px.iter().enumerate() {
        draw_vertex(ctx, *p, i == 0, completed, style)?;
    }

    Ok(())
}

fn trace_path(ctx: &CanvasRenderingContext2d, px: &[Point], close: bool) {
    ctx.begin_path();
    let Some((first, rest)) = px.split_first() else {
        return;
    };
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    if close {
        ctx.close_path();
    }
}

fn draw_preview(ctx: &CanvasRenderingContext2d, from: Point, to: Point, style: &RegionStyle) -> Result<(), JsValue> {
    let dash = JsValue::from_f64(style.preview_dash_px);
    ctx.save();
    ctx.set_line_dash(&Array::of2(&dash, &dash))?;
    ctx.begin_path();
    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
    ctx.stroke();
    ctx.restore();
    Ok(())
}

fn draw_vertex(
    ctx: &CanvasRenderingContext2d,
    p: Point,
    first: bool,
    draggable: bool,
    style: &RegionStyle,
) -> Result<(), JsValue> {
    let radius = if draggable { style.completed_vertex_radius_px } else { style.vertex_radius_px };
    let fill = if first { &style.first_vertex_color } else { &style.vertex_color };

    ctx.begin_path();
    ctx.arc(p.x, p.y, radius, 0.0, TAU)?;
    ctx.set_fill_style_str(fill);
    ctx.fill();

    if draggable {
        ctx.set_stroke_style_str(&style.outline_color);
        ctx.set_line_width(style.outline_width);
        ctx.stroke();
    }
    Ok(())
}

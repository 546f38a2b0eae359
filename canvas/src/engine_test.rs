#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::HELP_TEXT;
use crate::input::{Button, InputState, Key, Modifiers};

// =============================================================
// Helpers
// =============================================================

/// 1000x1000 so normalised 0.1 is 100px in both axes.
fn ready_core() -> EngineCore {
    let mut core = EngineCore::new(SurfaceConfig::default());
    core.set_viewport(1000.0, 1000.0, 1.0);
    core
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Surface-pixel position of a normalised point on the 1000x1000 test surface.
fn at(x: f64, y: f64) -> Point {
    pt(x * 1000.0, y * 1000.0)
}

fn click(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_click(at(x, y), Button::Primary)
}

/// Draw the canonical triangle without closing it.
fn open_triangle() -> EngineCore {
    let mut core = ready_core();
    click(&mut core, 0.1, 0.1);
    click(&mut core, 0.5, 0.1);
    click(&mut core, 0.5, 0.5);
    core
}

fn closed_triangle() -> EngineCore {
    let mut core = open_triangle();
    core.complete();
    core
}

fn triangle() -> Vec<Point> {
    vec![pt(0.1, 0.1), pt(0.5, 0.1), pt(0.5, 0.5)]
}

fn region_changes(actions: &[Action]) -> Vec<Option<Polygon>> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::RegionChanged(p) => Some(p.clone()),
            _ => None,
        })
        .collect()
}

fn has_render_needed(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::RenderNeeded))
}

fn cursor_set(actions: &[Action]) -> Option<&str> {
    actions.iter().rev().find_map(|a| match a {
        Action::SetCursor(c) => Some(c.as_str()),
        _ => None,
    })
}

fn key(name: &str) -> Key {
    Key(name.to_owned())
}

// =============================================================
// EngineCore: construction and defaults
// =============================================================

#[test]
fn core_new_is_empty() {
    let core = EngineCore::default();
    assert!(core.region().is_empty());
    assert!(core.polygon().is_none());
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn core_default_drawing_mode_on() {
    let core = EngineCore::default();
    assert!(core.drawing_mode());
    assert_eq!(core.help_text(), Some(HELP_TEXT));
}

#[test]
fn core_default_surface_is_zero() {
    let core = EngineCore::default();
    assert_eq!(core.surface.width, 0.0);
    assert_eq!(core.surface.height, 0.0);
    assert_eq!(core.surface.dpr, 1.0);
}

#[test]
fn set_viewport_updates_surface() {
    let mut core = EngineCore::default();
    core.set_viewport(640.0, 480.0, 2.0);
    assert_eq!(core.surface, Surface::new(640.0, 480.0, 2.0));
}

// =============================================================
// Drawing: appending points
// =============================================================

#[test]
fn first_click_starts_drawing() {
    let mut core = ready_core();
    let actions = click(&mut core, 0.2, 0.3);
    assert_eq!(
        region_changes(&actions),
        vec![Some(Polygon { points: vec![pt(0.2, 0.3)], completed: false })]
    );
    assert!(has_render_needed(&actions));
    assert!(core.region().is_drawing());
}

#[test]
fn clicks_append_in_order() {
    let core = open_triangle();
    assert_eq!(core.region().points(), triangle().as_slice());
    assert!(!core.region().is_completed());
}

#[test]
fn click_near_first_with_two_points_appends() {
    let mut core = ready_core();
    click(&mut core, 0.1, 0.1);
    click(&mut core, 0.5, 0.1);
    let actions = core.on_click(pt(105.0, 100.0), Button::Primary);
    assert_eq!(region_changes(&actions).len(), 1);
    assert_eq!(core.region().len(), 3);
    assert!(core.region().is_drawing());
}

#[test]
fn click_outside_close_radius_appends_fourth_point() {
    let mut core = open_triangle();
    // 20px from the first vertex.
    core.on_click(pt(120.0, 100.0), Button::Primary);
    assert_eq!(core.region().len(), 4);
    assert!(core.region().is_drawing());
}

#[test]
fn secondary_click_is_ignored() {
    let mut core = ready_core();
    let actions = core.on_click(at(0.2, 0.2), Button::Secondary);
    assert!(actions.is_empty());
    assert!(core.region().is_empty());
}

#[test]
fn click_before_viewport_is_ignored() {
    let mut core = EngineCore::default();
    let actions = core.on_click(pt(10.0, 10.0), Button::Primary);
    assert!(actions.is_empty());
    assert!(core.region().is_empty());
}

#[test]
fn click_outside_surface_clamps_into_range() {
    let mut core = ready_core();
    core.on_click(pt(-50.0, 1200.0), Button::Primary);
    assert_eq!(core.region().points(), &[pt(0.0, 1.0)]);
}

// =============================================================
// Closing the loop
// =============================================================

#[test]
fn click_near_first_closes_without_appending() {
    let mut core = open_triangle();
    let actions = core.on_click(pt(108.0, 95.0), Button::Primary);
    assert_eq!(
        region_changes(&actions),
        vec![Some(Polygon { points: triangle(), completed: true })]
    );
    assert!(core.region().is_completed());
    assert_eq!(core.region().len(), 3);
}

#[test]
fn closing_click_count_matches_non_closing_clicks() {
    let mut core = ready_core();
    let clicks = [(0.1, 0.1), (0.4, 0.1), (0.7, 0.2), (0.8, 0.6), (0.3, 0.8)];
    for (x, y) in clicks {
        click(&mut core, x, y);
    }
    click(&mut core, 0.105, 0.1);
    assert!(core.region().is_completed());
    assert_eq!(core.region().len(), clicks.len());
}

#[test]
fn complete_with_three_points() {
    let mut core = open_triangle();
    let actions = core.complete();
    assert_eq!(region_changes(&actions), vec![Some(Polygon { points: triangle(), completed: true })]);
}

#[test]
fn complete_with_two_points_is_noop() {
    let mut core = ready_core();
    click(&mut core, 0.1, 0.1);
    click(&mut core, 0.5, 0.1);
    assert!(!core.can_complete());
    assert!(core.complete().is_empty());
    assert!(core.region().is_drawing());
}

#[test]
fn complete_on_empty_is_noop() {
    let mut core = ready_core();
    assert!(core.complete().is_empty());
    assert!(core.region().is_empty());
}

#[test]
fn double_click_closes_with_three_points() {
    let mut core = open_triangle();
    let actions = core.on_double_click(at(0.5, 0.5), Button::Primary);
    assert_eq!(region_changes(&actions).len(), 1);
    assert!(core.region().is_completed());
    assert_eq!(core.region().len(), 3);
}

#[test]
fn double_click_with_two_points_is_noop() {
    let mut core = ready_core();
    click(&mut core, 0.1, 0.1);
    click(&mut core, 0.5, 0.1);
    assert!(core.on_double_click(at(0.5, 0.1), Button::Primary).is_empty());
    assert!(core.region().is_drawing());
}

#[test]
fn double_click_on_completed_is_noop() {
    let mut core = closed_triangle();
    assert!(core.on_double_click(at(0.3, 0.3), Button::Primary).is_empty());
}

// =============================================================
// Completed: appends refused
// =============================================================

#[test]
fn click_after_completion_is_noop() {
    let mut core = closed_triangle();
    let before = core.polygon();
    let actions = click(&mut core, 0.9, 0.9);
    assert!(region_changes(&actions).is_empty());
    assert_eq!(core.polygon(), before);
}

#[test]
fn click_on_first_vertex_after_completion_is_noop() {
    let mut core = closed_triangle();
    let actions = click(&mut core, 0.1, 0.1);
    assert!(region_changes(&actions).is_empty());
    assert!(core.region().is_completed());
}

// =============================================================
// Undo
// =============================================================

#[test]
fn undo_removes_last_point() {
    let mut core = open_triangle();
    let actions = core.undo();
    assert_eq!(
        region_changes(&actions),
        vec![Some(Polygon { points: vec![pt(0.1, 0.1), pt(0.5, 0.1)], completed: false })]
    );
}

#[test]
fn undo_of_last_point_reports_none() {
    let mut core = ready_core();
    click(&mut core, 0.3, 0.3);
    let actions = core.undo();
    assert_eq!(region_changes(&actions), vec![None]);
    assert!(core.region().is_empty());
}

#[test]
fn undo_on_empty_is_noop() {
    let mut core = ready_core();
    assert!(!core.can_undo());
    assert!(core.undo().is_empty());
    assert!(core.polygon().is_none());
}

#[test]
fn undo_on_completed_is_noop() {
    let mut core = closed_triangle();
    assert!(!core.can_undo());
    assert!(core.undo().is_empty());
    assert_eq!(core.region().len(), 3);
}

// =============================================================
// Clear
// =============================================================

#[test]
fn clear_drawing_reports_none() {
    let mut core = open_triangle();
    let actions = core.clear();
    assert_eq!(region_changes(&actions), vec![None]);
    assert!(core.region().is_empty());
}

#[test]
fn clear_completed_reports_none() {
    let mut core = closed_triangle();
    assert!(core.can_clear());
    assert_eq!(region_changes(&core.clear()), vec![None]);
}

#[test]
fn clear_is_idempotent() {
    let mut core = open_triangle();
    core.clear();
    assert!(core.clear().is_empty());
    assert!(core.polygon().is_none());
}

#[test]
fn clear_ends_drag() {
    let mut core = closed_triangle();
    core.on_pointer_down(at(0.5, 0.1), Button::Primary);
    assert!(core.is_dragging());
    core.clear();
    assert!(!core.is_dragging());
}

#[test]
fn draw_again_after_clear() {
    let mut core = closed_triangle();
    core.clear();
    click(&mut core, 0.7, 0.7);
    assert_eq!(core.polygon(), Some(Polygon { points: vec![pt(0.7, 0.7)], completed: false }));
}

// =============================================================
// Dragging vertices
// =============================================================

#[test]
fn drag_vertex_changes_only_that_vertex() {
    let mut core = closed_triangle();
    core.on_pointer_down(at(0.5, 0.1), Button::Primary);
    let actions = core.on_pointer_move(at(0.6, 0.2));
    core.on_pointer_up(at(0.6, 0.2), Button::Primary);

    let expected = Polygon { points: vec![pt(0.1, 0.1), pt(0.6, 0.2), pt(0.5, 0.5)], completed: true };
    assert_eq!(region_changes(&actions), vec![Some(expected.clone())]);
    assert_eq!(core.polygon(), Some(expected));
    assert!(!core.is_dragging());
}

#[test]
fn drag_reports_every_move() {
    let mut core = closed_triangle();
    core.on_pointer_down(at(0.5, 0.5), Button::Primary);
    let first = core.on_pointer_move(at(0.55, 0.55));
    let second = core.on_pointer_move(at(0.6, 0.6));
    assert_eq!(region_changes(&first).len(), 1);
    assert_eq!(region_changes(&second).len(), 1);
    assert_eq!(core.region().points()[2], pt(0.6, 0.6));
}

#[test]
fn drag_picks_nearest_vertex() {
    let mut core = closed_triangle();
    core.on_pointer_down(pt(498.0, 102.0), Button::Primary);
    assert_eq!(core.input, InputState::DraggingVertex { index: 1 });
}

#[test]
fn pointer_down_away_from_vertices_does_not_drag() {
    let mut core = closed_triangle();
    assert!(core.on_pointer_down(at(0.3, 0.8), Button::Primary).is_empty());
    assert!(!core.is_dragging());
    assert!(core.on_pointer_move(at(0.35, 0.8)).iter().all(|a| !matches!(a, Action::RegionChanged(_))));
}

#[test]
fn pointer_down_while_drawing_does_not_drag() {
    let mut core = open_triangle();
    core.on_pointer_down(at(0.5, 0.1), Button::Primary);
    assert!(!core.is_dragging());
    let actions = core.on_pointer_move(at(0.6, 0.2));
    assert!(region_changes(&actions).is_empty());
    assert_eq!(core.region().points(), triangle().as_slice());
}

#[test]
fn drag_keeps_point_count_and_completion() {
    let mut core = closed_triangle();
    core.on_pointer_down(at(0.1, 0.1), Button::Primary);
    for step in 1..=10_u8 {
        core.on_pointer_move(at(0.1 + f64::from(step) * 0.02, 0.1));
    }
    core.on_pointer_up(at(0.3, 0.1), Button::Primary);
    assert!(core.region().is_completed());
    assert_eq!(core.region().len(), 3);
}

#[test]
fn drag_outside_surface_clamps() {
    let mut core = closed_triangle();
    core.on_pointer_down(at(0.5, 0.5), Button::Primary);
    core.on_pointer_move(pt(1500.0, -20.0));
    assert_eq!(core.region().points()[2], pt(1.0, 0.0));
}

#[test]
fn pointer_leave_ends_drag() {
    let mut core = closed_triangle();
    core.on_pointer_down(at(0.5, 0.5), Button::Primary);
    let actions = core.on_pointer_leave();
    assert!(!core.is_dragging());
    assert!(has_render_needed(&actions));
    // A later move without a new pointer-down does not move the vertex.
    let after = core.on_pointer_move(at(0.9, 0.9));
    assert!(region_changes(&after).is_empty());
    assert_eq!(core.region().points()[2], pt(0.5, 0.5));
}

#[test]
fn pointer_up_without_drag_is_quiet() {
    let mut core = closed_triangle();
    assert!(core.on_pointer_up(at(0.2, 0.2), Button::Primary).is_empty());
}

// =============================================================
// Drawing mode
// =============================================================

#[test]
fn drawing_mode_off_ignores_clicks() {
    let mut core = ready_core();
    core.set_drawing_mode(false);
    assert!(click(&mut core, 0.2, 0.2).is_empty());
    assert!(core.region().is_empty());
    assert!(core.help_text().is_none());
}

#[test]
fn drawing_mode_off_ignores_drag() {
    let mut core = closed_triangle();
    core.set_drawing_mode(false);
    assert!(core.on_pointer_down(at(0.5, 0.1), Button::Primary).is_empty());
    assert!(core.on_pointer_move(at(0.6, 0.2)).is_empty());
    assert_eq!(core.region().points(), triangle().as_slice());
}

#[test]
fn drawing_mode_off_ends_active_drag() {
    let mut core = closed_triangle();
    core.on_pointer_down(at(0.5, 0.1), Button::Primary);
    core.set_drawing_mode(false);
    assert!(!core.is_dragging());
}

#[test]
fn drawing_mode_off_ignores_keys() {
    let mut core = open_triangle();
    core.set_drawing_mode(false);
    assert!(core.on_key_down(key("Enter"), Modifiers::default()).is_empty());
    assert!(core.region().is_drawing());
}

#[test]
fn explicit_commands_work_in_view_mode() {
    let mut core = open_triangle();
    core.set_drawing_mode(false);
    assert_eq!(region_changes(&core.clear()), vec![None]);
}

#[test]
fn drawing_mode_toggle_requests_render() {
    let mut core = ready_core();
    assert!(has_render_needed(&core.set_drawing_mode(false)));
    assert!(has_render_needed(&core.set_drawing_mode(true)));
}

// =============================================================
// Keyboard
// =============================================================

#[test]
fn enter_completes() {
    let mut core = open_triangle();
    let actions = core.on_key_down(key("Enter"), Modifiers::default());
    assert_eq!(region_changes(&actions).len(), 1);
    assert!(core.region().is_completed());
}

#[test]
fn backspace_undoes() {
    let mut core = open_triangle();
    core.on_key_down(key("Backspace"), Modifiers::default());
    assert_eq!(core.region().len(), 2);
}

#[test]
fn ctrl_z_undoes() {
    let mut core = open_triangle();
    core.on_key_down(key("z"), Modifiers { ctrl: true, ..Default::default() });
    assert_eq!(core.region().len(), 2);
}

#[test]
fn unbound_key_is_noop() {
    let mut core = open_triangle();
    assert!(core.on_key_down(key("Escape"), Modifiers::default()).is_empty());
    assert_eq!(core.region().len(), 3);
}

// =============================================================
// Loading an existing polygon
// =============================================================

#[test]
fn load_completed_polygon_allows_drag() {
    let mut core = ready_core();
    let loaded = core.load_polygon(Some(Polygon { points: triangle(), completed: true }));
    assert!(loaded.is_ok());
    assert!(core.region().is_completed());
    core.on_pointer_down(at(0.1, 0.1), Button::Primary);
    assert!(core.is_dragging());
}

#[test]
fn load_open_polygon_continues_drawing() {
    let mut core = ready_core();
    let seeded = core.load_polygon(Some(Polygon { points: vec![pt(0.1, 0.1), pt(0.5, 0.1)], completed: false }));
    assert!(seeded.is_ok());
    click(&mut core, 0.5, 0.5);
    click(&mut core, 0.1, 0.1);
    assert_eq!(core.polygon(), Some(Polygon { points: triangle(), completed: true }));
}

#[test]
fn load_none_empties_region() {
    let mut core = open_triangle();
    assert!(core.load_polygon(None).is_ok());
    assert!(core.region().is_empty());
}

#[test]
fn load_invalid_polygon_keeps_current_region() {
    let mut core = open_triangle();
    let err = core.load_polygon(Some(Polygon { points: vec![pt(0.1, 0.1)], completed: true }));
    assert_eq!(err, Err(RegionError::TooFewPoints(1)));
    assert_eq!(core.region().points(), triangle().as_slice());
}

#[test]
fn load_replaces_during_drag() {
    let mut core = closed_triangle();
    core.on_pointer_down(at(0.5, 0.1), Button::Primary);
    assert!(core.load_polygon(None).is_ok());
    assert!(!core.is_dragging());
}

// =============================================================
// Hit radius configuration
// =============================================================

#[test]
fn custom_close_radius_is_honoured() {
    let config = SurfaceConfig { close_radius_px: 30.0, ..Default::default() };
    let mut core = EngineCore::new(config);
    core.set_viewport(1000.0, 1000.0, 1.0);
    click(&mut core, 0.1, 0.1);
    click(&mut core, 0.5, 0.1);
    click(&mut core, 0.5, 0.5);
    // 25px away: outside the default radius, inside this one.
    core.on_click(pt(125.0, 100.0), Button::Primary);
    assert!(core.region().is_completed());
}

#[test]
fn dpr_scaled_radius_when_enabled() {
    let config = SurfaceConfig { scale_radius_with_dpr: true, ..Default::default() };
    let mut core = EngineCore::new(config);
    core.set_viewport(1000.0, 1000.0, 2.0);
    click(&mut core, 0.1, 0.1);
    click(&mut core, 0.5, 0.1);
    click(&mut core, 0.5, 0.5);
    core.on_click(pt(125.0, 100.0), Button::Primary);
    assert!(core.region().is_completed());
}

#[test]
fn dpr_ignored_by_default() {
    let mut core = EngineCore::default();
    core.set_viewport(1000.0, 1000.0, 2.0);
    click(&mut core, 0.1, 0.1);
    click(&mut core, 0.5, 0.1);
    click(&mut core, 0.5, 0.5);
    core.on_click(pt(125.0, 100.0), Button::Primary);
    assert!(core.region().is_drawing());
    assert_eq!(core.region().len(), 4);
}

// =============================================================
// Resize safety
// =============================================================

#[test]
fn region_survives_resize() {
    let mut core = closed_triangle();
    core.set_viewport(500.0, 500.0, 1.0);
    assert_eq!(core.region().points(), triangle().as_slice());
    // Vertex 1 is now at (250, 50).
    core.on_pointer_down(pt(252.0, 52.0), Button::Primary);
    assert_eq!(core.input, InputState::DraggingVertex { index: 1 });
}

// =============================================================
// Preview and cursor
// =============================================================

#[test]
fn pointer_move_while_drawing_requests_render() {
    let mut core = ready_core();
    click(&mut core, 0.1, 0.1);
    let actions = core.on_pointer_move(at(0.4, 0.4));
    assert!(has_render_needed(&actions));
    assert!(core.shows_preview());
}

#[test]
fn preview_hidden_after_leave() {
    let mut core = ready_core();
    click(&mut core, 0.1, 0.1);
    core.on_pointer_move(at(0.4, 0.4));
    core.on_pointer_leave();
    assert!(!core.shows_preview());
}

#[test]
fn preview_hidden_when_completed() {
    let mut core = closed_triangle();
    core.on_pointer_move(at(0.4, 0.4));
    assert!(!core.shows_preview());
}

#[test]
fn cursor_crosshair_while_drawing() {
    let mut core = ready_core();
    let actions = core.on_pointer_move(at(0.4, 0.4));
    assert_eq!(cursor_set(&actions), Some("crosshair"));
    assert_eq!(core.cursor(), "crosshair");
}

#[test]
fn cursor_pointer_over_close_target() {
    let mut core = open_triangle();
    core.on_pointer_move(at(0.105, 0.1));
    assert_eq!(core.cursor(), "pointer");
}

#[test]
fn cursor_grab_over_completed_vertex() {
    let mut core = closed_triangle();
    core.on_pointer_move(at(0.5, 0.5));
    assert_eq!(core.cursor(), "grab");
    core.on_pointer_down(at(0.5, 0.5), Button::Primary);
    assert_eq!(core.cursor(), "grabbing");
    core.on_pointer_up(at(0.5, 0.5), Button::Primary);
    assert_eq!(core.cursor(), "grab");
}

#[test]
fn cursor_not_repeated_when_unchanged() {
    let mut core = ready_core();
    core.on_pointer_move(at(0.4, 0.4));
    let actions = core.on_pointer_move(at(0.41, 0.4));
    assert!(cursor_set(&actions).is_none());
}

#[test]
fn cursor_default_in_view_mode() {
    let mut core = ready_core();
    core.on_pointer_move(at(0.4, 0.4));
    let actions = core.set_drawing_mode(false);
    assert_eq!(cursor_set(&actions), Some("default"));
}

// =============================================================
// Scenarios
// =============================================================

#[test]
fn scenario_close_then_drag() {
    let mut core = ready_core();
    click(&mut core, 0.1, 0.1);
    click(&mut core, 0.5, 0.1);
    click(&mut core, 0.5, 0.5);
    assert!(core.region().is_drawing());

    core.on_click(pt(103.0, 104.0), Button::Primary);
    assert_eq!(core.polygon(), Some(Polygon { points: triangle(), completed: true }));

    core.on_pointer_down(at(0.5, 0.1), Button::Primary);
    core.on_pointer_move(at(0.6, 0.2));
    core.on_pointer_up(at(0.6, 0.2), Button::Primary);
    assert_eq!(
        core.polygon(),
        Some(Polygon { points: vec![pt(0.1, 0.1), pt(0.6, 0.2), pt(0.5, 0.5)], completed: true })
    );
}

#[test]
fn completed_always_has_three_points() {
    // Mixed sequence of valid and invalid actions.
    let mut core = ready_core();
    click(&mut core, 0.1, 0.1);
    core.complete();
    click(&mut core, 0.1, 0.1);
    core.on_double_click(at(0.1, 0.1), Button::Primary);
    core.undo();
    core.undo();
    click(&mut core, 0.2, 0.2);
    click(&mut core, 0.6, 0.2);
    core.complete();
    click(&mut core, 0.6, 0.6);
    core.on_key_down(key("Enter"), Modifiers::default());
    if let Some(polygon) = core.polygon() {
        assert!(!polygon.completed || polygon.points.len() >= 3);
    }
    assert!(core.region().is_completed());
    assert_eq!(core.region().len(), 3);
}

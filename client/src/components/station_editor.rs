//! Bridge component between Leptos and the imperative `station_canvas::Engine`.
//!
//! ARCHITECTURE
//! ============
//! The engine owns region semantics and rendering. This host mounts it on a
//! `<canvas>`, fits the surface to the container and the camera still, feeds
//! DOM events in, and acts on the returned [`Action`]s: committed regions go
//! to the parent's `on_change`, cursors go to the canvas style, and renders
//! happen synchronously.

use leptos::prelude::*;

use station_canvas::config::SurfaceConfig;
#[cfg(feature = "hydrate")]
use station_canvas::engine::{Action, Engine};
#[cfg(feature = "hydrate")]
use station_canvas::input::{Button, Key};
use station_canvas::region::Polygon;

#[cfg(feature = "hydrate")]
use crate::state::editor_view::replace_region;
use crate::state::editor_view::{EditorView, initial_core};
#[cfg(feature = "hydrate")]
use crate::util::canvas_input::{event_modifiers, event_point, should_forward_click, should_prevent_default_key};

#[cfg(feature = "hydrate")]
use std::cell::RefCell;
#[cfg(feature = "hydrate")]
use std::rc::Rc;

#[cfg(feature = "hydrate")]
use wasm_bindgen::{JsCast, closure::Closure};

#[cfg(feature = "hydrate")]
type SharedEngine = Rc<RefCell<Option<Engine>>>;

#[cfg(feature = "hydrate")]
fn render(engine: &Engine) {
    if let Err(err) = engine.render() {
        log::error!("station editor render failed: {err:?}");
    }
}

/// Fit the surface to the container's current width and the device pixel ratio.
#[cfg(feature = "hydrate")]
fn fit_to_container(engine: &mut Engine, container_ref: NodeRef<leptos::html::Div>) {
    let Some(container) = container_ref.get_untracked() else {
        return;
    };
    let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
    if let Err(err) = engine.resize(f64::from(container.client_width()), dpr) {
        log::warn!("station editor resize failed: {err:?}");
    }
}

#[cfg(feature = "hydrate")]
fn process_actions(
    actions: Vec<Action>,
    engine: &Engine,
    on_change: Callback<Option<Polygon>>,
    view: RwSignal<EditorView>,
) {
    let mut render_needed = false;
    for action in actions {
        match action {
            Action::RegionChanged(polygon) => on_change.run(polygon),
            Action::SetCursor(cursor) => {
                if let Err(err) = engine.set_cursor(&cursor) {
                    log::debug!("cursor update failed: {err:?}");
                }
            }
            Action::RenderNeeded => render_needed = true,
        }
    }
    let next = EditorView::from_core(&engine.core);
    if view.with_untracked(|current| *current != next) {
        view.set(next);
    }
    if render_needed {
        render(engine);
    }
}

/// Run one engine call and process whatever it returns.
#[cfg(feature = "hydrate")]
fn dispatch(
    engine: &SharedEngine,
    on_change: Callback<Option<Polygon>>,
    view: RwSignal<EditorView>,
    call: impl FnOnce(&mut Engine) -> Vec<Action>,
) {
    if let Some(engine) = engine.borrow_mut().as_mut() {
        let actions = call(engine);
        process_actions(actions, engine, on_change, view);
    }
}

/// Station-region editor.
///
/// Draws `image_url` and lets the user trace a closed polygon over it. Every
/// committed change (point added, loop closed, vertex dragged, undo, clear)
/// is reported through `on_change` in normalised image coordinates; `None`
/// means no region.
#[component]
pub fn StationEditor(
    /// Camera still to trace over.
    #[prop(into)]
    image_url: Signal<String>,
    /// Whether pointer and keyboard input edits the region.
    #[prop(into)]
    drawing_mode: Signal<bool>,
    /// Saved region to start from. Later values replace the region wholesale.
    #[prop(into, optional)]
    existing: Signal<Option<Polygon>>,
    /// Hit radius and style overrides.
    #[prop(optional)]
    config: Option<SurfaceConfig>,
    on_change: Callback<Option<Polygon>>,
) -> impl IntoView {
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let container_ref = NodeRef::<leptos::html::Div>::new();
    let initial = initial_core(config.unwrap_or_default(), existing.get_untracked(), drawing_mode.get_untracked());
    let view = RwSignal::new(EditorView::from_core(&initial));
    #[cfg(feature = "hydrate")]
    let engine: SharedEngine = Rc::new(RefCell::new(None));

    #[cfg(feature = "hydrate")]
    {
        let engine = Rc::clone(&engine);
        let mut seed = Some(initial);
        Effect::new(move || {
            let Some(canvas) = canvas_ref.get() else {
                return;
            };
            if engine.borrow().is_some() {
                return;
            }
            let Some(core) = seed.take() else {
                return;
            };

            let mut instance = match Engine::new(canvas, &image_url.get_untracked(), core.config.clone()) {
                Ok(instance) => instance,
                Err(err) => {
                    log::error!("station editor mount failed: {err:?}");
                    return;
                }
            };
            instance.core = core;
            if let Err(err) = instance.set_cursor(instance.core.cursor()) {
                log::debug!("cursor update failed: {err:?}");
            }

            let on_load = {
                let engine = Rc::clone(&engine);
                Closure::<dyn FnMut()>::new(move || {
                    if let Some(engine) = engine.borrow_mut().as_mut() {
                        fit_to_container(engine, container_ref);
                        render(engine);
                    }
                })
            };
            instance.image().set_onload(Some(on_load.as_ref().unchecked_ref()));
            on_load.forget();

            fit_to_container(&mut instance, container_ref);
            render(&instance);
            *engine.borrow_mut() = Some(instance);
        });
    }

    #[cfg(feature = "hydrate")]
    {
        let engine = Rc::clone(&engine);
        Effect::new(move |previous: Option<String>| {
            let url = image_url.get();
            if previous.is_some_and(|p| p != url) {
                if let Some(engine) = engine.borrow_mut().as_mut() {
                    log::debug!("station editor image changed to {url}");
                    engine.set_image_url(&url);
                }
            }
            url
        });
    }

    #[cfg(feature = "hydrate")]
    {
        let engine = Rc::clone(&engine);
        Effect::new(move |previous: Option<Option<Polygon>>| {
            let next = existing.get();
            if previous.is_some_and(|p| p != next) {
                let replacement = next.clone();
                dispatch(&engine, on_change, view, |engine| {
                    if replace_region(&mut engine.core, replacement) {
                        vec![Action::RenderNeeded]
                    } else {
                        Vec::new()
                    }
                });
            }
            next
        });
    }

    #[cfg(feature = "hydrate")]
    {
        let engine = Rc::clone(&engine);
        Effect::new(move || {
            let on = drawing_mode.get();
            dispatch(&engine, on_change, view, |engine| engine.set_drawing_mode(on));
        });
    }

    #[cfg(feature = "hydrate")]
    {
        let engine = Rc::clone(&engine);
        let handle = window_event_listener(leptos::ev::resize, move |_| {
            if let Some(engine) = engine.borrow_mut().as_mut() {
                fit_to_container(engine, container_ref);
                render(engine);
            }
        });
        on_cleanup(move || handle.remove());
    }

    let on_click = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |ev: leptos::ev::MouseEvent| {
                if !should_forward_click(ev.detail()) {
                    return;
                }
                let point = event_point(&ev);
                let button = Button::from_dom(ev.button());
                dispatch(&engine, on_change, view, |engine| engine.on_click(point, button));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::MouseEvent| {}
        }
    };

    let on_double_click = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |ev: leptos::ev::MouseEvent| {
                ev.prevent_default();
                let point = event_point(&ev);
                let button = Button::from_dom(ev.button());
                dispatch(&engine, on_change, view, |engine| engine.on_double_click(point, button));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::MouseEvent| {}
        }
    };

    let on_pointer_down = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |ev: leptos::ev::PointerEvent| {
                if let Some(canvas) = canvas_ref.get_untracked() {
                    if let Err(err) = canvas.focus() {
                        log::debug!("canvas focus failed: {err:?}");
                    }
                }
                let point = event_point(&ev);
                let button = Button::from_dom(ev.button());
                dispatch(&engine, on_change, view, |engine| engine.on_pointer_down(point, button));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_pointer_move = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |ev: leptos::ev::PointerEvent| {
                let point = event_point(&ev);
                dispatch(&engine, on_change, view, |engine| engine.on_pointer_move(point));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_pointer_up = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |ev: leptos::ev::PointerEvent| {
                let point = event_point(&ev);
                let button = Button::from_dom(ev.button());
                dispatch(&engine, on_change, view, |engine| engine.on_pointer_up(point, button));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_pointer_leave = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |_ev: leptos::ev::PointerEvent| {
                dispatch(&engine, on_change, view, Engine::on_pointer_leave);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_key_down = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |ev: leptos::ev::KeyboardEvent| {
                let key = ev.key();
                let modifiers = event_modifiers(&ev);
                if view.with_untracked(|v| should_prevent_default_key(&key, modifiers, v)) {
                    ev.prevent_default();
                }
                dispatch(&engine, on_change, view, |engine| engine.on_key_down(Key(key), modifiers));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::KeyboardEvent| {}
        }
    };

    let on_complete = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |_ev: leptos::ev::MouseEvent| dispatch(&engine, on_change, view, Engine::complete)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::MouseEvent| {}
        }
    };

    let on_undo = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |_ev: leptos::ev::MouseEvent| dispatch(&engine, on_change, view, Engine::undo)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::MouseEvent| {}
        }
    };

    let on_clear = {
        #[cfg(feature = "hydrate")]
        {
            let engine = Rc::clone(&engine);
            move |_ev: leptos::ev::MouseEvent| dispatch(&engine, on_change, view, Engine::clear)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            move |_ev: leptos::ev::MouseEvent| {}
        }
    };

    view! {
        <div class="station-editor">
            <div class="station-editor__toolbar">
                <button
                    class="btn station-editor__complete"
                    title="Close the region (Enter)"
                    disabled=move || !view.get().can_complete
                    on:click=on_complete
                >
                    "Complete"
                </button>
                <button
                    class="btn station-editor__undo"
                    title="Remove the last point (Backspace)"
                    disabled=move || !view.get().can_undo
                    on:click=on_undo
                >
                    "Undo"
                </button>
                <button
                    class="btn station-editor__clear"
                    title="Discard the region"
                    disabled=move || !view.get().can_clear
                    on:click=on_clear
                >
                    "Clear"
                </button>
                <span class="station-editor__status">{move || view.get().status_label()}</span>
            </div>
            <div class="station-editor__surface" node_ref=container_ref>
                <canvas
                    class="station-editor__canvas"
                    node_ref=canvas_ref
                    tabindex="0"
                    on:click=on_click
                    on:dblclick=on_double_click
                    on:pointerdown=on_pointer_down
                    on:pointermove=on_pointer_move
                    on:pointerup=on_pointer_up
                    on:pointerleave=on_pointer_leave
                    on:keydown=on_key_down
                >
                    "Your browser does not support canvas."
                </canvas>
            </div>
            {move || {
                view.get().help_text.map(|text| view! { <p class="station-editor__help">{text}</p> })
            }}
        </div>
    }
}

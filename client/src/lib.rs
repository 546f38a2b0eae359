//! # station-client
//!
//! Leptos host for the station-region editor. Mounts the `station-canvas`
//! engine on a `<canvas>`, maps DOM events into engine input, and forwards
//! every committed region change to the parent through a `Callback`.
//!
//! The dashboard embeds [`components::station_editor::StationEditor`] on the
//! station configuration form and persists whatever polygon it reports.

pub mod components;
pub mod state;
pub mod util;

/// Browser entry point: route panics and `log` output to the console.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        log::debug!("console logger already installed");
    }
}

//! Station-region drawing surface for the pallet-monitoring dashboard.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! full lifecycle of the station editor canvas: translating raw DOM input
//! events into region mutations, hit-testing vertices, converting between
//! surface pixels and normalised image coordinates, and rendering the camera
//! still with the region traced over it. The host layer is responsible only
//! for wiring DOM events to the engine and forwarding the resulting
//! [`engine::Action`]s to whoever stores the station boundary.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`region`] | Region state machine and the host-facing [`region::Polygon`] |
//! | [`surface`] | Points and pixel/normalised coordinate conversions |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Vertex hit-testing in surface pixels |
//! | [`render`] | Scene rendering to a 2D context |
//! | [`config`] | Hit radius and style configuration |
//! | [`consts`] | Shared numeric constants (radii, dash lengths, etc.) |

pub mod config;
pub mod consts;
pub mod engine;
pub mod hit;
pub mod input;
pub mod region;
pub mod render;
pub mod surface;

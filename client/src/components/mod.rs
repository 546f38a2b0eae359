//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components own DOM wiring only; region semantics live in `station-canvas`.

pub mod station_editor;

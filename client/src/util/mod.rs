//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser event details from component logic so the
//! mapping rules can be tested without a DOM.

pub mod canvas_input;

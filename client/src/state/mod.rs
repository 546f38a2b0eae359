//! Reactive snapshots of engine state for UI chrome.

pub mod editor_view;

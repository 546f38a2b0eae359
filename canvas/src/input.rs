//! Input model: mouse buttons, modifier keys, and the gesture state machine.
//!
//! `Button`, `Modifiers` and `Key` describe a DOM event after the host has
//! mapped it. `InputState` is the gesture tracked between pointer-down and
//! pointer-up (or pointer-leave); it is separate from the region itself so a
//! drag can never leave the region in a half-edited state.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` value.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A keyboard key as reported by the browser (e.g. `"Enter"`, `"Backspace"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Editor command a key press maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Complete,
    Undo,
}

impl Key {
    /// The editor command bound to this key, if any.
    #[must_use]
    pub fn command(&self, modifiers: Modifiers) -> Option<KeyCommand> {
        match self.0.as_str() {
            "Enter" => Some(KeyCommand::Complete),
            "Backspace" => Some(KeyCommand::Undo),
            "z" | "Z" if modifiers.command() && !modifiers.shift => Some(KeyCommand::Undo),
            _ => None,
        }
    }
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is repositioning one vertex of a closed region.
    DraggingVertex {
        /// Index of the vertex being dragged.
        index: usize,
    },
}

impl InputState {
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::DraggingVertex { .. })
    }
}

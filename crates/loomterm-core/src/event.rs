#![forbid(unsafe_code)]

//! The `Event` type produced by the input parser and consumed by widgets.

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a key or mouse event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const ALT   = 1 << 1;
        const CTRL  = 1 << 2;
        const SUPER = 1 << 3;
        const HYPER = 1 << 4;
        const META  = 1 << 5;
    }
}

/// A logical key, independent of the wire encoding that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Function(u8),
    Enter,
    Tab,
    Backspace,
    Escape,
    Space,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    Null,
    Unknown(u8),
}

/// A key press/release together with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    /// The raw byte that produced this key, when it came from a single
    /// control byte rather than a named escape sequence.
    pub raw: Option<u8>,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            raw: None,
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn with_raw(mut self, raw: u8) -> Self {
        self.raw = Some(raw);
        self
    }
}

/// The kind of mouse action that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Press,
    Release,
    Move,
    Drag,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
}

/// The mouse button involved in a press/release/drag event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// No button is involved (plain move, or a wheel event).
    None,
}

/// A mouse action at a 0-based screen coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: u16,
    pub y: u16,
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

/// A per-frame tick, dispatched when the app loop has ticking enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickEvent {
    pub number: u64,
    pub delta_ns: u64,
    pub elapsed_ns: u64,
}

/// An application-defined event, carried opaquely through the queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserEvent {
    pub type_id: u64,
    pub data: Vec<u8>,
}

/// Everything the input parser or the app loop can push onto the event
/// queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize { cols: u16, rows: u16 },
    FocusGained,
    FocusLost,
    Paste(String),
    Tick(TickEvent),
    User(UserEvent),
    Quit,
}

impl Event {
    #[must_use]
    pub const fn key(key: Key) -> Self {
        Self::Key(KeyEvent::new(key))
    }

    #[must_use]
    pub const fn key_with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self::Key(KeyEvent::new(key).with_modifiers(modifiers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_builder_sets_modifiers() {
        let ev = KeyEvent::new(Key::Char('c')).with_modifiers(Modifiers::CTRL);
        assert_eq!(ev.modifiers, Modifiers::CTRL);
        assert_eq!(ev.raw, None);
    }

    #[test]
    fn event_key_helper_matches_manual_construction() {
        let a = Event::key_with_modifiers(Key::Up, Modifiers::empty());
        let b = Event::Key(KeyEvent::new(Key::Up));
        assert_eq!(a, b);
    }
}

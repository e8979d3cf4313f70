//! Input events delivered through the widget tree.
//!
//! The host translates device input into [`Event`]s before handing them to
//! [`Screen::process_event`](crate::Screen::process_event). Positions are
//! absolute screen coordinates; widgets compare them against their own
//! `screen_rect`.

use std::time::Duration;

use trellis_render::Point;

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held.
    pub alt: bool,
    /// The Meta/Super key is held.
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Check if no modifiers are pressed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.control && !self.alt && !self.meta
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left = 0,
    /// Secondary button (usually right).
    Right = 1,
    /// Middle button (scroll wheel click).
    Middle = 2,
}

/// Keys the tree knows by name. Anything else arrives as `Other(scancode)`.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Numbers (main keyboard)
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Navigation
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    Home, End, PageUp, PageDown,

    // Editing
    Backspace, Delete, Insert,
    Enter, Tab, Space, Escape,

    /// A key without a name here, identified by its host scancode.
    Other(u32),
}

/// A mouse button press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseButtonEvent {
    /// The button.
    pub button: MouseButton,
    /// Pointer position in screen coordinates.
    pub position: Point,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
}

impl MouseButtonEvent {
    /// Create an event with no modifiers held.
    pub fn new(button: MouseButton, position: Point) -> Self {
        Self {
            button,
            position,
            modifiers: KeyboardModifiers::NONE,
        }
    }
}

/// A mouse wheel movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseWheelEvent {
    /// Pointer position in screen coordinates.
    pub position: Point,
    /// Scroll amount; positive `y` scrolls up.
    pub delta: Point,
}

/// Pointer motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseMotionEvent {
    /// New pointer position in screen coordinates.
    pub position: Point,
    /// Movement since the previous motion event.
    pub delta: Point,
}

impl MouseMotionEvent {
    /// Create a motion event with no recorded delta.
    pub fn new(position: Point) -> Self {
        Self {
            position,
            delta: Point::ZERO,
        }
    }
}

/// A key press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key.
    pub key: Key,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
    /// Whether this is an auto-repeat.
    pub repeat: bool,
}

impl KeyEvent {
    /// Create a non-repeat key event with no modifiers held.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: KeyboardModifiers::NONE,
            repeat: false,
        }
    }
}

/// An input event delivered to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A mouse button went down.
    MouseButtonDown(MouseButtonEvent),
    /// A mouse button went up.
    MouseButtonUp(MouseButtonEvent),
    /// The mouse wheel moved.
    MouseWheel(MouseWheelEvent),
    /// The pointer moved.
    MouseMotion(MouseMotionEvent),
    /// A key went down.
    KeyDown(KeyEvent),
    /// A key went up.
    KeyUp(KeyEvent),
    /// The host asked the application to quit.
    Quit,
}

impl Event {
    /// The pointer position for events that carry one.
    pub fn position(&self) -> Option<Point> {
        match self {
            Event::MouseButtonDown(e) | Event::MouseButtonUp(e) => Some(e.position),
            Event::MouseWheel(e) => Some(e.position),
            Event::MouseMotion(e) => Some(e.position),
            Event::KeyDown(_) | Event::KeyUp(_) | Event::Quit => None,
        }
    }

    /// Whether the event is routed by pointer position.
    #[inline]
    pub fn is_positional(&self) -> bool {
        self.position().is_some()
    }

    /// Whether the event is routed down the focus chain.
    #[inline]
    pub fn is_keyboard(&self) -> bool {
        matches!(self, Event::KeyDown(_) | Event::KeyUp(_))
    }
}

/// Timing passed to [`Widget::handle_frame`](super::Widget::handle_frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTime {
    /// Host time of this frame.
    pub time: Duration,
    /// Time since the previous frame; zero on the first.
    pub delta: Duration,
}

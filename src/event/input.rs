use bitflags::bitflags;
use std::fmt::{self, Display};

/// Represents a mouse button that can be pressed or released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Maps the native library's numbering (1 = left, 2 = middle, 3 = right).
    pub fn from_native(number: u8) -> Option<MouseButton> {
        match number {
            1 => Some(MouseButton::Left),
            2 => Some(MouseButton::Middle),
            3 => Some(MouseButton::Right),
            _ => None,
        }
    }

    /// Maps the DOM `MouseEvent.button` numbering (0 = left, 1 = middle, 2 = right).
    pub fn from_dom(number: i32) -> Option<MouseButton> {
        match number {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }
}

impl Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MouseButton::Left => write!(f, "Left"),
            MouseButton::Middle => write!(f, "Middle"),
            MouseButton::Right => write!(f, "Right"),
        }
    }
}

/// A keyboard key as seen by the normalizer.
///
/// Keys with their own field in the event state get their own variant;
/// everything else is tracked by name in the pressed-key set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Shift,
    Ctrl,
    Alt,
    /// Printable key, by its unshifted character.
    Char(char),
    /// Any other key by name, e.g. `F1`.
    Named(String),
}

/// Name used for backspace in the pressed-key set.
pub const BACKSPACE_KEY_NAME: &str = r"\b";

impl Key {
    /// The name under which this key appears in the pressed-key set.
    pub fn name(&self) -> String {
        match self {
            Key::Escape => "Escape".into(),
            Key::Enter => "Enter".into(),
            Key::Space => " ".into(),
            Key::Backspace => BACKSPACE_KEY_NAME.into(),
            Key::Up => "ArrowUp".into(),
            Key::Down => "ArrowDown".into(),
            Key::Left => "ArrowLeft".into(),
            Key::Right => "ArrowRight".into(),
            Key::Shift => "Shift".into(),
            Key::Ctrl => "Control".into(),
            Key::Alt => "Alt".into(),
            Key::Char(c) => c.to_string(),
            Key::Named(name) => name.clone(),
        }
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One input event in the backend-independent vocabulary. Both the polling
/// and the callback backends reduce their native events to these.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The host asked the application to close.
    Quit,
    WindowResized { width: i32, height: i32 },
    MouseMotion { x: i32, y: i32 },
    MouseButton { x: i32, y: i32, button: MouseButton, pressed: bool },
    Key { key: Key, pressed: bool, repeat: bool },
    MultiGesture { fingers: i32, x: i32, y: i32, pinched: f64, rotated: f64 },
    ControllerAdded { index: i32, name: String },
    ControllerRemoved { index: i32 },
    ControllerButton { index: i32, button: String, pressed: bool },
    ControllerAxis { index: i32, axis: String, value: i32 },
}

bitflags! {
    /// Categories of input events that get traced at debug level.
    #[derive(Default)]
    pub struct DebugEvents: u8 {
        const WINDOW     = 0b000001;
        const TOUCH      = 0b000010;
        const MOUSE      = 0b000100;
        const CLICK      = 0b001000;
        const KEY        = 0b010000;
        const CONTROLLER = 0b100000;
    }
}

impl InputEvent {
    /// The debug category this event is traced under.
    pub fn debug_category(&self) -> DebugEvents {
        match self {
            InputEvent::Quit | InputEvent::WindowResized { .. } => DebugEvents::WINDOW,
            InputEvent::MouseMotion { .. } => DebugEvents::MOUSE,
            InputEvent::MouseButton { .. } => DebugEvents::CLICK,
            InputEvent::Key { .. } => DebugEvents::KEY,
            InputEvent::MultiGesture { .. } => DebugEvents::TOUCH,
            InputEvent::ControllerAdded { .. }
            | InputEvent::ControllerRemoved { .. }
            | InputEvent::ControllerButton { .. }
            | InputEvent::ControllerAxis { .. } => DebugEvents::CONTROLLER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_button_numbering_per_backend() {
        assert_eq!(MouseButton::from_native(1), Some(MouseButton::Left));
        assert_eq!(MouseButton::from_native(3), Some(MouseButton::Right));
        assert_eq!(MouseButton::from_native(0), None);

        assert_eq!(MouseButton::from_dom(0), Some(MouseButton::Left));
        assert_eq!(MouseButton::from_dom(2), Some(MouseButton::Right));
        assert_eq!(MouseButton::from_dom(5), None);

        assert_eq!(MouseButton::Middle.to_string(), "Middle");
    }

    #[test]
    fn key_names() {
        assert_eq!(Key::Backspace.name(), "\\b");
        assert_eq!(Key::Space.name(), " ");
        assert_eq!(Key::Char('a').name(), "a");
        assert_eq!(Key::Named("F5".into()).to_string(), "F5");
    }

    #[test]
    fn debug_categories() {
        let ev = InputEvent::MouseMotion { x: 1, y: 2 };
        assert_eq!(ev.debug_category(), DebugEvents::MOUSE);

        let enabled = DebugEvents::MOUSE | DebugEvents::KEY;
        assert!(enabled.contains(ev.debug_category()));
        assert!(!enabled.contains(InputEvent::Quit.debug_category()));
        assert!(DebugEvents::default().is_empty());
    }
}

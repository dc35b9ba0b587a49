//! Bounded queue between host callbacks and the frame's poll call.
//!
//! Callback-driven hosts fire events at arbitrary points outside `poll`.
//! Each callback pushes a small DOM-style [`Event`] through an [`EventSink`];
//! `poll` later drains the [`EventQueue`] without blocking and feeds the
//! translated events to the same state machine the polling backend uses.

use crate::event::input::{InputEvent, Key, MouseButton};
use crate::event::state::EventPump;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventClass {
    Window,
    Mouse,
    Keyboard,
    Touch,
    Gamepad,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventPayload {
    None,
    /// `button` uses DOM numbering (0 = left, 1 = middle, 2 = right).
    Pointer { x: i32, y: i32, button: i32 },
    /// `key` is the DOM `KeyboardEvent.key` value.
    Key { key: String, repeat: bool },
    Size { width: i32, height: i32 },
    Gesture { fingers: i32, x: i32, y: i32, pinched: f64, rotated: f64 },
    /// For connect events `control` holds the pad's id string; for buttons a
    /// non-zero `value` means pressed.
    Gamepad { index: i32, control: String, value: i32 },
}

/// A host event as queued by a callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub class: EventClass,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(name: &str, class: EventClass, payload: EventPayload) -> Self {
        Self { name: name.to_string(), class, payload }
    }

    pub fn mouse_move(x: i32, y: i32) -> Self {
        Self::new("mousemove", EventClass::Mouse, EventPayload::Pointer { x, y, button: 0 })
    }

    pub fn mouse_down(x: i32, y: i32, button: i32) -> Self {
        Self::new("mousedown", EventClass::Mouse, EventPayload::Pointer { x, y, button })
    }

    pub fn mouse_up(x: i32, y: i32, button: i32) -> Self {
        Self::new("mouseup", EventClass::Mouse, EventPayload::Pointer { x, y, button })
    }

    pub fn key_down(key: &str, repeat: bool) -> Self {
        Self::new(
            "keydown",
            EventClass::Keyboard,
            EventPayload::Key { key: key.to_string(), repeat },
        )
    }

    pub fn key_up(key: &str) -> Self {
        Self::new(
            "keyup",
            EventClass::Keyboard,
            EventPayload::Key { key: key.to_string(), repeat: false },
        )
    }

    pub fn resize(width: i32, height: i32) -> Self {
        Self::new("resize", EventClass::Window, EventPayload::Size { width, height })
    }

    pub fn quit() -> Self {
        Self::new("beforeunload", EventClass::Window, EventPayload::None)
    }

    /// Reduces the host event to the backend-independent vocabulary.
    ///
    /// Returns `None` for names this crate does not handle, or for a name
    /// paired with the wrong payload.
    pub fn translate(&self) -> Option<InputEvent> {
        match (self.name.as_str(), &self.payload) {
            ("beforeunload" | "quit", _) => Some(InputEvent::Quit),
            ("resize", EventPayload::Size { width, height }) => {
                Some(InputEvent::WindowResized { width: *width, height: *height })
            }
            ("mousemove", EventPayload::Pointer { x, y, .. }) => {
                Some(InputEvent::MouseMotion { x: *x, y: *y })
            }
            (name @ ("mousedown" | "mouseup"), EventPayload::Pointer { x, y, button }) => {
                let button = MouseButton::from_dom(*button)?;
                Some(InputEvent::MouseButton { x: *x, y: *y, button, pressed: name == "mousedown" })
            }
            (name @ ("keydown" | "keyup"), EventPayload::Key { key, repeat }) => {
                Some(InputEvent::Key { key: key_from_dom(key), pressed: name == "keydown", repeat: *repeat })
            }
            ("gesture", EventPayload::Gesture { fingers, x, y, pinched, rotated }) => {
                Some(InputEvent::MultiGesture {
                    fingers: *fingers,
                    x: *x,
                    y: *y,
                    pinched: *pinched,
                    rotated: *rotated,
                })
            }
            ("gamepadconnected", EventPayload::Gamepad { index, control, .. }) => {
                Some(InputEvent::ControllerAdded { index: *index, name: control.clone() })
            }
            ("gamepaddisconnected", EventPayload::Gamepad { index, .. }) => {
                Some(InputEvent::ControllerRemoved { index: *index })
            }
            ("gamepadbutton", EventPayload::Gamepad { index, control, value }) => {
                Some(InputEvent::ControllerButton {
                    index: *index,
                    button: control.clone(),
                    pressed: *value != 0,
                })
            }
            ("gamepadaxis", EventPayload::Gamepad { index, control, value }) => {
                Some(InputEvent::ControllerAxis { index: *index, axis: control.clone(), value: *value })
            }
            _ => None,
        }
    }
}

/// Maps a DOM `KeyboardEvent.key` value onto a [`Key`].
pub fn key_from_dom(key: &str) -> Key {
    match key {
        "Escape" | "Esc" => Key::Escape,
        "Enter" => Key::Enter,
        " " | "Spacebar" => Key::Space,
        "Backspace" => Key::Backspace,
        "ArrowUp" | "Up" => Key::Up,
        "ArrowDown" | "Down" => Key::Down,
        "ArrowLeft" | "Left" => Key::Left,
        "ArrowRight" | "Right" => Key::Right,
        "Shift" => Key::Shift,
        "Control" => Key::Ctrl,
        "Alt" => Key::Alt,
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                // Shift state is tracked separately, the set holds unshifted keys.
                (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                _ => Key::Named(key.to_string()),
            }
        }
    }
}

/// Producer half of the queue, handed to host callbacks.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::Sender<Event>,
}

impl EventSink {
    /// Queues an event without ever blocking the caller.
    ///
    /// A full queue drops the new event with a warning. Returns false if the
    /// event was not queued.
    pub fn push(&self, event: Event) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                log::warn!("event queue full, dropping '{}' event", event.name);
                false
            }
            Err(TrySendError::Closed(event)) => {
                log::debug!("event queue closed, dropping '{}' event", event.name);
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half of the queue, owned by the engine.
#[derive(Debug)]
pub struct EventQueue {
    rx: mpsc::Receiver<Event>,
}

impl EventQueue {
    /// Creates a queue holding at most `capacity` undrained events.
    pub fn bounded(capacity: usize) -> (EventSink, EventQueue) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (EventSink { tx }, EventQueue { rx })
    }

    /// Removes the oldest queued host event, if any.
    pub fn try_next(&mut self) -> Option<Event> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl EventPump for EventQueue {
    fn next_event(&mut self) -> Option<InputEvent> {
        while let Some(event) = self.try_next() {
            match event.translate() {
                Some(input) => return Some(input),
                None => log::debug!("ignoring unhandled {:?} event '{}'", event.class, event.name),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::state::EventState;

    #[test]
    fn drains_in_fifo_order() {
        let (sink, mut queue) = EventQueue::bounded(8);
        assert!(sink.push(Event::mouse_move(1, 1)));
        assert!(sink.push(Event::mouse_down(5, 5, 0)));
        assert!(sink.push(Event::mouse_move(9, 9)));

        let mut state = EventState::new();
        state.pump(&mut queue).unwrap();
        assert_eq!((state.cursor_x, state.cursor_y), (9, 9));
        assert!(state.button1);
        assert!(queue.try_next().is_none());
    }

    #[test]
    fn full_queue_drops_without_blocking() {
        let (sink, mut queue) = EventQueue::bounded(2);
        assert!(sink.push(Event::mouse_move(1, 1)));
        assert!(sink.push(Event::mouse_move(2, 2)));
        assert!(!sink.push(Event::mouse_move(3, 3)));

        assert_eq!(queue.next_event(), Some(InputEvent::MouseMotion { x: 1, y: 1 }));
        assert_eq!(queue.next_event(), Some(InputEvent::MouseMotion { x: 2, y: 2 }));
        assert_eq!(queue.next_event(), None);
    }

    #[test]
    fn unknown_events_are_skipped() {
        let (sink, mut queue) = EventQueue::bounded(4);
        sink.push(Event::new("contextmenu", EventClass::Mouse, EventPayload::None));
        sink.push(Event::new("resize", EventClass::Window, EventPayload::None));
        sink.push(Event::key_down("Enter", false));

        let expected = InputEvent::Key { key: Key::Enter, pressed: true, repeat: false };
        assert_eq!(queue.next_event(), Some(expected));
        assert_eq!(queue.next_event(), None);
    }

    #[test]
    fn quit_stops_the_drain() {
        let (sink, mut queue) = EventQueue::bounded(4);
        sink.push(Event::quit());
        sink.push(Event::key_down("x", false));

        let mut state = EventState::new();
        assert!(state.pump(&mut queue).unwrap_err().is_quit());
        assert!(!state.key_down("x"));

        state.pump(&mut queue).unwrap();
        assert!(state.key_down("x"));
    }

    #[test]
    fn dom_key_names() {
        assert_eq!(key_from_dom("ArrowLeft"), Key::Left);
        assert_eq!(key_from_dom(" "), Key::Space);
        assert_eq!(key_from_dom("Q"), Key::Char('q'));
        assert_eq!(key_from_dom("F12"), Key::Named("F12".into()));
    }

    #[test]
    fn dom_buttons_keep_left_and_right_apart() {
        let (sink, mut queue) = EventQueue::bounded(4);
        sink.push(Event::mouse_down(0, 0, 2));
        sink.push(Event::mouse_down(0, 0, 0));
        sink.push(Event::mouse_up(0, 0, 2));

        let mut state = EventState::new();
        state.pump(&mut queue).unwrap();
        assert!(state.button1);
        assert!(!state.button3);
    }

    #[test]
    fn gamepad_events_reach_the_controller() {
        let (sink, mut queue) = EventQueue::bounded(8);
        let pad = |name: &str, control: &str, value| {
            Event::new(
                name,
                EventClass::Gamepad,
                EventPayload::Gamepad { index: 0, control: control.into(), value },
            )
        };
        sink.push(pad("gamepadconnected", "Xbox Controller", 0));
        sink.push(pad("gamepadbutton", "start", 1));
        sink.push(pad("gamepadaxis", "righttrigger", 32767));

        let mut state = EventState::new();
        state.pump(&mut queue).unwrap();

        use crate::event::controller::GameController;
        let ctrl = state.controller(0).unwrap();
        assert_eq!(ctrl.name(), "Xbox Controller");
        assert!(ctrl.button_start());
        assert!(ctrl.button_r2());
    }

    #[test]
    fn host_events_decode_from_json() {
        let json = r#"{"name":"mousedown","class":"mouse","payload":{"type":"pointer","x":3,"y":4,"button":1}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event, Event::mouse_down(3, 4, 1));
        assert_eq!(
            event.translate(),
            Some(InputEvent::MouseButton { x: 3, y: 4, button: MouseButton::Middle, pressed: true })
        );
    }

    #[test]
    fn closed_queue_rejects_pushes() {
        let (sink, queue) = EventQueue::bounded(4);
        drop(queue);
        assert!(sink.is_closed());
        assert!(!sink.push(Event::mouse_move(0, 0)));
    }
}

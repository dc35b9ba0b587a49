//! Per-frame input snapshot and the one code path that mutates it.
//!
//! Backends never touch [`EventState`] fields directly. They hand their
//! events, already reduced to [`InputEvent`]s, to [`EventState::apply`],
//! either one at a time or through an [`EventPump`] drained by
//! [`EventState::pump`].

use crate::errors::RenderError;
use crate::event::controller::{Controller, GameController, DEFAULT_TRIGGER_THRESHOLD};
use crate::event::input::{DebugEvents, InputEvent, Key, MouseButton};
use lazy_static::lazy_static;
use std::collections::{BTreeMap, BTreeSet, HashMap};

lazy_static! {
    /// US keyboard layout: what a key produces while Shift is held.
    static ref SHIFT_MAP: HashMap<&'static str, &'static str> = HashMap::from([
        ("`", "~"),
        ("1", "!"),
        ("2", "@"),
        ("3", "#"),
        ("4", "$"),
        ("5", "%"),
        ("6", "^"),
        ("7", "&"),
        ("8", "*"),
        ("9", "("),
        ("0", ")"),
        ("-", "_"),
        ("=", "+"),
        ("[", "{"),
        ("]", "}"),
        ("\\", "|"),
        (";", ":"),
        ("'", "\""),
        (",", "<"),
        (".", ">"),
        ("/", "?"),
    ]);
}

/// Source of input events that can be drained without blocking.
///
/// A polling backend implements this over its native event queue; the
/// callback backend implements it over the queue its callbacks feed.
pub trait EventPump {
    /// Returns the next pending event, or `None` once nothing is queued.
    fn next_event(&mut self) -> Option<InputEvent>;
}

/// Snapshot of mouse, keyboard, touch and controller state.
#[derive(Debug, Clone)]
pub struct EventState {
    /// Left mouse button.
    pub button1: bool,
    /// Middle mouse button.
    pub button2: bool,
    /// Right mouse button.
    pub button3: bool,

    pub escape: bool,
    pub space: bool,
    pub enter: bool,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub up: bool,
    pub left: bool,
    pub right: bool,
    pub down: bool,

    pub cursor_x: i32,
    pub cursor_y: i32,

    /// Set when the window was resized. Not cleared by every backend; see
    /// the backend docs.
    pub window_resized: bool,
    /// Size reported by the last resize event.
    pub window_size: (i32, i32),

    pub touching: bool,
    pub touch_num_fingers: i32,
    pub touch_center_x: i32,
    pub touch_center_y: i32,
    pub gesture_pinched: f64,
    pub gesture_rotated: f64,

    keydown: BTreeSet<String>,
    controllers: BTreeMap<i32, Controller>,
    trigger_threshold: f64,
    debug: DebugEvents,
}

impl Default for EventState {
    fn default() -> Self {
        Self::new()
    }
}

impl EventState {
    pub fn new() -> Self {
        Self {
            button1: false,
            button2: false,
            button3: false,
            escape: false,
            space: false,
            enter: false,
            shift: false,
            ctrl: false,
            alt: false,
            up: false,
            left: false,
            right: false,
            down: false,
            cursor_x: 0,
            cursor_y: 0,
            window_resized: false,
            window_size: (0, 0),
            touching: false,
            touch_num_fingers: 0,
            touch_center_x: 0,
            touch_center_y: 0,
            gesture_pinched: 0.0,
            gesture_rotated: 0.0,
            keydown: BTreeSet::new(),
            controllers: BTreeMap::new(),
            trigger_threshold: DEFAULT_TRIGGER_THRESHOLD,
            debug: DebugEvents::empty(),
        }
    }

    /// Threshold handed to controllers added from now on.
    pub fn with_trigger_threshold(mut self, threshold: f64) -> Self {
        self.trigger_threshold = threshold;
        self
    }

    /// Event categories traced at debug level.
    pub fn with_debug(mut self, debug: DebugEvents) -> Self {
        self.debug = debug;
        self
    }

    /// Applies every event the pump has queued, in order.
    ///
    /// Stops at a quit event and returns [`RenderError::Quit`]; events behind
    /// it stay in the pump for the next call.
    pub fn pump(&mut self, pump: &mut dyn EventPump) -> Result<(), RenderError> {
        while let Some(event) = pump.next_event() {
            self.apply(&event)?;
        }
        Ok(())
    }

    /// Applies a single event.
    pub fn apply(&mut self, event: &InputEvent) -> Result<(), RenderError> {
        if self.debug.contains(event.debug_category()) {
            log::debug!("input event: {:?}", event);
        }

        match event {
            InputEvent::Quit => return Err(RenderError::Quit),
            InputEvent::WindowResized { width, height } => {
                self.window_resized = true;
                self.window_size = (*width, *height);
            }
            InputEvent::MouseMotion { x, y } => {
                self.cursor_x = *x;
                self.cursor_y = *y;
            }
            InputEvent::MouseButton { x, y, button, pressed } => {
                self.cursor_x = *x;
                self.cursor_y = *y;
                match button {
                    MouseButton::Left => self.button1 = *pressed,
                    MouseButton::Middle => self.button2 = *pressed,
                    MouseButton::Right => self.button3 = *pressed,
                }
            }
            InputEvent::Key { key, pressed, repeat } => self.apply_key(key, *pressed, *repeat),
            InputEvent::MultiGesture { fingers, x, y, pinched, rotated } => {
                self.touching = true;
                self.touch_num_fingers = *fingers;
                self.touch_center_x = *x;
                self.touch_center_y = *y;
                self.gesture_pinched = *pinched;
                self.gesture_rotated = *rotated;
            }
            InputEvent::ControllerAdded { index, name } => {
                if !self.add_controller(*index, name) {
                    log::debug!("controller {} already attached", index);
                }
            }
            InputEvent::ControllerRemoved { index } => {
                if !self.remove_controller(*index) {
                    log::debug!("controller {} was not attached", index);
                }
            }
            InputEvent::ControllerButton { index, button, pressed } => {
                match self.controllers.get_mut(index) {
                    Some(ctrl) => ctrl.set_button_state(button, *pressed),
                    None => log::debug!("button event for unknown controller {}", index),
                }
            }
            InputEvent::ControllerAxis { index, axis, value } => {
                match self.controllers.get_mut(index) {
                    Some(ctrl) => ctrl.set_axis_state(axis, *value),
                    None => log::debug!("axis event for unknown controller {}", index),
                }
            }
        }

        Ok(())
    }

    fn apply_key(&mut self, key: &Key, pressed: bool, repeat: bool) {
        match key {
            // Edge triggered: auto-repeat must not re-fire these.
            Key::Escape => {
                if !repeat {
                    self.escape = pressed;
                }
            }
            Key::Enter => {
                if !repeat {
                    self.enter = pressed;
                }
            }
            Key::Up => self.up = pressed,
            Key::Down => self.down = pressed,
            Key::Left => self.left = pressed,
            Key::Right => self.right = pressed,
            Key::Shift => self.shift = pressed,
            Key::Ctrl => self.ctrl = pressed,
            Key::Alt => self.alt = pressed,
            Key::Space => {
                self.space = pressed;
                self.set_key_down(&key.name(), pressed || repeat);
            }
            Key::Backspace | Key::Char(_) | Key::Named(_) => {
                self.set_key_down(&key.name(), pressed || repeat);
            }
        }
    }

    /// Marks a named key as pressed or released.
    pub fn set_key_down(&mut self, name: &str, down: bool) {
        if down {
            self.keydown.insert(name.to_string());
        } else {
            self.keydown.remove(name);
        }
    }

    pub fn key_down(&self, name: &str) -> bool {
        self.keydown.contains(name)
    }

    /// Names of every pressed key, in sorted order.
    ///
    /// With `shifted` set and Shift currently held, keys are rendered as the
    /// symbol they type on a US keyboard: letters uppercase, digits and
    /// punctuation through the shift table.
    pub fn keys_down(&self, shifted: bool) -> Vec<String> {
        self.keydown
            .iter()
            .map(|key| {
                if shifted && self.shift {
                    match SHIFT_MAP.get(key.as_str()) {
                        Some(symbol) => symbol.to_string(),
                        None => key.to_uppercase(),
                    }
                } else {
                    key.clone()
                }
            })
            .collect()
    }

    pub fn reset_key_down(&mut self) {
        self.keydown.clear();
    }

    /// Attaches a controller. Returns false if the index is already taken.
    pub fn add_controller(&mut self, index: i32, name: &str) -> bool {
        if self.controllers.contains_key(&index) {
            return false;
        }
        self.controllers.insert(
            index,
            Controller::with_threshold(index, name, self.trigger_threshold),
        );
        true
    }

    /// Detaches a controller. Returns false if nothing was attached there.
    pub fn remove_controller(&mut self, index: i32) -> bool {
        self.controllers.remove(&index).is_some()
    }

    pub fn controller(&self, index: i32) -> Option<&Controller> {
        self.controllers.get(&index)
    }

    pub fn controller_mut(&mut self, index: i32) -> Option<&mut Controller> {
        self.controllers.get_mut(&index)
    }

    /// Attached controllers ordered by index.
    pub fn controllers(&self) -> impl Iterator<Item = &Controller> {
        self.controllers.values()
    }
}

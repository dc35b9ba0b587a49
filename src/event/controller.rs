use std::collections::HashMap;

/// Threshold above which an analog trigger counts as a digital press.
pub const DEFAULT_TRIGGER_THRESHOLD: f64 = 0.5;

/// Two-axis analog value, each component in `-1.0..=1.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

/// Logical view of an (Xbox-style) game controller.
///
/// Button and axis names passed to the setters are backend specific; the
/// application should only use the logical getters.
pub trait GameController {
    fn id(&self) -> i32;
    fn name(&self) -> &str;

    fn set_button_state(&mut self, name: &str, pressed: bool);
    fn button_state(&self, name: &str) -> bool;
    /// Raw axis value in the signed 16-bit range.
    fn set_axis_state(&mut self, name: &str, value: i32);
    fn axis_state(&self, name: &str) -> i32;

    fn button_a(&self) -> bool;
    fn button_b(&self) -> bool;
    fn button_x(&self) -> bool;
    fn button_y(&self) -> bool;
    /// Left shoulder.
    fn button_l1(&self) -> bool;
    /// Right shoulder.
    fn button_r1(&self) -> bool;
    /// Left trigger as a digital button.
    fn button_l2(&self) -> bool;
    /// Right trigger as a digital button.
    fn button_r2(&self) -> bool;
    fn button_lstick(&self) -> bool;
    fn button_rstick(&self) -> bool;
    fn button_start(&self) -> bool;
    /// The "back" button.
    fn button_select(&self) -> bool;
    /// The "guide" button.
    fn button_home(&self) -> bool;

    fn button_up(&self) -> bool;
    fn button_down(&self) -> bool;
    fn button_left(&self) -> bool;
    fn button_right(&self) -> bool;

    fn left_stick(&self) -> Vector;
    fn right_stick(&self) -> Vector;
    fn left_trigger(&self) -> f64;
    fn right_trigger(&self) -> f64;
}

/// Converts a raw signed 16-bit axis value into `-1.0..=1.0`.
///
/// The negative range is one larger than the positive range, so each side
/// uses its own divisor and both extremes map exactly to ±1.0.
pub fn normalize_axis(value: i32) -> f64 {
    if value < 0 {
        value as f64 / 32768.0
    } else {
        value as f64 / 32767.0
    }
}

/// Controller state keyed by the standard game-controller button and axis
/// names (`a`, `leftshoulder`, `dpup`, `lefttrigger`, `leftx`, ...).
#[derive(Debug, Clone)]
pub struct Controller {
    id: i32,
    name: String,
    trigger_threshold: f64,
    buttons: HashMap<String, bool>,
    axes: HashMap<String, i32>,
}

impl Controller {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self::with_threshold(id, name, DEFAULT_TRIGGER_THRESHOLD)
    }

    pub fn with_threshold(id: i32, name: impl Into<String>, trigger_threshold: f64) -> Self {
        Self {
            id,
            name: name.into(),
            trigger_threshold,
            buttons: HashMap::new(),
            axes: HashMap::new(),
        }
    }

    pub fn trigger_threshold(&self) -> f64 {
        self.trigger_threshold
    }

    fn axis(&self, name: &str) -> f64 {
        normalize_axis(self.axis_state(name))
    }
}

impl GameController for Controller {
    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_button_state(&mut self, name: &str, pressed: bool) {
        self.buttons.insert(name.to_string(), pressed);
    }

    fn button_state(&self, name: &str) -> bool {
        self.buttons.get(name).copied().unwrap_or(false)
    }

    fn set_axis_state(&mut self, name: &str, value: i32) {
        self.axes.insert(name.to_string(), value);
    }

    fn axis_state(&self, name: &str) -> i32 {
        self.axes.get(name).copied().unwrap_or(0)
    }

    fn button_a(&self) -> bool {
        self.button_state("a")
    }

    fn button_b(&self) -> bool {
        self.button_state("b")
    }

    fn button_x(&self) -> bool {
        self.button_state("x")
    }

    fn button_y(&self) -> bool {
        self.button_state("y")
    }

    fn button_l1(&self) -> bool {
        self.button_state("leftshoulder")
    }

    fn button_r1(&self) -> bool {
        self.button_state("rightshoulder")
    }

    fn button_l2(&self) -> bool {
        self.left_trigger() > self.trigger_threshold
    }

    fn button_r2(&self) -> bool {
        self.right_trigger() > self.trigger_threshold
    }

    fn button_lstick(&self) -> bool {
        self.button_state("leftstick")
    }

    fn button_rstick(&self) -> bool {
        self.button_state("rightstick")
    }

    fn button_start(&self) -> bool {
        self.button_state("start")
    }

    fn button_select(&self) -> bool {
        self.button_state("back")
    }

    fn button_home(&self) -> bool {
        self.button_state("guide")
    }

    fn button_up(&self) -> bool {
        self.button_state("dpup")
    }

    fn button_down(&self) -> bool {
        self.button_state("dpdown")
    }

    fn button_left(&self) -> bool {
        self.button_state("dpleft")
    }

    fn button_right(&self) -> bool {
        self.button_state("dpright")
    }

    fn left_stick(&self) -> Vector {
        Vector { x: self.axis("leftx"), y: self.axis("lefty") }
    }

    fn right_stick(&self) -> Vector {
        Vector { x: self.axis("rightx"), y: self.axis("righty") }
    }

    fn left_trigger(&self) -> f64 {
        self.axis("lefttrigger")
    }

    fn right_trigger(&self) -> f64 {
        self.axis("righttrigger")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_extremes_normalize_to_unit() {
        assert_eq!(normalize_axis(32767), 1.0);
        assert_eq!(normalize_axis(-32768), -1.0);
        assert_eq!(normalize_axis(0), 0.0);
    }

    #[test]
    fn logical_buttons_use_standard_names() {
        let mut pad = Controller::new(0, "Test Pad");
        pad.set_button_state("a", true);
        pad.set_button_state("back", true);
        pad.set_button_state("dpleft", true);

        assert!(pad.button_a());
        assert!(!pad.button_b());
        assert!(pad.button_select());
        assert!(pad.button_left());
        assert!(!pad.button_home());

        pad.set_button_state("a", false);
        assert!(!pad.button_a());
        assert_eq!(pad.name(), "Test Pad");
        assert_eq!(pad.id(), 0);
    }

    #[test]
    fn triggers_become_digital_past_the_threshold() {
        let mut pad = Controller::new(1, "pad");
        pad.set_axis_state("lefttrigger", 16000);
        assert!(!pad.button_l2());

        pad.set_axis_state("lefttrigger", 20000);
        assert!(pad.button_l2());
        assert!(!pad.button_r2());

        let mut twitchy = Controller::with_threshold(2, "pad", 0.1);
        twitchy.set_axis_state("righttrigger", 4000);
        assert!(twitchy.button_r2());
    }

    #[test]
    fn sticks_report_normalized_vectors() {
        let mut pad = Controller::new(0, "pad");
        pad.set_axis_state("leftx", -32768);
        pad.set_axis_state("lefty", 32767);

        assert_eq!(pad.left_stick(), Vector { x: -1.0, y: 1.0 });
        assert_eq!(pad.right_stick(), Vector::default());
        assert_eq!(pad.axis_state("leftx"), -32768);
    }
}

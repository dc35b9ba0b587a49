//! Input normalization.
//!
//! Two delivery models feed one [`EventState`]: a polling backend drains its
//! native source inline, a callback backend drains the [`EventQueue`] its
//! callbacks filled. Both go through [`EventState::pump`].

pub mod controller;
pub mod input;
pub mod queue;
pub mod state;

use std::collections::VecDeque;

pub use controller::{Controller, GameController, Vector};
pub use input::{DebugEvents, InputEvent, Key, MouseButton};
pub use queue::{Event, EventClass, EventPayload, EventQueue, EventSink};
pub use state::{EventPump, EventState};

/// In-memory event source. Used by the software backend as its native
/// queue, and handy for driving an engine from tests or replays.
#[derive(Debug, Default, Clone)]
pub struct ScriptedEvents {
    pending: VecDeque<InputEvent>,
}

impl ScriptedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl From<Vec<InputEvent>> for ScriptedEvents {
    fn from(events: Vec<InputEvent>) -> Self {
        Self { pending: events.into() }
    }
}

impl EventPump for ScriptedEvents {
    fn next_event(&mut self) -> Option<InputEvent> {
        self.pending.pop_front()
    }
}

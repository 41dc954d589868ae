//! Input state and the per-tick input queue
//!
//! Host event handlers never touch simulation state. They push `InputEvent`s
//! into an `InputQueue`, which the frame loop drains once per tick into a
//! stable `TickInput` snapshot.

use serde::{Deserialize, Serialize};

/// Logical actions driven by held keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    Jump,
    Sprint,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Forward,
        Action::Backward,
        Action::TurnLeft,
        Action::TurnRight,
        Action::Jump,
        Action::Sprint,
    ];
}

/// Held state of the six logical actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub jump: bool,
    pub sprint: bool,
}

impl InputState {
    pub fn set(&mut self, action: Action, held: bool) {
        match action {
            Action::Forward => self.forward = held,
            Action::Backward => self.backward = held,
            Action::TurnLeft => self.turn_left = held,
            Action::TurnRight => self.turn_right = held,
            Action::Jump => self.jump = held,
            Action::Sprint => self.sprint = held,
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        match action {
            Action::Forward => self.forward,
            Action::Backward => self.backward,
            Action::TurnLeft => self.turn_left,
            Action::TurnRight => self.turn_right,
            Action::Jump => self.jump,
            Action::Sprint => self.sprint,
        }
    }
}

/// Pointer button that fires a projectile
pub const PRIMARY_BUTTON: i16 = 0;

/// Raw input events from the host, in arrival order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    ActionPressed(Action),
    ActionReleased(Action),
    /// One event per press
    PointerDown { button: i16 },
    /// Relative vertical motion in pixels (positive = down)
    PointerMove { dy: f32 },
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Held actions as of the start of the tick
    pub held: InputState,
    /// Primary-button presses since the previous tick
    pub fire: u32,
    /// Summed vertical pointer motion since the previous tick
    pub pointer_dy: f32,
}

impl TickInput {
    pub fn holding(held: InputState) -> Self {
        Self {
            held,
            ..Default::default()
        }
    }
}

/// Events collected between ticks
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
    held: InputState,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Current held state, including events not yet drained
    pub fn held(&self) -> InputState {
        let mut held = self.held;
        for event in &self.events {
            match *event {
                InputEvent::ActionPressed(a) => held.set(a, true),
                InputEvent::ActionReleased(a) => held.set(a, false),
                _ => {}
            }
        }
        held
    }

    /// Fold queued events into a snapshot for the next tick.
    ///
    /// Pointer presses and motion are consumed; held actions persist across
    /// drains until released.
    pub fn drain(&mut self) -> TickInput {
        let mut input = TickInput::default();
        for event in self.events.drain(..) {
            match event {
                InputEvent::ActionPressed(a) => self.held.set(a, true),
                InputEvent::ActionReleased(a) => self.held.set(a, false),
                InputEvent::PointerDown { button } => {
                    if button == PRIMARY_BUTTON {
                        input.fire += 1;
                    }
                }
                InputEvent::PointerMove { dy } => input.pointer_dy += dy,
            }
        }
        input.held = self.held;
        input
    }

    /// Release everything (window lost focus)
    pub fn release_all(&mut self) {
        for action in Action::ALL {
            self.push(InputEvent::ActionReleased(action));
        }
    }
}

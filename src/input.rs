//! Logical input actions and the keyboard source that produces them.
//!
//! Gameplay code only ever asks "is this action held" or "was it pressed this
//! frame". [`KeyboardInput`] answers from winit key events through a set of
//! [`KeyBindings`]; tests and replays can implement [`Input`] directly.

use std::collections::HashSet;

use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// The logical controls of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveForward,
    MoveBack,
    RotateLeft,
    RotateRight,
    Drop,
    /// Puts every posable bone back to its rest orientation.
    PoseReset,
    /// Bends the bone in the given pose-control slot one way...
    BoneDecrease(u8),
    /// ...or the other.
    BoneIncrease(u8),
}

pub trait Input {
    /// Is the action active right now.
    fn is_held(&self, action: Action) -> bool;

    /// Did the action become active during this frame.
    fn just_pressed(&self, action: Action) -> bool;

    /// Value in `[-1, 1]` from a pair of opposing actions. Holding both cancels out.
    fn axis(&self, negative: Action, positive: Action) -> f32 {
        let mut value = 0.0;
        if self.is_held(negative) {
            value -= 1.0;
        }
        if self.is_held(positive) {
            value += 1.0;
        }
        value
    }

    /// Called by the frame driver once every flow has seen this frame.
    fn end_frame(&mut self) {}
}

/// Many-to-many mapping between physical keys and actions.
#[derive(Clone, Debug, Default)]
pub struct KeyBindings {
    bindings: Vec<(KeyCode, Action)>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bind(mut self, key: KeyCode, action: Action) -> Self {
        if !self.bindings.contains(&(key, action)) {
            self.bindings.push((key, action));
        }
        self
    }

    /// WASD / arrow keys to move, Q/E to yaw, space to drop.
    pub fn crane() -> Self {
        Self::new()
            .bind(KeyCode::KeyA, Action::MoveLeft)
            .bind(KeyCode::ArrowLeft, Action::MoveLeft)
            .bind(KeyCode::KeyD, Action::MoveRight)
            .bind(KeyCode::ArrowRight, Action::MoveRight)
            .bind(KeyCode::KeyW, Action::MoveForward)
            .bind(KeyCode::ArrowUp, Action::MoveForward)
            .bind(KeyCode::KeyS, Action::MoveBack)
            .bind(KeyCode::ArrowDown, Action::MoveBack)
            .bind(KeyCode::KeyQ, Action::RotateLeft)
            .bind(KeyCode::KeyE, Action::RotateRight)
            .bind(KeyCode::Space, Action::Drop)
    }

    /// Key pairs for the six default pose-control slots (see
    /// [`crate::pose::PosePreview::humanoid`]) and backspace to reset.
    pub fn pose_preview() -> Self {
        let pairs = [
            (KeyCode::KeyI, KeyCode::KeyK),
            (KeyCode::KeyO, KeyCode::KeyL),
            (KeyCode::KeyW, KeyCode::KeyS),
            (KeyCode::KeyE, KeyCode::KeyD),
            (KeyCode::KeyA, KeyCode::KeyF),
            (KeyCode::KeyQ, KeyCode::KeyR),
        ];
        pairs
            .into_iter()
            .enumerate()
            .fold(Self::new(), |bindings, (slot, (decrease, increase))| {
                bindings
                    .bind(decrease, Action::BoneDecrease(slot as u8))
                    .bind(increase, Action::BoneIncrease(slot as u8))
            })
            .bind(KeyCode::Backspace, Action::PoseReset)
    }

    /// Combines two binding sets, keeping every binding of both.
    #[must_use]
    pub fn merge(self, other: KeyBindings) -> Self {
        other
            .bindings
            .into_iter()
            .fold(self, |bindings, (key, action)| bindings.bind(key, action))
    }

    fn keys_for(&self, action: Action) -> impl Iterator<Item = KeyCode> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, bound)| *bound == action)
            .map(|(key, _)| *key)
    }
}

/// Keyboard state tracked from winit events.
#[derive(Clone, Debug, Default)]
pub struct KeyboardInput {
    bindings: KeyBindings,
    held: HashSet<KeyCode>,
    pressed_this_frame: HashSet<KeyCode>,
}

impl KeyboardInput {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: HashSet::new(),
            pressed_this_frame: HashSet::new(),
        }
    }

    /// Records a key transition. OS key repeats never count as a fresh press.
    pub fn process_key(&mut self, key: KeyCode, pressed: bool, repeat: bool) {
        if pressed {
            if self.held.insert(key) && !repeat {
                self.pressed_this_frame.insert(key);
            }
        } else {
            self.held.remove(&key);
        }
    }

    /// Feeds a window event; anything but keyboard input is ignored.
    ///
    /// Returns whether the event was a key event.
    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                self.process_key(*key, *state == ElementState::Pressed, *repeat);
                true
            }
            WindowEvent::Focused(false) => {
                // keys released while unfocused never reach us
                self.held.clear();
                false
            }
            _ => false,
        }
    }
}

impl Input for KeyboardInput {
    fn is_held(&self, action: Action) -> bool {
        self.bindings
            .keys_for(action)
            .any(|key| self.held.contains(&key))
    }

    fn just_pressed(&self, action: Action) -> bool {
        self.bindings
            .keys_for(action)
            .any(|key| self.pressed_this_frame.contains(&key))
    }

    fn end_frame(&mut self) {
        self.pressed_this_frame.clear();
    }
}

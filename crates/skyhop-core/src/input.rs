use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::time::Millis;

/// Logical actions the simulation understands. Raw key codes never reach
/// gameplay code; they are translated through [`KeyBindings`] first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Left,
    Right,
    Up,
    Jump,
}

/// Mapping from host key codes (`"KeyA"`, `"ArrowLeft"`, `"Space"`, ...) to actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    map: HashMap<String, Action>,
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn bind(&mut self, code: impl Into<String>, action: Action) {
        self.map.insert(code.into(), action);
    }

    pub fn action_for(&self, code: &str) -> Option<Action> {
        self.map.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for KeyBindings {
    /// WASD + arrows for movement, Space for jump.
    fn default() -> Self {
        let mut b = Self::empty();
        b.bind("KeyA", Action::Left);
        b.bind("ArrowLeft", Action::Left);
        b.bind("KeyD", Action::Right);
        b.bind("ArrowRight", Action::Right);
        b.bind("KeyW", Action::Up);
        b.bind("ArrowUp", Action::Up);
        b.bind("Space", Action::Jump);
        b
    }
}

/// Logical input consumed by one simulation tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerIntent {
    pub left: bool,
    pub right: bool,
    pub jump_held: bool,
    /// Sim-clock time of the most recent jump press edge since the last tick.
    pub jump_pressed_at: Option<Millis>,
    /// Jump was released since the last tick (variable jump height).
    pub jump_released: bool,
}

impl PlayerIntent {
    /// -1 for left, +1 for right, 0 when both or neither are held.
    pub fn horizontal(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Keyboard state, updated from raw host events.
pub struct InputState {
    bindings: KeyBindings,
    /// Raw codes currently held down.
    keys_down: HashSet<String>,
    /// Rising edge of the jump level since the last `take_intent`.
    jump_pressed_at: Option<Millis>,
    /// Falling edge of the jump level since the last `take_intent`.
    jump_released: bool,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            keys_down: HashSet::new(),
            jump_pressed_at: None,
            jump_released: false,
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Register a key-down event. Returns `true` when the code is bound, in
    /// which case the host should suppress its default behavior (scrolling).
    pub fn on_key_down(&mut self, code: &str, now: Millis) -> bool {
        let Some(action) = self.bindings.action_for(code) else {
            return false;
        };
        let was_jumping = self.jump_level();
        // Auto-repeat delivers key-down again without a key-up; no new edge.
        if self.keys_down.insert(code.to_string()) && !was_jumping && self.jump_level() {
            self.jump_pressed_at = Some(if now.is_finite() { now } else { 0.0 });
            tracing::trace!(code, ?action, now, "jump pressed");
        }
        true
    }

    /// Register a key-up event. Returns `true` when the code is bound.
    pub fn on_key_up(&mut self, code: &str, _now: Millis) -> bool {
        if self.bindings.action_for(code).is_none() {
            return false;
        }
        let was_jumping = self.jump_level();
        self.keys_down.remove(code);
        if was_jumping && !self.jump_level() {
            self.jump_released = true;
        }
        true
    }

    /// Drop every held key, e.g. when the host window loses focus.
    pub fn release_all(&mut self) {
        if self.jump_level() {
            self.jump_released = true;
        }
        if !self.keys_down.is_empty() {
            tracing::debug!(held = self.keys_down.len(), "releasing all held keys");
        }
        self.keys_down.clear();
    }

    /// Discard pending press and release edges without touching held keys.
    /// Used when the simulation clock is rewound, since the stamps no longer
    /// refer to it.
    pub fn clear_edges(&mut self) {
        self.jump_pressed_at = None;
        self.jump_released = false;
    }

    /// Whether any key bound to `action` is held.
    pub fn is_held(&self, action: Action) -> bool {
        self.keys_down
            .iter()
            .any(|code| self.bindings.action_for(code) == Some(action))
    }

    /// Jump and Up both count as "jump held".
    fn jump_level(&self) -> bool {
        self.is_held(Action::Jump) || self.is_held(Action::Up)
    }

    /// Snapshot the logical state for one tick and consume the edges.
    pub fn take_intent(&mut self) -> PlayerIntent {
        let intent = self.peek_intent();
        self.jump_pressed_at = None;
        self.jump_released = false;
        intent
    }

    /// Current logical state without consuming edges.
    pub fn peek_intent(&self) -> PlayerIntent {
        PlayerIntent {
            left: self.is_held(Action::Left),
            right: self.is_held(Action::Right),
            jump_held: self.jump_level(),
            jump_pressed_at: self.jump_pressed_at,
            jump_released: self.jump_released,
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

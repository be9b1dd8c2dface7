use serde::{Deserialize, Serialize};

use crate::input::PlayerIntent;
use crate::time::Millis;

/// A fixed-timestep simulation driven by a host frame loop.
///
/// The loop owns timing (accumulator, elapsed clamp, FPS); the simulation
/// only knows how to advance by exactly one tick and how to expose a
/// read-only snapshot for rendering.
pub trait Simulation {
    /// Read-only view handed to renderers after each frame's steps.
    type Snapshot;

    /// Fixed steps per second.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Fixed step length in milliseconds.
    fn dt_ms(&self) -> Millis {
        1000.0 / f64::from(self.tick_rate())
    }

    /// Current simulation clock. Input edges are stamped with this value.
    fn clock_ms(&self) -> Millis;

    /// Advance by one fixed tick. Returns the gameplay events of that tick.
    fn step(&mut self, intent: &PlayerIntent) -> Vec<SimEvent>;

    /// Build the render-facing snapshot of the current state.
    fn snapshot(&self, safe_mode: bool) -> Self::Snapshot;

    /// Serialize the full simulation state (fingerprinting, rewind).
    fn serialize_state(&self) -> Vec<u8>;

    /// Replace the simulation state with a previously serialized one.
    /// Malformed input is ignored.
    fn apply_state(&mut self, state: &[u8]);

    /// Return to the initial world.
    fn restart(&mut self);

    fn pause(&mut self);

    fn resume(&mut self);

    fn is_paused(&self) -> bool;
}

/// Why the player was sent back to spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RespawnCause {
    /// Stun countdown after enemy contact ran out.
    StunExpired,
    /// Fell below the world's lower bound.
    FellOutOfWorld,
}

/// Gameplay events emitted by a tick. Consumed by renderers (juice) and logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Jumped,
    Landed,
    Stunned { enemy_index: usize },
    Respawned { cause: RespawnCause },
    CoinCollected { coin_index: usize, tally: u32 },
    AllCoinsCollected,
}

/// Generates the `Simulation` methods that are identical across games:
/// `serialize_state`, `apply_state`, `pause`, `resume`, `is_paused`.
///
/// Requires the implementing struct to have `state: $StateType` and
/// `paused: bool` fields.
#[macro_export]
macro_rules! simulation_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).expect("simulation state serialization must succeed")
        }

        fn apply_state(&mut self, state: &[u8]) {
            match rmp_serde::from_slice::<$StateType>(state) {
                Ok(s) => self.state = s,
                Err(e) => tracing::warn!(error = %e, "ignoring malformed simulation state"),
            }
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn is_paused(&self) -> bool {
            self.paused
        }
    };
}

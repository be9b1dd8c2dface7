pub mod game_trait;
pub mod geometry;
pub mod input;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::{SimEvent, Simulation};
    use crate::input::PlayerIntent;

    /// Intent holding only the given horizontal direction (-1, 0, +1).
    pub fn walking(dir: i8) -> PlayerIntent {
        PlayerIntent {
            left: dir < 0,
            right: dir > 0,
            ..Default::default()
        }
    }

    /// Intent with a fresh jump press stamped at `now`.
    pub fn jump_pressed(now: f64) -> PlayerIntent {
        PlayerIntent {
            jump_held: true,
            jump_pressed_at: Some(now),
            ..Default::default()
        }
    }

    /// Run `n` ticks with the same intent, returning all accumulated events.
    pub fn run_ticks<S: Simulation>(sim: &mut S, n: usize, intent: &PlayerIntent) -> Vec<SimEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(sim.step(intent));
        }
        all_events
    }

    // ================================================================
    // Simulation Contract Tests
    // ================================================================
    // Generic checks every Simulation implementation must pass. Game crates
    // call them from their own #[cfg(test)] modules.

    /// step() must advance the clock by exactly one dt.
    pub fn contract_step_advances_clock<S: Simulation>(sim: &mut S) {
        let before = sim.clock_ms();
        sim.step(&PlayerIntent::default());
        let after = sim.clock_ms();
        assert!(
            (after - before - sim.dt_ms()).abs() < 1e-9,
            "step() must advance the clock by dt ({} -> {})",
            before,
            after
        );
    }

    /// pause() must freeze state, resume() must unfreeze it.
    pub fn contract_pause_stops_updates<S: Simulation>(sim: &mut S) {
        sim.pause();
        assert!(sim.is_paused());
        let before = sim.serialize_state();
        sim.step(&walking(1));
        let during_pause = sim.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        sim.resume();
        sim.step(&walking(1));
        let after_resume = sim.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// serialize → apply → serialize must be stable.
    pub fn contract_state_roundtrip_preserves<S: Simulation>(sim: &mut S) {
        let state_a = sim.serialize_state();
        sim.apply_state(&state_a);
        let state_b = sim.serialize_state();
        assert_eq!(
            state_a, state_b,
            "State must be stable after serialize→apply→serialize roundtrip"
        );
    }

    /// apply_state() with garbage must leave the state untouched.
    pub fn contract_malformed_state_ignored<S: Simulation>(sim: &mut S) {
        let before = sim.serialize_state();
        sim.apply_state(&[0xc1, 0xff, 0x00]);
        assert_eq!(before, sim.serialize_state());
    }

    /// restart() must restore the state captured right after construction.
    pub fn contract_restart_restores_initial<S: Simulation>(sim: &mut S) {
        let initial = sim.serialize_state();
        run_ticks(sim, 30, &walking(1));
        assert_ne!(initial, sim.serialize_state(), "ticks must change state");
        sim.restart();
        assert_eq!(initial, sim.serialize_state(), "restart must restore state");
    }
}

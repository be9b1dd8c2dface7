use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use skyhop_core::game_trait::{SimEvent, Simulation};
use skyhop_core::input::{InputState, KeyBindings};
use skyhop_core::time::Millis;

use crate::config::LoopSettings;
use crate::renderer::Renderer;

/// FPS assumed before the first window closes.
const INITIAL_FPS: f32 = 60.0;

/// Counts rendered frames over a rolling window and flips safe mode with
/// hysteresis.
#[derive(Debug, Clone, PartialEq)]
pub struct FpsMeter {
    window_ms: Millis,
    safe_mode_fps: f32,
    recover_fps: f32,
    window_start: Option<Millis>,
    frames: u32,
    fps: f32,
    safe_mode: bool,
}

impl FpsMeter {
    pub fn new(settings: &LoopSettings) -> Self {
        Self {
            window_ms: settings.fps_window_ms,
            safe_mode_fps: settings.safe_mode_fps,
            recover_fps: settings.recover_fps,
            window_start: None,
            frames: 0,
            fps: INITIAL_FPS,
            safe_mode: false,
        }
    }

    /// Record one rendered frame at `now`. Returns the new safe-mode flag when
    /// it changed at this window boundary.
    pub fn record_frame(&mut self, now: Millis) -> Option<bool> {
        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            return None;
        };
        self.frames += 1;
        let span = now - start;
        if span < self.window_ms {
            return None;
        }

        self.fps = (f64::from(self.frames) * 1000.0 / span) as f32;
        self.frames = 0;
        self.window_start = Some(now);

        let next = if self.safe_mode {
            self.fps < self.recover_fps
        } else {
            self.fps < self.safe_mode_fps
        };
        if next == self.safe_mode {
            return None;
        }
        self.safe_mode = next;
        Some(next)
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn safe_mode(&self) -> bool {
        self.safe_mode
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Frames still render; the simulation does not advance.
    Paused,
    /// Frames are no-ops.
    Stopped,
}

/// What one call to [`FrameLoop::frame`] did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    pub steps: u32,
    pub rendered: bool,
    pub safe_mode: bool,
    pub fps: f32,
}

/// A panic caught by [`FrameLoop::guarded_frame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    Simulation { message: String },
    Render { message: String },
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simulation { message } => write!(f, "simulation step failed: {message}"),
            Self::Render { message } => write!(f, "render failed: {message}"),
        }
    }
}

impl std::error::Error for FrameError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FramePhase {
    Step,
    Render,
}

/// Fixed-timestep driver: accumulates host time, advances the simulation in
/// whole ticks, then renders once per frame.
pub struct FrameLoop<S, R>
where
    S: Simulation,
    R: Renderer<Snapshot = S::Snapshot>,
{
    sim: S,
    renderer: R,
    input: InputState,
    settings: LoopSettings,
    meter: FpsMeter,
    accumulator: Millis,
    last_timestamp: Option<Millis>,
    state: LoopState,
    phase: FramePhase,
    last_error: Option<FrameError>,
}

impl<S, R> FrameLoop<S, R>
where
    S: Simulation,
    R: Renderer<Snapshot = S::Snapshot>,
{
    pub fn new(sim: S, renderer: R, bindings: KeyBindings, settings: LoopSettings) -> Self {
        tracing::info!(tick_rate = sim.tick_rate(), "frame loop started");
        Self {
            sim,
            renderer,
            input: InputState::new(bindings),
            meter: FpsMeter::new(&settings),
            settings,
            accumulator: 0.0,
            last_timestamp: None,
            state: LoopState::Running,
            phase: FramePhase::Step,
            last_error: None,
        }
    }

    /// Run one host frame at `timestamp_ms`.
    pub fn frame(&mut self, timestamp_ms: Millis) -> FrameReport {
        if self.state == LoopState::Stopped {
            return FrameReport::default();
        }
        let now = if timestamp_ms.is_finite() {
            timestamp_ms
        } else {
            self.last_timestamp.unwrap_or(0.0)
        };
        let Some(last) = self.last_timestamp.replace(now) else {
            return self.report(0, false);
        };
        let elapsed = (now - last).clamp(0.0, self.settings.max_frame_ms);

        self.phase = FramePhase::Step;
        let mut events: Vec<SimEvent> = Vec::new();
        let mut steps = 0;
        if self.state == LoopState::Running {
            let dt = self.sim.dt_ms();
            if dt.is_finite() && dt > 0.0 {
                self.accumulator += elapsed;
                while self.accumulator >= dt {
                    let intent = self.input.take_intent();
                    events.extend(self.sim.step(&intent));
                    self.accumulator -= dt;
                    steps += 1;
                }
            }
        }

        if let Some(safe_mode) = self.meter.record_frame(now) {
            tracing::info!(safe_mode, fps = self.meter.fps(), "safe mode changed");
        }

        self.phase = FramePhase::Render;
        let snapshot = self.sim.snapshot(self.meter.safe_mode());
        self.renderer.render(&snapshot, &events);
        self.report(steps, true)
    }

    /// [`frame`](Self::frame), with panics converted into a [`FrameError`].
    /// The loop stops after the first failure and keeps the error around.
    pub fn guarded_frame(&mut self, timestamp_ms: Millis) -> Result<FrameReport, FrameError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.frame(timestamp_ms)));
        match outcome {
            Ok(report) => Ok(report),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                let error = match self.phase {
                    FramePhase::Step => FrameError::Simulation { message },
                    FramePhase::Render => FrameError::Render { message },
                };
                tracing::error!(%error, "frame failed, stopping loop");
                self.state = LoopState::Stopped;
                self.last_error = Some(error.clone());
                Err(error)
            },
        }
    }

    fn report(&self, steps: u32, rendered: bool) -> FrameReport {
        FrameReport {
            steps,
            rendered,
            safe_mode: self.meter.safe_mode(),
            fps: self.meter.fps(),
        }
    }

    /// Host key-down. Returns `true` when the key is bound.
    pub fn key_down(&mut self, code: &str) -> bool {
        let now = self.sim.clock_ms();
        self.input.on_key_down(code, now)
    }

    /// Host key-up. Returns `true` when the key is bound.
    pub fn key_up(&mut self, code: &str) -> bool {
        let now = self.sim.clock_ms();
        self.input.on_key_up(code, now)
    }

    /// Host window lost focus.
    pub fn on_blur(&mut self) {
        self.input.release_all();
    }

    pub fn pause(&mut self) {
        if self.state != LoopState::Running {
            return;
        }
        self.state = LoopState::Paused;
        self.accumulator = 0.0;
        self.sim.pause();
        tracing::info!("frame loop paused");
    }

    pub fn resume(&mut self) {
        if self.state != LoopState::Paused {
            return;
        }
        self.state = LoopState::Running;
        self.sim.resume();
        tracing::info!("frame loop resumed");
    }

    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.state = LoopState::Stopped;
        tracing::info!("frame loop stopped");
    }

    pub fn restart(&mut self) {
        self.sim.restart();
        self.accumulator = 0.0;
        self.input.release_all();
        // Edge stamps refer to the old clock.
        self.input.clear_edges();
        tracing::debug!("frame loop reset");
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_safe_mode(&self) -> bool {
        self.meter.safe_mode()
    }

    pub fn fps(&self) -> f32 {
        self.meter.fps()
    }

    pub fn last_error(&self) -> Option<&FrameError> {
        self.last_error.as_ref()
    }

    pub fn sim(&self) -> &S {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut S {
        &mut self.sim
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

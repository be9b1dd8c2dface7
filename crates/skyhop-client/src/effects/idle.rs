//! Idle animations: breathing, enemy bob and blink, coin wobble.

use std::f32::consts::TAU;

/// Slow sine used for breathing scale and enemy bob.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Breath {
    pub phase: f32,
}

impl Breath {
    const STEP: f32 = 0.05;

    pub fn tick(&mut self) {
        self.phase = (self.phase + Self::STEP) % TAU;
    }

    /// Uniform scale around 1.
    pub fn scale(&self) -> f32 {
        1.0 + 0.02 * self.phase.sin()
    }

    /// Vertical bob offset in px.
    pub fn bob(&self) -> f32 {
        self.phase.sin() * 4.0
    }
}

/// Enemy eye blink on a random timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blink {
    /// Frames until the eyes toggle.
    pub timer: u32,
    pub eyes_open: bool,
}

impl Blink {
    /// Frames the eyes stay shut.
    pub const CLOSED_FRAMES: u32 = 10;

    pub fn new(rng: &mut fastrand::Rng) -> Self {
        Self {
            timer: Self::open_frames(rng),
            eyes_open: true,
        }
    }

    fn open_frames(rng: &mut fastrand::Rng) -> u32 {
        rng.u32(60..180)
    }

    pub fn tick(&mut self, rng: &mut fastrand::Rng) {
        self.timer = self.timer.saturating_sub(1);
        if self.timer == 0 {
            self.eyes_open = !self.eyes_open;
            self.timer = if self.eyes_open {
                Self::open_frames(rng)
            } else {
                Self::CLOSED_FRAMES
            };
        }
    }
}

/// Coin hover and pulse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoinWobble {
    pub phase: f32,
}

impl CoinWobble {
    const STEP: f32 = 0.1;

    /// Random starting phase so coins do not pulse in lockstep.
    pub fn new(rng: &mut fastrand::Rng) -> Self {
        Self {
            phase: rng.f32() * TAU,
        }
    }

    pub fn tick(&mut self) {
        self.phase = (self.phase + Self::STEP) % TAU;
    }

    /// Vertical offset in px.
    pub fn offset(&self) -> f32 {
        self.phase.sin() * 5.0
    }

    pub fn scale(&self) -> f32 {
        0.9 + 0.1 * (self.phase * 2.0).sin()
    }
}

use serde::{Deserialize, Serialize};

/// Gravity added to `vy` every tick (px/tick², downward).
pub const GRAVITY: f32 = 0.5;
/// Horizontal speed while a direction is held (px/tick).
pub const MOVE_SPEED: f32 = 5.0;
/// Initial vertical velocity of a jump (negative is up).
pub const JUMP_VELOCITY: f32 = -12.0;
/// Per-tick horizontal decay when no single direction is held.
pub const FRICTION: f32 = 0.8;
/// Grace window after leaving the ground during which a jump is honored.
pub const COYOTE_WINDOW_MS: f64 = 100.0;
/// Grace window before landing during which an early jump press is honored.
pub const JUMP_BUFFER_WINDOW_MS: f64 = 120.0;
/// Highest accepted tick rate. Each frame runs `elapsed / dt` steps, so this
/// bounds the work per frame.
pub const MAX_TICK_RATE_HZ: f32 = 1000.0;
/// Default viewport size in px.
pub const VIEWPORT_WIDTH: f32 = 1280.0;
pub const VIEWPORT_HEIGHT: f32 = 720.0;

/// Player movement tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub move_speed: f32,
    pub jump_velocity: f32,
    /// Multiplier applied to upward `vy` when jump is released mid-ascent.
    pub jump_cut: f32,
    pub friction: f32,
    /// `|vx|` below this snaps to zero while decaying.
    pub friction_epsilon: f32,
    pub max_fall_speed: f32,
    pub max_rise_speed: f32,
    pub coyote_ms: f64,
    pub jump_buffer_ms: f64,
    /// Ticks the player stays stunned after touching an enemy.
    pub stun_ticks: u32,
    pub knockback_x: f32,
    pub knockback_y: f32,
    pub player_width: f32,
    pub player_height: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            move_speed: MOVE_SPEED,
            jump_velocity: JUMP_VELOCITY,
            jump_cut: 0.5,
            friction: FRICTION,
            friction_epsilon: 0.05,
            max_fall_speed: 15.0,
            max_rise_speed: 20.0,
            coyote_ms: COYOTE_WINDOW_MS,
            jump_buffer_ms: JUMP_BUFFER_WINDOW_MS,
            stun_ticks: 60,
            knockback_x: 8.0,
            knockback_y: 8.0,
            player_width: 40.0,
            player_height: 40.0,
        }
    }
}

/// Camera follow tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Fraction of the remaining distance covered per tick, in (0, 1].
    pub smoothing: f32,
    /// Never scroll past the world origin.
    pub clamp_to_origin: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.1,
            clamp_to_origin: true,
        }
    }
}

/// Top-level platformer configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerConfig {
    pub physics: PhysicsConfig,
    pub camera: CameraConfig,
    pub tick_rate_hz: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Players whose top edge passes below this y are sent back to spawn.
    pub world_bottom: f32,
    /// Generate the level from this seed instead of using the built-in layout.
    pub level_seed: Option<u64>,
}

impl Default for PlatformerConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            camera: CameraConfig::default(),
            tick_rate_hz: 60.0,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            world_bottom: VIEWPORT_HEIGHT,
            level_seed: None,
        }
    }
}

impl PlatformerConfig {
    /// Load config from `SKYHOP_CONFIG` or `config/skyhop.toml`. Falls back to
    /// defaults if the file is missing or unparseable.
    pub fn load() -> Self {
        let path =
            std::env::var("SKYHOP_CONFIG").unwrap_or_else(|_| "config/skyhop.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => {
                    tracing::info!(path = %path, "loaded platformer config");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    PlatformerConfig::default()
                },
            },
            Err(_) => PlatformerConfig::default(),
        }
    }

    /// Parse and sanitize a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<PlatformerConfig>(content).map(Self::sanitized)
    }

    /// Clamp values that would stall or destabilize the simulation.
    pub fn sanitized(mut self) -> Self {
        let defaults = PlatformerConfig::default();
        if !(self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0) {
            tracing::warn!(tick_rate_hz = self.tick_rate_hz, "invalid tick rate, using default");
            self.tick_rate_hz = defaults.tick_rate_hz;
        } else if self.tick_rate_hz > MAX_TICK_RATE_HZ {
            tracing::warn!(
                tick_rate_hz = self.tick_rate_hz,
                max = MAX_TICK_RATE_HZ,
                "tick rate too high, clamping"
            );
            self.tick_rate_hz = MAX_TICK_RATE_HZ;
        }
        let jump_velocity = self.physics.jump_velocity;
        if !(jump_velocity.is_finite() && jump_velocity < 0.0) {
            tracing::warn!(jump_velocity, "jump velocity must be negative, using default");
            self.physics.jump_velocity = defaults.physics.jump_velocity;
        }
        let gravity = self.physics.gravity;
        if !(gravity.is_finite() && gravity > 0.0) {
            tracing::warn!(gravity, "gravity must be positive, using default");
            self.physics.gravity = defaults.physics.gravity;
        }
        let smoothing = self.camera.smoothing;
        if !(smoothing > 0.0 && smoothing <= 1.0) {
            tracing::warn!(smoothing, "camera smoothing must be in (0, 1], using default");
            self.camera.smoothing = defaults.camera.smoothing;
        }
        let friction = self.physics.friction;
        if !(0.0..=1.0).contains(&friction) {
            tracing::warn!(friction, "friction must be in [0, 1], clamping");
            self.physics.friction = if friction.is_nan() {
                defaults.physics.friction
            } else {
                friction.clamp(0.0, 1.0)
            };
        }
        self.physics.max_fall_speed = self.physics.max_fall_speed.abs();
        self.physics.max_rise_speed = self.physics.max_rise_speed.abs();
        self.physics.player_width = self.physics.player_width.max(0.0);
        self.physics.player_height = self.physics.player_height.max(0.0);
        self
    }

    /// Fixed step length in milliseconds.
    pub fn dt_ms(&self) -> f64 {
        1000.0 / f64::from(self.tick_rate_hz)
    }
}

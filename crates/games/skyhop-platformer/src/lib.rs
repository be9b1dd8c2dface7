pub mod camera;
pub mod coins;
pub mod config;
pub mod enemy;
pub mod level;
pub mod physics;
pub mod snapshot;
pub mod world;

use serde::{Deserialize, Serialize};

use skyhop_core::game_trait::{SimEvent, Simulation};
use skyhop_core::input::PlayerIntent;
use skyhop_core::simulation_boilerplate;
use skyhop_core::time::Millis;

use camera::Camera;
use coins::collect_coins;
use config::PlatformerConfig;
use enemy::tick_enemies;
use physics::tick_player;
use snapshot::RenderSnapshot;
use world::World;

/// Serializable state of a running session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub world: World,
    pub camera: Camera,
    pub clock_ms: Millis,
    pub tick: u64,
    /// Set on the first tick every coin has been collected.
    pub won: bool,
}

/// One running platformer game.
pub struct Session {
    config: PlatformerConfig,
    /// Pristine copy of the level for `restart`.
    initial: World,
    state: SessionState,
    paused: bool,
}

impl Session {
    /// Session on the level described by `config`.
    pub fn new(config: PlatformerConfig) -> Self {
        let world = level::world_for(&config);
        Self::with_world(config, world)
    }

    /// Session on a caller-supplied world.
    pub fn with_world(config: PlatformerConfig, world: World) -> Self {
        let state = fresh_state(&config, &world);
        tracing::info!(
            platforms = world.platforms.len(),
            enemies = world.enemies.len(),
            coins = world.coins.len(),
            seed = ?config.level_seed,
            "session started"
        );
        Self {
            config,
            initial: world,
            state,
            paused: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn world(&self) -> &World {
        &self.state.world
    }

    pub fn config(&self) -> &PlatformerConfig {
        &self.config
    }

    pub fn is_won(&self) -> bool {
        self.state.won
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PlatformerConfig::default())
    }
}

fn fresh_state(config: &PlatformerConfig, world: &World) -> SessionState {
    let mut camera = Camera::new(
        &config.camera,
        config.viewport_width,
        config.viewport_height,
    );
    camera.snap_to(&world.player.rect);
    SessionState {
        world: world.clone(),
        camera,
        clock_ms: 0.0,
        tick: 0,
        won: false,
    }
}

impl Simulation for Session {
    type Snapshot = RenderSnapshot;

    fn tick_rate(&self) -> f32 {
        self.config.tick_rate_hz
    }

    fn dt_ms(&self) -> Millis {
        self.config.dt_ms()
    }

    fn clock_ms(&self) -> Millis {
        self.state.clock_ms
    }

    fn step(&mut self, intent: &PlayerIntent) -> Vec<SimEvent> {
        if self.paused {
            return Vec::new();
        }

        let dt = self.dt_ms();
        let state = &mut self.state;
        state.tick += 1;
        state.clock_ms = state.tick as f64 * dt;
        let now = state.clock_ms;
        let world = &mut state.world;
        let mut events = Vec::new();

        tick_enemies(&mut world.enemies);

        let outcome = tick_player(
            &mut world.player,
            intent,
            &world.platforms,
            &world.enemies,
            &self.config.physics,
            self.config.world_bottom,
            now,
        );
        if outcome.jumped {
            tracing::debug!(tick = state.tick, "jumped");
            events.push(SimEvent::Jumped);
        }
        if outcome.landed {
            tracing::debug!(tick = state.tick, y = world.player.rect.y, "landed");
            events.push(SimEvent::Landed);
        }
        if let Some(enemy_index) = outcome.stunned_by {
            tracing::debug!(tick = state.tick, enemy_index, "stunned by enemy");
            events.push(SimEvent::Stunned { enemy_index });
        }
        if let Some(cause) = outcome.respawned {
            tracing::debug!(tick = state.tick, ?cause, "respawned");
            events.push(SimEvent::Respawned { cause });
        }

        for coin_index in collect_coins(&mut world.coins, &world.player.rect) {
            world.collected_count += 1;
            tracing::debug!(
                tick = state.tick,
                coin_index,
                tally = world.collected_count,
                "coin collected"
            );
            events.push(SimEvent::CoinCollected {
                coin_index,
                tally: world.collected_count,
            });
        }
        if !state.won && world.all_collected() {
            state.won = true;
            tracing::info!(tick = state.tick, coins = world.collected_count, "all coins collected");
            events.push(SimEvent::AllCoinsCollected);
        }

        state.camera.update(&world.player.rect);

        events
    }

    fn snapshot(&self, safe_mode: bool) -> RenderSnapshot {
        let world = &self.state.world;
        RenderSnapshot {
            player: world.player.clone(),
            platforms: world.platforms.clone(),
            enemies: world.enemies.clone(),
            coins: world.coins.clone(),
            collected_count: world.collected_count,
            total_coins: world.total_coins(),
            camera: self.state.camera.clone(),
            safe_mode,
            won: self.state.won,
            tick: self.state.tick,
            clock_ms: self.state.clock_ms,
        }
    }

    fn restart(&mut self) {
        tracing::info!(tick = self.state.tick, "session restarted");
        self.state = fresh_state(&self.config, &self.initial);
    }

    simulation_boilerplate!(state_type: SessionState);
}

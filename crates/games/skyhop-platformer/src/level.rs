use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use skyhop_core::geometry::Rect;

use crate::coins::{COIN_SIZE, Coin};
use crate::config::PlatformerConfig;
use crate::enemy::Enemy;
use crate::physics::PlayerState;
use crate::world::World;

/// Thickness of every platform in px.
pub const PLATFORM_HEIGHT: f32 = 32.0;
/// Width of one procedural section in px.
const CHUNK_WIDTH: f32 = 320.0;
/// Number of sections in a generated level, including the flat spawn section.
const NUM_CHUNKS: u32 = 8;
/// Patrol speed of generated enemies (px/tick).
const ENEMY_SPEED: f32 = 2.0;
const ENEMY_SIZE: f32 = 40.0;
/// Gap between a platform's top and the coin floating above it.
const COIN_HOVER: f32 = 40.0;
/// Upper bound on the height difference the generator plans jumps around.
const MAX_REACH: f32 = 400.0;

/// Build a platform of the standard thickness.
pub fn platform(x: f32, y: f32, width: f32) -> Rect {
    Rect::new(x, y, width, PLATFORM_HEIGHT)
}

/// The hand-built single-screen level.
pub fn default_world(cfg: &PlatformerConfig) -> World {
    let player = PlayerState::new(
        100.0,
        600.0,
        cfg.physics.player_width,
        cfg.physics.player_height,
    );

    let platforms = vec![
        platform(0.0, 680.0, 1280.0),
        platform(200.0, 560.0, 200.0),
        platform(450.0, 440.0, 200.0),
        platform(700.0, 320.0, 200.0),
        platform(950.0, 200.0, 200.0),
    ];

    let enemies = vec![Enemy::new(
        Rect::new(600.0, 640.0, ENEMY_SIZE, ENEMY_SIZE),
        ENEMY_SPEED,
        500.0,
        1200.0,
    )];

    let coins = vec![
        Coin::new(100.0, 640.0),
        Coin::new(280.0, 520.0),
        Coin::new(530.0, 400.0),
        Coin::new(780.0, 280.0),
        Coin::new(1030.0, 160.0),
    ];

    World::new(player, platforms, enemies, coins)
}

/// World described by `cfg`: generated from `level_seed` when set, otherwise
/// the hand-built level.
pub fn world_for(cfg: &PlatformerConfig) -> World {
    match cfg.level_seed {
        Some(seed) => generate_world(seed, cfg),
        None => default_world(cfg),
    }
}

/// Generate a deterministic, side-scrolling level from a seed.
///
/// Every raised platform sits within one jump of the ground or of the step
/// below it, and every pit is narrower than a running jump.
pub fn generate_world(seed: u64, cfg: &PlatformerConfig) -> World {
    let mut rng = StdRng::seed_from_u64(seed);
    let ground_y = cfg.viewport_height - 40.0;
    // Degenerate jump tuning still has to yield a non-empty height range.
    let reach = (max_jump_height(cfg) * 0.8)
        .max(PLATFORM_HEIGHT)
        .min(MAX_REACH);

    let mut level = LevelBuilder::default();

    // Flat spawn section
    level.platforms.push(platform(0.0, ground_y, CHUNK_WIDTH));
    level.coin_above(CHUNK_WIDTH * 0.5, ground_y);

    for chunk_idx in 1..NUM_CHUNKS {
        let base_x = chunk_idx as f32 * CHUNK_WIDTH;
        generate_chunk(&mut level, &mut rng, base_x, ground_y, reach);
    }

    tracing::debug!(
        seed,
        platforms = level.platforms.len(),
        enemies = level.enemies.len(),
        coins = level.coins.len(),
        "generated level"
    );

    let player = PlayerState::new(
        100.0,
        ground_y - cfg.physics.player_height,
        cfg.physics.player_width,
        cfg.physics.player_height,
    );
    World::new(player, level.platforms, level.enemies, level.coins)
}

/// Apex of a full-height jump in px.
fn max_jump_height(cfg: &PlatformerConfig) -> f32 {
    let v = cfg.physics.jump_velocity.abs();
    let g = cfg.physics.gravity.max(f32::EPSILON);
    v * v / (2.0 * g)
}

#[derive(Default)]
struct LevelBuilder {
    platforms: Vec<Rect>,
    enemies: Vec<Enemy>,
    coins: Vec<Coin>,
}

impl LevelBuilder {
    /// Coin centered at `center_x`, hovering above a surface at `top`.
    fn coin_above(&mut self, center_x: f32, top: f32) {
        self.coins.push(Coin::new(
            center_x - COIN_SIZE / 2.0,
            top - COIN_HOVER - COIN_SIZE,
        ));
    }

    fn patrol(&mut self, from_x: f32, to_x: f32, ground_y: f32) {
        let start = (from_x + to_x) / 2.0 - ENEMY_SIZE / 2.0;
        self.enemies.push(Enemy::new(
            Rect::new(start, ground_y - ENEMY_SIZE, ENEMY_SIZE, ENEMY_SIZE),
            ENEMY_SPEED,
            from_x,
            to_x,
        ));
    }
}

fn generate_chunk(
    level: &mut LevelBuilder,
    rng: &mut StdRng,
    base_x: f32,
    ground_y: f32,
    reach: f32,
) {
    let pattern = rng.random_range(0u8..5);

    match pattern {
        0 => {
            // Flat section with a pit
            let pit_start = base_x + rng.random_range(80.0..160.0);
            let pit_width = rng.random_range(64.0..128.0);
            level
                .platforms
                .push(platform(base_x, ground_y, pit_start - base_x));
            let after = pit_start + pit_width;
            level
                .platforms
                .push(platform(after, ground_y, base_x + CHUNK_WIDTH - after));
            level.coin_above(pit_start + pit_width / 2.0, ground_y - 40.0);
        },
        1 => {
            // Raised ledge
            level.platforms.push(platform(base_x, ground_y, CHUNK_WIDTH));
            let w = rng.random_range(120.0..200.0);
            let x = base_x + rng.random_range(20.0..(CHUNK_WIDTH - w));
            let y = ground_y - rng.random_range(reach * 0.6..reach);
            level.platforms.push(platform(x, y, w));
            level.coin_above(x + w / 2.0, y);
        },
        2 => {
            // Two-step staircase
            level.platforms.push(platform(base_x, ground_y, CHUNK_WIDTH));
            let step = rng.random_range(reach * 0.6..reach);
            let w = 110.0;
            let first_x = base_x + rng.random_range(10.0..40.0);
            let second_x = first_x + w + rng.random_range(30.0..60.0);
            level.platforms.push(platform(first_x, ground_y - step, w));
            level
                .platforms
                .push(platform(second_x, ground_y - 2.0 * step, w));
            level.coin_above(second_x + w / 2.0, ground_y - 2.0 * step);
        },
        3 => {
            // Enemy patrol
            level.platforms.push(platform(base_x, ground_y, CHUNK_WIDTH));
            let margin = rng.random_range(20.0..60.0);
            level.patrol(base_x + margin, base_x + CHUNK_WIDTH - margin, ground_y);
            level.coin_above(base_x + CHUNK_WIDTH / 2.0, ground_y - ENEMY_SIZE);
        },
        _ => {
            // Floating platform over a patrol
            level.platforms.push(platform(base_x, ground_y, CHUNK_WIDTH));
            let w = rng.random_range(100.0..160.0);
            let x = base_x + (CHUNK_WIDTH - w) / 2.0;
            let y = ground_y - rng.random_range(reach * 0.7..reach);
            level.platforms.push(platform(x, y, w));
            level.patrol(base_x + 10.0, base_x + CHUNK_WIDTH - 10.0, ground_y);
            level.coin_above(x + w / 2.0, y);
        },
    }
}

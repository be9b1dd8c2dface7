use serde::{Deserialize, Serialize};

use skyhop_core::game_trait::RespawnCause;
use skyhop_core::geometry::Rect;
use skyhop_core::input::PlayerIntent;
use skyhop_core::time::{Millis, NEVER, within_window};

use crate::config::PhysicsConfig;
use crate::enemy::Enemy;

/// Player control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerMode {
    /// Input is live; `on_ground` distinguishes grounded from airborne.
    Normal,
    /// Knocked back by an enemy. Input is ignored until the countdown ends,
    /// at which point the player is reset to spawn.
    Stunned { ticks_left: u32 },
}

/// State of the player character.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerState {
    pub rect: Rect,
    pub vx: f32,
    pub vy: f32,
    pub on_ground: bool,
    /// -1 facing left, +1 facing right.
    pub facing: i8,
    pub last_grounded_at: Millis,
    pub last_jump_requested_at: Millis,
    pub mode: PlayerMode,
    pub spawn_x: f32,
    pub spawn_y: f32,
}

impl PlayerState {
    pub fn new(spawn_x: f32, spawn_y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(spawn_x, spawn_y, width, height),
            vx: 0.0,
            vy: 0.0,
            on_ground: false,
            facing: 1,
            last_grounded_at: NEVER,
            last_jump_requested_at: NEVER,
            mode: PlayerMode::Normal,
            spawn_x,
            spawn_y,
        }
    }

    /// Back to spawn with velocity, flags, timers and stun cleared.
    pub fn reset(&mut self) {
        self.rect.x = self.spawn_x;
        self.rect.y = self.spawn_y;
        self.vx = 0.0;
        self.vy = 0.0;
        self.on_ground = false;
        self.facing = 1;
        self.last_grounded_at = NEVER;
        self.last_jump_requested_at = NEVER;
        self.mode = PlayerMode::Normal;
    }

    pub fn is_stunned(&self) -> bool {
        matches!(self.mode, PlayerMode::Stunned { .. })
    }
}

/// What happened to the player during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerTick {
    pub jumped: bool,
    pub landed: bool,
    /// Index of the enemy that stunned the player this tick.
    pub stunned_by: Option<usize>,
    pub respawned: Option<RespawnCause>,
}

/// Advance the player by one fixed tick.
///
/// Horizontal resolution always runs before vertical resolution, and each
/// axis gets at most one correction per platform.
pub fn tick_player(
    player: &mut PlayerState,
    intent: &PlayerIntent,
    platforms: &[Rect],
    enemies: &[Enemy],
    cfg: &PhysicsConfig,
    world_bottom: f32,
    now: Millis,
) -> PlayerTick {
    let mut out = PlayerTick::default();
    let stunned = player.is_stunned();

    if let Some(t) = intent.jump_pressed_at
        && !stunned
    {
        player.last_jump_requested_at = t;
    }

    // Horizontal intent
    let dir = intent.horizontal();
    if stunned || dir == 0.0 {
        player.vx *= cfg.friction;
        if player.vx.abs() < cfg.friction_epsilon {
            player.vx = 0.0;
        }
    } else {
        player.vx = dir * cfg.move_speed;
        player.facing = if dir < 0.0 { -1 } else { 1 };
    }

    // Jump: coyote time + buffered press
    if !stunned {
        if try_jump(player, cfg, now) {
            out.jumped = true;
        }
        if intent.jump_released && player.vy < 0.0 {
            player.vy *= cfg.jump_cut;
        }
    }

    // Gravity
    player.vy = (player.vy + cfg.gravity).clamp(-cfg.max_rise_speed, cfg.max_fall_speed);

    // Horizontal move + resolve
    player.rect.x += player.vx;
    for p in platforms {
        if player.rect.intersects(p) {
            if player.vx > 0.0 {
                player.rect.x = p.x - player.rect.width;
            } else if player.vx < 0.0 {
                player.rect.x = p.right();
            }
            player.vx = 0.0;
        }
    }

    // Vertical move + resolve
    let was_grounded = player.on_ground;
    player.rect.y += player.vy;
    player.on_ground = false;
    for p in platforms {
        if player.rect.intersects(p) {
            if player.vy > 0.0 {
                player.rect.y = p.y - player.rect.height;
                player.on_ground = true;
                player.last_grounded_at = now;
            } else if player.vy < 0.0 {
                player.rect.y = p.bottom();
            }
            player.vy = 0.0;
        }
    }
    if player.on_ground && !was_grounded {
        out.landed = true;
        // A press buffered while airborne fires on the landing tick itself.
        if !stunned && try_jump(player, cfg, now) {
            out.jumped = true;
        }
    }

    // Enemy contact
    if !player.is_stunned()
        && let Some((idx, enemy)) = enemies
            .iter()
            .enumerate()
            .find(|(_, e)| player.rect.intersects(&e.rect))
    {
        let (px, _) = player.rect.center();
        let (ex, _) = enemy.rect.center();
        let away = if px < ex { -1.0 } else { 1.0 };
        player.vx = away * cfg.knockback_x;
        player.vy = -cfg.knockback_y;
        player.on_ground = false;
        player.mode = PlayerMode::Stunned {
            ticks_left: cfg.stun_ticks,
        };
        out.stunned_by = Some(idx);
    }

    // Stun countdown
    if let PlayerMode::Stunned { ticks_left } = player.mode {
        let ticks_left = ticks_left.saturating_sub(1);
        if ticks_left == 0 {
            player.reset();
            out.respawned = Some(RespawnCause::StunExpired);
        } else {
            player.mode = PlayerMode::Stunned { ticks_left };
        }
    }

    // Fell out of the world
    if player.rect.y > world_bottom {
        player.reset();
        out.respawned = Some(RespawnCause::FellOutOfWorld);
    }

    out
}

/// Fire a jump when the player can jump (grounded or within coyote time) and
/// wants to (press within the buffer window). Consumes the request.
fn try_jump(player: &mut PlayerState, cfg: &PhysicsConfig, now: Millis) -> bool {
    let can_jump = player.on_ground || within_window(now, player.last_grounded_at, cfg.coyote_ms);
    let want_jump = within_window(now, player.last_jump_requested_at, cfg.jump_buffer_ms);
    if !(can_jump && want_jump) {
        return false;
    }
    player.vy = cfg.jump_velocity;
    player.on_ground = false;
    player.last_grounded_at = NEVER;
    player.last_jump_requested_at = NEVER;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyhop_core::test_helpers::{jump_pressed, walking};

    const DT: f64 = 1000.0 / 60.0;

    fn cfg() -> PhysicsConfig {
        PhysicsConfig {
            player_width: 32.0,
            player_height: 32.0,
            ..Default::default()
        }
    }

    fn ground() -> Vec<Rect> {
        vec![Rect::new(0.0, 500.0, 800.0, 20.0)]
    }

    /// Player standing on the ground platform at `x`.
    fn grounded_player(x: f32) -> PlayerState {
        let mut p = PlayerState::new(x, 468.0, 32.0, 32.0);
        p.on_ground = true;
        p.last_grounded_at = 0.0;
        p
    }

    fn step(
        p: &mut PlayerState,
        intent: &PlayerIntent,
        platforms: &[Rect],
        now: Millis,
    ) -> PlayerTick {
        tick_player(p, intent, platforms, &[], &cfg(), 10_000.0, now)
    }

    #[test]
    fn gravity_pulls_down() {
        let mut p = PlayerState::new(100.0, 100.0, 32.0, 32.0);
        step(&mut p, &PlayerIntent::default(), &[], DT);
        assert!(p.rect.y > 100.0, "Gravity should pull player down (y grows)");
        assert_eq!(p.vy, cfg().gravity);
    }

    #[test]
    fn fall_speed_is_clamped() {
        let mut p = PlayerState::new(100.0, 100.0, 32.0, 32.0);
        p.vy = 1_000.0;
        step(&mut p, &PlayerIntent::default(), &[], DT);
        assert_eq!(p.vy, cfg().max_fall_speed);
    }

    #[test]
    fn ground_latch_snaps_to_platform_top() {
        let platforms = ground();
        let mut p = PlayerState::new(100.0, 460.0, 32.0, 32.0);
        p.vy = 10.0;
        let t = step(&mut p, &PlayerIntent::default(), &platforms, 5.0 * DT);
        assert!(p.on_ground);
        assert!(t.landed);
        assert_eq!(p.vy, 0.0);
        assert_eq!(p.rect.y + p.rect.height, platforms[0].y);
        assert_eq!(p.last_grounded_at, 5.0 * DT);
    }

    #[test]
    fn standing_player_stays_grounded() {
        let platforms = ground();
        let mut p = grounded_player(100.0);
        for i in 1..=10 {
            let t = step(&mut p, &PlayerIntent::default(), &platforms, i as f64 * DT);
            assert!(p.on_ground);
            assert!(!t.landed, "resting contact is not a new landing");
            assert_eq!(p.rect.y, 468.0);
        }
    }

    #[test]
    fn ceiling_stops_upward_motion() {
        let ceiling = vec![Rect::new(0.0, 380.0, 800.0, 20.0)];
        let mut p = PlayerState::new(100.0, 405.0, 32.0, 32.0);
        p.vy = -10.0;
        step(&mut p, &PlayerIntent::default(), &ceiling, DT);
        assert_eq!(p.rect.y, 400.0);
        assert_eq!(p.vy, 0.0);
        assert!(!p.on_ground);
    }

    #[test]
    fn wall_stops_horizontal_motion_without_touching_vy() {
        // Wall to the right; the player is airborne and falling.
        let wall = vec![Rect::new(140.0, 0.0, 20.0, 800.0)];
        let mut p = PlayerState::new(106.0, 100.0, 32.0, 32.0);
        p.vy = 3.0;
        step(&mut p, &walking(1), &wall, DT);
        assert_eq!(p.rect.x, 140.0 - 32.0);
        assert_eq!(p.vx, 0.0);
        assert_eq!(p.vy, 3.0 + cfg().gravity, "horizontal resolution leaves vy alone");
    }

    #[test]
    fn wall_on_left_pushes_to_right_edge() {
        let wall = vec![Rect::new(0.0, 0.0, 50.0, 800.0)];
        let mut p = PlayerState::new(52.0, 100.0, 32.0, 32.0);
        step(&mut p, &walking(-1), &wall, DT);
        assert_eq!(p.rect.x, 50.0);
        assert_eq!(p.vx, 0.0);
    }

    #[test]
    fn friction_decays_and_snaps_to_zero() {
        let platforms = ground();
        let mut p = grounded_player(100.0);
        p.vx = 5.0;
        step(&mut p, &PlayerIntent::default(), &platforms, DT);
        assert_eq!(p.vx, 5.0 * cfg().friction);
        for i in 2..60 {
            step(&mut p, &PlayerIntent::default(), &platforms, i as f64 * DT);
        }
        assert_eq!(p.vx, 0.0, "vx should snap to exactly zero");
    }

    #[test]
    fn both_directions_apply_friction() {
        let platforms = ground();
        let mut p = grounded_player(100.0);
        p.vx = 5.0;
        let both = PlayerIntent {
            left: true,
            right: true,
            ..Default::default()
        };
        step(&mut p, &both, &platforms, DT);
        assert_eq!(p.vx, 5.0 * cfg().friction);
    }

    #[test]
    fn facing_follows_direction() {
        let platforms = ground();
        let mut p = grounded_player(300.0);
        step(&mut p, &walking(-1), &platforms, DT);
        assert_eq!(p.facing, -1);
        step(&mut p, &walking(1), &platforms, 2.0 * DT);
        assert_eq!(p.facing, 1);
    }

    #[test]
    fn grounded_jump_press_jumps() {
        let platforms = ground();
        let mut p = grounded_player(100.0);
        let t = step(&mut p, &jump_pressed(DT), &platforms, DT);
        assert!(t.jumped);
        assert_eq!(p.vy, cfg().jump_velocity + cfg().gravity);
        assert!(p.rect.y < 468.0);
        assert!(!p.on_ground);
        assert_eq!(p.last_jump_requested_at, NEVER, "request consumed");
    }

    #[test]
    fn held_jump_does_not_rejump_on_landing() {
        let platforms = ground();
        let mut p = grounded_player(100.0);
        step(&mut p, &jump_pressed(DT), &platforms, DT);
        let held = PlayerIntent {
            jump_held: true,
            ..Default::default()
        };
        let mut jumps = 0;
        for i in 2..200 {
            if step(&mut p, &held, &platforms, i as f64 * DT).jumped {
                jumps += 1;
            }
        }
        assert_eq!(jumps, 0, "holding jump must not bunny-hop");
        assert!(p.on_ground);
    }

    #[test]
    fn coyote_window_honors_late_press() {
        let c = cfg();
        let leave_t = 1_000.0;
        let mut p = PlayerState::new(100.0, 100.0, 32.0, 32.0);
        p.last_grounded_at = leave_t;
        p.on_ground = false;

        let now = leave_t + c.coyote_ms - 1.0;
        let t = step(&mut p, &jump_pressed(now), &[], now);
        assert!(t.jumped, "press just inside coyote window should jump");
        assert_eq!(p.vy, c.jump_velocity + c.gravity);
    }

    #[test]
    fn coyote_window_rejects_press_after_window() {
        let c = cfg();
        let leave_t = 1_000.0;
        let mut p = PlayerState::new(100.0, 100.0, 32.0, 32.0);
        p.last_grounded_at = leave_t;
        p.on_ground = false;

        let now = leave_t + c.coyote_ms + 1.0;
        let t = step(&mut p, &jump_pressed(now), &[], now);
        assert!(!t.jumped);
        assert!(p.vy > 0.0, "player keeps falling");
    }

    #[test]
    fn coyote_jump_only_once() {
        let c = cfg();
        let mut p = PlayerState::new(100.0, 100.0, 32.0, 32.0);
        p.last_grounded_at = 1_000.0;
        let t1 = step(&mut p, &jump_pressed(1_010.0), &[], 1_010.0);
        let t2 = step(&mut p, &jump_pressed(1_020.0), &[], 1_020.0);
        assert!(t1.jumped);
        assert!(!t2.jumped, "coyote window is consumed by the first jump");
        assert!(1_020.0 - 1_000.0 <= c.coyote_ms);
    }

    #[test]
    fn walking_off_ledge_then_jumping_within_coyote() {
        // Short ledge; walk right off it and press jump two ticks later.
        let ledge = vec![Rect::new(0.0, 500.0, 120.0, 20.0)];
        let mut p = grounded_player(80.0);
        let mut now = 0.0;
        let mut left_ground_at = None;
        for _ in 0..20 {
            now += DT;
            step(&mut p, &walking(1), &ledge, now);
            if !p.on_ground {
                left_ground_at = Some(now);
                break;
            }
        }
        let left_ground_at = left_ground_at.expect("player should walk off the ledge");
        now += DT;
        let t = step(&mut p, &jump_pressed(now), &ledge, now);
        assert!(now - left_ground_at < cfg().coyote_ms);
        assert!(t.jumped);
    }

    #[test]
    fn buffered_press_fires_on_landing_tick() {
        let c = cfg();
        let platforms = ground();
        let mut p = PlayerState::new(100.0, 400.0, 32.0, 32.0);
        p.vy = 10.0;

        let press_t = 1_000.0;
        // Press while clearly airborne: cannot jump yet.
        let t = step(&mut p, &jump_pressed(press_t), &platforms, press_t);
        assert!(!t.jumped);

        // Fall until landing, which happens before the buffer expires.
        let mut now = press_t;
        let mut landed = None;
        for _ in 0..20 {
            now += DT;
            let t = step(&mut p, &PlayerIntent::default(), &platforms, now);
            if t.landed {
                landed = Some(t);
                break;
            }
        }
        let t = landed.expect("player should land");
        assert!(now - press_t < c.jump_buffer_ms);
        assert!(t.jumped, "buffered jump should fire on the landing tick");
        assert_eq!(p.vy, c.jump_velocity);
        assert!(!p.on_ground);
    }

    #[test]
    fn stale_buffered_press_is_ignored() {
        let c = cfg();
        let platforms = ground();
        let mut p = PlayerState::new(100.0, 300.0, 32.0, 32.0);
        p.last_jump_requested_at = 0.0;
        let now = c.jump_buffer_ms + 1.0;
        // Drop straight onto the ground this tick.
        p.rect.y = 460.0;
        p.vy = 10.0;
        let t = step(&mut p, &PlayerIntent::default(), &platforms, now);
        assert!(t.landed);
        assert!(!t.jumped);
        assert!(p.on_ground);
    }

    #[test]
    fn releasing_jump_cuts_ascent() {
        let c = cfg();
        let mut p = PlayerState::new(100.0, 100.0, 32.0, 32.0);
        p.vy = -10.0;
        let release = PlayerIntent {
            jump_released: true,
            ..Default::default()
        };
        step(&mut p, &release, &[], DT);
        assert_eq!(p.vy, -10.0 * c.jump_cut + c.gravity);
    }

    #[test]
    fn releasing_jump_while_falling_is_noop() {
        let c = cfg();
        let mut p = PlayerState::new(100.0, 100.0, 32.0, 32.0);
        p.vy = 4.0;
        let release = PlayerIntent {
            jump_released: true,
            ..Default::default()
        };
        step(&mut p, &release, &[], DT);
        assert_eq!(p.vy, 4.0 + c.gravity);
    }

    fn enemy_at(x: f32, y: f32) -> Enemy {
        Enemy::new(Rect::new(x, y, 40.0, 40.0), 0.0, x - 100.0, x + 140.0)
    }

    #[test]
    fn enemy_contact_stuns_and_knocks_back() {
        let c = cfg();
        let enemies = vec![enemy_at(120.0, 100.0)];
        let mut p = PlayerState::new(100.0, 100.0, 32.0, 32.0);
        let t = tick_player(&mut p, &walking(1), &[], &enemies, &c, 10_000.0, DT);
        assert_eq!(t.stunned_by, Some(0));
        assert_eq!(p.mode, PlayerMode::Stunned { ticks_left: c.stun_ticks - 1 });
        assert_eq!(p.vx, -c.knockback_x, "player left of enemy is pushed left");
        assert_eq!(p.vy, -c.knockback_y);
    }

    #[test]
    fn knockback_points_right_when_player_is_right_of_enemy() {
        let c = cfg();
        let enemies = vec![enemy_at(80.0, 100.0)];
        let mut p = PlayerState::new(100.0, 100.0, 32.0, 32.0);
        tick_player(&mut p, &PlayerIntent::default(), &[], &enemies, &c, 10_000.0, DT);
        assert_eq!(p.vx, c.knockback_x);
    }

    #[test]
    fn stunned_player_ignores_input_and_is_not_restunned() {
        let c = cfg();
        let enemies = vec![enemy_at(120.0, 100.0)];
        let mut p = PlayerState::new(100.0, 100.0, 32.0, 32.0);
        tick_player(&mut p, &PlayerIntent::default(), &[], &enemies, &c, 10_000.0, DT);
        let vx_after_hit = p.vx;

        // Holding right while stunned: friction applies, no re-stun.
        let t = tick_player(&mut p, &walking(1), &[], &enemies, &c, 10_000.0, 2.0 * DT);
        assert_eq!(t.stunned_by, None);
        assert_eq!(p.vx, vx_after_hit * c.friction);
        assert_eq!(p.mode, PlayerMode::Stunned { ticks_left: c.stun_ticks - 2 });

        let now = 3.0 * DT;
        let t = tick_player(&mut p, &jump_pressed(now), &[], &enemies, &c, 10_000.0, now);
        assert!(!t.jumped, "stunned player cannot jump");
    }

    #[test]
    fn stun_countdown_resets_to_spawn() {
        let c = PhysicsConfig {
            stun_ticks: 5,
            ..cfg()
        };
        let platforms = ground();
        let enemies = vec![enemy_at(300.0, 460.0)];
        let mut p = grounded_player(270.0);
        p.spawn_x = 50.0;
        p.spawn_y = 468.0;

        let mut respawn = None;
        for i in 1..=5 {
            let now = i as f64 * DT;
            let t = tick_player(
                &mut p,
                &PlayerIntent::default(),
                &platforms,
                &enemies,
                &c,
                10_000.0,
                now,
            );
            if t.respawned.is_some() {
                respawn = Some((i, t.respawned));
            }
        }
        assert_eq!(respawn, Some((5, Some(RespawnCause::StunExpired))));
        assert_eq!(p.mode, PlayerMode::Normal);
        assert_eq!((p.rect.x, p.rect.y), (50.0, 468.0));
        assert_eq!((p.vx, p.vy), (0.0, 0.0));
    }

    #[test]
    fn falling_out_of_world_resets_to_spawn() {
        let mut p = PlayerState::new(50.0, 468.0, 32.0, 32.0);
        p.rect.y = 10_001.0;
        p.vx = 3.0;
        let t = step(&mut p, &PlayerIntent::default(), &[], DT);
        assert_eq!(t.respawned, Some(RespawnCause::FellOutOfWorld));
        assert_eq!((p.rect.x, p.rect.y), (50.0, 468.0));
        assert_eq!((p.vx, p.vy), (0.0, 0.0));
    }

    #[test]
    fn fall_reset_overrides_stun() {
        let c = cfg();
        let mut p = PlayerState::new(50.0, 468.0, 32.0, 32.0);
        p.mode = PlayerMode::Stunned { ticks_left: 30 };
        p.rect.y = 20_000.0;
        let t = tick_player(&mut p, &PlayerIntent::default(), &[], &[], &c, 10_000.0, DT);
        assert_eq!(t.respawned, Some(RespawnCause::FellOutOfWorld));
        assert_eq!(p.mode, PlayerMode::Normal);
    }

    #[test]
    fn holding_right_moves_monotonically_at_move_speed() {
        let platforms = ground();
        let mut p = grounded_player(50.0);
        let mut last_x = p.rect.x;
        for i in 1..=30 {
            step(&mut p, &walking(1), &platforms, i as f64 * DT);
            assert!(p.rect.x > last_x, "x must increase every tick");
            assert_eq!(p.vx, cfg().move_speed);
            assert!(p.on_ground);
            last_x = p.rect.x;
        }
        assert_eq!(p.rect.x, 50.0 + 30.0 * cfg().move_speed);
    }

    #[test]
    fn zero_area_platform_does_not_crash() {
        let platforms = vec![
            Rect::new(100.0, 480.0, 0.0, 0.0),
            Rect::new(0.0, 500.0, 800.0, 20.0),
        ];
        let mut p = grounded_player(90.0);
        for i in 1..=20 {
            step(&mut p, &walking(1), &platforms, i as f64 * DT);
        }
        assert!(p.rect.x.is_finite() && p.rect.y.is_finite());
        assert!(p.on_ground);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn never_rests_inside_a_platform(
                moves in proptest::collection::vec((-1i8..=1, any::<bool>()), 10..120)
            ) {
                let platforms = vec![
                    Rect::new(0.0, 500.0, 800.0, 20.0),
                    Rect::new(200.0, 400.0, 120.0, 20.0),
                    Rect::new(420.0, 320.0, 120.0, 20.0),
                ];
                let mut p = grounded_player(50.0);
                let mut now = 0.0;
                for (dir, jump) in moves {
                    now += DT;
                    let mut intent = walking(dir);
                    if jump {
                        intent.jump_held = true;
                        intent.jump_pressed_at = Some(now);
                    }
                    step(&mut p, &intent, &platforms, now);
                    prop_assert!(p.rect.x.is_finite() && p.rect.y.is_finite());
                    for plat in &platforms {
                        prop_assert!(
                            !p.rect.intersects(plat),
                            "player {:?} overlaps platform {:?}",
                            p.rect,
                            plat
                        );
                    }
                }
            }

            #[test]
            fn velocity_stays_bounded(
                moves in proptest::collection::vec(-1i8..=1, 10..200)
            ) {
                let c = cfg();
                let mut p = PlayerState::new(100.0, 0.0, 32.0, 32.0);
                let mut now = 0.0;
                for dir in moves {
                    now += DT;
                    step(&mut p, &walking(dir), &[], now);
                    prop_assert!(p.vy <= c.max_fall_speed && p.vy >= -c.max_rise_speed);
                    prop_assert!(p.vx.abs() <= c.move_speed);
                }
            }
        }
    }
}

use serde::{Deserialize, Serialize};

use skyhop_core::geometry::Rect;

/// A patrolling enemy. Moves horizontally at `|vx|` between `min_x` and `max_x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub rect: Rect,
    pub vx: f32,
    /// Leftmost x the left edge may reach.
    pub min_x: f32,
    /// Rightmost x the right edge may reach.
    pub max_x: f32,
}

impl Enemy {
    pub fn new(rect: Rect, vx: f32, min_x: f32, max_x: f32) -> Self {
        let (min_x, max_x) = if min_x <= max_x {
            (min_x, max_x)
        } else {
            (max_x, min_x)
        };
        Self {
            rect,
            vx,
            min_x,
            max_x,
        }
    }

    /// Whether the patrol range is too narrow to fit the enemy.
    fn is_pinned(&self) -> bool {
        self.max_x - self.min_x <= self.rect.width
    }
}

/// Advance one enemy by one tick.
///
/// When the leading edge reaches a bound the enemy is placed back inside the
/// range and its velocity flips.
pub fn tick_enemy(enemy: &mut Enemy) {
    if enemy.is_pinned() {
        enemy.rect.x = enemy.min_x;
        return;
    }

    enemy.rect.x += enemy.vx;

    if enemy.vx < 0.0 && enemy.rect.x <= enemy.min_x {
        enemy.rect.x = enemy.min_x;
        enemy.vx = -enemy.vx;
    } else if enemy.vx > 0.0 && enemy.rect.right() >= enemy.max_x {
        enemy.rect.x = enemy.max_x - enemy.rect.width;
        enemy.vx = -enemy.vx;
    }
}

/// Advance every enemy by one tick.
pub fn tick_enemies(enemies: &mut [Enemy]) {
    for enemy in enemies {
        tick_enemy(enemy);
    }
}

use serde::{Deserialize, Serialize};

use skyhop_core::geometry::Rect;

use crate::coins::Coin;
use crate::enemy::Enemy;
use crate::physics::PlayerState;

/// Everything that exists in a level: the player, static platforms, enemies
/// and coins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub player: PlayerState,
    pub platforms: Vec<Rect>,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    /// Always equal to the number of coins with `collected == true`.
    pub collected_count: u32,
}

impl World {
    pub fn new(
        player: PlayerState,
        platforms: Vec<Rect>,
        enemies: Vec<Enemy>,
        coins: Vec<Coin>,
    ) -> Self {
        let collected_count = crate::coins::collected_count(&coins);
        Self {
            player,
            platforms,
            enemies,
            coins,
            collected_count,
        }
    }

    pub fn total_coins(&self) -> u32 {
        self.coins.len() as u32
    }

    /// True once every coin is collected. A world with no coins is never won.
    pub fn all_collected(&self) -> bool {
        !self.coins.is_empty() && self.collected_count == self.total_coins()
    }
}

use serde::{Deserialize, Serialize};

use skyhop_core::geometry::Rect;

use crate::camera::Camera;
use crate::coins::Coin;
use crate::enemy::Enemy;
use crate::physics::PlayerState;

/// Kinds of drawable entities. Renderers key their draw routines on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Platform,
    Coin,
    Enemy,
    Player,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Platform,
        EntityKind::Coin,
        EntityKind::Enemy,
        EntityKind::Player,
    ];
}

/// Stable identity of an entity within one world: kind plus list index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    pub kind: EntityKind,
    pub index: usize,
}

impl EntityId {
    pub const PLAYER: EntityId = EntityId {
        kind: EntityKind::Player,
        index: 0,
    };

    pub fn new(kind: EntityKind, index: usize) -> Self {
        Self { kind, index }
    }
}

/// Borrowed view of one drawable entity.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Platform(&'a Rect),
    Coin(&'a Coin),
    Enemy(&'a Enemy),
    Player(&'a PlayerState),
}

impl EntityRef<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Platform(_) => EntityKind::Platform,
            EntityRef::Coin(_) => EntityKind::Coin,
            EntityRef::Enemy(_) => EntityKind::Enemy,
            EntityRef::Player(_) => EntityKind::Player,
        }
    }

    pub fn rect(&self) -> Rect {
        match self {
            EntityRef::Platform(r) => **r,
            EntityRef::Coin(c) => c.rect,
            EntityRef::Enemy(e) => e.rect,
            EntityRef::Player(p) => p.rect,
        }
    }
}

/// Read-only view of a session handed to renderers once per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub player: PlayerState,
    pub platforms: Vec<Rect>,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    pub collected_count: u32,
    pub total_coins: u32,
    pub camera: Camera,
    /// Renderers should skip expensive effects while set.
    pub safe_mode: bool,
    pub won: bool,
    pub tick: u64,
    pub clock_ms: f64,
}

impl RenderSnapshot {
    /// Entities in back-to-front draw order, each paired with its id.
    /// Collected coins are skipped.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, EntityRef<'_>)> + '_ {
        let platforms = self
            .platforms
            .iter()
            .enumerate()
            .map(|(i, p)| (EntityId::new(EntityKind::Platform, i), EntityRef::Platform(p)));
        let coins = self
            .coins
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.collected)
            .map(|(i, c)| (EntityId::new(EntityKind::Coin, i), EntityRef::Coin(c)));
        let enemies = self
            .enemies
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityId::new(EntityKind::Enemy, i), EntityRef::Enemy(e)));
        let player = std::iter::once((EntityId::PLAYER, EntityRef::Player(&self.player)));
        platforms.chain(coins).chain(enemies).chain(player)
    }

    /// HUD tally line.
    pub fn coin_text(&self) -> String {
        format!("Coins: {}/{}", self.collected_count, self.total_coins)
    }
}

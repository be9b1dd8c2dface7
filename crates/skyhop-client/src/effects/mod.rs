pub mod idle;
pub mod parallax;
pub mod squash_stretch;

use std::collections::{HashMap, HashSet};

use skyhop_core::game_trait::SimEvent;
use skyhop_platformer::snapshot::{EntityId, EntityKind, RenderSnapshot};

use idle::{Blink, Breath, CoinWobble};
use squash_stretch::SquashStretch;

/// Per-entity cosmetic state. Never fed back into the simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityAnim {
    Player {
        squash: SquashStretch,
        breath: Breath,
    },
    Enemy {
        breath: Breath,
        blink: Blink,
    },
    Coin(CoinWobble),
}

impl EntityAnim {
    fn for_kind(kind: EntityKind, rng: &mut fastrand::Rng) -> Option<Self> {
        match kind {
            EntityKind::Player => Some(EntityAnim::Player {
                squash: SquashStretch::default(),
                breath: Breath::default(),
            }),
            EntityKind::Enemy => Some(EntityAnim::Enemy {
                breath: Breath::default(),
                blink: Blink::new(rng),
            }),
            EntityKind::Coin => Some(EntityAnim::Coin(CoinWobble::new(rng))),
            EntityKind::Platform => None,
        }
    }

    fn tick(&mut self, rng: &mut fastrand::Rng) {
        match self {
            EntityAnim::Player { squash, breath } => {
                squash.tick();
                breath.tick();
            },
            EntityAnim::Enemy { breath, blink } => {
                breath.tick();
                blink.tick(rng);
            },
            EntityAnim::Coin(wobble) => wobble.tick(),
        }
    }
}

/// Renderer-owned side table of animation state, keyed by entity id.
pub struct AnimationTable {
    entries: HashMap<EntityId, EntityAnim>,
    rng: fastrand::Rng,
}

impl AnimationTable {
    pub fn new() -> Self {
        Self::with_rng(fastrand::Rng::new())
    }

    /// Deterministic cosmetic randomness.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(fastrand::Rng::with_seed(seed))
    }

    fn with_rng(rng: fastrand::Rng) -> Self {
        Self {
            entries: HashMap::new(),
            rng,
        }
    }

    pub fn get(&self, id: &EntityId) -> Option<&EntityAnim> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advance one rendered frame: create entries for new entities, drop
    /// entries for entities no longer drawn, apply event-driven juice, then
    /// tick every entry.
    pub fn tick(&mut self, snapshot: &RenderSnapshot, events: &[SimEvent]) {
        let mut live = HashSet::new();
        for (id, entity) in snapshot.entities() {
            let kind = entity.kind();
            if !self.entries.contains_key(&id)
                && let Some(anim) = EntityAnim::for_kind(kind, &mut self.rng)
            {
                self.entries.insert(id, anim);
            }
            live.insert(id);
        }
        self.entries.retain(|id, _| live.contains(id));

        if let Some(EntityAnim::Player { squash, .. }) = self.entries.get_mut(&EntityId::PLAYER) {
            for event in events {
                match event {
                    SimEvent::Jumped => squash.on_jump(),
                    SimEvent::Landed => squash.on_land(),
                    SimEvent::Respawned { .. } => squash.reset(),
                    _ => {},
                }
            }
        }

        for anim in self.entries.values_mut() {
            anim.tick(&mut self.rng);
        }
    }

    /// Player squash/stretch scale and breathing factor.
    pub fn player_scale(&self) -> (glam::Vec2, f32) {
        match self.entries.get(&EntityId::PLAYER) {
            Some(EntityAnim::Player { squash, breath }) => (squash.scale(), breath.scale()),
            _ => (glam::Vec2::ONE, 1.0),
        }
    }

    /// Enemy bob offset, breathing factor, and whether its eyes are open.
    pub fn enemy_pose(&self, index: usize) -> (f32, f32, bool) {
        match self.entries.get(&EntityId::new(EntityKind::Enemy, index)) {
            Some(EntityAnim::Enemy { breath, blink }) => {
                (breath.bob(), breath.scale(), blink.eyes_open)
            },
            _ => (0.0, 1.0, true),
        }
    }

    /// Coin vertical offset and scale.
    pub fn coin_pose(&self, index: usize) -> (f32, f32) {
        match self.entries.get(&EntityId::new(EntityKind::Coin, index)) {
            Some(EntityAnim::Coin(w)) => (w.offset(), w.scale()),
            _ => (0.0, 1.0),
        }
    }
}

impl Default for AnimationTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyhop_core::game_trait::Simulation;
    use skyhop_platformer::Session;

    fn snapshot() -> RenderSnapshot {
        Session::default().snapshot(false)
    }

    #[test]
    fn entries_created_for_animated_kinds_only() {
        let snap = snapshot();
        let mut table = AnimationTable::with_seed(3);
        table.tick(&snap, &[]);
        // 5 coins + 1 enemy + player; platforms have no animation.
        assert_eq!(table.len(), 7);
        assert!(
            table
                .get(&EntityId::new(EntityKind::Platform, 0))
                .is_none()
        );
    }

    #[test]
    fn collected_coin_entry_is_dropped() {
        let mut snap = snapshot();
        let mut table = AnimationTable::with_seed(3);
        table.tick(&snap, &[]);
        snap.coins[2].collected = true;
        table.tick(&snap, &[]);
        assert!(table.get(&EntityId::new(EntityKind::Coin, 2)).is_none());
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn jump_event_squashes_player() {
        let snap = snapshot();
        let mut table = AnimationTable::with_seed(3);
        table.tick(&snap, &[SimEvent::Jumped]);
        let (scale, _) = table.player_scale();
        assert!(scale.x > 1.0 && scale.y < 1.0);
    }

    #[test]
    fn landing_stretches_player() {
        let snap = snapshot();
        let mut table = AnimationTable::with_seed(3);
        table.tick(&snap, &[SimEvent::Landed]);
        let (scale, _) = table.player_scale();
        assert!(scale.x < 1.0 && scale.y > 1.0);
    }

    #[test]
    fn same_seed_same_cosmetics() {
        let snap = snapshot();
        let mut a = AnimationTable::with_seed(42);
        let mut b = AnimationTable::with_seed(42);
        for _ in 0..30 {
            a.tick(&snap, &[]);
            b.tick(&snap, &[]);
        }
        for i in 0..5 {
            assert_eq!(a.coin_pose(i), b.coin_pose(i));
        }
        assert_eq!(a.enemy_pose(0), b.enemy_pose(0));
    }

    #[test]
    fn unknown_entity_has_neutral_pose() {
        let table = AnimationTable::with_seed(0);
        assert_eq!(table.coin_pose(99), (0.0, 1.0));
        assert_eq!(table.enemy_pose(99), (0.0, 1.0, true));
        assert_eq!(table.player_scale(), (glam::Vec2::ONE, 1.0));
    }
}

use std::collections::HashMap;

/// Bitmap assets the renderer can use when available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    Coin,
    Cloud,
}

impl SpriteKey {
    pub const ALL: [SpriteKey; 2] = [SpriteKey::Coin, SpriteKey::Cloud];
}

/// Load state of one sprite. The host flips it once decoding finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpriteSlot {
    #[default]
    Pending,
    Ready,
    Failed,
}

/// Readiness flags for every sprite, polled at draw time. Drawing never waits
/// on a slot; pending or failed sprites fall back to procedural shapes.
#[derive(Debug, Clone)]
pub struct SpriteSlots {
    slots: HashMap<SpriteKey, SpriteSlot>,
}

impl SpriteSlots {
    /// All sprites pending.
    pub fn new() -> Self {
        Self {
            slots: SpriteKey::ALL
                .iter()
                .map(|&k| (k, SpriteSlot::Pending))
                .collect(),
        }
    }

    pub fn get(&self, key: SpriteKey) -> SpriteSlot {
        self.slots.get(&key).copied().unwrap_or_default()
    }

    pub fn is_ready(&self, key: SpriteKey) -> bool {
        self.get(key) == SpriteSlot::Ready
    }

    pub fn mark_ready(&mut self, key: SpriteKey) {
        tracing::debug!(?key, "sprite ready");
        self.slots.insert(key, SpriteSlot::Ready);
    }

    /// A failed sprite stays on its fallback for the rest of the session.
    pub fn mark_failed(&mut self, key: SpriteKey, reason: &str) {
        tracing::warn!(?key, reason, "sprite failed to load, using fallback");
        self.slots.insert(key, SpriteSlot::Failed);
    }

    /// No slot is still pending.
    pub fn all_settled(&self) -> bool {
        SpriteKey::ALL
            .iter()
            .all(|&k| self.get(k) != SpriteSlot::Pending)
    }
}

impl Default for SpriteSlots {
    fn default() -> Self {
        Self::new()
    }
}

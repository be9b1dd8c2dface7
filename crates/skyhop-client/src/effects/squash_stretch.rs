use glam::Vec2;

/// Fraction of the remaining distance to rest scale recovered per frame.
const RECOVERY: f32 = 0.1;

/// Player squash/stretch: wide and flat on take-off, tall and thin on landing,
/// easing back to 1 every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquashStretch {
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Default for SquashStretch {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl SquashStretch {
    pub fn on_jump(&mut self) {
        self.scale_x = 1.2;
        self.scale_y = 0.8;
    }

    pub fn on_land(&mut self) {
        self.scale_x = 0.8;
        self.scale_y = 1.2;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn tick(&mut self) {
        self.scale_x += (1.0 - self.scale_x) * RECOVERY;
        self.scale_y += (1.0 - self.scale_y) * RECOVERY;
    }

    pub fn scale(&self) -> Vec2 {
        Vec2::new(self.scale_x, self.scale_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_squashes_and_land_stretches() {
        let mut ss = SquashStretch::default();
        ss.on_jump();
        assert!(ss.scale_x > 1.0 && ss.scale_y < 1.0);
        ss.on_land();
        assert!(ss.scale_x < 1.0 && ss.scale_y > 1.0);
    }

    #[test]
    fn eases_back_to_rest() {
        let mut ss = SquashStretch::default();
        ss.on_jump();
        let first = ss.scale_x;
        ss.tick();
        assert!((ss.scale_x - (first + (1.0 - first) * 0.1)).abs() < 1e-6);
        for _ in 0..200 {
            ss.tick();
        }
        assert!((ss.scale_x - 1.0).abs() < 1e-3);
        assert!((ss.scale_y - 1.0).abs() < 1e-3);
    }

    #[test]
    fn reset_restores_unit_scale() {
        let mut ss = SquashStretch::default();
        ss.on_land();
        ss.reset();
        assert_eq!(ss.scale(), Vec2::ONE);
    }
}

//! Background layers that scroll slower than the world.

use glam::Vec2;

/// Hills scroll at this fraction of the camera speed.
pub const HILL_FACTOR: f32 = 0.3;
/// Clouds scroll at this fraction of the camera speed.
pub const CLOUD_FACTOR: f32 = 0.5;
/// Hill drift per frame in px.
const HILL_DRIFT: f32 = -0.2;
pub const CLOUD_SIZE: Vec2 = Vec2::new(80.0, 50.0);

/// A cloud drifting right and wrapping around the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
}

/// State of the hill and cloud layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Parallax {
    pub hill_offset: f32,
    pub clouds: Vec<Cloud>,
    /// Width the layers wrap around, normally the viewport width.
    pub wrap_width: f32,
}

impl Parallax {
    pub fn new(wrap_width: f32) -> Self {
        Self {
            hill_offset: 0.0,
            clouds: vec![
                Cloud {
                    x: 200.0,
                    y: 120.0,
                    speed: 0.3,
                },
                Cloud {
                    x: 800.0,
                    y: 80.0,
                    speed: 0.2,
                },
                Cloud {
                    x: 400.0,
                    y: 160.0,
                    speed: 0.25,
                },
            ],
            wrap_width,
        }
    }

    pub fn tick(&mut self) {
        self.hill_offset = (self.hill_offset + HILL_DRIFT) % self.wrap_width;
        for cloud in &mut self.clouds {
            cloud.x += cloud.speed;
            if cloud.x > self.wrap_width + 50.0 {
                cloud.x = -100.0;
            }
        }
    }

    /// Screen-space shift of a layer with the given factor.
    pub fn layer_shift(camera: Vec2, factor: f32) -> Vec2 {
        -camera * factor
    }
}

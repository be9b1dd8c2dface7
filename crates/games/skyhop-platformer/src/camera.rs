use serde::{Deserialize, Serialize};

use skyhop_core::geometry::Rect;

use crate::config::CameraConfig;

/// Side-view follow camera. `(x, y)` is the world position of the viewport's
/// top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub smoothing: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub clamp_to_origin: bool,
}

impl Camera {
    pub fn new(cfg: &CameraConfig, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            smoothing: cfg.smoothing,
            viewport_width,
            viewport_height,
            clamp_to_origin: cfg.clamp_to_origin,
        }
    }

    /// Where the camera wants to be to center `focus`.
    pub fn target_for(&self, focus: &Rect) -> (f32, f32) {
        let (cx, cy) = focus.center();
        self.clamped(
            cx - self.viewport_width / 2.0,
            cy - self.viewport_height / 2.0,
        )
    }

    /// Move a fraction of the way toward centering `focus`.
    pub fn update(&mut self, focus: &Rect) {
        let (tx, ty) = self.target_for(focus);
        self.x += (tx - self.x) * self.smoothing;
        self.y += (ty - self.y) * self.smoothing;
        (self.x, self.y) = self.clamped(self.x, self.y);
    }

    /// Jump straight to the target (session start, restart).
    pub fn snap_to(&mut self, focus: &Rect) {
        (self.x, self.y) = self.target_for(focus);
    }

    /// World-space rectangle currently in view.
    pub fn view_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.viewport_width, self.viewport_height)
    }

    /// World to screen coordinates.
    pub fn to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (x - self.x, y - self.y)
    }

    fn clamped(&self, x: f32, y: f32) -> (f32, f32) {
        if self.clamp_to_origin {
            (x.max(0.0), y.max(0.0))
        } else {
            (x, y)
        }
    }
}

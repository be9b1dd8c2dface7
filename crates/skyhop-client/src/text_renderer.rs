use glam::Vec2;

use skyhop_core::game_trait::SimEvent;
use skyhop_platformer::snapshot::{EntityKind, RenderSnapshot};

use crate::config::TextSettings;
use crate::renderer::{Renderer, SceneRenderer};
use crate::scene::{Layer, RenderObject, Shape, TextAlign};

/// Rasterizes the scene list into a fixed grid of ASCII cells. Used by the
/// headless binary and by tests that want to eyeball a frame.
pub struct TextRenderer {
    inner: SceneRenderer,
    cols: usize,
    rows: usize,
    frame: String,
}

impl TextRenderer {
    pub fn new(inner: SceneRenderer, settings: &TextSettings) -> Self {
        Self {
            inner,
            cols: settings.cols.max(1),
            rows: settings.rows.max(1),
            frame: String::new(),
        }
    }

    /// The most recent frame, `rows` lines of `cols` characters.
    pub fn last_frame(&self) -> &str {
        &self.frame
    }

    pub fn scene_renderer(&self) -> &SceneRenderer {
        &self.inner
    }

    pub fn scene_renderer_mut(&mut self) -> &mut SceneRenderer {
        &mut self.inner
    }

    fn rasterize(&mut self, viewport: Vec2) {
        let cell = Vec2::new(viewport.x / self.cols as f32, viewport.y / self.rows as f32);
        let mut grid = vec![vec![' '; self.cols]; self.rows];

        for obj in self.inner.scene().visible_objects() {
            match &obj.shape {
                Shape::Text { text, align, .. } => {
                    self.put_text(&mut grid, cell, obj, text, *align);
                },
                _ => {
                    if let Some(glyph) = glyph_for(obj) {
                        self.fill(&mut grid, cell, obj, glyph);
                    }
                },
            }
        }

        self.frame = grid
            .into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
    }

    fn fill(&self, grid: &mut [Vec<char>], cell: Vec2, obj: &RenderObject, glyph: char) {
        let size = obj.shape.size();
        let (min, max) = obj.transform.bounds(size);
        let Some((c0, c1)) = cell_span(min.x, max.x, cell.x, self.cols) else {
            return;
        };
        let Some((r0, r1)) = cell_span(min.y, max.y, cell.y, self.rows) else {
            return;
        };
        let center = obj.transform.translation;
        let half = (max - min) / 2.0;
        for (r, row) in grid.iter_mut().enumerate().take(r1).skip(r0) {
            for (c, slot) in row.iter_mut().enumerate().take(c1).skip(c0) {
                // Background mounds keep their rounded outline.
                if obj.layer == Layer::Hills {
                    let p = (Vec2::new(c as f32 + 0.5, r as f32 + 0.5) * cell - center) / half;
                    if p.length_squared() > 1.0 {
                        continue;
                    }
                }
                *slot = glyph;
            }
        }
    }

    fn put_text(
        &self,
        grid: &mut [Vec<char>],
        cell: Vec2,
        obj: &RenderObject,
        text: &str,
        align: TextAlign,
    ) {
        let pos = obj.transform.translation / cell;
        if pos.y < 0.0 || pos.y >= self.rows as f32 {
            return;
        }
        let row = pos.y as usize;
        let len = text.chars().count() as f32;
        let start = match align {
            TextAlign::Left => pos.x,
            TextAlign::Center => pos.x - len / 2.0,
            TextAlign::Right => pos.x - len,
        }
        .round() as i64;
        for (i, ch) in text.chars().enumerate() {
            let col = start + i as i64;
            if col >= 0 && (col as usize) < self.cols {
                grid[row][col as usize] = ch;
            }
        }
    }
}

impl Renderer for TextRenderer {
    type Snapshot = RenderSnapshot;

    fn render(&mut self, snapshot: &RenderSnapshot, events: &[SimEvent]) {
        self.inner.render(snapshot, events);
        let viewport = Vec2::new(
            snapshot.camera.viewport_width,
            snapshot.camera.viewport_height,
        );
        self.rasterize(viewport);
    }
}

fn glyph_for(obj: &RenderObject) -> Option<char> {
    match obj.tag {
        Some(EntityKind::Platform) => Some('#'),
        Some(EntityKind::Coin) => Some('o'),
        Some(EntityKind::Enemy) => Some('E'),
        Some(EntityKind::Player) => Some('@'),
        None => match obj.layer {
            Layer::Hills => Some('.'),
            Layer::Clouds => Some('~'),
            _ => None,
        },
    }
}

/// Half-open range of cells covered by `[min, max)` along one axis.
fn cell_span(min: f32, max: f32, cell: f32, count: usize) -> Option<(usize, usize)> {
    if cell.is_nan() || cell <= 0.0 || max <= 0.0 || min >= cell * count as f32 {
        return None;
    }
    let first = (min / cell).floor().max(0.0) as usize;
    let last = ((max / cell).ceil() as usize).min(count);
    (first < last).then_some((first, last))
}

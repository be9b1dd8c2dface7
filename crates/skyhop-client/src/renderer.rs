use std::collections::HashMap;

use glam::{Vec2, Vec4};

use skyhop_core::game_trait::SimEvent;
use skyhop_core::geometry::Rect;
use skyhop_platformer::camera::Camera;
use skyhop_platformer::snapshot::{EntityId, EntityKind, EntityRef, RenderSnapshot};

use crate::effects::AnimationTable;
use crate::effects::parallax::{CLOUD_FACTOR, CLOUD_SIZE, HILL_FACTOR, Parallax};
use crate::resources::{SpriteKey, SpriteSlots};
use crate::scene::{Fill, Layer, Scene, Shape, TextAlign, Transform2};
use crate::theme::{Theme, rgba};

/// Consumes one read-only snapshot per frame.
pub trait Renderer {
    type Snapshot;

    /// Draw the latest state. `events` are the gameplay events of the steps
    /// run since the previous render.
    fn render(&mut self, snapshot: &Self::Snapshot, events: &[SimEvent]);
}

/// Everything a draw routine may read while emitting objects.
pub struct DrawContext<'a> {
    pub scene: &'a mut Scene,
    pub theme: &'a Theme,
    pub anim: &'a AnimationTable,
    pub sprites: &'a SpriteSlots,
    pub camera: &'a Camera,
    pub safe_mode: bool,
}

impl DrawContext<'_> {
    /// Screen-space center of a world rectangle.
    fn screen_center(&self, rect: &Rect) -> Vec2 {
        let (cx, cy) = rect.center();
        let (sx, sy) = self.camera.to_screen(cx, cy);
        Vec2::new(sx, sy)
    }
}

/// Draw routine for one entity kind.
pub type DrawFn = fn(&mut DrawContext<'_>, EntityId, EntityRef<'_>);

/// Extra margin around the view inside which entities are still drawn.
const CULL_MARGIN: f32 = 64.0;
const EYE_SIZE: f32 = 6.0;

/// Builds a backend-agnostic [`Scene`] from each snapshot: sky, parallax
/// layers, world entities through a kind-to-routine table, then the HUD.
pub struct SceneRenderer {
    scene: Scene,
    theme: Theme,
    anim: AnimationTable,
    parallax: Parallax,
    sprites: SpriteSlots,
    routines: HashMap<EntityKind, DrawFn>,
    frames: u64,
}

impl SceneRenderer {
    pub fn new(theme: Theme, anim: AnimationTable, viewport_width: f32) -> Self {
        let mut routines: HashMap<EntityKind, DrawFn> = HashMap::new();
        routines.insert(EntityKind::Platform, draw_platform);
        routines.insert(EntityKind::Coin, draw_coin);
        routines.insert(EntityKind::Enemy, draw_enemy);
        routines.insert(EntityKind::Player, draw_player);
        Self {
            scene: Scene::new(),
            theme,
            anim,
            parallax: Parallax::new(viewport_width),
            sprites: SpriteSlots::new(),
            routines,
            frames: 0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn sprites_mut(&mut self) -> &mut SpriteSlots {
        &mut self.sprites
    }

    pub fn animations(&self) -> &AnimationTable {
        &self.anim
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// The draw routine registered for `kind`.
    pub fn draw_routine(&self, kind: EntityKind) -> Option<DrawFn> {
        self.routines.get(&kind).copied()
    }

    fn draw_sky(&mut self, viewport: Vec2) {
        let sky = &self.theme.sky;
        self.scene.add(
            Layer::Sky,
            Shape::Rect { size: viewport },
            Fill::VerticalGradient {
                top: rgba(&sky.top),
                bottom: rgba(&sky.bottom),
            },
            Transform2::from_xy(viewport.x / 2.0, viewport.y / 2.0),
        );
    }

    fn draw_parallax(&mut self, camera: &Camera, viewport: Vec2, safe_mode: bool) {
        let cam = Vec2::new(camera.x, camera.y);

        let hill_color = Fill::Solid(rgba(&self.theme.background.hills));
        let shift = Parallax::layer_shift(cam, HILL_FACTOR);
        let width = self.parallax.wrap_width;
        // Two mounds per repetition, repeated until the band covers the view.
        let mut x = (self.parallax.hill_offset + shift.x).rem_euclid(width) - width;
        while x < viewport.x {
            for (dx, size) in [
                (100.0, Vec2::new(600.0, 400.0)),
                (900.0, Vec2::new(600.0, 300.0)),
            ] {
                self.scene.add(
                    Layer::Hills,
                    Shape::Ellipse { size },
                    hill_color,
                    Transform2::from_xy(x + dx, viewport.y + shift.y),
                );
            }
            x += width;
        }

        let shift = Parallax::layer_shift(cam, CLOUD_FACTOR);
        let cloud_color = Fill::Solid(rgba(&self.theme.background.clouds));
        let use_sprite = !safe_mode && self.sprites.is_ready(SpriteKey::Cloud);
        for cloud in &self.parallax.clouds {
            let center = Vec2::new(cloud.x, cloud.y) + CLOUD_SIZE / 2.0 + shift;
            let shape = if use_sprite {
                Shape::Sprite {
                    key: SpriteKey::Cloud,
                    size: CLOUD_SIZE,
                }
            } else {
                Shape::Ellipse { size: CLOUD_SIZE }
            };
            self.scene.add(
                Layer::Clouds,
                shape,
                cloud_color,
                Transform2::from_xy(center.x, center.y),
            );
        }
    }

    fn draw_world(&mut self, snapshot: &RenderSnapshot) {
        let view = snapshot.camera.view_rect();
        let view = Rect::new(
            view.x - CULL_MARGIN,
            view.y - CULL_MARGIN,
            view.width + 2.0 * CULL_MARGIN,
            view.height + 2.0 * CULL_MARGIN,
        );
        let mut ctx = DrawContext {
            scene: &mut self.scene,
            theme: &self.theme,
            anim: &self.anim,
            sprites: &self.sprites,
            camera: &snapshot.camera,
            safe_mode: snapshot.safe_mode,
        };
        for (id, entity) in snapshot.entities() {
            if id.kind != EntityKind::Player && !entity.rect().intersects(&view) {
                continue;
            }
            match self.routines.get(&id.kind) {
                Some(draw) => draw(&mut ctx, id, entity),
                None => tracing::trace!(kind = ?id.kind, "no draw routine"),
            }
        }
    }

    fn draw_hud(&mut self, snapshot: &RenderSnapshot, viewport: Vec2) {
        let hud = &self.theme.hud;
        let color = Fill::Solid(rgba(&hud.text));
        let px = hud.font_px;
        let lines = [
            (snapshot.coin_text(), TextAlign::Left, Vec2::new(20.0, 30.0)),
            (hud.controls_hint.clone(), TextAlign::Left, Vec2::new(20.0, 60.0)),
            (
                format!("v{}", env!("CARGO_PKG_VERSION")),
                TextAlign::Right,
                Vec2::new(viewport.x - 20.0, 30.0),
            ),
        ];
        for (text, align, at) in lines {
            self.scene.add(
                Layer::Hud,
                Shape::Text { text, align, px },
                color,
                Transform2::from_xy(at.x, at.y),
            );
        }
        if snapshot.won {
            self.scene.add(
                Layer::Hud,
                Shape::Text {
                    text: "You win!".to_string(),
                    align: TextAlign::Center,
                    px,
                },
                color,
                Transform2::from_xy(viewport.x / 2.0, viewport.y / 2.0),
            );
        }
    }
}

impl Renderer for SceneRenderer {
    type Snapshot = RenderSnapshot;

    fn render(&mut self, snapshot: &RenderSnapshot, events: &[SimEvent]) {
        self.anim.tick(snapshot, events);
        self.parallax.tick();

        let viewport = Vec2::new(
            snapshot.camera.viewport_width,
            snapshot.camera.viewport_height,
        );
        self.scene.clear();
        self.draw_sky(viewport);
        self.draw_parallax(&snapshot.camera, viewport, snapshot.safe_mode);
        self.draw_world(snapshot);
        self.draw_hud(snapshot, viewport);
        self.frames += 1;
    }
}

// ================================================================
// Draw routines
// ================================================================

fn draw_platform(ctx: &mut DrawContext<'_>, _id: EntityId, entity: EntityRef<'_>) {
    let EntityRef::Platform(rect) = entity else {
        return;
    };
    let theme = &ctx.theme.platform;
    let (left, top) = ctx.camera.to_screen(rect.x, rect.y);
    let grass_h = theme.grass_height.min(rect.height);
    let grass = Fill::VerticalGradient {
        top: rgba(&theme.grass_top),
        bottom: rgba(&theme.grass_bottom),
    };

    if ctx.safe_mode {
        let body = Vec2::new(rect.width, rect.height - grass_h);
        ctx.scene.add_tagged(
            EntityKind::Platform,
            Shape::Rect { size: body },
            Fill::Solid(rgba(&theme.body_flat)),
            Transform2::from_xy(left + body.x / 2.0, top + grass_h + body.y / 2.0),
        );
        ctx.scene.add_tagged(
            EntityKind::Platform,
            Shape::Rect {
                size: Vec2::new(rect.width, grass_h),
            },
            Fill::Solid(rgba(&theme.grass_top)),
            Transform2::from_xy(left + rect.width / 2.0, top + grass_h / 2.0),
        );
        return;
    }

    let body_fill = Fill::VerticalGradient {
        top: rgba(&theme.body_top),
        bottom: rgba(&theme.body_bottom),
    };
    let tile_w = theme.tile_width.max(1.0);
    let mut offset = 0.0;
    while offset < rect.width {
        let w = tile_w.min(rect.width - offset);
        let x = left + offset + w / 2.0;
        let body_h = rect.height - grass_h;
        ctx.scene.add_tagged(
            EntityKind::Platform,
            Shape::Rect {
                size: Vec2::new(w, body_h),
            },
            body_fill,
            Transform2::from_xy(x, top + grass_h + body_h / 2.0),
        );
        ctx.scene.add_tagged(
            EntityKind::Platform,
            Shape::Rect {
                size: Vec2::new(w, grass_h),
            },
            grass,
            Transform2::from_xy(x, top + grass_h / 2.0),
        );
        offset += tile_w;
    }
}

fn draw_coin(ctx: &mut DrawContext<'_>, id: EntityId, entity: EntityRef<'_>) {
    let EntityRef::Coin(coin) = entity else {
        return;
    };
    let (wobble, scale) = ctx.anim.coin_pose(id.index);
    let center = ctx.screen_center(&coin.rect) + Vec2::new(0.0, wobble);
    let size = Vec2::new(coin.rect.width, coin.rect.height);
    let shape = if !ctx.safe_mode && ctx.sprites.is_ready(SpriteKey::Coin) {
        Shape::Sprite {
            key: SpriteKey::Coin,
            size,
        }
    } else {
        Shape::Ellipse { size }
    };
    ctx.scene.add_tagged(
        EntityKind::Coin,
        shape,
        Fill::Solid(rgba(&ctx.theme.coin.fill)),
        Transform2::from_xy(center.x, center.y).with_scale(Vec2::splat(scale)),
    );
}

fn draw_enemy(ctx: &mut DrawContext<'_>, id: EntityId, entity: EntityRef<'_>) {
    let EntityRef::Enemy(enemy) = entity else {
        return;
    };
    let (bob, breath, eyes_open) = ctx.anim.enemy_pose(id.index);
    let facing = if enemy.vx > 0.0 { 1.0 } else { -1.0 };
    let center = ctx.screen_center(&enemy.rect) + Vec2::new(0.0, bob);
    let scale = Vec2::new(facing * breath, breath);
    let theme = &ctx.theme.enemy;
    let body = Fill::Solid(rgba(&theme.body));
    draw_actor_body(
        ctx.scene,
        EntityKind::Enemy,
        &enemy.rect,
        center,
        scale,
        body,
        theme.corner_radius,
    );

    // Blinking is cosmetic; safe mode keeps the eyes open.
    let eye_h = if ctx.safe_mode || eyes_open {
        EYE_SIZE
    } else {
        2.0
    };
    let eye_y = -enemy.rect.height * 0.1 + EYE_SIZE - eye_h / 2.0;
    let eyes = rgba(&theme.eyes);
    draw_eyes(ctx.scene, &enemy.rect, center, scale, 0.0, eye_y, eye_h, eyes);
}

fn draw_player(ctx: &mut DrawContext<'_>, _id: EntityId, entity: EntityRef<'_>) {
    let EntityRef::Player(player) = entity else {
        return;
    };
    let (squash, breath) = ctx.anim.player_scale();
    let facing = f32::from(player.facing);
    let center = ctx.screen_center(&player.rect);
    let scale = Vec2::new(facing * squash.x * breath, squash.y * breath);
    let theme = &ctx.theme.player;
    let body = Fill::Solid(rgba(&theme.body));
    draw_actor_body(
        ctx.scene,
        EntityKind::Player,
        &player.rect,
        center,
        scale,
        body,
        theme.corner_radius,
    );

    let eye_y = -player.rect.height * 0.1 + EYE_SIZE / 2.0;
    let eyes = rgba(&theme.eyes);
    draw_eyes(ctx.scene, &player.rect, center, scale, 4.0, eye_y, EYE_SIZE, eyes);
}

fn draw_actor_body(
    scene: &mut Scene,
    kind: EntityKind,
    rect: &Rect,
    center: Vec2,
    scale: Vec2,
    fill: Fill,
    radius: f32,
) {
    scene.add_tagged(
        kind,
        Shape::RoundRect {
            size: Vec2::new(rect.width, rect.height),
            radius,
        },
        fill,
        Transform2::from_xy(center.x, center.y).with_scale(scale),
    );
}

/// Two eyes in body-local coordinates, mirrored with the body.
#[allow(clippy::too_many_arguments)]
fn draw_eyes(
    scene: &mut Scene,
    rect: &Rect,
    center: Vec2,
    scale: Vec2,
    look_offset: f32,
    eye_y: f32,
    eye_h: f32,
    color: Vec4,
) {
    let facing = scale.x.signum();
    let shift = facing * look_offset;
    for local_x in [
        -rect.width * 0.15 + EYE_SIZE / 2.0,
        rect.width * 0.15 - EYE_SIZE / 2.0,
    ] {
        let local = Vec2::new(local_x + shift, eye_y);
        let pos = center + local * scale.abs();
        scene.add(
            Layer::World,
            Shape::Rect {
                size: Vec2::new(EYE_SIZE, eye_h),
            },
            Fill::Solid(color),
            Transform2::from_xy(pos.x, pos.y),
        );
    }
}

use glam::{Vec2, Vec4};

use skyhop_platformer::snapshot::EntityKind;

use crate::resources::SpriteKey;

/// Unique identifier for a render object.
pub type ObjectId = u32;

/// Screen-space placement. `translation` is the center of the shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2 {
    pub translation: Vec2,
    /// Negative x mirrors the shape horizontally.
    pub scale: Vec2,
}

impl Default for Transform2 {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            scale: Vec2::ONE,
        }
    }
}

impl Transform2 {
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self {
            translation: Vec2::new(x, y),
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Axis-aligned bounds `(min, max)` of a shape of `size` under this transform.
    pub fn bounds(&self, size: Vec2) -> (Vec2, Vec2) {
        let half = size * self.scale.abs() * 0.5;
        (self.translation - half, self.translation + half)
    }
}

/// Draw layers, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Sky,
    Hills,
    Clouds,
    World,
    Hud,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Shape primitives a backend must be able to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect { size: Vec2 },
    RoundRect { size: Vec2, radius: f32 },
    Ellipse { size: Vec2 },
    Sprite { key: SpriteKey, size: Vec2 },
    Text { text: String, align: TextAlign, px: f32 },
}

impl Shape {
    /// Unscaled extent. Text reports its height only.
    pub fn size(&self) -> Vec2 {
        match self {
            Shape::Rect { size }
            | Shape::RoundRect { size, .. }
            | Shape::Ellipse { size }
            | Shape::Sprite { size, .. } => *size,
            Shape::Text { px, .. } => Vec2::new(0.0, *px),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Vec4),
    VerticalGradient { top: Vec4, bottom: Vec4 },
}

/// A drawable object in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderObject {
    pub id: ObjectId,
    pub layer: Layer,
    pub shape: Shape,
    pub fill: Fill,
    pub transform: Transform2,
    /// Gameplay entity this object belongs to, if any.
    pub tag: Option<EntityKind>,
    pub visible: bool,
}

/// Flat draw list, rebuilt every frame in back-to-front order.
pub struct Scene {
    objects: Vec<RenderObject>,
    next_id: ObjectId,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::with_capacity(256),
            next_id: 1,
        }
    }

    /// Add an object to the scene, returning its ID.
    pub fn add(
        &mut self,
        layer: Layer,
        shape: Shape,
        fill: Fill,
        transform: Transform2,
    ) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        self.objects.push(RenderObject {
            id,
            layer,
            shape,
            fill,
            transform,
            tag: None,
            visible: true,
        });
        id
    }

    /// Add an object that belongs to a gameplay entity.
    pub fn add_tagged(
        &mut self,
        kind: EntityKind,
        shape: Shape,
        fill: Fill,
        transform: Transform2,
    ) -> ObjectId {
        let id = self.add(Layer::World, shape, fill, transform);
        if let Some(obj) = self.get_mut(id) {
            obj.tag = Some(kind);
        }
        id
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut RenderObject> {
        self.objects.iter_mut().rev().find(|o| o.id == id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&RenderObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn remove(&mut self, id: ObjectId) {
        self.objects.retain(|o| o.id != id);
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.next_id = 1;
    }

    /// Visible objects in draw order.
    pub fn visible_objects(&self) -> impl Iterator<Item = &RenderObject> {
        self.objects.iter().filter(|o| o.visible)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn count_on(&self, layer: Layer) -> usize {
        self.objects.iter().filter(|o| o.layer == layer).count()
    }

    pub fn count_tagged(&self, kind: EntityKind) -> usize {
        self.objects.iter().filter(|o| o.tag == Some(kind)).count()
    }

    /// All text strings on the HUD layer, in draw order.
    pub fn hud_text(&self) -> Vec<&str> {
        self.objects
            .iter()
            .filter(|o| o.layer == Layer::Hud)
            .filter_map(|o| match &o.shape {
                Shape::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Fill {
        Fill::Solid(Vec4::new(1.0, 0.0, 0.0, 1.0))
    }

    fn square() -> Shape {
        Shape::Rect {
            size: Vec2::splat(10.0),
        }
    }

    #[test]
    fn scene_add_and_get() {
        let mut scene = Scene::new();
        let id = scene.add(Layer::World, square(), red(), Transform2::from_xy(1.0, 2.0));
        assert!(scene.get(id).is_some());
        assert_eq!(scene.object_count(), 1);
    }

    #[test]
    fn scene_remove() {
        let mut scene = Scene::new();
        let id = scene.add(Layer::World, square(), red(), Transform2::default());
        scene.remove(id);
        assert!(scene.get(id).is_none());
        assert_eq!(scene.object_count(), 0);
    }

    #[test]
    fn scene_clear_resets_ids() {
        let mut scene = Scene::new();
        for _ in 0..10 {
            scene.add(Layer::World, square(), red(), Transform2::default());
        }
        assert_eq!(scene.object_count(), 10);
        scene.clear();
        assert_eq!(scene.object_count(), 0);
        assert_eq!(scene.add(Layer::Sky, square(), red(), Transform2::default()), 1);
    }

    #[test]
    fn scene_visible_objects_filters() {
        let mut scene = Scene::new();
        let id1 = scene.add(Layer::World, square(), red(), Transform2::default());
        let _id2 = scene.add(Layer::World, square(), red(), Transform2::default());
        scene.get_mut(id1).unwrap().visible = false;
        assert_eq!(scene.visible_objects().count(), 1);
    }

    #[test]
    fn tagged_objects_live_on_world_layer() {
        let mut scene = Scene::new();
        let id = scene.add_tagged(EntityKind::Coin, square(), red(), Transform2::default());
        let obj = scene.get(id).unwrap();
        assert_eq!(obj.layer, Layer::World);
        assert_eq!(obj.tag, Some(EntityKind::Coin));
        assert_eq!(scene.count_tagged(EntityKind::Coin), 1);
        assert_eq!(scene.count_on(Layer::World), 1);
    }

    #[test]
    fn bounds_ignore_mirroring() {
        let t = Transform2::from_xy(100.0, 50.0).with_scale(Vec2::new(-2.0, 1.0));
        let (min, max) = t.bounds(Vec2::new(10.0, 10.0));
        assert_eq!(min, Vec2::new(90.0, 45.0));
        assert_eq!(max, Vec2::new(110.0, 55.0));
    }

    #[test]
    fn hud_text_collects_strings() {
        let mut scene = Scene::new();
        scene.add(
            Layer::Hud,
            Shape::Text {
                text: "Coins: 0/5".to_string(),
                align: TextAlign::Left,
                px: 20.0,
            },
            red(),
            Transform2::from_xy(20.0, 30.0),
        );
        scene.add(Layer::World, square(), red(), Transform2::default());
        assert_eq!(scene.hud_text(), vec!["Coins: 0/5"]);
    }
}

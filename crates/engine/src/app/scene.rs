use std::ops::{Add, AddAssign, Mul, Sub};

use super::input::{ActionStates, InputAction};
use super::rendering::RenderFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(quit_requested: bool, actions: ActionStates) -> Self {
        Self {
            quit_requested,
            actions,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).length()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned box in world units. Touching edges do not count as overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Shrinks every edge by `amount`. Returns `None` when nothing is left.
    pub fn inset(&self, amount: Vec2) -> Option<Aabb> {
        let inset = Aabb {
            min: self.min + amount,
            max: self.max - amount,
        };
        (inset.min.x <= inset.max.x && inset.min.y <= inset.max.y).then_some(inset)
    }
}

/// Bottom-left corner of the window in world space. World y points up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
}

impl Camera2D {
    pub fn scrolled_to(scroll_y: f32) -> Self {
        Self {
            position: Vec2::new(0.0, scroll_y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(pub u64);

#[derive(Debug, Default)]
pub struct SpriteIdAllocator {
    next: u64,
}

impl SpriteIdAllocator {
    pub fn allocate(&mut self) -> SpriteId {
        let id = SpriteId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderableKind {
    Hidden,
    Placeholder([u8; 4]),
    Texture {
        key: &'static str,
        fallback: [u8; 4],
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub id: SpriteId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub half_extents: Vec2,
    pub angle_degrees: f32,
    pub renderable: RenderableKind,
}

impl Sprite {
    pub fn new(id: SpriteId, half_extents: Vec2, renderable: RenderableKind) -> Self {
        Self {
            id,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            half_extents,
            angle_degrees: 0.0,
            renderable,
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::from_center(self.position, self.half_extents)
    }

    /// Swaps the texture while keeping the placeholder color.
    pub fn assign_texture(&mut self, key: &'static str) {
        self.renderable = match self.renderable {
            RenderableKind::Texture { fallback, .. } | RenderableKind::Placeholder(fallback) => {
                RenderableKind::Texture { key, fallback }
            }
            RenderableKind::Hidden => RenderableKind::Texture {
                key,
                fallback: [255, 255, 255, 255],
            },
        };
    }

    pub fn texture_key(&self) -> Option<&'static str> {
        match self.renderable {
            RenderableKind::Texture { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// Sprites of one category. Removal is deferred to `apply_pending` so it can be
/// requested while iterating, and requesting it twice is harmless.
#[derive(Debug, Clone)]
pub struct SpriteList<T> {
    items: Vec<T>,
    pending_removals: Vec<SpriteId>,
}

impl<T> Default for SpriteList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pending_removals: Vec::new(),
        }
    }
}

impl<T: AsRef<Sprite>> SpriteList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Queues `id` for removal. Returns false when the sprite is absent or
    /// already queued.
    pub fn remove_later(&mut self, id: SpriteId) -> bool {
        if self.is_pending_removal(id) {
            return false;
        }
        if !self.items.iter().any(|item| item.as_ref().id == id) {
            return false;
        }
        self.pending_removals.push(id);
        true
    }

    pub fn is_pending_removal(&self, id: SpriteId) -> bool {
        self.pending_removals.contains(&id)
    }

    /// Live sprites: present and not queued for removal.
    pub fn live(&self) -> impl Iterator<Item = &T> + '_ {
        self.items
            .iter()
            .filter(|item| !self.pending_removals.contains(&item.as_ref().id))
    }

    pub fn apply_pending(&mut self) -> usize {
        if self.pending_removals.is_empty() {
            return 0;
        }
        self.pending_removals.sort();
        self.pending_removals.dedup();
        let before = self.items.len();
        let pending = &self.pending_removals;
        self.items
            .retain(|item| pending.binary_search(&item.as_ref().id).is_err());
        self.pending_removals.clear();
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.pending_removals.clear();
    }
}

impl AsRef<Sprite> for Sprite {
    fn as_ref(&self) -> &Sprite {
        self
    }
}

pub trait Scene {
    fn load(&mut self);
    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand;
    fn render(&mut self, frame: &mut RenderFrame);
    fn unload(&mut self);
    fn debug_title(&self) -> Option<String> {
        None
    }
    fn sprite_count(&self) -> usize {
        0
    }
}

use crate::app::{Camera2D, RenderableKind, Sprite, Vec2};

const DEFAULT_CLEAR_COLOR: [u8; 4] = [20, 22, 28, 255];

/// Rectangle in screen pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ScreenRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    pub renderable: RenderableKind,
    pub center: Vec2,
    pub half_extents: Vec2,
    pub angle_degrees: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayItem {
    FilledRect {
        rect: ScreenRect,
        color: [u8; 4],
    },
    RectOutline {
        rect: ScreenRect,
        color: [u8; 4],
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        color: [u8; 4],
        scale: i32,
    },
}

/// Display list filled by a scene each frame. World sprites are drawn first,
/// in push order, then the screen-space overlay.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    clear_color: [u8; 4],
    camera: Camera2D,
    sprites: Vec<SpriteDraw>,
    overlay: Vec<OverlayItem>,
}

impl Default for RenderFrame {
    fn default() -> Self {
        Self {
            clear_color: DEFAULT_CLEAR_COLOR,
            camera: Camera2D::default(),
            sprites: Vec::new(),
            overlay: Vec::new(),
        }
    }
}

impl RenderFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&mut self) {
        self.clear_color = DEFAULT_CLEAR_COLOR;
        self.camera = Camera2D::default();
        self.sprites.clear();
        self.overlay.clear();
    }

    pub fn set_clear_color(&mut self, color: [u8; 4]) {
        self.clear_color = color;
    }

    pub fn clear_color(&self) -> [u8; 4] {
        self.clear_color
    }

    pub fn set_camera(&mut self, camera: Camera2D) {
        self.camera = camera;
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn draw_sprite(&mut self, sprite: &Sprite) {
        if sprite.renderable == RenderableKind::Hidden {
            return;
        }
        self.sprites.push(SpriteDraw {
            renderable: sprite.renderable,
            center: sprite.position,
            half_extents: sprite.half_extents,
            angle_degrees: sprite.angle_degrees,
        });
    }

    pub fn draw_sprites<'a, T, I>(&mut self, sprites: I)
    where
        T: AsRef<Sprite> + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        for sprite in sprites {
            self.draw_sprite(sprite.as_ref());
        }
    }

    pub fn fill_rect(&mut self, rect: ScreenRect, color: [u8; 4]) {
        self.overlay.push(OverlayItem::FilledRect { rect, color });
    }

    pub fn outline_rect(&mut self, rect: ScreenRect, color: [u8; 4]) {
        self.overlay.push(OverlayItem::RectOutline { rect, color });
    }

    pub fn text(&mut self, x: i32, y: i32, text: impl Into<String>, color: [u8; 4], scale: i32) {
        self.overlay.push(OverlayItem::Text {
            x,
            y,
            text: text.into(),
            color,
            scale: scale.max(1),
        });
    }

    pub fn sprites(&self) -> &[SpriteDraw] {
        &self.sprites
    }

    pub fn overlay(&self) -> &[OverlayItem] {
        &self.overlay
    }
}

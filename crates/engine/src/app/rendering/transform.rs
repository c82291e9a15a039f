use crate::app::{Camera2D, Vec2};

/// Size of the pixel buffer the scene draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Screen space has its origin at the top-left and y pointing down; world
/// space has y pointing up with the camera at the bottom-left of the view.
pub fn world_to_screen(world: Vec2, camera: &Camera2D, viewport: Viewport) -> (f32, f32) {
    let x = world.x - camera.position.x;
    let y = viewport.height as f32 - (world.y - camera.position.y);
    (x, y)
}

pub fn world_to_screen_px(world: Vec2, camera: &Camera2D, viewport: Viewport) -> (i32, i32) {
    let (x, y) = world_to_screen(world, camera, viewport);
    (x.round() as i32, y.round() as i32)
}

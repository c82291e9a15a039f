mod collision;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod timer;

pub use collision::{
    collides, collides_with_any, collisions, kinematic_update, Collider, KinematicOutcome,
};
pub use input::InputAction;
pub use loop_runner::{run_app, run_app_with_metrics, AppError, LoopConfig};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use rendering::{
    glyph_advance, line_advance, text_width_px, world_to_screen, world_to_screen_px, wrap_text,
    OverlayItem, RenderFrame, Renderer, ScreenRect, SpriteDraw, Viewport,
};
pub use scene::{
    Aabb, Camera2D, InputSnapshot, RenderableKind, Scene, SceneCommand, Sprite, SpriteId,
    SpriteIdAllocator, SpriteList, Vec2,
};
pub use timer::{Schedule, TimerId};

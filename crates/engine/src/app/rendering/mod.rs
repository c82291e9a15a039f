mod frame;
mod raster;
mod renderer;
mod text;
mod transform;

pub use frame::{OverlayItem, RenderFrame, ScreenRect, SpriteDraw};
pub use renderer::Renderer;
pub use text::{glyph_advance, line_advance, text_width_px, wrap_text};
pub use transform::{world_to_screen, world_to_screen_px, Viewport};

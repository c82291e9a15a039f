use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageReader;
use pixels::{Error, Pixels, SurfaceTexture};
use tracing::warn;
use winit::window::Window;

use crate::app::RenderableKind;
use crate::texture_keys::validate_texture_key;

use super::frame::{OverlayItem, RenderFrame, SpriteDraw};
use super::raster::{
    draw_filled_rect, draw_rect_outline, draw_solid_quad, draw_textured_quad, fill_frame,
    LoadedTexture, ScreenQuad,
};
use super::text::draw_text_clipped;
use super::{world_to_screen, Viewport};

const VIEW_CULL_PADDING_PX: f32 = 16.0;

/// Draws a `RenderFrame` into a fixed-size pixel buffer that `pixels` scales
/// to the window surface.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    asset_root: PathBuf,
    texture_cache: HashMap<String, Option<LoadedTexture>>,
    warned_texture_keys: HashSet<String>,
}

impl Renderer {
    pub fn new(
        window: Arc<Window>,
        asset_root: PathBuf,
        viewport: Viewport,
    ) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), viewport, size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport,
            asset_root,
            texture_cache: HashMap::new(),
            warned_texture_keys: HashSet::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), self.viewport, width, height)?;
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        viewport: Viewport,
        surface_width: u32,
        surface_height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(surface_width, surface_height, window);
        Pixels::new(viewport.width, viewport.height, surface)
    }

    pub(crate) fn render_frame(&mut self, scene_frame: &RenderFrame) -> Result<(), Error> {
        let Viewport { width, height } = self.viewport;
        let frame = self.pixels.frame_mut();
        fill_frame(frame, scene_frame.clear_color());

        for draw in scene_frame.sprites() {
            let Some(quad) = screen_quad_for(draw, scene_frame, self.viewport) else {
                continue;
            };
            match draw.renderable {
                RenderableKind::Hidden => {}
                RenderableKind::Placeholder(color) => {
                    draw_solid_quad(frame, width, height, quad, color);
                }
                RenderableKind::Texture { key, fallback } => {
                    match resolve_cached_texture(
                        &mut self.texture_cache,
                        &mut self.warned_texture_keys,
                        &self.asset_root,
                        key,
                    ) {
                        Some(texture) => draw_textured_quad(frame, width, height, quad, texture),
                        None => draw_solid_quad(frame, width, height, quad, fallback),
                    }
                }
            }
        }

        for item in scene_frame.overlay() {
            match item {
                OverlayItem::FilledRect { rect, color } => draw_filled_rect(
                    frame,
                    width,
                    height,
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    *color,
                ),
                OverlayItem::RectOutline { rect, color } => draw_rect_outline(
                    frame,
                    width,
                    height,
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    *color,
                ),
                OverlayItem::Text {
                    x,
                    y,
                    text,
                    color,
                    scale,
                } => draw_text_clipped(frame, width, height, *x, *y, text, *color, *scale),
            }
        }

        self.pixels.render()
    }
}

/// Screen placement of a sprite, or `None` when it is entirely off view.
fn screen_quad_for(
    draw: &SpriteDraw,
    frame: &RenderFrame,
    viewport: Viewport,
) -> Option<ScreenQuad> {
    let (center_x, center_y) = world_to_screen(draw.center, frame.camera(), viewport);
    let reach = draw.half_extents.length() + VIEW_CULL_PADDING_PX;
    if center_x + reach < 0.0
        || center_y + reach < 0.0
        || center_x - reach > viewport.width as f32
        || center_y - reach > viewport.height as f32
    {
        return None;
    }
    Some(ScreenQuad {
        center_x,
        center_y,
        width: draw.half_extents.x * 2.0,
        height: draw.half_extents.y * 2.0,
        angle_degrees: draw.angle_degrees,
    })
}

fn resolve_cached_texture<'a>(
    cache: &'a mut HashMap<String, Option<LoadedTexture>>,
    warned_texture_keys: &mut HashSet<String>,
    asset_root: &Path,
    key: &str,
) -> Option<&'a LoadedTexture> {
    if !cache.contains_key(key) {
        let loaded = match resolve_texture_path(asset_root, key) {
            Ok(path) => match load_texture_rgba(&path) {
                Ok(texture) => Some(texture),
                Err(reason) => {
                    warn_texture_load_once(warned_texture_keys, key, Some(&path), &reason);
                    None
                }
            },
            Err(reason) => {
                warn_texture_load_once(warned_texture_keys, key, None, &reason);
                None
            }
        };
        cache.insert(key.to_string(), loaded);
    }
    cache.get(key).and_then(Option::as_ref)
}

fn resolve_texture_path(asset_root: &Path, key: &str) -> Result<PathBuf, String> {
    validate_texture_key(key).map_err(|error| format!("invalid_key:{error}"))?;
    Ok(asset_root.join("sprites").join(format!("{key}.png")))
}

fn load_texture_rgba(path: &Path) -> Result<LoadedTexture, String> {
    let reader = ImageReader::open(path).map_err(|error| format!("file_open_failed:{error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedTexture {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

fn warn_texture_load_once(
    warned_keys: &mut HashSet<String>,
    key: &str,
    resolved_path: Option<&Path>,
    reason: &str,
) {
    if !warned_keys.insert(key.to_string()) {
        return;
    }
    let path_display = resolved_path
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<unresolved>".to_string());
    warn!(
        texture_key = key,
        path = %path_display,
        reason = reason,
        "renderer_texture_load_failed_using_placeholder"
    );
}

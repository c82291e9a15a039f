pub(crate) struct LoadedTexture {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rgba: Vec<u8>,
}

/// Placement of a rotated quad on screen. `angle_degrees` is counter-clockwise
/// as seen on screen.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScreenQuad {
    pub(crate) center_x: f32,
    pub(crate) center_y: f32,
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) angle_degrees: f32,
}

pub(crate) fn write_pixel_rgba_clipped(
    frame: &mut [u8],
    width: usize,
    x: i32,
    y: i32,
    color: [u8; 4],
) {
    if x < 0 || y < 0 || x as usize >= width {
        return;
    }
    let x = x as usize;
    let y = y as usize;
    let Some(pixel_offset) = y.checked_mul(width).and_then(|row| row.checked_add(x)) else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }
    frame[byte_offset..end].copy_from_slice(&color);
}

pub(crate) fn fill_frame(frame: &mut [u8], color: [u8; 4]) {
    for pixel in frame.chunks_exact_mut(4) {
        pixel.copy_from_slice(&color);
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_filled_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    let start_x = x.max(0);
    let start_y = y.max(0);
    let end_x = x.saturating_add(rect_width).min(width as i32);
    let end_y = y.saturating_add(rect_height).min(height as i32);
    if end_x <= start_x || end_y <= start_y {
        return;
    }
    for py in start_y..end_y {
        for px in start_x..end_x {
            write_pixel_rgba_clipped(frame, width as usize, px, py, color);
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_rect_outline(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    if rect_width <= 1 || rect_height <= 1 {
        return;
    }
    let right = x + rect_width - 1;
    let bottom = y + rect_height - 1;
    draw_filled_rect(frame, width, height, x, y, rect_width, 1, color);
    draw_filled_rect(frame, width, height, x, bottom, rect_width, 1, color);
    draw_filled_rect(frame, width, height, x, y, 1, rect_height, color);
    draw_filled_rect(frame, width, height, right, y, 1, rect_height, color);
}

/// Inverse-maps every pixel in the quad's bounding square back into the
/// unrotated quad and asks `sample` for its color at normalized `(u, v)`.
fn raster_quad<F>(frame: &mut [u8], width: u32, height: u32, quad: ScreenQuad, mut sample: F)
where
    F: FnMut(f32, f32) -> Option<[u8; 4]>,
{
    if width == 0 || height == 0 || quad.width <= 0.0 || quad.height <= 0.0 {
        return;
    }
    if !quad.center_x.is_finite() || !quad.center_y.is_finite() {
        return;
    }

    let radians = quad.angle_degrees.to_radians();
    let (sin, cos) = radians.sin_cos();
    let half_w = quad.width * 0.5;
    let half_h = quad.height * 0.5;
    let reach = half_w.hypot(half_h).ceil();

    let left = ((quad.center_x - reach).floor() as i32).max(0);
    let right = ((quad.center_x + reach).ceil() as i32).min(width as i32);
    let top = ((quad.center_y - reach).floor() as i32).max(0);
    let bottom = ((quad.center_y + reach).ceil() as i32).min(height as i32);

    for py in top..bottom {
        let dy = py as f32 + 0.5 - quad.center_y;
        for px in left..right {
            let dx = px as f32 + 0.5 - quad.center_x;
            // Screen y points down, so a visual counter-clockwise turn uses +sin here.
            let local_x = dx * cos - dy * sin;
            let local_y = dx * sin + dy * cos;
            if local_x < -half_w || local_x >= half_w || local_y < -half_h || local_y >= half_h {
                continue;
            }
            let u = (local_x + half_w) / quad.width;
            let v = (local_y + half_h) / quad.height;
            if let Some(color) = sample(u, v) {
                write_pixel_rgba_clipped(frame, width as usize, px, py, color);
            }
        }
    }
}

pub(crate) fn draw_solid_quad(
    frame: &mut [u8],
    width: u32,
    height: u32,
    quad: ScreenQuad,
    color: [u8; 4],
) {
    raster_quad(frame, width, height, quad, |_, _| Some(color));
}

/// Stretches `texture` over the quad; fully transparent texels are skipped.
pub(crate) fn draw_textured_quad(
    frame: &mut [u8],
    width: u32,
    height: u32,
    quad: ScreenQuad,
    texture: &LoadedTexture,
) {
    if texture.width == 0 || texture.height == 0 {
        return;
    }
    let expected_len = texture.width as usize * texture.height as usize * 4;
    if texture.rgba.len() < expected_len {
        return;
    }
    raster_quad(frame, width, height, quad, |u, v| {
        let tx = ((u * texture.width as f32) as u32).min(texture.width - 1) as usize;
        let ty = ((v * texture.height as f32) as u32).min(texture.height - 1) as usize;
        let offset = (ty * texture.width as usize + tx) * 4;
        let texel = &texture.rgba[offset..offset + 4];
        (texel[3] != 0).then(|| [texel[0], texel[1], texel[2], texel[3]])
    });
}

use super::raster::write_pixel_rgba_clipped;

pub const GLYPH_WIDTH: i32 = 5;
pub const GLYPH_HEIGHT: i32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Glyph {
    rows: [u8; GLYPH_HEIGHT as usize],
}

const BLANK: Glyph = Glyph { rows: [0; 7] };

const fn glyph(rows: [u8; GLYPH_HEIGHT as usize]) -> Glyph {
    Glyph { rows }
}

/// Horizontal distance between glyph origins at `scale`.
pub fn glyph_advance(scale: i32) -> i32 {
    (GLYPH_WIDTH + 1) * scale.max(1)
}

pub fn line_advance(scale: i32) -> i32 {
    (GLYPH_HEIGHT + 3) * scale.max(1)
}

pub fn text_width_px(text: &str, scale: i32) -> i32 {
    let count = text.chars().count() as i32;
    if count == 0 {
        return 0;
    }
    count * glyph_advance(scale) - scale.max(1)
}

/// Greedy word wrap so no line is wider than `max_width_px`. Words longer
/// than a full line are split.
pub fn wrap_text(text: &str, max_width_px: i32, scale: i32) -> Vec<String> {
    let max_chars = (max_width_px.max(0) / glyph_advance(scale)).max(1) as usize;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let line_len = line.chars().count();
            let needed = if line.is_empty() {
                word.len()
            } else {
                line_len + 1 + word.len()
            };
            if needed > max_chars {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.extend(word);
        }
        lines.push(line);
    }

    lines
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_text_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    mut x: i32,
    mut y: i32,
    text: &str,
    color: [u8; 4],
    scale: i32,
) {
    let scale = scale.max(1);
    let line_start = x;
    for ch in text.chars() {
        if ch == '\n' {
            x = line_start;
            y += line_advance(scale);
            continue;
        }
        draw_glyph_clipped(frame, width, height, x, y, glyph_for(ch), color, scale);
        x += glyph_advance(scale);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_glyph_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    glyph: Glyph,
    color: [u8; 4],
    scale: i32,
) {
    if width == 0 || height == 0 {
        return;
    }
    for (row, bits) in glyph.rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                continue;
            }
            let left = x + col * scale;
            let top = y + row as i32 * scale;
            for py in top..top + scale {
                if py < 0 || py >= height as i32 {
                    continue;
                }
                for px in left..left + scale {
                    if px < 0 || px >= width as i32 {
                        continue;
                    }
                    write_pixel_rgba_clipped(frame, width as usize, px, py, color);
                }
            }
        }
    }
}

fn glyph_for(ch: char) -> Glyph {
    match ch.to_ascii_uppercase() {
        ' ' => BLANK,
        'A' => glyph([0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]),
        'B' => glyph([0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E]),
        'C' => glyph([0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E]),
        'D' => glyph([0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C]),
        'E' => glyph([0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F]),
        'F' => glyph([0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10]),
        'G' => glyph([0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F]),
        'H' => glyph([0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]),
        'I' => glyph([0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E]),
        'J' => glyph([0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C]),
        'K' => glyph([0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11]),
        'L' => glyph([0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F]),
        'M' => glyph([0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11]),
        'N' => glyph([0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11]),
        'O' => glyph([0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]),
        'P' => glyph([0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10]),
        'Q' => glyph([0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D]),
        'R' => glyph([0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11]),
        'S' => glyph([0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E]),
        'T' => glyph([0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04]),
        'U' => glyph([0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]),
        'V' => glyph([0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04]),
        'W' => glyph([0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A]),
        'X' => glyph([0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11]),
        'Y' => glyph([0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04]),
        'Z' => glyph([0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F]),
        '0' => glyph([0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E]),
        '1' => glyph([0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E]),
        '2' => glyph([0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F]),
        '3' => glyph([0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E]),
        '4' => glyph([0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02]),
        '5' => glyph([0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E]),
        '6' => glyph([0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E]),
        '7' => glyph([0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08]),
        '8' => glyph([0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E]),
        '9' => glyph([0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C]),
        ':' => glyph([0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00]),
        '.' => glyph([0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C]),
        ',' => glyph([0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08]),
        '!' => glyph([0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04]),
        '\'' => glyph([0x04, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00]),
        '-' => glyph([0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00]),
        '/' => glyph([0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00]),
        '(' => glyph([0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02]),
        ')' => glyph([0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08]),
        _ => glyph([0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04]),
    }
}

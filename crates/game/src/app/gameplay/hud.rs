use hive_engine::{line_advance, text_width_px, wrap_text, RenderFrame, ScreenRect};

use crate::app::config::GameConfig;

const BAR_COLOR: [u8; 4] = [34, 26, 18, 255];
const BAR_OUTLINE_COLOR: [u8; 4] = [226, 190, 110, 255];
const MESSAGE_COLOR: [u8; 4] = [248, 238, 212, 255];
const SCORE_COLOR: [u8; 4] = [255, 196, 48, 255];
const TEXT_SCALE: i32 = 2;
const MESSAGE_WIDTH_PX: i32 = 700;
const MARGIN_PX: i32 = 20;

/// Info bar along the bottom of the window. Only reads game state.
#[derive(Debug, Clone)]
pub(crate) struct Hud {
    bar: ScreenRect,
    typing_speed: u32,
    char_index: u32,
}

impl Hud {
    pub(crate) fn new(config: &GameConfig) -> Self {
        let height = config.info_bar_height as i32;
        let bar = ScreenRect::new(
            0,
            config.window_height as i32 - height,
            config.window_width as i32,
            height,
        );
        Self {
            bar,
            typing_speed: config.typing_speed.max(1),
            char_index: 0,
        }
    }

    pub(crate) fn tick(&mut self) {
        self.char_index = self.char_index.saturating_add(1);
    }

    /// Part of `message` revealed so far by the typewriter.
    pub(crate) fn typed<'a>(&self, message: &'a str) -> &'a str {
        let visible = (self.char_index / self.typing_speed) as usize;
        match message.char_indices().nth(visible) {
            Some((byte_index, _)) => &message[..byte_index],
            None => message,
        }
    }

    pub(crate) fn draw(&self, frame: &mut RenderFrame, message: &str, score: u32) {
        frame.fill_rect(self.bar, BAR_COLOR);
        frame.outline_rect(self.bar, BAR_OUTLINE_COLOR);

        let max_width = MESSAGE_WIDTH_PX.min(self.bar.width - 2 * MARGIN_PX);
        let mut y = self.bar.y + MARGIN_PX;
        for line in wrap_text(message, max_width, TEXT_SCALE) {
            if y + line_advance(TEXT_SCALE) > self.bar.y + self.bar.height {
                break;
            }
            frame.text(self.bar.x + MARGIN_PX, y, line, MESSAGE_COLOR, TEXT_SCALE);
            y += line_advance(TEXT_SCALE);
        }

        let score_text = format!("HONEY: {score}");
        let x = self.bar.x + self.bar.width - text_width_px(&score_text, TEXT_SCALE) - MARGIN_PX;
        let y = self.bar.y + self.bar.height - line_advance(TEXT_SCALE) - MARGIN_PX / 2;
        frame.text(x, y, score_text, SCORE_COLOR, TEXT_SCALE);
    }
}

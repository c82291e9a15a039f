use std::fmt;
use std::str::FromStr;

use hive_engine::{
    kinematic_update, text_width_px, Aabb, Camera2D, KinematicOutcome, RenderFrame,
    RenderableKind, Schedule, Sprite, SpriteIdAllocator, SpriteList, TimerId, Vec2,
};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::trace;

use super::entities::{EntityKind, Marker, Player};
use super::placement::{PlacementError, PlacementRegion};
use super::steering::{resolve, ControlKey, DirectionFlags};
use crate::app::config::GameConfig;

pub(crate) type GameRng = ChaCha8Rng;

const WALL_THICKNESS: f32 = 50.0;
const HIVE_BACKGROUND_COLOR: [u8; 4] = [112, 72, 28, 255];
const OUTSIDE_BACKGROUND_COLOR: [u8; 4] = [84, 142, 64, 255];
const STATUS_TEXT_COLOR: [u8; 4] = [255, 244, 214, 255];
const STATUS_TEXT_SCALE: i32 = 2;
const STATUS_MARGIN_PX: i32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum LevelName {
    Home,
    OutsideLeave,
    ForeignHive,
    OutsideReturn,
}

impl LevelName {
    /// Play order. Each level's successor is the next entry, wrapping around.
    pub(crate) const CYCLE: [LevelName; 4] = [
        LevelName::Home,
        LevelName::OutsideLeave,
        LevelName::ForeignHive,
        LevelName::OutsideReturn,
    ];

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            LevelName::Home => "home",
            LevelName::OutsideLeave => "outside_leave",
            LevelName::ForeignHive => "foreign_hive",
            LevelName::OutsideReturn => "outside_return",
        }
    }

    fn pascal_name(self) -> &'static str {
        match self {
            LevelName::Home => "Home",
            LevelName::OutsideLeave => "OutsideLeave",
            LevelName::ForeignHive => "ForeignHive",
            LevelName::OutsideReturn => "OutsideReturn",
        }
    }

    fn cycle_index(self) -> usize {
        match self {
            LevelName::Home => 0,
            LevelName::OutsideLeave => 1,
            LevelName::ForeignHive => 2,
            LevelName::OutsideReturn => 3,
        }
    }

    pub(crate) fn next(self) -> Self {
        Self::CYCLE[(self.cycle_index() + 1) % Self::CYCLE.len()]
    }

    pub(crate) fn previous(self) -> Self {
        Self::CYCLE[(self.cycle_index() + Self::CYCLE.len() - 1) % Self::CYCLE.len()]
    }
}

impl fmt::Display for LevelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown level name {0:?}")]
pub(crate) struct UnknownLevel(pub(crate) String);

impl FromStr for LevelName {
    type Err = UnknownLevel;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::CYCLE
            .into_iter()
            .find(|name| name.as_str() == trimmed || name.pascal_name() == trimmed)
            .ok_or_else(|| UnknownLevel(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LevelCommand {
    Stay,
    ChangeTo(LevelName),
}

/// State shared by the director with the active level for one call.
pub(crate) struct LevelContext<'a> {
    pub(crate) player: &'a mut Player,
    pub(crate) rng: &'a mut GameRng,
    pub(crate) config: &'a GameConfig,
    pub(crate) ids: &'a mut SpriteIdAllocator,
}

pub(crate) trait LevelController {
    fn name(&self) -> LevelName;

    fn core(&self) -> &LevelCore;

    fn core_mut(&mut self) -> &mut LevelCore;

    /// Creates and places every entity of the level and positions the player.
    fn setup(&mut self, ctx: &mut LevelContext<'_>) -> Result<(), PlacementError>;

    fn on_key_down(&mut self, key: ControlKey, player: &mut Player) {
        self.core_mut().handle_key(key, true, player);
    }

    fn on_key_up(&mut self, key: ControlKey, player: &mut Player) {
        self.core_mut().handle_key(key, false, player);
    }

    fn on_tick(&mut self, dt_seconds: f32, ctx: &mut LevelContext<'_>) -> LevelCommand;

    fn on_draw(&self, player: &Player, frame: &mut RenderFrame);

    /// Cancels every periodic timer the level owns. Returns how many were live.
    fn teardown(&mut self) -> usize {
        self.core_mut().teardown()
    }

    /// Extra text for the top of the play area.
    fn status_line(&self) -> Option<String> {
        None
    }

    /// Live entity counts by kind, the player excluded.
    fn census(&self) -> Vec<(EntityKind, usize)>;

    #[cfg(test)]
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViewMode {
    Hive,
    Outside,
}

/// Key state, walls, timers and camera shared by every level.
#[derive(Debug)]
pub(crate) struct LevelCore {
    pub(crate) keys: DirectionFlags,
    pub(crate) walls: SpriteList<Marker>,
    pub(crate) schedule: Schedule,
    mode: ViewMode,
    scroll: f32,
    max_scroll: f32,
    view_width: f32,
    view_height: f32,
    info_bar_height: f32,
    padding: f32,
    player_speed: f32,
    outside_speed: f32,
    camera_speed: f32,
    placement_max_attempts: u32,
    background: Sprite,
    fired: Vec<TimerId>,
}

impl LevelCore {
    pub(crate) fn new(
        mode: ViewMode,
        config: &GameConfig,
        ids: &mut SpriteIdAllocator,
        background: &'static str,
    ) -> Self {
        let (background_color, background_height) = match mode {
            ViewMode::Hive => (HIVE_BACKGROUND_COLOR, config.window_height),
            ViewMode::Outside => (OUTSIDE_BACKGROUND_COLOR, config.outside_height),
        };
        let mut background_sprite = Sprite::new(
            ids.allocate(),
            Vec2::new(config.window_width * 0.5, background_height * 0.5),
            RenderableKind::Placeholder(background_color),
        )
        .at(Vec2::new(config.window_width * 0.5, background_height * 0.5));
        background_sprite.assign_texture(background);

        Self {
            keys: DirectionFlags::default(),
            walls: SpriteList::new(),
            schedule: Schedule::new(),
            mode,
            scroll: 0.0,
            max_scroll: config.max_scroll(),
            view_width: config.window_width,
            view_height: config.window_height,
            info_bar_height: config.info_bar_height,
            padding: config.padding,
            player_speed: config.player_speed,
            outside_speed: config.player_speed * config.outside_speed_multiplier,
            camera_speed: config.camera_speed,
            placement_max_attempts: config.placement_max_attempts,
            background: background_sprite,
            fired: Vec::new(),
        }
    }

    pub(crate) fn scroll(&self) -> f32 {
        self.scroll
    }

    pub(crate) fn camera(&self) -> Camera2D {
        Camera2D::scrolled_to(self.scroll)
    }

    /// Part of the window above the info bar, in world coordinates.
    pub(crate) fn play_area(&self) -> Aabb {
        Aabb::new(
            Vec2::new(0.0, self.scroll + self.info_bar_height),
            Vec2::new(self.view_width, self.scroll + self.view_height),
        )
    }

    pub(crate) fn placement_region(&self) -> PlacementRegion {
        PlacementRegion {
            bounds: self.play_area(),
            padding: self.padding,
            max_attempts: self.placement_max_attempts,
        }
    }

    /// Window center, where outside levels spawn the player.
    pub(crate) fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.view_width * 0.5, self.scroll + self.view_height * 0.5)
    }

    /// Surrounds the play area with four walls just outside its edges.
    pub(crate) fn enclose_play_area(&mut self, ids: &mut SpriteIdAllocator) {
        let area = self.play_area();
        let t = WALL_THICKNESS;
        let sides = [
            Aabb::new(
                Vec2::new(area.min.x - t, area.min.y - t),
                Vec2::new(area.min.x, area.max.y + t),
            ),
            Aabb::new(
                Vec2::new(area.max.x, area.min.y - t),
                Vec2::new(area.max.x + t, area.max.y + t),
            ),
            Aabb::new(
                Vec2::new(area.min.x, area.min.y - t),
                Vec2::new(area.max.x, area.min.y),
            ),
            Aabb::new(
                Vec2::new(area.min.x, area.max.y),
                Vec2::new(area.max.x, area.max.y + t),
            ),
        ];
        for side in sides {
            self.walls.push(Marker::wall(ids.allocate(), side));
        }
    }

    pub(crate) fn handle_key(&mut self, key: ControlKey, is_down: bool, player: &mut Player) {
        if key == ControlKey::Fly {
            player.flags.flying = is_down;
            return;
        }
        self.keys.set(key, is_down);
        self.apply_steering(player);
    }

    /// Recomputes the player's velocity from the held keys. Outside, the
    /// player also drifts up with the camera and keeps its facing.
    pub(crate) fn apply_steering(&self, player: &mut Player) {
        match self.mode {
            ViewMode::Hive => {
                let steering = resolve(self.keys, self.player_speed);
                player.sprite.velocity = steering.velocity;
                if let Some(facing) = steering.facing {
                    player.sprite.angle_degrees = facing.angle_degrees();
                }
                player.flags.walking = steering.velocity != Vec2::ZERO;
            }
            ViewMode::Outside => {
                let steering = resolve(self.keys, self.outside_speed);
                player.sprite.velocity = steering.velocity + Vec2::new(0.0, self.camera_speed);
            }
        }
    }

    /// Applies the player's velocity against the walls, then keeps it inside
    /// the visible play area.
    pub(crate) fn move_player(&self, player: &mut Player, dt_seconds: f32) -> KinematicOutcome {
        let outcome = kinematic_update(&mut player.sprite, self.walls.as_slice(), dt_seconds);
        if outcome.blocked_x || outcome.blocked_y {
            trace!(
                blocked_x = outcome.blocked_x,
                blocked_y = outcome.blocked_y,
                "player_blocked"
            );
        }
        self.clamp_to_view(&mut player.sprite);
        outcome
    }

    pub(crate) fn clamp_to_view(&self, sprite: &mut Sprite) {
        let area = self.play_area();
        let half = sprite.half_extents;
        sprite.position.x = clamp_axis(sprite.position.x, area.min.x + half.x, area.max.x - half.x);
        sprite.position.y = clamp_axis(sprite.position.y, area.min.y + half.y, area.max.y - half.y);
    }

    pub(crate) fn advance_scroll(&mut self, dt_seconds: f32) {
        if self.mode == ViewMode::Outside {
            let step = self.camera_speed * dt_seconds.max(0.0);
            self.scroll = (self.scroll + step).min(self.max_scroll);
        }
    }

    pub(crate) fn scroll_finished(&self) -> bool {
        self.scroll >= self.max_scroll
    }

    /// Timers that fired during this step, in fire order.
    pub(crate) fn advance_timers(&mut self, dt_seconds: f32) -> Vec<TimerId> {
        self.fired.clear();
        self.schedule.advance(dt_seconds, &mut self.fired);
        self.fired.clone()
    }

    pub(crate) fn teardown(&mut self) -> usize {
        self.keys = DirectionFlags::default();
        self.schedule.cancel_all()
    }

    /// Camera, background and walls. Levels draw their entities afterwards.
    pub(crate) fn draw_world(&self, frame: &mut RenderFrame) {
        frame.set_camera(self.camera());
        frame.draw_sprite(&self.background);
        frame.draw_sprites(self.walls.iter());
    }

    /// Screen text in the top right corner of the play area.
    pub(crate) fn draw_status(&self, frame: &mut RenderFrame, text: &str) {
        let width = text_width_px(text, STATUS_TEXT_SCALE);
        let x = self.view_width as i32 - width - STATUS_MARGIN_PX;
        frame.text(x, STATUS_MARGIN_PX, text, STATUS_TEXT_COLOR, STATUS_TEXT_SCALE);
    }

    #[cfg(test)]
    pub(crate) fn set_scroll(&mut self, scroll: f32) {
        self.scroll = scroll.clamp(0.0, self.max_scroll);
    }
}

fn clamp_axis(value: f32, low: f32, high: f32) -> f32 {
    if low > high {
        return (low + high) * 0.5;
    }
    value.clamp(low, high)
}

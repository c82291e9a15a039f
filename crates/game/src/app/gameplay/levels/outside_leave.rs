use hive_engine::{collisions, RenderFrame, SpriteIdAllocator, SpriteList, TimerId, Vec2};
use rand::Rng;
use tracing::{debug, info};

use super::enter_outside;
use crate::app::config::GameConfig;
use crate::app::gameplay::entities::{EntityKind, Player, Scent};
use crate::app::gameplay::level::{
    LevelCommand, LevelContext, LevelController, LevelCore, LevelName, ViewMode,
};
use crate::app::gameplay::placement::PlacementError;

const BACKGROUND: &str = "background/outside";

/// Flight out. The camera climbs on its own and the player has to pick up a
/// trail of scents before they drop below the info bar.
pub(crate) struct OutsideLeaveLevel {
    core: LevelCore,
    scents: SpriteList<Scent>,
    scent_timer: Option<TimerId>,
}

impl OutsideLeaveLevel {
    pub(crate) fn new(config: &GameConfig, ids: &mut SpriteIdAllocator) -> Self {
        Self {
            core: LevelCore::new(ViewMode::Outside, config, ids, BACKGROUND),
            scents: SpriteList::new(),
            scent_timer: None,
        }
    }

    /// Drops the next scent just above the top of the view, continuing the
    /// trail from the newest scent still around.
    fn spawn_scent(&mut self, ctx: &mut LevelContext<'_>) {
        let config = ctx.config;
        let previous_x = self
            .scents
            .as_slice()
            .last()
            .map_or(config.window_width * 0.5, |scent| scent.sprite.position.x);
        let x = next_scent_x(
            &mut *ctx.rng,
            previous_x,
            config.scent_delta_x_max,
            config.window_width,
            config.padding,
        );
        let y = self.core.scroll() + config.window_height + config.scent_spawn_margin;

        let mut scent = Scent::new(ctx.ids.allocate(), config);
        scent.sprite.position = Vec2::new(x, y);
        debug!(x, y, "scent_spawned");
        self.scents.push(scent);
    }

    fn collect_scents(&mut self, player: &Player) {
        let scents = self.scents.as_slice();
        let touched: Vec<_> = collisions(player, scents)
            .into_iter()
            .map(|index| scents[index].sprite.id)
            .collect();
        for id in touched {
            self.scents.remove_later(id);
        }
        self.scents.apply_pending();
    }

    /// A live scent below the info bar means the trail was lost.
    fn missed_scent(&self) -> Option<Vec2> {
        let floor = self.core.play_area().min.y;
        self.scents
            .live()
            .find(|scent| scent.sprite.position.y < floor)
            .map(|scent| scent.sprite.position)
    }

    #[cfg(test)]
    pub(crate) fn push_scent_at(
        &mut self,
        ids: &mut SpriteIdAllocator,
        config: &GameConfig,
        position: Vec2,
    ) {
        let mut scent = Scent::new(ids.allocate(), config);
        scent.sprite.position = position;
        self.scents.push(scent);
    }

    #[cfg(test)]
    pub(crate) fn scents(&self) -> &SpriteList<Scent> {
        &self.scents
    }
}

/// Random walk along x. A step past the padded edge is mirrored back inside.
pub(crate) fn next_scent_x<R: Rng + ?Sized>(
    rng: &mut R,
    previous_x: f32,
    delta_max: f32,
    width: f32,
    padding: f32,
) -> f32 {
    let delta = rng.gen_range(-delta_max..=delta_max);
    let (low, high) = (padding, width - padding);
    let mut x = previous_x + delta;
    if x > high {
        x = high - delta;
    } else if x < low {
        x = low + delta;
    }
    x.clamp(low, high)
}

impl LevelController for OutsideLeaveLevel {
    fn name(&self) -> LevelName {
        LevelName::OutsideLeave
    }

    fn core(&self) -> &LevelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LevelCore {
        &mut self.core
    }

    fn setup(&mut self, ctx: &mut LevelContext<'_>) -> Result<(), PlacementError> {
        enter_outside(&self.core, ctx.player);
        self.scent_timer = Some(
            self.core
                .schedule
                .schedule_periodic(ctx.config.scent_interval),
        );
        Ok(())
    }

    fn on_tick(&mut self, dt_seconds: f32, ctx: &mut LevelContext<'_>) -> LevelCommand {
        self.core.advance_scroll(dt_seconds);
        for timer in self.core.advance_timers(dt_seconds) {
            if Some(timer) == self.scent_timer {
                self.spawn_scent(ctx);
            }
        }

        self.core.move_player(ctx.player, dt_seconds);
        self.collect_scents(ctx.player);

        if let Some(position) = self.missed_scent() {
            info!(
                scent_x = position.x,
                scent_y = position.y,
                scroll = self.core.scroll(),
                "scent_missed"
            );
            return LevelCommand::ChangeTo(LevelName::Home);
        }
        if self.core.scroll_finished() {
            info!(scroll = self.core.scroll(), "outside_traversed");
            return LevelCommand::ChangeTo(LevelName::ForeignHive);
        }

        ctx.player.update_animation();
        LevelCommand::Stay
    }

    fn on_draw(&self, player: &Player, frame: &mut RenderFrame) {
        self.core.draw_world(frame);
        frame.draw_sprites(self.scents.live());
        frame.draw_sprite(&player.sprite);
    }

    fn census(&self) -> Vec<(EntityKind, usize)> {
        vec![(EntityKind::Scent, self.scents.live().count())]
    }

    #[cfg(test)]
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

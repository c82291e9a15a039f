use hive_engine::{collides, collisions, RenderFrame, SpriteIdAllocator, SpriteList};
use rand::Rng;
use tracing::{debug, info};

use crate::app::config::GameConfig;
use crate::app::gameplay::entities::{textures, EnemyBee, EntityKind, Honey, Marker, Player};
use crate::app::gameplay::level::{
    LevelCommand, LevelContext, LevelController, LevelCore, LevelName, ViewMode,
};
use crate::app::gameplay::placement::{place_randomly, PlacementError};

const BACKGROUND: &str = "background/foreign_hive";

/// The neighbours' hive. Honey scores, guards flutter, and the visit ends at
/// the exit or when time runs out.
pub(crate) struct ForeignHiveLevel {
    core: LevelCore,
    exit: Marker,
    honey: SpriteList<Honey>,
    bees: SpriteList<EnemyBee>,
    time_limit: f64,
    elapsed: f64,
}

impl ForeignHiveLevel {
    pub(crate) fn new(config: &GameConfig, ids: &mut SpriteIdAllocator) -> Self {
        Self {
            core: LevelCore::new(ViewMode::Hive, config, ids, BACKGROUND),
            exit: Marker::exit(ids.allocate(), config, textures::EXIT_FOREIGN),
            honey: SpriteList::new(),
            bees: SpriteList::new(),
            time_limit: f64::from(config.foreign_hive_time_limit),
            elapsed: 0.0,
        }
    }

    /// Whole seconds left, never negative.
    pub(crate) fn seconds_left(&self) -> u32 {
        (self.time_limit - self.elapsed).max(0.0).floor() as u32
    }

    fn collect_honey(&mut self, player: &mut Player) {
        if player.flags.flying {
            return;
        }
        let honey = self.honey.as_slice();
        let touched: Vec<_> = collisions(&*player, honey)
            .into_iter()
            .map(|index| honey[index].sprite.id)
            .collect();
        for id in touched {
            if self.honey.remove_later(id) {
                player.add_score(1);
                info!(score = player.score(), "honey_collected");
            }
        }
    }

    fn bump_bees(&mut self, player: &mut Player, penalty: u32) {
        for bee in self.bees.iter_mut() {
            if !collides(&*player, &*bee) {
                bee.release();
                continue;
            }
            let new_contact = bee.touch();
            if new_contact && penalty > 0 && !player.flags.flying {
                player.lose_score(penalty);
                debug!(score = player.score(), penalty, "bee_contact_penalty");
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn exit_mut(&mut self) -> &mut Marker {
        &mut self.exit
    }

    #[cfg(test)]
    pub(crate) fn honey_mut(&mut self) -> &mut SpriteList<Honey> {
        &mut self.honey
    }

    #[cfg(test)]
    pub(crate) fn bees_mut(&mut self) -> &mut SpriteList<EnemyBee> {
        &mut self.bees
    }
}

impl LevelController for ForeignHiveLevel {
    fn name(&self) -> LevelName {
        LevelName::ForeignHive
    }

    fn core(&self) -> &LevelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LevelCore {
        &mut self.core
    }

    fn setup(&mut self, ctx: &mut LevelContext<'_>) -> Result<(), PlacementError> {
        self.core.enclose_play_area(ctx.ids);
        let region = self.core.placement_region();
        let no_obstacles: [Marker; 0] = [];

        // Everything else only has to keep clear of the exit.
        place_randomly(&mut *ctx.rng, &mut self.exit.sprite, &region, &no_obstacles)?;
        let exit = [self.exit.sprite.hitbox()];
        place_randomly(&mut *ctx.rng, &mut ctx.player.sprite, &region, &exit)?;

        for _ in 0..ctx.config.honey_count {
            let mut honey = Honey::new(ctx.ids.allocate(), ctx.config);
            place_randomly(&mut *ctx.rng, &mut honey.sprite, &region, &exit)?;
            self.honey.push(honey);
        }
        for _ in 0..ctx.config.enemy_bee_count {
            let mut bee = EnemyBee::new(ctx.ids.allocate(), ctx.config);
            place_randomly(&mut *ctx.rng, &mut bee.sprite, &region, &exit)?;
            bee.sprite.angle_degrees = ctx.rng.gen_range(0.0..360.0);
            self.bees.push(bee);
        }

        self.core.apply_steering(ctx.player);
        debug!(
            honey = self.honey.len(),
            bees = self.bees.len(),
            time_limit = self.time_limit,
            "foreign_hive_setup"
        );
        Ok(())
    }

    fn on_tick(&mut self, dt_seconds: f32, ctx: &mut LevelContext<'_>) -> LevelCommand {
        self.elapsed += f64::from(dt_seconds.max(0.0));
        self.core.move_player(ctx.player, dt_seconds);

        self.collect_honey(ctx.player);
        self.honey.apply_pending();
        self.bump_bees(ctx.player, ctx.config.enemy_bee_contact_penalty);

        if collides(&*ctx.player, &self.exit) {
            info!(score = ctx.player.score(), "exit_reached");
            return LevelCommand::ChangeTo(LevelName::OutsideReturn);
        }
        if self.elapsed >= self.time_limit {
            info!(
                score = ctx.player.score(),
                honey_left = self.honey.len(),
                "time_up"
            );
            return LevelCommand::ChangeTo(LevelName::OutsideReturn);
        }

        for bee in self.bees.iter_mut() {
            bee.update_animation(&mut *ctx.rng, ctx.config.bee_rotate_chance);
        }
        ctx.player.update_animation();
        LevelCommand::Stay
    }

    fn on_draw(&self, player: &Player, frame: &mut RenderFrame) {
        self.core.draw_world(frame);
        frame.draw_sprite(&self.exit.sprite);
        frame.draw_sprites(self.honey.live());
        frame.draw_sprites(self.bees.iter());
        frame.draw_sprite(&player.sprite);
        if let Some(status) = self.status_line() {
            self.core.draw_status(frame, &status);
        }
    }

    fn status_line(&self) -> Option<String> {
        Some(format!("TIME LEFT: {}", self.seconds_left()))
    }

    fn census(&self) -> Vec<(EntityKind, usize)> {
        vec![
            (EntityKind::Honey, self.honey.live().count()),
            (EntityKind::EnemyBee, self.bees.len()),
            (self.exit.entity_kind(), 1),
            (EntityKind::Wall, self.core.walls.len()),
        ]
    }

    #[cfg(test)]
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

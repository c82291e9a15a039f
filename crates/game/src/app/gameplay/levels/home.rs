use hive_engine::{collides, Aabb, RenderFrame, SpriteIdAllocator, SpriteList};
use rand::Rng;
use tracing::{debug, info};

use crate::app::config::GameConfig;
use crate::app::gameplay::entities::{textures, EntityKind, FriendlyBee, Marker, Player};
use crate::app::gameplay::level::{
    LevelCommand, LevelContext, LevelController, LevelCore, LevelName, ViewMode,
};
use crate::app::gameplay::placement::{place_randomly, PlacementError};

const BACKGROUND: &str = "background/home";

/// The player's own hive. Friendly bees idle around; the exit leads out.
pub(crate) struct HomeLevel {
    core: LevelCore,
    exit: Marker,
    bees: SpriteList<FriendlyBee>,
}

impl HomeLevel {
    pub(crate) fn new(config: &GameConfig, ids: &mut SpriteIdAllocator) -> Self {
        Self {
            core: LevelCore::new(ViewMode::Hive, config, ids, BACKGROUND),
            exit: Marker::exit(ids.allocate(), config, textures::EXIT_HOME),
            bees: SpriteList::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn exit_mut(&mut self) -> &mut Marker {
        &mut self.exit
    }
}

impl LevelController for HomeLevel {
    fn name(&self) -> LevelName {
        LevelName::Home
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

        // Every placement avoids everything placed before it.
        let mut placed: Vec<Aabb> = Vec::with_capacity(ctx.config.friendly_bee_count + 2);
        place_randomly(&mut *ctx.rng, &mut ctx.player.sprite, &region, &placed)?;
        placed.push(ctx.player.sprite.hitbox());
        place_randomly(&mut *ctx.rng, &mut self.exit.sprite, &region, &placed)?;
        placed.push(self.exit.sprite.hitbox());

        for _ in 0..ctx.config.friendly_bee_count {
            let mut bee = FriendlyBee::new(ctx.ids.allocate(), ctx.config);
            place_randomly(&mut *ctx.rng, &mut bee.sprite, &region, &placed)?;
            bee.sprite.angle_degrees = ctx.rng.gen_range(0.0..360.0);
            placed.push(bee.sprite.hitbox());
            self.bees.push(bee);
        }

        self.core.apply_steering(ctx.player);
        debug!(
            bees = self.bees.len(),
            exit_x = self.exit.sprite.position.x,
            exit_y = self.exit.sprite.position.y,
            "home_setup"
        );
        Ok(())
    }

    fn on_tick(&mut self, dt_seconds: f32, ctx: &mut LevelContext<'_>) -> LevelCommand {
        self.core.move_player(ctx.player, dt_seconds);

        if collides(&*ctx.player, &self.exit) {
            info!(score = ctx.player.score(), "exit_reached");
            return LevelCommand::ChangeTo(LevelName::OutsideLeave);
        }

        for bee in self.bees.iter_mut() {
            bee.fidget(&mut *ctx.rng, ctx.config.friend_rotate_chance);
        }
        ctx.player.update_animation();
        LevelCommand::Stay
    }

    fn on_draw(&self, player: &Player, frame: &mut RenderFrame) {
        self.core.draw_world(frame);
        frame.draw_sprite(&self.exit.sprite);
        frame.draw_sprites(self.bees.iter());
        frame.draw_sprite(&player.sprite);
    }

    fn census(&self) -> Vec<(EntityKind, usize)> {
        vec![
            (EntityKind::FriendlyBee, self.bees.len()),
            (self.exit.entity_kind(), 1),
            (EntityKind::Wall, self.core.walls.len()),
        ]
    }

    #[cfg(test)]
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

use hive_engine::{collides_with_any, RenderFrame, SpriteIdAllocator, SpriteList, TimerId, Vec2};
use rand::Rng;
use tracing::{debug, info};

use super::enter_outside;
use crate::app::config::GameConfig;
use crate::app::gameplay::entities::{EntityKind, Facing, Player, Wasp};
use crate::app::gameplay::level::{
    LevelCommand, LevelContext, LevelController, LevelCore, LevelName, ViewMode,
};
use crate::app::gameplay::placement::PlacementError;

const BACKGROUND: &str = "background/outside_return";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttackDirection {
    FromAbove,
    FromBelow,
    FromRight,
    FromLeft,
}

impl AttackDirection {
    const ALL: [AttackDirection; 4] = [
        AttackDirection::FromAbove,
        AttackDirection::FromBelow,
        AttackDirection::FromRight,
        AttackDirection::FromLeft,
    ];

    fn as_str(self) -> &'static str {
        match self {
            AttackDirection::FromAbove => "above",
            AttackDirection::FromBelow => "below",
            AttackDirection::FromRight => "right",
            AttackDirection::FromLeft => "left",
        }
    }
}

/// Where a wasp starts relative to its target, how it moves, and which way
/// the rest of a wave is spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AttackVector {
    pub(crate) offset: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) facing: Facing,
    pub(crate) wave_axis: Vec2,
}

pub(crate) fn attack_vector(
    direction: AttackDirection,
    distance: f32,
    speed: f32,
) -> AttackVector {
    match direction {
        AttackDirection::FromAbove => AttackVector {
            offset: Vec2::new(0.0, distance),
            velocity: Vec2::new(0.0, -speed),
            facing: Facing::Down,
            wave_axis: Vec2::new(1.0, 0.0),
        },
        AttackDirection::FromBelow => AttackVector {
            offset: Vec2::new(0.0, -distance),
            velocity: Vec2::new(0.0, speed),
            facing: Facing::Up,
            wave_axis: Vec2::new(1.0, 0.0),
        },
        AttackDirection::FromRight => AttackVector {
            offset: Vec2::new(distance, 0.0),
            velocity: Vec2::new(-speed, 0.0),
            facing: Facing::Left,
            wave_axis: Vec2::new(0.0, 1.0),
        },
        AttackDirection::FromLeft => AttackVector {
            offset: Vec2::new(-distance, 0.0),
            velocity: Vec2::new(speed, 0.0),
            facing: Facing::Right,
            wave_axis: Vec2::new(0.0, 1.0),
        },
    }
}

/// Flight home. Wasps attack at intervals; each sting costs one honey.
pub(crate) struct OutsideReturnLevel {
    core: LevelCore,
    wasps: SpriteList<Wasp>,
    attack_timer: Option<TimerId>,
    stings: u32,
}

impl OutsideReturnLevel {
    pub(crate) fn new(config: &GameConfig, ids: &mut SpriteIdAllocator) -> Self {
        Self {
            core: LevelCore::new(ViewMode::Outside, config, ids, BACKGROUND),
            wasps: SpriteList::new(),
            attack_timer: None,
            stings: 0,
        }
    }

    fn launch_attack(&mut self, ctx: &mut LevelContext<'_>) {
        let config = ctx.config;
        let direction = AttackDirection::ALL[ctx.rng.gen_range(0..AttackDirection::ALL.len())];
        let speed = ctx
            .rng
            .gen_range(config.wasp_speed_min..=config.wasp_speed_max);
        let wave = ctx.rng.gen_bool(config.wasp_wave_chance);
        let vector = attack_vector(direction, config.wasp_spawn_distance, speed);
        let origin = ctx.player.position() + vector.offset;

        let mut positions = vec![origin];
        if wave {
            let spread = vector.wave_axis * config.wasp_wave_spacing;
            positions.push(origin - spread);
            positions.push(origin + spread);
        }
        for position in positions {
            let mut wasp = Wasp::new(ctx.ids.allocate(), config);
            wasp.sprite.position = position;
            wasp.sprite.velocity = vector.velocity;
            wasp.sprite.angle_degrees = vector.facing.angle_degrees();
            self.wasps.push(wasp);
        }
        info!(
            direction = direction.as_str(),
            speed,
            wave,
            wasps = self.wasps.len(),
            "wasp_attack"
        );
    }

    fn move_wasps(&mut self, dt_seconds: f32) {
        for wasp in self.wasps.iter_mut() {
            wasp.sprite.position += wasp.sprite.velocity * dt_seconds;
            wasp.update_animation();
        }
    }

    /// Hurt is set on the first sting and cleared once no wasp touches the
    /// player. Flying neither stings nor heals.
    fn resolve_stings(&mut self, player: &mut Player) {
        if collides_with_any(&*player, self.wasps.live()) {
            if !player.flags.hurt && !player.flags.flying {
                player.flags.hurt = true;
                player.lose_score(1);
                self.stings += 1;
                info!(score = player.score(), "player_stung");
            }
        } else {
            player.flags.hurt = false;
        }
    }

    fn despawn_far_wasps(&mut self, max_distance: f32) {
        let center = self.core.play_area().center();
        let far: Vec<_> = self
            .wasps
            .live()
            .filter(|wasp| wasp.sprite.position.distance(center) > max_distance)
            .map(|wasp| wasp.sprite.id)
            .collect();
        for id in far {
            self.wasps.remove_later(id);
        }
        let removed = self.wasps.apply_pending();
        if removed > 0 {
            debug!(removed, remaining = self.wasps.len(), "wasps_despawned");
        }
    }

    #[cfg(test)]
    pub(crate) fn wasps_mut(&mut self) -> &mut SpriteList<Wasp> {
        &mut self.wasps
    }

    #[cfg(test)]
    pub(crate) fn wasps(&self) -> &SpriteList<Wasp> {
        &self.wasps
    }
}

impl LevelController for OutsideReturnLevel {
    fn name(&self) -> LevelName {
        LevelName::OutsideReturn
    }

    fn core(&self) -> &LevelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LevelCore {
        &mut self.core
    }

    fn setup(&mut self, ctx: &mut LevelContext<'_>) -> Result<(), PlacementError> {
        enter_outside(&self.core, ctx.player);
        self.attack_timer = Some(
            self.core
                .schedule
                .schedule_periodic(ctx.config.wasp_attack_interval),
        );
        Ok(())
    }

    fn on_tick(&mut self, dt_seconds: f32, ctx: &mut LevelContext<'_>) -> LevelCommand {
        self.core.advance_scroll(dt_seconds);
        for timer in self.core.advance_timers(dt_seconds) {
            if Some(timer) == self.attack_timer {
                self.launch_attack(ctx);
            }
        }

        self.core.move_player(ctx.player, dt_seconds);
        self.move_wasps(dt_seconds);
        self.resolve_stings(ctx.player);
        self.despawn_far_wasps(ctx.config.wasp_despawn_distance);

        if self.core.scroll_finished() {
            info!(
                score = ctx.player.score(),
                stings = self.stings,
                "made_it_home"
            );
            return LevelCommand::ChangeTo(LevelName::Home);
        }

        ctx.player.update_animation();
        LevelCommand::Stay
    }

    fn on_draw(&self, player: &Player, frame: &mut RenderFrame) {
        self.core.draw_world(frame);
        frame.draw_sprite(&player.sprite);
        frame.draw_sprites(self.wasps.live());
    }

    fn census(&self) -> Vec<(EntityKind, usize)> {
        vec![(EntityKind::Wasp, self.wasps.live().count())]
    }

    #[cfg(test)]
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

use hive_engine::{
    InputAction, InputSnapshot, MetricsHandle, RenderFrame, Scene, SceneCommand, SpriteIdAllocator,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::entities::{EntityKind, Player};
use super::hud::Hud;
use super::level::{
    GameRng, LevelCommand, LevelContext, LevelController, LevelName, UnknownLevel,
};
use super::levels::build_level;
use super::placement::PlacementError;
use super::steering::ControlKey;
use crate::app::config::{GameConfig, Messages};

#[derive(Debug, Error)]
pub(crate) enum DirectorError {
    #[error(transparent)]
    UnknownLevel(#[from] UnknownLevel),
    #[error("failed to set up level {level}: {source}")]
    Setup {
        level: LevelName,
        #[source]
        source: PlacementError,
    },
}

/// Owns the player and the single active level, and swaps levels when one
/// asks for it.
pub(crate) struct LevelDirector {
    config: GameConfig,
    messages: Messages,
    rng: GameRng,
    ids: SpriteIdAllocator,
    player: Player,
    level: Box<dyn LevelController>,
    hud: Hud,
    intro_complete: bool,
    previous_input: InputSnapshot,
    pause_remaining: f32,
    transitions: u32,
    metrics: MetricsHandle,
}

impl LevelDirector {
    pub(crate) fn new(
        config: GameConfig,
        messages: Messages,
        rng: GameRng,
        metrics: MetricsHandle,
        start: LevelName,
    ) -> Result<Self, DirectorError> {
        let mut ids = SpriteIdAllocator::default();
        let player = Player::new(ids.allocate(), &config);
        let level = build_level(start, &config, &mut ids);
        let hud = Hud::new(&config);
        let mut director = Self {
            config,
            messages,
            rng,
            ids,
            player,
            level,
            hud,
            intro_complete: false,
            previous_input: InputSnapshot::empty(),
            pause_remaining: 0.0,
            transitions: 0,
            metrics,
        };
        director.setup_active_level()?;
        Ok(director)
    }

    pub(crate) fn level_name(&self) -> LevelName {
        self.level.name()
    }

    /// Tears down the active level, keeps the player, and sets up `target`.
    /// On a setup error the old level is already gone; callers treat it as
    /// fatal.
    pub(crate) fn change_level(&mut self, target: LevelName) -> Result<(), DirectorError> {
        let from = self.level.name();
        let cancelled_timers = self.level.teardown();
        if from == LevelName::Home {
            self.intro_complete = true;
        }

        self.player.reset_for_level();
        self.previous_input = fly_released(&self.previous_input);
        self.level = build_level(target, &self.config, &mut self.ids);
        self.setup_active_level()?;

        self.pause_remaining = self.config.transition_pause;
        self.transitions = self.transitions.saturating_add(1);
        info!(
            from = %from,
            to = %target,
            score = self.player.score(),
            cancelled_timers,
            transitions = self.transitions,
            "level_changed"
        );
        Ok(())
    }

    pub(crate) fn change_level_by_name(&mut self, name: &str) -> Result<(), DirectorError> {
        let target = name.parse::<LevelName>()?;
        self.change_level(target)
    }

    fn setup_active_level(&mut self) -> Result<(), DirectorError> {
        let level = self.level.name();
        let mut ctx = LevelContext {
            player: &mut self.player,
            rng: &mut self.rng,
            config: &self.config,
            ids: &mut self.ids,
        };
        self.level
            .setup(&mut ctx)
            .map_err(|source| DirectorError::Setup { level, source })?;
        info!(
            level = %level,
            player_x = self.player.sprite.position.x,
            player_y = self.player.sprite.position.y,
            "level_loaded"
        );
        for (kind, count) in self.census() {
            debug!(level = %level, category = kind.category(), count, "level_census");
        }
        Ok(())
    }

    /// Live sprites per kind, the player included.
    fn census(&self) -> Vec<(EntityKind, usize)> {
        let mut census = vec![(EntityKind::Player, 1)];
        census.extend(self.level.census());
        census
    }

    fn forward_keys(&mut self, input: &InputSnapshot) {
        for key in ControlKey::ALL {
            let action = key.action();
            let was_down = self.previous_input.is_down(action);
            let is_down = input.is_down(action);
            if is_down && !was_down {
                self.level.on_key_down(key, &mut self.player);
            } else if was_down && !is_down {
                self.level.on_key_up(key, &mut self.player);
            }
        }
    }

    fn debug_level_request(&self, input: &InputSnapshot) -> Option<LevelName> {
        if !self.config.debug_level_keys {
            return None;
        }
        let pressed = |action| input.is_down(action) && !self.previous_input.is_down(action);
        let current = self.level.name();
        if pressed(InputAction::DebugNextLevel) {
            Some(current.next())
        } else if pressed(InputAction::DebugPreviousLevel) {
            Some(current.previous())
        } else {
            None
        }
    }

    fn tick_level(&mut self, dt_seconds: f32) -> LevelCommand {
        let mut ctx = LevelContext {
            player: &mut self.player,
            rng: &mut self.rng,
            config: &self.config,
            ids: &mut self.ids,
        };
        self.level.on_tick(dt_seconds, &mut ctx)
    }

    fn hud_message(&self) -> &str {
        if self.intro_complete {
            self.messages.for_level(self.level.name())
        } else {
            self.hud.typed(&self.messages.intro)
        }
    }

    #[cfg(test)]
    pub(crate) fn player(&self) -> &Player {
        &self.player
    }

    #[cfg(test)]
    pub(crate) fn intro_complete(&self) -> bool {
        self.intro_complete
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    #[cfg(test)]
    pub(crate) fn level(&self) -> &dyn LevelController {
        self.level.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn level_mut(&mut self) -> &mut dyn LevelController {
        self.level.as_mut()
    }

    #[cfg(test)]
    pub(crate) fn skip_pause(&mut self) {
        self.pause_remaining = 0.0;
    }

    #[cfg(test)]
    pub(crate) fn is_paused(&self) -> bool {
        self.pause_remaining > 0.0
    }
}

fn fly_released(input: &InputSnapshot) -> InputSnapshot {
    input.with_action_down(InputAction::Fly, false)
}

impl Scene for LevelDirector {
    fn load(&mut self) {
        info!(
            level = %self.level.name(),
            debug_level_keys = self.config.debug_level_keys,
            "game_started"
        );
    }

    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if input.quit_requested() || input.is_down(InputAction::Quit) {
            return SceneCommand::Quit;
        }
        self.hud.tick();

        if self.pause_remaining > 0.0 {
            self.pause_remaining -= fixed_dt_seconds;
            // A held fly key is picked up again once the pause ends.
            self.previous_input = fly_released(input);
            return SceneCommand::None;
        }

        if let Some(target) = self.debug_level_request(input) {
            warn!(from = %self.level.name(), to = %target, "debug_level_skip");
            self.previous_input = *input;
            if let Err(err) = self.change_level(target) {
                error!(error = %err, "level_change_failed");
                return SceneCommand::Quit;
            }
            return SceneCommand::None;
        }

        self.forward_keys(input);
        self.previous_input = *input;

        if let LevelCommand::ChangeTo(target) = self.tick_level(fixed_dt_seconds) {
            if let Err(err) = self.change_level(target) {
                error!(error = %err, "level_change_failed");
                return SceneCommand::Quit;
            }
        }
        SceneCommand::None
    }

    fn render(&mut self, frame: &mut RenderFrame) {
        self.level.on_draw(&self.player, frame);
        self.hud.draw(frame, self.hud_message(), self.player.score());
    }

    fn unload(&mut self) {
        let cancelled_timers = self.level.teardown();
        info!(
            level = %self.level.name(),
            score = self.player.score(),
            transitions = self.transitions,
            cancelled_timers,
            "game_ended"
        );
    }

    fn debug_title(&self) -> Option<String> {
        let metrics = self.metrics.snapshot();
        Some(format!(
            "Honey Thief | {} | honey {} | {:.0} fps | {:.0} tps",
            self.level_name(),
            self.player.score(),
            metrics.fps,
            metrics.tps
        ))
    }

    fn sprite_count(&self) -> usize {
        self.census().iter().map(|(_, count)| count).sum()
    }
}

mod foreign_hive;
mod home;
mod outside_leave;
mod outside_return;

pub(crate) use foreign_hive::ForeignHiveLevel;
pub(crate) use home::HomeLevel;
pub(crate) use outside_leave::OutsideLeaveLevel;
pub(crate) use outside_return::OutsideReturnLevel;

use hive_engine::SpriteIdAllocator;

use super::entities::{Player, PlayerFlags};
use super::level::{LevelController, LevelCore, LevelName};
use crate::app::config::GameConfig;

/// Empty controller for `name`. Entities appear once `setup` runs.
pub(crate) fn build_level(
    name: LevelName,
    config: &GameConfig,
    ids: &mut SpriteIdAllocator,
) -> Box<dyn LevelController> {
    match name {
        LevelName::Home => Box::new(HomeLevel::new(config, ids)),
        LevelName::OutsideLeave => Box::new(OutsideLeaveLevel::new(config, ids)),
        LevelName::ForeignHive => Box::new(ForeignHiveLevel::new(config, ids)),
        LevelName::OutsideReturn => Box::new(OutsideReturnLevel::new(config, ids)),
    }
}

/// Puts the player at the window center, facing up, riding the camera.
fn enter_outside(core: &LevelCore, player: &mut Player) {
    player.sprite.position = core.spawn_point();
    player.sprite.angle_degrees = 0.0;
    player.flags = PlayerFlags {
        outside: true,
        ..PlayerFlags::default()
    };
    core.apply_steering(player);
}

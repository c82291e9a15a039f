use hive_engine::{
    InputAction, InputSnapshot, MetricsHandle, OverlayItem, RenderFrame, Scene, SceneCommand,
    SpriteId, SpriteIdAllocator, Vec2,
};
use rand::{Rng, SeedableRng};

use super::director::{DirectorError, LevelDirector};
use super::entities::{textures, EnemyBee, EntityKind, Honey, Player, Wasp};
use super::level::{GameRng, LevelContext, LevelController, LevelName};
use super::levels::{ForeignHiveLevel, HomeLevel, OutsideLeaveLevel, OutsideReturnLevel};
use crate::app::config::{GameConfig, Messages};

const DT: f32 = 1.0 / 60.0;

fn director_with(config: GameConfig, start: LevelName) -> LevelDirector {
    LevelDirector::new(
        config,
        Messages::default(),
        GameRng::seed_from_u64(0x00b0_0b1e),
        MetricsHandle::default(),
        start,
    )
    .expect("director")
}

fn director_at(start: LevelName) -> LevelDirector {
    director_with(GameConfig::default(), start)
}

fn idle_tick(director: &mut LevelDirector) -> SceneCommand {
    director.update(DT, &InputSnapshot::empty())
}

fn held(actions: &[InputAction]) -> InputSnapshot {
    actions
        .iter()
        .fold(InputSnapshot::empty(), |snapshot, action| {
            snapshot.with_action_down(*action, true)
        })
}

fn count_of(level: &dyn LevelController, kind: EntityKind) -> usize {
    level
        .census()
        .into_iter()
        .filter(|(entry, _)| *entry == kind)
        .map(|(_, count)| count)
        .sum()
}

fn foreign_hive(director: &mut LevelDirector) -> &mut ForeignHiveLevel {
    director
        .level_mut()
        .as_any_mut()
        .downcast_mut::<ForeignHiveLevel>()
        .expect("foreign hive active")
}

fn outside_leave(director: &mut LevelDirector) -> &mut OutsideLeaveLevel {
    director
        .level_mut()
        .as_any_mut()
        .downcast_mut::<OutsideLeaveLevel>()
        .expect("outside leave active")
}

fn outside_return(director: &mut LevelDirector) -> &mut OutsideReturnLevel {
    director
        .level_mut()
        .as_any_mut()
        .downcast_mut::<OutsideReturnLevel>()
        .expect("outside return active")
}

/// A foreign hive holding exactly one honey at `position`, with the exit out
/// of reach.
fn foreign_hive_with_single_honey(config: GameConfig, position: Vec2) -> LevelDirector {
    let honey_config = config.clone();
    let mut director = director_with(config, LevelName::ForeignHive);
    let level = foreign_hive(&mut director);
    level.exit_mut().sprite.position = Vec2::new(-1000.0, -1000.0);
    level.bees_mut().clear();
    level.honey_mut().clear();
    let mut honey = Honey::new(SpriteId(90_000), &honey_config);
    honey.sprite.position = position;
    level.honey_mut().push(honey);
    director.player_mut().sprite.position = position;
    director
}

#[test]
fn touching_the_home_exit_leads_outside_with_score_kept() {
    let mut director = director_at(LevelName::Home);
    director.player_mut().add_score(3);
    let player_id = director.player().sprite.id;
    let player_position = director.player().position();

    let level = director
        .level_mut()
        .as_any_mut()
        .downcast_mut::<HomeLevel>()
        .expect("home active");
    level.exit_mut().sprite.position = player_position + Vec2::new(5.0, 0.0);

    assert_eq!(idle_tick(&mut director), SceneCommand::None);

    assert_eq!(director.level_name(), LevelName::OutsideLeave);
    assert_eq!(director.player().position(), Vec2::new(400.0, 375.0));
    assert_eq!(director.player().score(), 3);
    assert_eq!(director.player().sprite.id, player_id);
    assert!(director.player().flags.outside);
    assert!(director.intro_complete());
}

#[test]
fn foreign_hive_ends_when_the_clock_runs_out() {
    let mut director = director_at(LevelName::ForeignHive);
    assert_eq!(
        director.level().status_line().as_deref(),
        Some("TIME LEFT: 30")
    );

    for _ in 0..30 {
        idle_tick(&mut director);
    }
    assert_eq!(
        director.level().status_line().as_deref(),
        Some("TIME LEFT: 29")
    );

    // 29.9 s in, still inside.
    for _ in 30..1794 {
        idle_tick(&mut director);
    }
    assert_eq!(director.level_name(), LevelName::ForeignHive);
    assert_eq!(
        director.level().status_line().as_deref(),
        Some("TIME LEFT: 0")
    );

    // 30.01 s.
    for _ in 1794..1801 {
        idle_tick(&mut director);
    }
    assert_eq!(director.level_name(), LevelName::OutsideReturn);
}

#[test]
fn level_change_keeps_only_the_player() {
    let mut director = director_at(LevelName::ForeignHive);
    director.player_mut().add_score(4);
    let player_id = director.player().sprite.id;
    assert_eq!(count_of(director.level(), EntityKind::Honey), 15);
    assert_eq!(count_of(director.level(), EntityKind::EnemyBee), 75);

    director
        .change_level(LevelName::OutsideReturn)
        .expect("outside return");
    assert_eq!(director.player().sprite.id, player_id);
    assert_eq!(director.player().score(), 4);
    assert_eq!(count_of(director.level(), EntityKind::Honey), 0);
    assert_eq!(count_of(director.level(), EntityKind::EnemyBee), 0);
    assert_eq!(count_of(director.level(), EntityKind::Wasp), 0);

    director.change_level(LevelName::Home).expect("home");
    assert_eq!(director.player().score(), 4);
    assert_eq!(count_of(director.level(), EntityKind::FriendlyBee), 20);
    assert_eq!(count_of(director.level(), EntityKind::Exit), 1);
    assert_eq!(count_of(director.level(), EntityKind::Wasp), 0);
}

#[test]
fn honey_scores_once() {
    let mut director =
        foreign_hive_with_single_honey(GameConfig::default(), Vec2::new(400.0, 400.0));

    idle_tick(&mut director);
    assert_eq!(director.player().score(), 1);
    assert_eq!(count_of(director.level(), EntityKind::Honey), 0);

    for _ in 0..10 {
        idle_tick(&mut director);
    }
    assert_eq!(director.player().score(), 1);
}

#[test]
fn flying_passes_over_honey() {
    let mut director =
        foreign_hive_with_single_honey(GameConfig::default(), Vec2::new(400.0, 400.0));

    director.update(DT, &held(&[InputAction::Fly]));
    assert!(director.player().flags.flying);
    assert_eq!(director.player().score(), 0);
    assert_eq!(count_of(director.level(), EntityKind::Honey), 1);

    director.update(DT, &InputSnapshot::empty());
    assert!(!director.player().flags.flying);
    assert_eq!(director.player().score(), 1);
}

#[test]
fn bee_contact_is_cosmetic_by_default() {
    let config = GameConfig::default();
    let mut director =
        foreign_hive_with_single_honey(config.clone(), Vec2::new(100.0, 600.0));
    director.player_mut().add_score(2);
    director.player_mut().sprite.position = Vec2::new(400.0, 400.0);

    let mut bee = EnemyBee::new(SpriteId(90_001), &config);
    bee.sprite.position = Vec2::new(410.0, 400.0);
    foreign_hive(&mut director).bees_mut().push(bee);

    idle_tick(&mut director);
    assert_eq!(director.player().score(), 2);
    let bee = foreign_hive(&mut director)
        .bees_mut()
        .iter()
        .next()
        .map(|bee| bee.sprite.texture_key());
    assert_eq!(bee, Some(Some(textures::ENEMY_BEE_FLUTTER)));
}

#[test]
fn bee_contact_penalty_applies_once_per_contact() {
    let config = GameConfig {
        enemy_bee_contact_penalty: 1,
        ..GameConfig::default()
    };
    let mut director =
        foreign_hive_with_single_honey(config.clone(), Vec2::new(100.0, 600.0));
    director.player_mut().add_score(2);
    director.player_mut().sprite.position = Vec2::new(400.0, 400.0);

    let mut bee = EnemyBee::new(SpriteId(90_001), &config);
    bee.sprite.position = Vec2::new(410.0, 400.0);
    foreign_hive(&mut director).bees_mut().push(bee);

    for _ in 0..5 {
        idle_tick(&mut director);
    }
    assert_eq!(director.player().score(), 1);

    director.player_mut().sprite.position = Vec2::new(600.0, 300.0);
    idle_tick(&mut director);
    director.player_mut().sprite.position = Vec2::new(400.0, 400.0);
    idle_tick(&mut director);
    idle_tick(&mut director);
    assert_eq!(director.player().score(), 0);
}

#[test]
fn lost_scent_sends_the_player_home() {
    let config = GameConfig::default();
    let mut director = director_at(LevelName::OutsideLeave);
    let mut ids = SpriteIdAllocator::default();
    outside_leave(&mut director).push_scent_at(&mut ids, &config, Vec2::new(700.0, 120.0));

    idle_tick(&mut director);
    assert_eq!(director.level_name(), LevelName::Home);
}

#[test]
fn collected_scent_cannot_fail_the_level_later() {
    let config = GameConfig::default();
    let mut director = director_at(LevelName::OutsideLeave);
    let mut ids = SpriteIdAllocator::default();
    let spawn = director.player().position();
    outside_leave(&mut director).push_scent_at(&mut ids, &config, spawn);

    idle_tick(&mut director);
    assert!(outside_leave(&mut director).scents().is_empty());

    outside_leave(&mut director).core_mut().set_scroll(600.0);
    idle_tick(&mut director);
    assert_eq!(director.level_name(), LevelName::OutsideLeave);
}

#[test]
fn full_scroll_reaches_the_foreign_hive() {
    let mut director = director_at(LevelName::OutsideLeave);
    let max_scroll = GameConfig::default().max_scroll();
    outside_leave(&mut director)
        .core_mut()
        .set_scroll(max_scroll - 1.0);

    idle_tick(&mut director);
    assert_eq!(director.level_name(), LevelName::ForeignHive);
}

#[test]
fn scent_trail_keeps_coming_while_flying_out() {
    let mut director = director_at(LevelName::OutsideLeave);
    // Two intervals of 0.75 s.
    for _ in 0..91 {
        idle_tick(&mut director);
    }
    assert_eq!(director.level_name(), LevelName::OutsideLeave);
    assert_eq!(outside_leave(&mut director).scents().len(), 2);
}

#[test]
fn wasp_sting_hurts_once_until_clear() {
    let config = GameConfig::default();
    let mut director = director_at(LevelName::OutsideReturn);
    director.player_mut().add_score(2);
    let mut wasp = Wasp::new(SpriteId(90_002), &config);
    wasp.sprite.position = director.player().position();
    outside_return(&mut director).wasps_mut().push(wasp);

    idle_tick(&mut director);
    assert!(director.player().flags.hurt);
    assert_eq!(director.player().score(), 1);

    idle_tick(&mut director);
    assert_eq!(director.player().score(), 1);

    outside_return(&mut director).wasps_mut().clear();
    idle_tick(&mut director);
    assert!(!director.player().flags.hurt);
}

#[test]
fn flying_dodges_wasps() {
    let config = GameConfig::default();
    let mut director = director_at(LevelName::OutsideReturn);
    director.player_mut().add_score(1);
    let mut wasp = Wasp::new(SpriteId(90_003), &config);
    wasp.sprite.position = director.player().position();
    outside_return(&mut director).wasps_mut().push(wasp);

    director.update(DT, &held(&[InputAction::Fly]));
    assert!(!director.player().flags.hurt);
    assert_eq!(director.player().score(), 1);
}

#[test]
fn far_wasps_are_dropped() {
    let config = GameConfig::default();
    let mut director = director_at(LevelName::OutsideReturn);
    let mut wasp = Wasp::new(SpriteId(90_004), &config);
    wasp.sprite.position = director.player().position() + Vec2::new(0.0, 5000.0);
    outside_return(&mut director).wasps_mut().push(wasp);

    idle_tick(&mut director);
    assert!(outside_return(&mut director).wasps().is_empty());
}

#[test]
fn wasp_attacks_arrive_on_schedule() {
    let config = GameConfig {
        wasp_wave_chance: 0.0,
        ..GameConfig::default()
    };
    let mut director = director_with(config, LevelName::OutsideReturn);
    for _ in 0..179 {
        idle_tick(&mut director);
    }
    assert_eq!(count_of(director.level(), EntityKind::Wasp), 0);
    idle_tick(&mut director);
    idle_tick(&mut director);

    let player = director.player().position();
    let level = outside_return(&mut director);
    assert_eq!(level.wasps().len(), 1);
    let wasp = &level.wasps().as_slice()[0];
    let speed = wasp.sprite.velocity.length();
    assert!((420.0..=480.0).contains(&speed), "speed={speed}");
    let to_player = player - wasp.sprite.position;
    let closing = to_player.x * wasp.sprite.velocity.x + to_player.y * wasp.sprite.velocity.y;
    assert!(closing > 0.0);
}

#[test]
fn wave_attacks_bring_three_wasps() {
    let config = GameConfig {
        wasp_wave_chance: 1.0,
        ..GameConfig::default()
    };
    let mut director = director_with(config, LevelName::OutsideReturn);
    for _ in 0..181 {
        idle_tick(&mut director);
    }
    let level = outside_return(&mut director);
    assert_eq!(level.wasps().len(), 3);
    let velocities: Vec<Vec2> = level
        .wasps()
        .iter()
        .map(|wasp| wasp.sprite.velocity)
        .collect();
    assert!(velocities.iter().all(|v| *v == velocities[0]));
}

#[test]
fn flight_home_ends_at_home() {
    let mut director = director_at(LevelName::OutsideReturn);
    let max_scroll = GameConfig::default().max_scroll();
    outside_return(&mut director)
        .core_mut()
        .set_scroll(max_scroll);

    idle_tick(&mut director);
    assert_eq!(director.level_name(), LevelName::Home);
    assert!(!director.player().flags.outside);
}

#[test]
fn teardown_stops_periodic_spawns() {
    let config = GameConfig::default();
    let mut ids = SpriteIdAllocator::default();
    let mut rng = GameRng::seed_from_u64(9);
    let mut player = Player::new(ids.allocate(), &config);
    let mut level = OutsideLeaveLevel::new(&config, &mut ids);

    let mut ctx = LevelContext {
        player: &mut player,
        rng: &mut rng,
        config: &config,
        ids: &mut ids,
    };
    level.setup(&mut ctx).expect("setup");
    assert_eq!(level.core().schedule.active_count(), 1);
    assert_eq!(level.teardown(), 1);

    for _ in 0..120 {
        level.on_tick(DT, &mut ctx);
    }
    assert!(level.scents().is_empty());
}

#[test]
fn held_keys_steer_the_player_until_released() {
    let mut director = director_at(LevelName::Home);
    director.skip_pause();

    director.update(DT, &held(&[InputAction::MoveUp, InputAction::MoveRight]));
    assert_eq!(director.player().sprite.velocity, Vec2::new(105.0, 105.0));
    assert_eq!(director.player().sprite.angle_degrees, 0.0);
    assert!(director.player().flags.walking);

    director.update(DT, &InputSnapshot::empty());
    assert_eq!(director.player().sprite.velocity, Vec2::ZERO);
    assert!(!director.player().flags.walking);
}

#[test]
fn keys_held_across_a_level_change_do_not_leak() {
    let mut director = director_at(LevelName::Home);
    let input = held(&[InputAction::MoveLeft]);
    director.update(DT, &input);
    assert_eq!(director.player().sprite.velocity, Vec2::new(-105.0, 0.0));

    director
        .change_level(LevelName::ForeignHive)
        .expect("foreign hive");
    director.skip_pause();
    director.update(DT, &input);
    assert_eq!(director.player().sprite.velocity, Vec2::ZERO);
    assert!(!director.level().core().keys.any());
}

#[test]
fn transition_pause_freezes_the_new_level() {
    let mut director = director_at(LevelName::Home);
    director
        .change_level(LevelName::ForeignHive)
        .expect("foreign hive");
    assert!(director.is_paused());

    for _ in 0..20 {
        idle_tick(&mut director);
    }
    assert_eq!(
        director.level().status_line().as_deref(),
        Some("TIME LEFT: 30")
    );
    for _ in 0..20 {
        idle_tick(&mut director);
    }
    assert!(!director.is_paused());
}

#[test]
fn fly_key_held_through_a_transition_pause_takes_effect() {
    let mut director = director_at(LevelName::Home);
    let flying = held(&[InputAction::Fly]);
    director.update(DT, &flying);
    assert!(director.player().flags.flying);

    director
        .change_level(LevelName::ForeignHive)
        .expect("foreign hive");
    assert!(!director.player().flags.flying);
    for _ in 0..60 {
        director.update(DT, &flying);
    }
    assert!(director.player().flags.flying);

    director
        .change_level(LevelName::OutsideReturn)
        .expect("outside return");
    for _ in 0..10 {
        idle_tick(&mut director);
    }
    for _ in 0..50 {
        director.update(DT, &flying);
    }
    assert!(director.player().flags.flying);
}

#[test]
fn debug_keys_cycle_levels_only_when_enabled() {
    let mut director = director_at(LevelName::Home);
    director.update(DT, &held(&[InputAction::DebugNextLevel]));
    assert_eq!(director.level_name(), LevelName::Home);

    let config = GameConfig {
        debug_level_keys: true,
        ..GameConfig::default()
    };
    let mut director = director_with(config, LevelName::Home);
    director.update(DT, &held(&[InputAction::DebugPreviousLevel]));
    assert_eq!(director.level_name(), LevelName::OutsideReturn);

    director.skip_pause();
    director.update(DT, &InputSnapshot::empty());
    director.update(DT, &held(&[InputAction::DebugNextLevel]));
    assert_eq!(director.level_name(), LevelName::Home);
}

#[test]
fn unknown_level_names_are_rejected() {
    let mut director = director_at(LevelName::Home);
    let err = director
        .change_level_by_name("beehive")
        .expect_err("unknown level");
    assert!(matches!(err, DirectorError::UnknownLevel(_)));
    assert_eq!(director.level_name(), LevelName::Home);

    director
        .change_level_by_name("ForeignHive")
        .expect("pascal case name");
    assert_eq!(director.level_name(), LevelName::ForeignHive);
}

#[test]
fn overcrowded_level_fails_setup() {
    let config = GameConfig {
        friendly_bee_count: 2000,
        placement_max_attempts: 20,
        ..GameConfig::default()
    };
    let result = LevelDirector::new(
        config,
        Messages::default(),
        GameRng::seed_from_u64(1),
        MetricsHandle::default(),
        LevelName::Home,
    );
    assert!(matches!(
        result,
        Err(DirectorError::Setup {
            level: LevelName::Home,
            ..
        })
    ));
}

#[test]
fn quit_action_stops_the_game() {
    let mut director = director_at(LevelName::Home);
    assert_eq!(
        director.update(DT, &held(&[InputAction::Quit])),
        SceneCommand::Quit
    );
    assert_eq!(
        director.update(DT, &InputSnapshot::empty().with_quit_requested(true)),
        SceneCommand::Quit
    );
}

#[test]
fn score_floor_holds_for_random_event_sequences() {
    let mut rng = GameRng::seed_from_u64(77);
    let config = GameConfig::default();
    for _ in 0..200 {
        let mut player = Player::new(SpriteId(0), &config);
        let mut expected: i64 = 0;
        for _ in 0..rng.gen_range(1..60) {
            match rng.gen_range(0..3) {
                0 => {
                    player.add_score(1);
                    expected += 1;
                }
                1 => {
                    player.lose_score(1);
                    expected = (expected - 1).max(0);
                }
                _ => {
                    let penalty = rng.gen_range(0..4);
                    player.lose_score(penalty);
                    expected = (expected - i64::from(penalty)).max(0);
                }
            }
            assert_eq!(i64::from(player.score()), expected);
        }
    }
}

#[test]
fn render_shows_intro_then_level_message() {
    let mut director = director_at(LevelName::Home);
    for _ in 0..10 {
        idle_tick(&mut director);
    }
    let mut frame = RenderFrame::new();
    director.render(&mut frame);
    let texts: Vec<String> = frame
        .overlay()
        .iter()
        .filter_map(|item| match item {
            OverlayItem::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect();
    let intro = Messages::default().intro;
    assert_eq!(texts.first().map(String::as_str), Some(&intro[..5]));
    assert_eq!(texts.last().map(String::as_str), Some("HONEY: 0"));
    assert!(!frame.sprites().is_empty());

    director
        .change_level(LevelName::OutsideLeave)
        .expect("outside");
    let mut frame = RenderFrame::new();
    director.render(&mut frame);
    let first_text = frame.overlay().iter().find_map(|item| match item {
        OverlayItem::Text { text, .. } => Some(text.clone()),
        _ => None,
    });
    let expected = Messages::default().outside_leave;
    assert!(expected.starts_with(first_text.as_deref().unwrap_or("-")));
}

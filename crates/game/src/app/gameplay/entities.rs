use hive_engine::{Aabb, Collider, RenderableKind, Sprite, SpriteId, Vec2};
use rand::Rng;

use crate::app::config::GameConfig;

pub(crate) mod textures {
    pub(crate) const PLAYER_IDLE: &str = "player/idle";
    pub(crate) const PLAYER_WALK: [&str; 2] = ["player/walk_0", "player/walk_1"];
    pub(crate) const PLAYER_FLY: [&str; 2] = ["player/fly_0", "player/fly_1"];
    pub(crate) const PLAYER_HURT: [&str; 2] = ["player/hurt_0", "player/hurt_1"];
    pub(crate) const PLAYER_OUTSIDE: [&str; 2] = ["player/outside_0", "player/outside_1"];
    pub(crate) const ENEMY_BEE_IDLE: &str = "bee/enemy_idle";
    pub(crate) const ENEMY_BEE_FLUTTER: &str = "bee/enemy_flutter";
    pub(crate) const FRIENDLY_BEE: &str = "bee/friend";
    pub(crate) const WASP_FLY: [&str; 2] = ["wasp/fly_0", "wasp/fly_1"];
    pub(crate) const HONEY: &str = "honey";
    pub(crate) const SCENT: &str = "scent";
    pub(crate) const EXIT_HOME: &str = "exit/home";
    pub(crate) const EXIT_FOREIGN: &str = "exit/foreign";
}

const PLAYER_COLOR: [u8; 4] = [250, 204, 48, 255];
const ENEMY_BEE_COLOR: [u8; 4] = [196, 110, 28, 255];
const FRIENDLY_BEE_COLOR: [u8; 4] = [236, 220, 130, 255];
const WASP_COLOR: [u8; 4] = [220, 56, 40, 255];
const HONEY_COLOR: [u8; 4] = [255, 168, 0, 255];
const SCENT_COLOR: [u8; 4] = [190, 130, 230, 255];
const EXIT_COLOR: [u8; 4] = [40, 24, 16, 255];

/// Cardinal facing. Angles are counter-clockwise from up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Facing {
    Up,
    Left,
    Down,
    Right,
}

impl Facing {
    pub(crate) fn angle_degrees(self) -> f32 {
        match self {
            Facing::Up => 0.0,
            Facing::Left => 90.0,
            Facing::Down => 180.0,
            Facing::Right => 270.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum EntityKind {
    Player,
    EnemyBee,
    FriendlyBee,
    Wasp,
    Honey,
    Scent,
    Wall,
    Exit,
}

impl EntityKind {
    /// Name of the sprite collection holding this kind.
    pub(crate) fn category(self) -> &'static str {
        match self {
            EntityKind::Player => "Player",
            EntityKind::EnemyBee | EntityKind::FriendlyBee => "Bees",
            EntityKind::Wasp => "Wasps",
            EntityKind::Honey => "Honey",
            EntityKind::Scent => "Scents",
            EntityKind::Wall => "Walls",
            EntityKind::Exit => "Exits",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PlayerFlags {
    pub(crate) walking: bool,
    pub(crate) flying: bool,
    pub(crate) hurt: bool,
    pub(crate) outside: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Animation {
    ticks: u32,
    frame: usize,
    ticks_per_frame: u32,
}

impl Animation {
    pub(crate) fn new(ticks_per_frame: u32) -> Self {
        Self {
            ticks: 0,
            frame: 0,
            ticks_per_frame: ticks_per_frame.max(1),
        }
    }

    /// Counts one tick. Every `ticks_per_frame` ticks, starting with the
    /// first, returns the next texture of `frames`.
    pub(crate) fn step(&mut self, frames: &[&'static str]) -> Option<&'static str> {
        let due = self.ticks % self.ticks_per_frame == 0;
        self.ticks = self.ticks.wrapping_add(1);
        if !due || frames.is_empty() {
            return None;
        }
        let index = self.frame % frames.len();
        self.frame = (index + 1) % frames.len();
        Some(frames[index])
    }

    fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }
}

/// The bee the user steers. Its score and identity survive level changes.
#[derive(Debug, Clone)]
pub(crate) struct Player {
    pub(crate) sprite: Sprite,
    pub(crate) flags: PlayerFlags,
    score: u32,
    animation: Animation,
}

impl Player {
    pub(crate) fn new(id: SpriteId, config: &GameConfig) -> Self {
        let half = config.player_half_extent;
        let mut sprite = Sprite::new(
            id,
            Vec2::new(half, half),
            RenderableKind::Placeholder(PLAYER_COLOR),
        );
        sprite.assign_texture(textures::PLAYER_IDLE);
        Self {
            sprite,
            flags: PlayerFlags::default(),
            score: 0,
            animation: Animation::new(config.ticks_per_frame()),
        }
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn add_score(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }

    /// Never drops below zero.
    pub(crate) fn lose_score(&mut self, amount: u32) {
        self.score = self.score.saturating_sub(amount);
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.sprite.position
    }

    /// Clears what belongs to the previous level; score and facing stay.
    pub(crate) fn reset_for_level(&mut self) {
        self.sprite.velocity = Vec2::ZERO;
        self.flags = PlayerFlags::default();
    }

    pub(crate) fn update_animation(&mut self) {
        let frames: &[&'static str] = if self.flags.hurt {
            &textures::PLAYER_HURT
        } else if self.flags.flying {
            &textures::PLAYER_FLY
        } else if self.flags.walking {
            &textures::PLAYER_WALK
        } else if self.flags.outside {
            &textures::PLAYER_OUTSIDE
        } else {
            self.animation.tick();
            self.sprite.assign_texture(textures::PLAYER_IDLE);
            return;
        };
        if let Some(key) = self.animation.step(frames) {
            self.sprite.assign_texture(key);
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EnemyBee {
    pub(crate) sprite: Sprite,
    pub(crate) fluttering: bool,
    in_contact: bool,
}

impl EnemyBee {
    pub(crate) fn new(id: SpriteId, config: &GameConfig) -> Self {
        let half = config.enemy_bee_half_extent;
        let mut sprite = Sprite::new(
            id,
            Vec2::new(half, half),
            RenderableKind::Placeholder(ENEMY_BEE_COLOR),
        );
        sprite.assign_texture(textures::ENEMY_BEE_IDLE);
        Self {
            sprite,
            fluttering: false,
            in_contact: false,
        }
    }

    /// Marks player contact this tick. Returns true when the contact is new.
    pub(crate) fn touch(&mut self) -> bool {
        self.fluttering = true;
        !std::mem::replace(&mut self.in_contact, true)
    }

    pub(crate) fn release(&mut self) {
        self.in_contact = false;
    }

    pub(crate) fn update_animation<R: Rng + ?Sized>(&mut self, rng: &mut R, rotate_chance: u32) {
        if self.fluttering {
            self.sprite.assign_texture(textures::ENEMY_BEE_FLUTTER);
            self.fluttering = false;
            return;
        }
        self.sprite.assign_texture(textures::ENEMY_BEE_IDLE);
        if rng.gen_range(0..=rotate_chance) == rotate_chance {
            let delta: f32 = rng.gen_range(-45.0..45.0);
            self.sprite.angle_degrees = (self.sprite.angle_degrees + delta).rem_euclid(360.0);
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FriendlyBee {
    pub(crate) sprite: Sprite,
}

impl FriendlyBee {
    pub(crate) fn new(id: SpriteId, config: &GameConfig) -> Self {
        let half = config.friendly_bee_half_extent;
        let mut sprite = Sprite::new(
            id,
            Vec2::new(half, half),
            RenderableKind::Placeholder(FRIENDLY_BEE_COLOR),
        );
        sprite.assign_texture(textures::FRIENDLY_BEE);
        Self { sprite }
    }

    pub(crate) fn fidget<R: Rng + ?Sized>(&mut self, rng: &mut R, rotate_chance: u32) {
        if rng.gen_range(0..=rotate_chance) == rotate_chance {
            self.sprite.angle_degrees = rng.gen_range(0.0..360.0);
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Wasp {
    pub(crate) sprite: Sprite,
    animation: Animation,
}

impl Wasp {
    pub(crate) fn new(id: SpriteId, config: &GameConfig) -> Self {
        let half = config.wasp_half_extent;
        let mut sprite = Sprite::new(
            id,
            Vec2::new(half, half),
            RenderableKind::Placeholder(WASP_COLOR),
        );
        sprite.assign_texture(textures::WASP_FLY[0]);
        Self {
            sprite,
            animation: Animation::new(config.ticks_per_frame()),
        }
    }

    pub(crate) fn update_animation(&mut self) {
        if let Some(key) = self.animation.step(&textures::WASP_FLY) {
            self.sprite.assign_texture(key);
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Honey {
    pub(crate) sprite: Sprite,
}

impl Honey {
    pub(crate) fn new(id: SpriteId, config: &GameConfig) -> Self {
        let half = config.honey_half_extent;
        let mut sprite = Sprite::new(
            id,
            Vec2::new(half, half),
            RenderableKind::Placeholder(HONEY_COLOR),
        );
        sprite.assign_texture(textures::HONEY);
        Self { sprite }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Scent {
    pub(crate) sprite: Sprite,
}

impl Scent {
    pub(crate) fn new(id: SpriteId, config: &GameConfig) -> Self {
        let half = config.scent_half_extent;
        let mut sprite = Sprite::new(
            id,
            Vec2::new(half, half),
            RenderableKind::Placeholder(SCENT_COLOR),
        );
        sprite.assign_texture(textures::SCENT);
        Self { sprite }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkerKind {
    Wall,
    Exit,
}

/// Static rectangle. Walls block movement and are never drawn; exits are
/// trigger volumes.
#[derive(Debug, Clone)]
pub(crate) struct Marker {
    pub(crate) sprite: Sprite,
    pub(crate) kind: MarkerKind,
}

impl Marker {
    pub(crate) fn wall(id: SpriteId, bounds: Aabb) -> Self {
        let half = Vec2::new(bounds.width() * 0.5, bounds.height() * 0.5);
        let sprite = Sprite::new(id, half, RenderableKind::Hidden).at(bounds.center());
        Self {
            sprite,
            kind: MarkerKind::Wall,
        }
    }

    pub(crate) fn exit(id: SpriteId, config: &GameConfig, texture: &'static str) -> Self {
        let half = config.exit_half_extent;
        let mut sprite = Sprite::new(
            id,
            Vec2::new(half, half),
            RenderableKind::Placeholder(EXIT_COLOR),
        );
        sprite.assign_texture(texture);
        Self {
            sprite,
            kind: MarkerKind::Exit,
        }
    }

    pub(crate) fn entity_kind(&self) -> EntityKind {
        match self.kind {
            MarkerKind::Wall => EntityKind::Wall,
            MarkerKind::Exit => EntityKind::Exit,
        }
    }
}

macro_rules! sprite_backed {
    ($($entity:ty),* $(,)?) => {
        $(
            impl AsRef<Sprite> for $entity {
                fn as_ref(&self) -> &Sprite {
                    &self.sprite
                }
            }

            impl Collider for $entity {
                fn hitbox(&self) -> Aabb {
                    self.sprite.hitbox()
                }
            }
        )*
    };
}

sprite_backed!(Player, EnemyBee, FriendlyBee, Wasp, Honey, Scent, Marker);

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn player() -> Player {
        Player::new(SpriteId(1), &GameConfig::default())
    }

    #[test]
    fn score_never_goes_negative() {
        let mut player = player();
        player.lose_score(3);
        assert_eq!(player.score(), 0);
        player.add_score(2);
        player.lose_score(1);
        player.lose_score(5);
        assert_eq!(player.score(), 0);
    }

    #[test]
    fn animation_prefers_hurt_over_flying_and_walking() {
        let mut player = player();
        player.flags = PlayerFlags {
            walking: true,
            flying: true,
            hurt: true,
            outside: true,
        };
        player.update_animation();
        assert_eq!(player.sprite.texture_key(), Some(textures::PLAYER_HURT[0]));

        let mut player = self::player();
        player.flags.walking = true;
        player.flags.flying = true;
        player.update_animation();
        assert_eq!(player.sprite.texture_key(), Some(textures::PLAYER_FLY[0]));
    }

    #[test]
    fn animation_advances_every_ticks_per_frame() {
        let mut player = player();
        player.flags.walking = true;
        let mut seen = Vec::new();
        for _ in 0..13 {
            player.update_animation();
            seen.push(player.sprite.texture_key());
        }
        // 20 / animation_speed(3) = 6 ticks per frame.
        assert_eq!(seen[0], Some(textures::PLAYER_WALK[0]));
        assert_eq!(seen[5], Some(textures::PLAYER_WALK[0]));
        assert_eq!(seen[6], Some(textures::PLAYER_WALK[1]));
        assert_eq!(seen[12], Some(textures::PLAYER_WALK[0]));
    }

    #[test]
    fn idle_player_shows_idle_texture() {
        let mut player = player();
        player.flags.walking = true;
        player.update_animation();
        player.flags.walking = false;
        player.update_animation();
        assert_eq!(player.sprite.texture_key(), Some(textures::PLAYER_IDLE));
    }

    #[test]
    fn flutter_lasts_one_step() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut bee = EnemyBee::new(SpriteId(2), &GameConfig::default());
        assert!(bee.touch());
        assert!(!bee.touch());
        bee.update_animation(&mut rng, 100);
        assert_eq!(bee.sprite.texture_key(), Some(textures::ENEMY_BEE_FLUTTER));
        assert!(!bee.fluttering);
        bee.update_animation(&mut rng, 100);
        assert_eq!(bee.sprite.texture_key(), Some(textures::ENEMY_BEE_IDLE));

        bee.release();
        assert!(bee.touch());
    }

    #[test]
    fn fidget_keeps_angles_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let config = GameConfig::default();
        let mut enemy = EnemyBee::new(SpriteId(3), &config);
        let mut friend = FriendlyBee::new(SpriteId(4), &config);
        let mut enemy_turns = 0;
        for _ in 0..2000 {
            let before = enemy.sprite.angle_degrees;
            enemy.update_animation(&mut rng, 0);
            friend.fidget(&mut rng, 0);
            if enemy.sprite.angle_degrees != before {
                enemy_turns += 1;
            }
            assert!((0.0..360.0).contains(&enemy.sprite.angle_degrees));
            assert!((0.0..360.0).contains(&friend.sprite.angle_degrees));
        }
        assert!(enemy_turns > 1000);
    }

    #[test]
    fn walls_are_hidden_and_cover_their_bounds() {
        let bounds = Aabb::new(Vec2::new(-10.0, 0.0), Vec2::new(0.0, 600.0));
        let wall = Marker::wall(SpriteId(5), bounds);
        assert_eq!(wall.sprite.renderable, RenderableKind::Hidden);
        assert_eq!(wall.hitbox(), bounds);
        assert_eq!(wall.entity_kind().category(), "Walls");
    }
}

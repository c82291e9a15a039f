use hive_engine::{InputAction, Vec2};

use super::entities::Facing;

/// Keys a level reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ControlKey {
    Up,
    Down,
    Left,
    Right,
    Fly,
}

impl ControlKey {
    pub(crate) const ALL: [ControlKey; 5] = [
        ControlKey::Up,
        ControlKey::Down,
        ControlKey::Left,
        ControlKey::Right,
        ControlKey::Fly,
    ];

    pub(crate) fn action(self) -> InputAction {
        match self {
            ControlKey::Up => InputAction::MoveUp,
            ControlKey::Down => InputAction::MoveDown,
            ControlKey::Left => InputAction::MoveLeft,
            ControlKey::Right => InputAction::MoveRight,
            ControlKey::Fly => InputAction::Fly,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DirectionFlags {
    pub(crate) up: bool,
    pub(crate) down: bool,
    pub(crate) left: bool,
    pub(crate) right: bool,
}

impl DirectionFlags {
    /// Records a press or release. Returns false for the fly key, which is not
    /// a direction.
    pub(crate) fn set(&mut self, key: ControlKey, is_down: bool) -> bool {
        match key {
            ControlKey::Up => self.up = is_down,
            ControlKey::Down => self.down = is_down,
            ControlKey::Left => self.left = is_down,
            ControlKey::Right => self.right = is_down,
            ControlKey::Fly => return false,
        }
        true
    }

    pub(crate) fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Steering {
    pub(crate) velocity: Vec2,
    /// `None` keeps the current facing.
    pub(crate) facing: Option<Facing>,
}

/// Velocity and facing for a set of held direction keys. Opposite keys cancel
/// on their axis. Both axes apply at full `speed`, so diagonals are faster.
/// Vertical movement decides the facing; horizontal facing applies only when
/// nothing moves vertically.
pub(crate) fn resolve(flags: DirectionFlags, speed: f32) -> Steering {
    let mut velocity = Vec2::ZERO;
    let mut facing = None;

    if flags.up && !flags.down {
        velocity.y = speed;
        facing = Some(Facing::Up);
    } else if flags.down && !flags.up {
        velocity.y = -speed;
        facing = Some(Facing::Down);
    }

    if flags.left && !flags.right {
        velocity.x = -speed;
        facing = facing.or(Some(Facing::Left));
    } else if flags.right && !flags.left {
        velocity.x = speed;
        facing = facing.or(Some(Facing::Right));
    }

    Steering { velocity, facing }
}

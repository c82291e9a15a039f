use super::scene::{Aabb, Sprite};

pub trait Collider {
    fn hitbox(&self) -> Aabb;
}

impl Collider for Aabb {
    fn hitbox(&self) -> Aabb {
        *self
    }
}

impl Collider for Sprite {
    fn hitbox(&self) -> Aabb {
        Sprite::hitbox(self)
    }
}

pub fn collides<A, B>(a: &A, b: &B) -> bool
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    a.hitbox().intersects(&b.hitbox())
}

pub fn collides_with_any<'a, S, T, I>(subject: &S, others: I) -> bool
where
    S: Collider + ?Sized,
    T: Collider + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let hitbox = subject.hitbox();
    others
        .into_iter()
        .any(|other| hitbox.intersects(&other.hitbox()))
}

/// Indices into `others` of every collider overlapping `subject`, in order.
pub fn collisions<'a, S, T, I>(subject: &S, others: I) -> Vec<usize>
where
    S: Collider + ?Sized,
    T: Collider + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let hitbox = subject.hitbox();
    others
        .into_iter()
        .enumerate()
        .filter(|(_, other)| hitbox.intersects(&other.hitbox()))
        .map(|(index, _)| index)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KinematicOutcome {
    pub blocked_x: bool,
    pub blocked_y: bool,
}

/// Moves `subject` by `velocity * dt`, one axis at a time. An axis step that
/// would end inside a blocker is undone; velocity is left untouched.
pub fn kinematic_update<T: Collider>(
    subject: &mut Sprite,
    blockers: &[T],
    dt_seconds: f32,
) -> KinematicOutcome {
    let mut outcome = KinematicOutcome::default();
    let start = subject.position;

    subject.position.x += subject.velocity.x * dt_seconds;
    if subject.velocity.x != 0.0 && collides_with_any(&*subject, blockers) {
        subject.position.x = start.x;
        outcome.blocked_x = true;
    }

    subject.position.y += subject.velocity.y * dt_seconds;
    if subject.velocity.y != 0.0 && collides_with_any(&*subject, blockers) {
        subject.position.y = start.y;
        outcome.blocked_y = true;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{RenderableKind, SpriteId, Vec2};

    fn body(x: f32, y: f32, half: f32) -> Sprite {
        Sprite::new(SpriteId(0), Vec2::new(half, half), RenderableKind::Hidden)
            .at(Vec2::new(x, y))
    }

    fn wall(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Aabb {
        Aabb::new(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y))
    }

    #[test]
    fn collisions_report_overlapping_indices_in_order() {
        let subject = body(0.0, 0.0, 10.0);
        let others = [
            body(15.0, 0.0, 10.0),
            body(100.0, 0.0, 10.0),
            body(-5.0, -5.0, 2.0),
        ];

        assert_eq!(collisions(&subject, &others), vec![0, 2]);
        assert!(collides_with_any(&subject, &others));
        assert!(collides(&subject, &others[0]));
        assert!(!collides(&subject, &others[1]));
    }

    #[test]
    fn collides_with_any_is_false_for_empty_list() {
        let subject = body(0.0, 0.0, 10.0);
        let none: [Aabb; 0] = [];
        assert!(!collides_with_any(&subject, &none));
        assert!(collisions(&subject, &none).is_empty());
    }

    #[test]
    fn kinematic_update_moves_freely_without_blockers() {
        let mut subject = body(0.0, 0.0, 5.0);
        subject.velocity = Vec2::new(60.0, -30.0);
        let blockers: [Aabb; 0] = [];

        let outcome = kinematic_update(&mut subject, &blockers, 0.5);

        assert_eq!(outcome, KinematicOutcome::default());
        assert_eq!(subject.position, Vec2::new(30.0, -15.0));
    }

    #[test]
    fn kinematic_update_halts_only_the_blocked_axis() {
        let mut subject = body(0.0, 0.0, 5.0);
        subject.velocity = Vec2::new(20.0, 20.0);
        let blockers = [wall(10.0, -100.0, 20.0, 100.0)];

        let outcome = kinematic_update(&mut subject, &blockers, 0.5);

        assert!(outcome.blocked_x);
        assert!(!outcome.blocked_y);
        assert_eq!(subject.position, Vec2::new(0.0, 10.0));
        assert_eq!(subject.velocity, Vec2::new(20.0, 20.0));
    }
}

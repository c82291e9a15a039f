use hive_engine::{Aabb, Collider, Sprite, Vec2};
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub(crate) enum PlacementError {
    #[error(
        "placement region {width}x{height} with padding {padding} cannot hold a sprite with half extents ({half_x}, {half_y})"
    )]
    RegionTooSmall {
        width: f32,
        height: f32,
        padding: f32,
        half_x: f32,
        half_y: f32,
    },
    #[error("no free spot after {attempts} attempts ({obstacle_count} obstacles)")]
    Exhausted {
        attempts: u32,
        obstacle_count: usize,
    },
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PlacementRegion {
    pub(crate) bounds: Aabb,
    pub(crate) padding: f32,
    pub(crate) max_attempts: u32,
}

/// Moves `sprite` to a uniformly random center inside `region` (shrunk by the
/// padding) that overlaps none of `obstacles`.
pub(crate) fn place_randomly<R, T>(
    rng: &mut R,
    sprite: &mut Sprite,
    region: &PlacementRegion,
    obstacles: &[T],
) -> Result<Vec2, PlacementError>
where
    R: Rng + ?Sized,
    T: Collider,
{
    let padding = region.padding.max(0.0);
    let centers = region
        .bounds
        .inset(Vec2::new(padding, padding))
        .ok_or_else(|| too_small(region, sprite))?;
    let attempts = region.max_attempts.max(1);

    for _ in 0..attempts {
        let candidate = Vec2::new(
            rng.gen_range(centers.min.x..=centers.max.x),
            rng.gen_range(centers.min.y..=centers.max.y),
        );
        let hitbox = Aabb::from_center(candidate, sprite.half_extents);
        if !obstacles
            .iter()
            .any(|obstacle| hitbox.intersects(&obstacle.hitbox()))
        {
            sprite.position = candidate;
            return Ok(candidate);
        }
    }

    Err(PlacementError::Exhausted {
        attempts,
        obstacle_count: obstacles.len(),
    })
}

fn too_small(region: &PlacementRegion, sprite: &Sprite) -> PlacementError {
    PlacementError::RegionTooSmall {
        width: region.bounds.width(),
        height: region.bounds.height(),
        padding: region.padding,
        half_x: sprite.half_extents.x,
        half_y: sprite.half_extents.y,
    }
}

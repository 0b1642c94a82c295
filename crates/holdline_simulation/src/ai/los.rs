//! Range + line-of-sight checks for the attack target.
//!
//! Ray from shooter к цели, все хиты вдоль луча. Цель видна, если есть хотя бы
//! один хит по её hitbox'у и ни одно препятствие достаточной высоты не ближе него.

use bevy::prelude::*;

use crate::physics::{HitCollider, RayHit, RaycastService};

/// Max LOS ray length (world units)
pub const LOS_RAY_LENGTH: f32 = 1000.0;

/// Range check: inclusive on the boundary.
pub fn is_target_in_range(shooter: Vec3, target: Option<Vec3>, weapon_range: f32) -> bool {
    let Some(target) = target else {
        return false;
    };
    shooter.distance(target) <= weapon_range
}

/// Decide LOS from the hits of one ray.
///
/// Obstacles only block when at or above the higher of the two actors.
pub fn evaluate_line_of_sight(
    hits: &[RayHit],
    target: Entity,
    observer_height: i32,
    target_height: i32,
) -> bool {
    let blocking_height = observer_height.max(target_height);

    let target_hits: Vec<f32> = hits
        .iter()
        .filter_map(|hit| match hit.collider {
            HitCollider::Hitbox { actor } if actor == target => Some(hit.distance),
            _ => None,
        })
        .collect();

    if target_hits.is_empty() {
        return false;
    }

    let blocked = hits.iter().any(|hit| match hit.collider {
        HitCollider::Obstacle { height_level, .. } if height_level >= blocking_height => {
            target_hits.iter().any(|&target_distance| hit.distance < target_distance)
        }
        _ => false,
    });

    !blocked
}

/// Cast the LOS ray and evaluate it.
pub fn check_line_of_sight<R: RaycastService + ?Sized>(
    raycast: &R,
    observer: Vec3,
    observer_height: i32,
    target: Entity,
    target_position: Vec3,
    target_height: i32,
) -> bool {
    let direction = target_position - observer;
    if direction.length_squared() <= f32::EPSILON {
        // Стоим внутри цели
        return true;
    }

    let hits = raycast.raycast_all(observer, direction.normalize(), LOS_RAY_LENGTH);
    evaluate_line_of_sight(&hits, target, observer_height, target_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{CollisionWorld, SceneCollider};
    use bevy_rapier3d::prelude::Collider;

    fn target_hit(target: Entity, distance: f32) -> RayHit {
        RayHit {
            collider: HitCollider::Hitbox { actor: target },
            distance,
        }
    }

    fn obstacle(height_level: i32, distance: f32) -> RayHit {
        RayHit {
            collider: HitCollider::Obstacle {
                entity: Entity::from_raw(99),
                height_level,
            },
            distance,
        }
    }

    #[test]
    fn test_range_without_target() {
        assert!(!is_target_in_range(Vec3::ZERO, None, 100.0));
    }

    #[test]
    fn test_range_boundary_inclusive() {
        let target = Some(Vec3::new(10.0, 0.0, 0.0));
        assert!(is_target_in_range(Vec3::ZERO, target, 10.0));
        assert!(!is_target_in_range(Vec3::ZERO, target, 9.99));
    }

    #[test]
    fn test_los_requires_target_hit() {
        let target = Entity::from_raw(1);
        let other = target_hit(Entity::from_raw(2), 3.0);
        assert!(!evaluate_line_of_sight(&[], target, 0, 0));
        assert!(!evaluate_line_of_sight(&[other], target, 0, 0));
        assert!(evaluate_line_of_sight(&[target_hit(target, 5.0)], target, 0, 0));
    }

    #[test]
    fn test_los_blocked_by_tall_obstacle_in_front() {
        let target = Entity::from_raw(1);
        let hits = [obstacle(1, 2.0), target_hit(target, 5.0)];
        assert!(!evaluate_line_of_sight(&hits, target, 0, 1));
        assert!(!evaluate_line_of_sight(&hits, target, 1, 0));
    }

    #[test]
    fn test_los_low_obstacle_does_not_block() {
        let target = Entity::from_raw(1);
        let hits = [obstacle(0, 2.0), target_hit(target, 5.0)];
        assert!(evaluate_line_of_sight(&hits, target, 1, 0));
    }

    #[test]
    fn test_los_obstacle_behind_target() {
        let target = Entity::from_raw(1);
        let hits = [target_hit(target, 5.0), obstacle(3, 8.0)];
        assert!(evaluate_line_of_sight(&hits, target, 0, 0));
    }

    #[test]
    fn test_check_line_of_sight_through_collision_world() {
        let target = Entity::from_raw(1);
        let wall = Entity::from_raw(2);
        let target_position = Vec3::new(10.0, 0.0, 0.0);

        let mut world = CollisionWorld::default();
        world.insert(SceneCollider::hitbox(target, target_position, Collider::ball(0.5)));
        assert!(check_line_of_sight(&world, Vec3::ZERO, 0, target, target_position, 0));

        world.insert(SceneCollider::obstacle(wall, 0, Vec3::new(5.0, 0.0, 0.0), Collider::cuboid(0.25, 1.0, 2.0)));
        assert!(!check_line_of_sight(&world, Vec3::ZERO, 0, target, target_position, 0));
    }

    #[test]
    fn test_check_line_of_sight_through_dyn_service() {
        let target = Entity::from_raw(1);
        let target_position = Vec3::new(4.0, 0.0, 0.0);

        let mut world = CollisionWorld::default();
        world.insert(SceneCollider::hitbox(target, target_position, Collider::ball(0.5)));
        let service: &dyn RaycastService = &world;
        assert!(check_line_of_sight(service, Vec3::ZERO, 0, target, target_position, 0));
    }
}

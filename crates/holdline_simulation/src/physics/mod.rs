//! Physics + navigation seams.
//!
//! The simulation only needs two queries from physics:
//! - ray-cast-all (line of sight) → [`RaycastService`]
//! - nearest navigable point (sapper stand-off) → [`NavigationQuery`]
//!
//! Хост подключает свой ray cast через [`RaycastBackend`]. Без него работает
//! встроенный [`CollisionWorld`]: rapier-коллайдеры (hitbox / obstacle groups),
//! пересобираемые каждый тик из актёров и построек.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, CollisionGroups, Group};

use crate::components::{Actor, Building, Dead, HitVolume};

pub mod navigation;

pub use navigation::{NavigationQuery, NavigationService, OpenGround};

/// Collision group: actor hitboxes
pub const HITBOX_GROUP: Group = Group::GROUP_2;

/// Collision group: walls, obstacles
pub const OBSTACLE_GROUP: Group = Group::GROUP_3;

/// LOS ray видит hitbox'ы и препятствия
pub const LOS_RAY_FILTER: Group = HITBOX_GROUP.union(OBSTACLE_GROUP);

/// What a ray hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitCollider {
    /// An actor's hitbox.
    Hitbox { actor: Entity },
    /// A collider on the obstacle layer.
    Obstacle { entity: Entity, height_level: i32 },
}

/// One ray-cast hit, distance measured from the ray origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub collider: HitCollider,
    pub distance: f32,
}

/// Host physics query: every collider along a ray, nearest first.
pub trait RaycastService: Send + Sync {
    fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RayHit>;
}

/// Resource wrapper around a host-supplied ray cast.
///
/// Пока ресурса нет, LOS считается по [`CollisionWorld`].
#[derive(Resource)]
pub struct RaycastBackend {
    service: Box<dyn RaycastService>,
}

impl RaycastBackend {
    pub fn new(service: impl RaycastService + 'static) -> Self {
        Self {
            service: Box::new(service),
        }
    }
}

impl RaycastService for RaycastBackend {
    fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RayHit> {
        self.service.raycast_all(origin, direction, max_distance)
    }
}

/// One collider in the built-in world.
#[derive(Clone)]
pub struct SceneCollider {
    pub collider: HitCollider,
    pub translation: Vec3,
    pub rotation: Quat,
    pub shape: Collider,
    pub groups: CollisionGroups,
}

impl SceneCollider {
    pub fn hitbox(actor: Entity, translation: Vec3, shape: Collider) -> Self {
        Self {
            collider: HitCollider::Hitbox { actor },
            translation,
            rotation: Quat::IDENTITY,
            shape,
            groups: CollisionGroups::new(HITBOX_GROUP, Group::ALL),
        }
    }

    pub fn obstacle(entity: Entity, height_level: i32, translation: Vec3, shape: Collider) -> Self {
        Self {
            collider: HitCollider::Obstacle { entity, height_level },
            translation,
            rotation: Quat::IDENTITY,
            shape,
            groups: CollisionGroups::new(OBSTACLE_GROUP, Group::ALL),
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_groups(mut self, groups: CollisionGroups) -> Self {
        self.groups = groups;
        self
    }
}

/// Built-in collision world (rapier shapes, solid ray casts)
#[derive(Resource, Default, Clone)]
pub struct CollisionWorld {
    colliders: Vec<SceneCollider>,
}

impl CollisionWorld {
    pub fn clear(&mut self) {
        self.colliders.clear();
    }

    pub fn insert(&mut self, collider: SceneCollider) {
        self.colliders.push(collider);
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl RaycastService for CollisionWorld {
    fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RayHit> {
        let Some(direction) = direction.try_normalize() else {
            return Vec::new();
        };

        let mut hits: Vec<RayHit> = self
            .colliders
            .iter()
            .filter(|scene| scene.groups.memberships.intersects(LOS_RAY_FILTER))
            .filter_map(|scene| {
                // solid: луч из середины коллайдера попадает на 0
                let distance = scene.shape.cast_ray(
                    scene.translation,
                    scene.rotation,
                    origin,
                    direction,
                    max_distance,
                    true,
                )?;
                Some(RayHit {
                    collider: scene.collider,
                    distance,
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

/// Shape for an entity: its own rapier collider, else a ball of the hit volume.
fn collider_shape(shape: Option<&Collider>, volume: &HitVolume) -> Collider {
    shape.cloned().unwrap_or_else(|| Collider::ball(volume.radius))
}

/// System: rebuild CollisionWorld from live actors and buildings.
///
/// Dead actors drop off the hitbox layer (bodies stay, but rays pass through).
/// Не запускается, если хост поставил [`RaycastBackend`].
pub fn sync_collision_world(
    mut world: ResMut<CollisionWorld>,
    actors: Query<
        (Entity, &Transform, &HitVolume, Option<&Collider>, Option<&CollisionGroups>),
        (With<Actor>, Without<Dead>),
    >,
    buildings: Query<(Entity, &Transform, &HitVolume, &Building, Option<&Collider>, Option<&CollisionGroups>)>,
) {
    world.clear();

    for (entity, transform, volume, shape, groups) in actors.iter() {
        let mut scene = SceneCollider::hitbox(entity, transform.translation, collider_shape(shape, volume))
            .with_rotation(transform.rotation);
        if let Some(groups) = groups {
            scene = scene.with_groups(*groups);
        }
        world.insert(scene);
    }

    for (entity, transform, volume, building, shape, groups) in buildings.iter() {
        let mut scene = SceneCollider::obstacle(
            entity,
            building.height_level,
            transform.translation,
            collider_shape(shape, volume),
        )
        .with_rotation(transform.rotation);
        if let Some(groups) = groups {
            scene = scene.with_groups(*groups);
        }
        world.insert(scene);
    }
}

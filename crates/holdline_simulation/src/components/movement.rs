//! Movement output: what the host pathfinder should do, and where the weapon points.

use bevy::prelude::*;

/// Movement command for an actor (executed by the host pathfinding agent)
///
/// - AI systems write the high-level intent
/// - the host converts it to a navigation target every frame
#[derive(Component, Debug, Clone, PartialEq, Default)]
pub enum MovementCommand {
    /// Stay put (do not touch the navigation target)
    #[default]
    Idle,
    /// Walk to a world position
    MoveToPosition { target: Vec3 },
    /// Keep following an entity (target refreshed every frame)
    FollowEntity { target: Entity },
    /// Stop immediately (drop velocity)
    Stop,
}

/// Direction the equipped weapon points in (world space, unit length or zero).
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct WeaponAim {
    pub direction: Vec3,
}

impl Default for WeaponAim {
    fn default() -> Self {
        Self { direction: Vec3::NEG_Z }
    }
}

impl WeaponAim {
    /// Point at a world position; no-op when the position coincides with `from`.
    pub fn aim_at(&mut self, from: Vec3, at: Vec3) {
        let to_target = at - from;
        if to_target.length_squared() > 1e-6 {
            self.direction = to_target.normalize();
        }
    }

    /// Point along the actor's facing.
    pub fn aim_forward(&mut self, transform: &Transform) {
        self.direction = transform.forward().as_vec3();
    }
}

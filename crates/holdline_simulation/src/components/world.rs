//! World geometry components: buildings and hit volumes.

use bevy::prelude::*;

/// Collision sphere radius used for ray casts (hitbox for actors, obstacle for buildings).
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HitVolume {
    pub radius: f32,
}

impl Default for HitVolume {
    fn default() -> Self {
        Self { radius: 0.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildingKind {
    #[default]
    Wall,
    Gate,
    Tower,
}

/// A player-built structure. Sits on the obstacle layer.
#[derive(Component, Debug, Clone, Default)]
#[require(HitVolume, Transform)]
pub struct Building {
    pub kind: BuildingKind,
    /// Blocks LOS for actors at or below this level.
    pub height_level: i32,
    /// Already claimed by a sapper.
    pub is_targeted: bool,
}

impl Building {
    pub fn wall(height_level: i32) -> Self {
        Self {
            kind: BuildingKind::Wall,
            height_level,
            is_targeted: false,
        }
    }
}

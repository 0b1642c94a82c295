//! Navigation seam (host navmesh / A* graph).

use bevy::prelude::*;

/// Host pathfinding query.
pub trait NavigationQuery: Send + Sync {
    /// Closest walkable point to `position`.
    fn nearest_point(&self, position: Vec3) -> Vec3;
}

/// Flat, fully walkable ground: every point is its own nearest point.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenGround;

impl NavigationQuery for OpenGround {
    fn nearest_point(&self, position: Vec3) -> Vec3 {
        position
    }
}

/// Resource wrapper around the active navigation backend.
#[derive(Resource)]
pub struct NavigationService {
    query: Box<dyn NavigationQuery>,
}

impl NavigationService {
    pub fn new(query: impl NavigationQuery + 'static) -> Self {
        Self {
            query: Box::new(query),
        }
    }

    pub fn nearest_point(&self, position: Vec3) -> Vec3 {
        self.query.nearest_point(position)
    }
}

impl Default for NavigationService {
    fn default() -> Self {
        Self::new(OpenGround)
    }
}

//! ECS components for game entities
//!
//! Split by domain:
//! - actor: team, health, height level, visibility
//! - movement: MovementCommand (read by the host pathfinder), WeaponAim
//! - world: buildings, walls, hit volumes
//! - player: player control marker

pub mod actor;
pub mod movement;
pub mod player;
pub mod world;

pub use actor::*;
pub use movement::*;
pub use player::*;
pub use world::*;

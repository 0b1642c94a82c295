//! Combat module: weapons, bursts, damage, death
//!
//! ECS owns:
//! - magazine / reload state, burst timing
//! - health, dazing, death markers and the death broadcast
//!
//! Host owns:
//! - projectiles, hit detection (reports `DamageDealt`), VFX for `WeaponFired`

use bevy::prelude::*;

pub mod burst;
pub mod damage;
pub mod weapon;

pub use burst::{tick_fire_bursts, BurstTask, FireBursts};
pub use damage::{apply_damage, handle_actor_deaths, DamageDealt, EntityDied};
pub use weapon::{tick_reloads, EquippedWeapon, WeaponData, WeaponFired, WeaponKind};

use crate::mission::ActorBroadcast;
use crate::SimSet;

/// Combat Plugin
///
/// FixedUpdate, after AI decisions:
/// 1. tick_reloads: magazines refill
/// 2. tick_fire_bursts: pending burst shots → WeaponFired
/// 3. apply_damage: DamageDealt → Health, daze
/// 4. handle_actor_deaths: ActorKilled broadcast, Dead marker
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<WeaponFired>()
            .add_event::<ActorBroadcast>();

        app.add_systems(
            FixedUpdate,
            (
                tick_reloads,
                tick_fire_bursts,
                apply_damage,
                handle_actor_deaths,
            )
                .chain()
                .in_set(SimSet::Combat),
        );
    }
}

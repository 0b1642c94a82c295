//! Weapon data, magazine/reload state and the shot event.
//!
//! - ECS: ammo, reload timers, burst decisions
//! - Host: muzzle flash, projectile/tracer, hit detection → DamageDealt

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, Validate};

/// Weapon archetypes known to the company data store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Pistol,
    Shotgun,
    AssaultRifle,
    EnemyRifle,
}

/// Static weapon stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponData {
    pub kind: WeaponKind,
    /// Max engagement distance (meters)
    pub range: f32,
    pub magazine_size: u32,
    pub shots_per_burst: u32,
    /// Delay between shots inside a burst (seconds)
    pub time_between_shots: f32,
    /// Seconds from reload start to full magazine
    pub reload_time: f32,
    pub damage: u32,
    /// Spare rounds; `None` = unlimited (AI enemies)
    #[serde(default)]
    pub reserve_ammo: Option<u32>,
}

impl WeaponData {
    pub fn pistol() -> Self {
        Self {
            kind: WeaponKind::Pistol,
            range: 8.0,
            magazine_size: 12,
            shots_per_burst: 1,
            time_between_shots: 0.2,
            reload_time: 1.2,
            damage: 15,
            reserve_ammo: None,
        }
    }

    pub fn shotgun() -> Self {
        Self {
            kind: WeaponKind::Shotgun,
            range: 5.0,
            magazine_size: 6,
            shots_per_burst: 1,
            time_between_shots: 0.6,
            reload_time: 2.5,
            damage: 45,
            reserve_ammo: None,
        }
    }

    pub fn assault_rifle() -> Self {
        Self {
            kind: WeaponKind::AssaultRifle,
            range: 12.0,
            magazine_size: 30,
            shots_per_burst: 3,
            time_between_shots: 0.1,
            reload_time: 2.0,
            damage: 12,
            reserve_ammo: None,
        }
    }

    pub fn enemy_rifle() -> Self {
        Self {
            kind: WeaponKind::EnemyRifle,
            range: 10.0,
            magazine_size: 20,
            shots_per_burst: 3,
            time_between_shots: 0.15,
            reload_time: 2.5,
            damage: 8,
            reserve_ammo: None,
        }
    }

    pub fn for_kind(kind: WeaponKind) -> Self {
        match kind {
            WeaponKind::Pistol => Self::pistol(),
            WeaponKind::Shotgun => Self::shotgun(),
            WeaponKind::AssaultRifle => Self::assault_rifle(),
            WeaponKind::EnemyRifle => Self::enemy_rifle(),
        }
    }
}

impl Validate for WeaponData {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.range <= 0.0 {
            return Err(ConfigError::Invalid(format!("{:?}: range must be positive", self.kind)));
        }
        if self.magazine_size == 0 || self.shots_per_burst == 0 {
            return Err(ConfigError::Invalid(format!(
                "{:?}: magazine_size and shots_per_burst must be at least 1",
                self.kind
            )));
        }
        if self.time_between_shots < 0.0 || self.reload_time < 0.0 {
            return Err(ConfigError::Invalid(format!("{:?}: timings must not be negative", self.kind)));
        }
        Ok(())
    }
}

/// The weapon an actor currently holds, with live magazine state.
#[derive(Component, Debug, Clone)]
pub struct EquippedWeapon {
    pub data: WeaponData,
    ammo: u32,
    reserve: Option<u32>,
    reload_timer: Option<f32>,
}

impl Default for EquippedWeapon {
    fn default() -> Self {
        Self::new(WeaponData::enemy_rifle())
    }
}

impl EquippedWeapon {
    pub fn new(data: WeaponData) -> Self {
        Self {
            ammo: data.magazine_size,
            reserve: data.reserve_ammo,
            reload_timer: None,
            data,
        }
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn reserve(&self) -> Option<u32> {
        self.reserve
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_timer.is_some()
    }

    /// Use up one round. False when the magazine is empty or a reload is running.
    pub fn consume_round(&mut self) -> bool {
        if self.ammo == 0 || self.is_reloading() {
            return false;
        }
        self.ammo -= 1;
        true
    }

    /// Start a reload. Returns whether a reload is now in progress.
    pub fn attempt_reload(&mut self) -> bool {
        if self.is_reloading() {
            return true;
        }
        if self.ammo >= self.data.magazine_size || self.reserve == Some(0) {
            return false;
        }
        self.reload_timer = Some(self.data.reload_time);
        true
    }

    /// Advance the reload timer. Returns true on the tick the magazine is refilled.
    pub fn tick_reload(&mut self, delta: f32) -> bool {
        let Some(remaining) = self.reload_timer.as_mut() else {
            return false;
        };

        *remaining -= delta;
        if *remaining > 0.0 {
            return false;
        }

        self.reload_timer = None;
        let needed = self.data.magazine_size - self.ammo;
        let loaded = match self.reserve.as_mut() {
            Some(reserve) => {
                let loaded = needed.min(*reserve);
                *reserve -= loaded;
                loaded
            }
            None => needed,
        };
        self.ammo += loaded;
        true
    }
}

/// Event: a round left the barrel (ECS → host VFX / projectile)
#[derive(Event, Debug, Clone)]
pub struct WeaponFired {
    pub shooter: Entity,
    pub target: Entity,
    pub weapon: WeaponKind,
    pub damage: u32,
}

/// System: advance reload timers
pub fn tick_reloads(mut weapons: Query<(Entity, &mut EquippedWeapon)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for (entity, mut weapon) in weapons.iter_mut() {
        if !weapon.is_reloading() {
            continue;
        }
        if weapon.tick_reload(delta) {
            crate::log(&format!(
                "🔄 {:?} reloaded {:?} ({} rounds)",
                entity,
                weapon.data.kind,
                weapon.ammo()
            ));
        }
    }
}

//! Fire bursts: short-lived sub-routines started by the attack routine.
//!
//! Каждый burst: независимая задача: N выстрелов с интервалом
//! `time_between_shots`. Несколько burst'ов могут идти одновременно.

use bevy::prelude::*;

use crate::combat::{EquippedWeapon, WeaponFired};
use crate::components::{Dead, Health};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstTask {
    pub target: Entity,
    pub shots_remaining: u32,
    /// Seconds until the next shot (0 = fire this tick)
    pub next_shot_in: f32,
}

/// In-flight bursts for one shooter.
#[derive(Component, Debug, Clone, Default)]
pub struct FireBursts {
    bursts: Vec<BurstTask>,
}

impl FireBursts {
    pub fn start(&mut self, target: Entity, shots: u32) {
        if shots == 0 {
            return;
        }
        self.bursts.push(BurstTask {
            target,
            shots_remaining: shots,
            next_shot_in: 0.0,
        });
    }

    /// Cancel everything (deactivation, death).
    pub fn cancel_all(&mut self) {
        self.bursts.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bursts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bursts.len()
    }

    /// Advance all bursts by `delta`. Returns the target of every shot fired this tick.
    ///
    /// A burst ends when its shots run out, its target dies or the magazine empties.
    pub fn tick(
        &mut self,
        delta: f32,
        weapon: &mut EquippedWeapon,
        is_target_alive: impl Fn(Entity) -> bool,
    ) -> Vec<Entity> {
        let mut shots = Vec::new();
        let interval = weapon.data.time_between_shots;

        self.bursts.retain_mut(|burst| {
            burst.next_shot_in -= delta;

            while burst.next_shot_in <= 0.0 && burst.shots_remaining > 0 {
                if !is_target_alive(burst.target) || !weapon.consume_round() {
                    return false;
                }
                shots.push(burst.target);
                burst.shots_remaining -= 1;
                // Zero interval: the whole burst goes out in one tick.
                burst.next_shot_in += interval;
            }

            burst.shots_remaining > 0
        });

        shots
    }
}

/// System: fire pending burst shots → WeaponFired
pub fn tick_fire_bursts(
    mut shooters: Query<(Entity, &mut FireBursts, &mut EquippedWeapon), Without<Dead>>,
    targets: Query<&Health>,
    mut fired_events: EventWriter<WeaponFired>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (shooter, mut bursts, mut weapon) in shooters.iter_mut() {
        if bursts.is_empty() {
            continue;
        }

        let shots = bursts.tick(delta, &mut weapon, |target| {
            targets.get(target).map(|h| h.is_alive()).unwrap_or(false)
        });

        for target in shots {
            fired_events.write(WeaponFired {
                shooter,
                target,
                weapon: weapon.data.kind,
                damage: weapon.data.damage,
            });
        }
    }
}

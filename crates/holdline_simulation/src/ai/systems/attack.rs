//! Attack routine system: one cycle per controller when its phase machine allows.

use bevy::prelude::*;

use crate::ai::{AIController, AttackRoutine, RoutineStep};
use crate::combat::{EquippedWeapon, FireBursts};
use crate::components::{Dead, Health, WeaponAim};
use crate::config::ControllerData;

/// Система: attack routine tick
///
/// Цикл (пока актор жив):
/// 1. dummy / player body → yield
/// 2. нет живой цели → pick new (старую удаляем), не нашли → yield
/// 3. навести оружие, перезарядка при пустом магазине
/// 4. все условия ок → новый burst (shots_per_burst)
/// 5. пауза pause_between_bursts + ещё один тик
pub fn run_attack_routines(
    mut shooters: Query<
        (
            Entity,
            &mut AIController,
            &mut AttackRoutine,
            &mut FireBursts,
            &mut EquippedWeapon,
            &mut WeaponAim,
            &Transform,
            &ControllerData,
        ),
        Without<Dead>,
    >,
    targets: Query<(&Transform, &Health)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let is_alive = |entity: Entity| targets.get(entity).map(|(_, h)| h.is_alive()).unwrap_or(false);

    for (entity, mut controller, mut routine, mut bursts, mut weapon, mut aim, transform, data) in
        shooters.iter_mut()
    {
        if routine.advance(delta) == RoutineStep::Idle {
            continue;
        }

        if controller.is_dummy || controller.is_player_controlled() {
            routine.yield_cycle();
            continue;
        }

        let current = controller.attack_target().filter(|&target| is_alive(target));
        let target = match current {
            Some(target) => target,
            None => {
                let old_target = controller.attack_target();
                let found = controller.pick_new_attack_target(&is_alive);

                if let Some(old_target) = old_target {
                    controller.remove_attack_target(old_target);
                }

                let Some(target) = controller.attack_target().filter(|_| found) else {
                    routine.yield_cycle();
                    continue;
                };
                crate::log(&format!("🎯 {:?} picked attack target {:?}", entity, target));
                target
            }
        };

        if let Ok((target_transform, _)) = targets.get(target) {
            aim.aim_at(transform.translation, target_transform.translation);
        }

        if weapon.ammo() == 0 {
            if !controller.is_reloading() {
                let reloading = weapon.attempt_reload();
                controller.set_reloading(reloading);
                if reloading {
                    crate::log(&format!("🔄 {:?} reloading", entity));
                }
            }
        } else {
            controller.set_reloading(false);
        }

        if controller.can_open_fire(data.can_move_and_shoot) {
            let shots = weapon.data.shots_per_burst;
            bursts.start(target, shots);
            crate::log(&format!("🔫 {:?} opens fire on {:?} ({} shots)", entity, target, shots));
        }

        routine.start_cooldown(data.pause_between_bursts);
    }
}

//! Per-tick range / LOS sensing for the current attack target.

use bevy::prelude::*;

use crate::ai::{check_line_of_sight, is_target_in_range, AIController};
use crate::combat::EquippedWeapon;
use crate::components::{Actor, Dead};
use crate::physics::{CollisionWorld, RaycastBackend, RaycastService};

/// Система: пересчёт target_in_range / target_in_los
///
/// Только для живых, включённых, не-игроковых, не-dummy контроллеров
/// с инициализированным state. Ray cast: RaycastBackend хоста, иначе CollisionWorld.
pub fn update_target_sensors(
    mut controllers: Query<(&mut AIController, &Actor, &Transform, &EquippedWeapon), Without<Dead>>,
    targets: Query<(&Transform, &Actor), Without<Dead>>,
    backend: Option<Res<RaycastBackend>>,
    collision: Res<CollisionWorld>,
) {
    let raycast: &dyn RaycastService = match backend.as_deref() {
        Some(backend) => backend,
        None => &*collision,
    };

    for (mut controller, actor, transform, weapon) in controllers.iter_mut() {
        if controller.is_dummy
            || controller.is_player_controlled()
            || !controller.enabled
            || controller.state().is_none()
        {
            continue;
        }

        let target = controller
            .attack_target()
            .and_then(|target| targets.get(target).ok().map(|found| (target, found)));

        let Some((target, (target_transform, target_actor))) = target else {
            controller.target_in_range = false;
            controller.target_in_los = false;
            continue;
        };

        let shooter = transform.translation;
        let target_position = target_transform.translation;

        controller.target_in_range =
            is_target_in_range(shooter, Some(target_position), weapon.data.range);
        controller.target_in_los = check_line_of_sight(
            raycast,
            shooter,
            actor.height_level,
            target,
            target_position,
            target_actor.height_level,
        );
    }
}

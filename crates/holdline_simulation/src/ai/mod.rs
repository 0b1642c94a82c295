//! AI decision-making module
//!
//! Per-actor FSM (HoldingPosition / FollowTarget / DeliveringBomb / Attacking),
//! candidate-target registry, attack routine, LOS.
//!
//! Хост отвечает за: detection triggers (→ TargetDetected/TargetLost),
//! pathfinding (читает MovementCommand), bomb prefab (BombPlaced).

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod los;
pub mod systems;

pub use components::*;
pub use events::*;
pub use los::*;
pub use systems::*;

use crate::physics::{sync_collision_world, RaycastBackend};
use crate::SimSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. Detection: start-up, activation, detection events, daze recovery
/// 2. Sensors: collision world sync, range / LOS
/// 3. Decisions: FSM transitions, movement, idle aim, attack routine
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActorNameIndex>()
            .add_event::<TargetDetected>()
            .add_event::<TargetLost>()
            .add_event::<SetActorActive>()
            .add_event::<RecoverFromDaze>()
            .add_event::<BombPlaced>();

        app.add_systems(
            FixedUpdate,
            (
                start_controllers,
                apply_activation_requests,
                apply_target_detection,
                apply_daze_recovery,
            )
                .chain()
                .in_set(SimSet::Detection),
        )
        .add_systems(
            FixedUpdate,
            (
                sync_collision_world.run_if(not(resource_exists::<RaycastBackend>)),
                update_target_sensors,
            )
                .chain()
                .in_set(SimSet::Sensors),
        )
        .add_systems(
            FixedUpdate,
            (
                advance_ai_states,
                ai_movement_from_state,
                aim_idle_weapons,
                run_attack_routines,
            )
                .chain() // Последовательное выполнение для детерминизма
                .in_set(SimSet::Decisions),
        );
    }
}

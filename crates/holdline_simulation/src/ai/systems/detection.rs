//! Event intake: detection triggers, activation, daze recovery.

use bevy::prelude::*;

use crate::ai::{AIController, AttackRoutine, RecoverFromDaze, SetActorActive, TargetDetected, TargetLost};
use crate::combat::FireBursts;
use crate::components::{Actor, Health};

/// Activate / deactivate one actor.
///
/// Activation: show + resume attacks (alive only).
/// Deactivation: hide; alive actors also pause attacks, drop the target,
/// halt the attack routine and every in-flight burst.
pub fn set_actor_active(
    active: bool,
    actor: &mut Actor,
    controller: &mut AIController,
    routine: &mut AttackRoutine,
    bursts: &mut FireBursts,
    is_alive: bool,
) {
    actor.set_visibility(active);

    if !is_alive {
        return;
    }

    if active {
        controller.resume_attacks();
        routine.resume();
    } else {
        controller.halt_attacks();
        routine.halt();
        bursts.cancel_all();
    }
}

/// Система: TargetDetected / TargetLost → PossibleTargets
pub fn apply_target_detection(
    mut detected: EventReader<TargetDetected>,
    mut lost: EventReader<TargetLost>,
    mut controllers: Query<&mut AIController>,
) {
    for event in detected.read() {
        if event.observer == event.target {
            continue;
        }

        let Ok(mut controller) = controllers.get_mut(event.observer) else {
            continue;
        };

        controller.add_attack_target(event.target, event.in_emergency_range);
        crate::log(&format!(
            "👁️ {:?} detected {:?} (emergency: {})",
            event.observer, event.target, event.in_emergency_range
        ));
    }

    for event in lost.read() {
        let Ok(mut controller) = controllers.get_mut(event.observer) else {
            continue;
        };

        if controller.possible_targets().contains(event.target) {
            controller.remove_attack_target(event.target);
            crate::log(&format!("👻 {:?} lost {:?}", event.observer, event.target));
        }
    }
}

/// Система: SetActorActive → activation / deactivation
pub fn apply_activation_requests(
    mut requests: EventReader<SetActorActive>,
    mut actors: Query<(
        &mut Actor,
        &mut AIController,
        &mut AttackRoutine,
        &mut FireBursts,
        &Health,
    )>,
) {
    for request in requests.read() {
        let Ok((mut actor, mut controller, mut routine, mut bursts, health)) =
            actors.get_mut(request.entity)
        else {
            crate::log_warning(&format!(
                "SetActorActive: {:?} has no AI controller",
                request.entity
            ));
            continue;
        };

        set_actor_active(
            request.active,
            &mut actor,
            &mut controller,
            &mut routine,
            &mut bursts,
            health.is_alive(),
        );

        crate::log(&format!(
            "{} {:?}",
            if request.active { "▶️ Activated" } else { "⏸️ Deactivated" },
            request.entity
        ));
    }
}

/// Система: RecoverFromDaze → clear dazed flag
pub fn apply_daze_recovery(
    mut events: EventReader<RecoverFromDaze>,
    mut controllers: Query<&mut AIController>,
) {
    for event in events.read() {
        if let Ok(mut controller) = controllers.get_mut(event.entity) {
            controller.stop_being_dazed();
        }
    }
}

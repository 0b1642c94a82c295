//! FSM systems: state transitions, state → MovementCommand, idle aiming.

use bevy::prelude::*;

use crate::ai::{pick_follow_target, AIAction, AIController, AISensors, AIState, BombPlaced};
use crate::components::{Actor, ActorTeam, Dead, Health, MovementCommand, WeaponAim};
use crate::mission::MissionState;
use crate::DeterministicRng;

/// Система: AI FSM transitions
///
/// Sensor snapshot → `AIState::transition` → apply actions.
/// Friendly AI не продвигает state сам (им командует игрок / хост).
pub fn advance_ai_states(
    mut controllers: Query<(Entity, &mut AIController, &Actor, &Transform), Without<Dead>>,
    alive: Query<&Health>,
    mission: Option<Res<MissionState>>,
    mut rng: ResMut<DeterministicRng>,
    mut bombs: EventWriter<BombPlaced>,
) {
    let is_alive = |entity: Entity| alive.get(entity).map(|h| h.is_alive()).unwrap_or(false);

    let fallback_friendlies: Vec<Entity> = controllers
        .iter()
        .filter(|(_, controller, actor, _)| {
            actor.team == ActorTeam::Friendly && controller.enabled && actor.visible
        })
        .map(|(entity, ..)| entity)
        .collect();
    let hidden: Vec<Entity> = controllers
        .iter()
        .filter(|(_, controller, actor, _)| !controller.enabled || !actor.visible)
        .map(|(entity, ..)| entity)
        .collect();
    let deployed: Vec<Entity> = mission
        .as_deref()
        .map(|mission| {
            mission
                .friendly_actors
                .iter()
                .copied()
                .filter(|&e| is_alive(e) && !hidden.contains(&e))
                .collect()
        })
        .unwrap_or_default();

    for (entity, mut controller, actor, transform) in controllers.iter_mut() {
        if controller.is_dummy
            || controller.is_player_controlled()
            || !controller.enabled
            || actor.team == ActorTeam::Friendly
        {
            continue;
        }

        let Some(state) = controller.state().copied() else {
            continue;
        };

        // Stale follow target (цель умерла / despawned / выключена)
        if let Some(follow) = controller.follow_target() {
            if !is_alive(follow) || hidden.contains(&follow) {
                controller.stop_following_something();
            }
        }

        let sensors = AISensors {
            has_attack_target: controller.attack_target().is_some(),
            target_in_range: controller.target_in_range,
            target_in_los: controller.target_in_los,
            has_follow_target: controller.should_follow_something(),
            distance_to_destination: match state {
                AIState::DeliveringBomb { destination } => {
                    Some(transform.translation.distance(destination))
                }
                _ => None,
            },
        };

        let transition = state.transition(&sensors);

        for action in &transition.actions {
            match action {
                AIAction::PlaceBomb => {
                    controller.stop_going_to_position();
                    bombs.write(BombPlaced {
                        sapper: entity,
                        position: transform.translation,
                        rotation: transform.rotation,
                    });
                    crate::log_info(&format!("💣 {:?} placed bomb at {:?}", entity, transform.translation));
                }
                AIAction::AcquireFollowTarget => {
                    if let Some(target) =
                        pick_follow_target(&deployed, &fallback_friendlies, entity, &mut rng.rng)
                    {
                        controller.follow(target);
                        crate::log(&format!("🎯 {:?} now following {:?}", entity, target));
                    }
                }
            }
        }

        if transition.next != state {
            crate::log(&format!("AI: {:?} {} → {}", entity, state.name(), transition.next.name()));
            controller.set_state(transition.next);
        }
    }
}

/// Система: AIState → MovementCommand (читает хост pathfinder)
///
/// - HoldingPosition / Attacking → Idle
/// - DeliveringBomb → MoveToPosition
/// - FollowTarget → move position, follow target, attack target, иначе Idle
pub fn ai_movement_from_state(
    mut controllers: Query<(&AIController, &Actor, &mut MovementCommand), Without<Dead>>,
) {
    for (controller, actor, mut command) in controllers.iter_mut() {
        if actor.team == ActorTeam::Friendly || !controller.enabled {
            continue;
        }

        let next = if !controller.pathfinder_enabled() || controller.is_dummy {
            MovementCommand::Idle
        } else {
            match controller.state() {
                None | Some(AIState::HoldingPosition) | Some(AIState::Attacking) => MovementCommand::Idle,
                Some(AIState::DeliveringBomb { destination }) => MovementCommand::MoveToPosition {
                    target: controller.move_position().unwrap_or(*destination),
                },
                Some(AIState::FollowTarget) => {
                    if let Some(target) = controller.move_position() {
                        MovementCommand::MoveToPosition { target }
                    } else if let Some(target) = controller.follow_target() {
                        MovementCommand::FollowEntity { target }
                    } else if let Some(target) = controller.attack_target() {
                        MovementCommand::FollowEntity { target }
                    } else {
                        MovementCommand::Idle
                    }
                }
            }
        };

        if *command != next {
            *command = next;
        }
    }
}

/// Система: без attack target оружие смотрит вперёд по facing
pub fn aim_idle_weapons(
    mut controllers: Query<(&AIController, &Transform, &mut WeaponAim), Without<Dead>>,
) {
    for (controller, transform, mut aim) in controllers.iter_mut() {
        if controller.is_dummy || controller.is_player_controlled() || controller.attack_target().is_some() {
            continue;
        }
        aim.aim_forward(transform);
    }
}

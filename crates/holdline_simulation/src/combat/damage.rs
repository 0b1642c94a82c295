//! Damage application and death handling
//!
//! 1. Host reports hits as `DamageDealt`
//! 2. `apply_damage` subtracts health, dazes AI actors, emits `EntityDied`
//! 3. `handle_actor_deaths` broadcasts `ActorKilled(team)` for AI actors,
//!    then runs base death handling (Dead marker, stop, cancel bursts)

use bevy::prelude::*;

use crate::ai::AIController;
use crate::combat::FireBursts;
use crate::components::{Actor, Dead, DeathCause, Health, MovementCommand};
use crate::mission::ActorBroadcast;

/// Event: something hit an actor
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub damage: u32,
    /// Grenade / bomb / explosive barrel
    pub explosive: bool,
}

/// Event: an actor's health reached zero
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
    pub cause: DeathCause,
}

/// System: apply DamageDealt → Health, daze AI actors
pub fn apply_damage(
    mut damage_events: EventReader<DamageDealt>,
    mut targets: Query<(&mut Health, Option<&mut AIController>), Without<Dead>>,
    mut died_events: EventWriter<EntityDied>,
) {
    for hit in damage_events.read() {
        let Ok((mut health, controller)) = targets.get_mut(hit.target) else {
            continue;
        };

        if !health.is_alive() {
            continue;
        }

        health.take_damage(hit.damage);

        if hit.damage > 0 {
            if let Some(mut controller) = controller {
                controller.handle_get_hit();
            }
        }

        crate::log(&format!(
            "💥 {:?} hit {:?} for {} (HP: {}/{})",
            hit.attacker, hit.target, hit.damage, health.current, health.max
        ));

        if !health.is_alive() {
            died_events.write(EntityDied {
                entity: hit.target,
                killer: hit.attacker,
                cause: if hit.explosive {
                    DeathCause::Explosive
                } else {
                    DeathCause::Normal
                },
            });
        }
    }
}

/// System: death broadcast + base death handling
///
/// AI-controlled actors announce their team first (mission counters listen),
/// then every dead actor gets the `Dead` marker and stops moving/shooting.
pub fn handle_actor_deaths(
    mut commands: Commands,
    mut died_events: EventReader<EntityDied>,
    mut actors: Query<(
        &Actor,
        Option<&mut AIController>,
        Option<&mut FireBursts>,
        Option<&mut MovementCommand>,
    )>,
    mut broadcasts: EventWriter<ActorBroadcast>,
) {
    for event in died_events.read() {
        let Ok((actor, controller, bursts, movement)) = actors.get_mut(event.entity) else {
            continue;
        };

        if let Some(mut controller) = controller {
            broadcasts.write(ActorBroadcast::ActorKilled { team: actor.team });
            controller.handle_death();
        }

        if let Some(mut bursts) = bursts {
            bursts.cancel_all();
        }
        if let Some(mut movement) = movement {
            *movement = MovementCommand::Stop;
        }

        commands.entity(event.entity).insert(Dead { cause: event.cause });

        crate::log_info(&format!(
            "☠️ {:?} ({:?}) died ({:?}), killer {:?}",
            event.entity, actor.team, event.cause, event.killer
        ));
    }
}

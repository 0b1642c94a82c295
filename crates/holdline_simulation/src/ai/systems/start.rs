//! Controller start-up: naming, activation, initial AI state.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{AIController, AIState, AttackRoutine};
use crate::combat::FireBursts;
use crate::components::{Actor, ActorTeam, Building, BuildingKind, Health, HitVolume};
use crate::config::{ControllerData, InitialState};
use crate::mission::MissionState;
use crate::physics::NavigationService;
use crate::DeterministicRng;

/// Sapper stands this many collider radii away from the wall.
pub const BOMB_STANDOFF_RADII: f32 = 3.0;

/// Marker: start-up already ran for this controller.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ControllerStarted;

/// Counter for auto-generated actor names ("Actor 0 (Enemy)", ...)
#[derive(Resource, Debug, Default)]
pub struct ActorNameIndex(pub u32);

/// Random friendly to hunt. Deployed friendlies first, any live friendly otherwise.
pub fn pick_follow_target(
    deployed: &[Entity],
    fallback: &[Entity],
    exclude: Entity,
    rng: &mut impl Rng,
) -> Option<Entity> {
    let source = if deployed.is_empty() { fallback } else { deployed };
    let pool: Vec<Entity> = source
        .iter()
        .copied()
        .filter(|&entity| entity != exclude)
        .collect();

    if pool.is_empty() {
        return None;
    }

    Some(pool[rng.gen_range(0..pool.len())])
}

/// Stand-off point between the actor and the wall's nearest navigable point.
pub fn bomb_standoff_point(navigable_wall_point: Vec3, actor_position: Vec3, collider_radius: f32) -> Vec3 {
    let away = (navigable_wall_point - actor_position).normalize_or_zero();
    navigable_wall_point - away * collider_radius * BOMB_STANDOFF_RADII
}

/// Система: первый тик контроллера
///
/// 1. activate_on_start → activation
/// 2. безымянные акторы получают "Actor {n} ({team})"
/// 3. dummy → HoldingPosition, остальные → initial state из ControllerData
pub fn start_controllers(
    mut commands: Commands,
    mut controllers: Query<(
        Entity,
        &mut AIController,
        &mut Actor,
        &Transform,
        &HitVolume,
        &Health,
        &ControllerData,
        &mut AttackRoutine,
        &mut FireBursts,
        Option<&Name>,
        Has<ControllerStarted>,
    )>,
    mut buildings: Query<(Entity, &mut Building, &Transform)>,
    navigation: Res<NavigationService>,
    mission: Option<Res<MissionState>>,
    mut name_index: ResMut<ActorNameIndex>,
    mut rng: ResMut<DeterministicRng>,
) {
    // Неактивные тела (спрятаны до деплоя) не годятся в follow target
    let fallback_friendlies: Vec<Entity> = controllers
        .iter()
        .filter(|(_, controller, actor, _, _, health, ..)| {
            actor.team == ActorTeam::Friendly && controller.enabled && actor.visible && health.is_alive()
        })
        .map(|(entity, ..)| entity)
        .collect();
    let deployed: &[Entity] = mission
        .as_deref()
        .map(|mission| mission.friendly_actors.as_slice())
        .unwrap_or(&[]);

    for (
        entity,
        mut controller,
        mut actor,
        transform,
        volume,
        health,
        data,
        mut routine,
        mut bursts,
        name,
        started,
    ) in controllers.iter_mut()
    {
        if started {
            continue;
        }
        commands.entity(entity).insert(ControllerStarted);

        if controller.activate_on_start {
            crate::ai::set_actor_active(
                true,
                &mut actor,
                &mut controller,
                &mut routine,
                &mut bursts,
                health.is_alive(),
            );
        }

        if name.is_none() {
            commands
                .entity(entity)
                .insert(Name::new(format!("Actor {} ({:?})", name_index.0, actor.team)));
            name_index.0 += 1;
        }

        if controller.is_dummy {
            controller.set_state(AIState::HoldingPosition);
            continue;
        }

        let position = transform.translation;
        let mut initial = data.initial_state;

        if initial == InitialState::DeliveringBomb {
            let mut walls: Vec<_> = buildings
                .iter_mut()
                .filter(|(_, building, _)| building.kind == BuildingKind::Wall && !building.is_targeted)
                .collect();
            walls.sort_by_key(|(wall, ..)| *wall);

            match walls.into_iter().next() {
                Some((wall, mut building, wall_transform)) => {
                    building.is_targeted = true;
                    let nearest = navigation.nearest_point(wall_transform.translation);
                    let destination = bomb_standoff_point(nearest, position, volume.radius);

                    controller.go_to_position(destination);
                    controller.set_state(AIState::DeliveringBomb { destination });
                    crate::log(&format!(
                        "💣 {:?} → wall {:?}, stand-off at {:?}",
                        entity, wall, destination
                    ));
                    continue;
                }
                None => {
                    // Свободных стен нет → просто атакуем
                    crate::log(&format!("💣 {:?}: no free wall, falling back to FollowTarget", entity));
                    initial = InitialState::FollowTarget;
                }
            }
        }

        match initial {
            InitialState::FollowTarget => {
                match pick_follow_target(deployed, &fallback_friendlies, entity, &mut rng.rng) {
                    Some(target) => controller.follow(target),
                    None => controller.stop_following_something(),
                }
                controller.set_state(AIState::FollowTarget);
            }
            InitialState::HoldingPosition | InitialState::DeliveringBomb => {
                controller.set_state(AIState::HoldingPosition);
            }
        }

        crate::log(&format!(
            "🤖 {:?} started in {}",
            entity,
            controller.state().map(AIState::name).unwrap_or("None")
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_pick_follow_target_excludes_self() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let me = Entity::from_raw(1);
        let other = Entity::from_raw(2);

        for _ in 0..10 {
            assert_eq!(pick_follow_target(&[me, other], &[], me, &mut rng), Some(other));
        }
        assert_eq!(pick_follow_target(&[me], &[], me, &mut rng), None);
    }

    #[test]
    fn test_pick_follow_target_prefers_deployed() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let deployed = Entity::from_raw(5);
        let fallback = Entity::from_raw(6);
        let me = Entity::from_raw(1);

        assert_eq!(pick_follow_target(&[deployed], &[fallback], me, &mut rng), Some(deployed));
        assert_eq!(pick_follow_target(&[], &[fallback], me, &mut rng), Some(fallback));
        assert_eq!(pick_follow_target(&[], &[], me, &mut rng), None);
    }

    #[test]
    fn test_bomb_standoff_point() {
        let point = bomb_standoff_point(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, 0.5);
        assert!((point - Vec3::new(8.5, 0.0, 0.0)).length() < 1e-5);

        // Уже стоим на точке: направление нулевое
        let same = bomb_standoff_point(Vec3::ONE, Vec3::ONE, 0.5);
        assert_eq!(same, Vec3::ONE);
    }
}

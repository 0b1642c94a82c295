//! Mission director: singleton registration and scene teardown.

use bevy::prelude::*;

use crate::config::MissionData;
use crate::mission::{
    deactivate_bodies, deploy_friendlies, ActorBroadcast, Company, FriendlyBodies, MissionLog,
    MissionSignal, MissionState, PlayerControl, SoundCue, SoundRequest,
};

/// Siren volume on attack start
pub const SIREN_VOLUME: f32 = 0.5;

/// Spawned once per mission scene. The first one wins; later ones are despawned.
#[derive(Component, Debug, Clone)]
pub struct MissionDirector {
    pub mission: MissionData,
    /// Test scenes: no deployment, attack starts from a button
    pub test_mode: bool,
}

/// Which director owns the active mission.
#[derive(Resource, Debug, Default)]
pub struct MissionRegistry {
    pub active: Option<Entity>,
}

/// Game-wide context readiness (meta game loaded, roster available).
#[derive(Resource, Debug, Clone, Default)]
pub struct GameContext {
    pub initialized: bool,
}

/// Система: регистрация MissionDirector
///
/// 1. дубликат → despawn + диагностика
/// 2. MissionState, все friendly bodies выключены, victory condition armed
/// 3. не test mode → deploy, BeginAttack (AttackStart + siren), ждём GameContext
#[allow(clippy::too_many_arguments)]
pub fn register_mission_directors(
    mut commands: Commands,
    directors: Query<(Entity, &MissionDirector), Added<MissionDirector>>,
    mut registry: ResMut<MissionRegistry>,
    mut bodies: FriendlyBodies,
    company: Option<Res<Company>>,
    mut player: ResMut<PlayerControl>,
    mut broadcasts: EventWriter<ActorBroadcast>,
    mut signals: EventWriter<MissionSignal>,
    mut sounds: EventWriter<SoundRequest>,
) {
    let mut added: Vec<(Entity, &MissionDirector)> = directors.iter().collect();
    added.sort_by_key(|(entity, _)| *entity);

    for (entity, director) in added {
        if let Some(active) = registry.active {
            crate::log_warning(&format!(
                "More than one MissionDirector ({:?}, active {:?}), despawning",
                entity, active
            ));
            commands.entity(entity).despawn();
            continue;
        }

        registry.active = Some(entity);
        let mut state = MissionState::new(director.mission.clone(), entity, director.test_mode);

        deactivate_bodies(&mut bodies);

        if !director.test_mode {
            match company.as_deref() {
                Some(company) => deploy_friendlies(
                    &mut commands,
                    &mut bodies,
                    company,
                    &mut state,
                    &mut player,
                    &mut broadcasts,
                ),
                None => crate::log_warning("Deployment: no Company resource, nobody deployed"),
            }
            state.await_game_context();
        }

        state.arm_victory_condition();

        if !director.test_mode {
            signals.write_batch(state.begin_attack());
            sounds.write(SoundRequest {
                cue: SoundCue::Siren,
                volume: SIREN_VOLUME,
            });
        }

        crate::log_info(&format!(
            "🗺️ Mission registered by {:?} ({} turns, {} enemies, test mode: {})",
            entity, state.mission.number_of_turns, state.mission.enemy_count, state.test_mode
        ));
        commands.insert_resource(state);
    }
}

/// Система: director despawned (scene unload) → mission torn down
///
/// Следующая сцена начинает с пустым MissionLog.
pub fn teardown_mission_state(
    mut commands: Commands,
    mut removed: RemovedComponents<MissionDirector>,
    mut registry: ResMut<MissionRegistry>,
    mut log: ResMut<MissionLog>,
) {
    for entity in removed.read() {
        if registry.active != Some(entity) {
            continue;
        }
        registry.active = None;
        commands.remove_resource::<MissionState>();
        log.signals.clear();
        crate::log_info(&format!("🗺️ Mission director {:?} gone, mission state cleared", entity));
    }
}

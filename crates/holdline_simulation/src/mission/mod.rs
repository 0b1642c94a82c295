//! Mission orchestration
//!
//! ECS owns:
//! - turn counter, alive counters, victory / defeat
//! - deployment of the company onto friendly bodies
//! - build mode toggle, slow motion, siren requests
//!
//! Host owns:
//! - enemy spawner (→ ActorBroadcast::EnemySpawned), UI, audio playback

use bevy::prelude::*;

pub mod deployment;
pub mod director;
pub mod events;
pub mod routines;
pub mod state;

pub use deployment::*;
pub use director::*;
pub use events::*;
pub use routines::*;
pub use state::*;

use crate::SimSet;

/// Mission Plugin
///
/// FixedUpdate, после Combat (ActorKilled уже разослан):
/// 1. teardown_mission_state: director despawned → state cleared
/// 2. register_mission_directors: singleton guard, deployment, BeginAttack
/// 3. handle_mission_commands: кнопки
/// 4. process_actor_broadcasts: counters, defeat
/// 5. tick_mission_routines: victory poll, game context, slow motion
/// 6. record_mission_signals: MissionLog
pub struct MissionPlugin;

impl Plugin for MissionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MissionRegistry>()
            .init_resource::<PlayerControl>()
            .init_resource::<BuildModeState>()
            .init_resource::<SlowMotion>()
            .init_resource::<MissionLog>()
            .add_event::<ActorBroadcast>()
            .add_event::<MissionSignal>()
            .add_event::<MissionCommand>()
            .add_event::<SoundRequest>();

        app.add_systems(
            FixedUpdate,
            (
                teardown_mission_state,
                register_mission_directors,
                handle_mission_commands,
                process_actor_broadcasts,
                tick_mission_routines,
                record_mission_signals,
            )
                .chain()
                .in_set(SimSet::Mission),
        );
    }
}

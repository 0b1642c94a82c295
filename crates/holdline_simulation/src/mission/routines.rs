//! Mission routines: commands, broadcasts, victory poll, slow motion, signal log.

use bevy::prelude::*;

use crate::mission::{
    bind_soldier, free_bodies, ActorBroadcast, Company, FriendlyBodies, GameContext, MissionCommand,
    MissionSignal, MissionState, PlayerControl, SoundCue, SoundRequest, SIREN_VOLUME,
};

/// Virtual time speed during slow motion
pub const SLOW_MOTION_SPEED: f32 = 0.5;
/// Slow motion length (game seconds)
pub const SLOW_MOTION_DURATION: f32 = 2.75;

#[derive(Debug, Clone, Copy, PartialEq)]
enum SlowMotionPhase {
    Waiting { remaining: f32 },
    Active { remaining: f32 },
}

/// Slow-motion timer: wait `delay`, then run at half speed.
#[derive(Resource, Debug, Clone, Default)]
pub struct SlowMotion {
    phase: Option<SlowMotionPhase>,
}

impl SlowMotion {
    pub fn start(&mut self, delay: f32) {
        self.phase = Some(SlowMotionPhase::Waiting { remaining: delay });
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Some(SlowMotionPhase::Active { .. }))
    }

    /// Returns the new time speed when it changes.
    pub fn tick(&mut self, delta: f32) -> Option<f32> {
        match self.phase? {
            SlowMotionPhase::Waiting { remaining } => {
                let remaining = remaining - delta;
                if remaining > 0.0 {
                    self.phase = Some(SlowMotionPhase::Waiting { remaining });
                    return None;
                }
                self.phase = Some(SlowMotionPhase::Active {
                    remaining: SLOW_MOTION_DURATION,
                });
                Some(SLOW_MOTION_SPEED)
            }
            SlowMotionPhase::Active { remaining } => {
                let remaining = remaining - delta;
                if remaining > 0.0 {
                    self.phase = Some(SlowMotionPhase::Active { remaining });
                    return None;
                }
                self.phase = None;
                Some(1.0)
            }
        }
    }
}

/// Building manager state (host owned).
#[derive(Resource, Debug, Clone, Default)]
pub struct BuildModeState {
    pub in_build_mode: bool,
}

/// Every MissionSignal in order (UI / tests / replay).
#[derive(Resource, Debug, Clone, Default)]
pub struct MissionLog {
    pub signals: Vec<MissionSignal>,
}

/// Система: MissionCommand (кнопки) → сигналы, спавн, slow motion
#[allow(clippy::too_many_arguments)]
pub fn handle_mission_commands(
    mut commands: Commands,
    mut inputs: EventReader<MissionCommand>,
    mission: Option<ResMut<MissionState>>,
    build_mode: Res<BuildModeState>,
    mut company: Option<ResMut<Company>>,
    mut bodies: FriendlyBodies,
    mut player: ResMut<PlayerControl>,
    mut slow_motion: ResMut<SlowMotion>,
    mut broadcasts: EventWriter<ActorBroadcast>,
    mut signals: EventWriter<MissionSignal>,
    mut sounds: EventWriter<SoundRequest>,
) {
    let Some(mut mission) = mission else {
        for input in inputs.read() {
            crate::log_warning(&format!("MissionCommand {:?} without an active mission", input));
        }
        return;
    };

    for input in inputs.read() {
        match *input {
            MissionCommand::BeginAttack => {
                signals.write_batch(mission.begin_attack());
                sounds.write(SoundRequest {
                    cue: SoundCue::Siren,
                    volume: SIREN_VOLUME,
                });
            }
            MissionCommand::ToggleBuildMode => {
                signals.write_batch(mission.toggle_build_mode(build_mode.in_build_mode));
            }
            MissionCommand::SpawnFriendly { weapon } => {
                let Some(company) = company.as_deref_mut() else {
                    crate::log_warning("SpawnFriendly: no Company resource");
                    continue;
                };

                let Some(mut soldier) = company.new_recruits(1).pop() else {
                    continue;
                };
                soldier.weapon = weapon;
                company.add_recruit(soldier.clone());

                let Some(body) = free_bodies(&bodies).first().copied() else {
                    crate::log_warning(&format!("SpawnFriendly: no free body for {}", soldier.name));
                    continue;
                };

                let make_player = mission.friendly_actors.is_empty();
                bind_soldier(
                    &mut commands,
                    &mut bodies,
                    body,
                    &soldier,
                    make_player,
                    &mut mission,
                    &mut player,
                    &mut broadcasts,
                );
            }
            MissionCommand::StartSlowMotion { delay_secs } => {
                slow_motion.start(delay_secs);
            }
        }
    }
}

/// Система: ActorBroadcast → counters, defeat check
pub fn process_actor_broadcasts(
    mut broadcasts: EventReader<ActorBroadcast>,
    mission: Option<ResMut<MissionState>>,
    mut signals: EventWriter<MissionSignal>,
) {
    let Some(mut mission) = mission else {
        broadcasts.clear();
        return;
    };

    for broadcast in broadcasts.read() {
        signals.write_batch(mission.handle_broadcast(broadcast));
    }
}

/// Система: victory poll, game context wait, slow motion timer
pub fn tick_mission_routines(
    mission: Option<ResMut<MissionState>>,
    context: Option<Res<GameContext>>,
    mut slow_motion: ResMut<SlowMotion>,
    mut virtual_time: ResMut<Time<Virtual>>,
    time: Res<Time<Fixed>>,
    mut signals: EventWriter<MissionSignal>,
) {
    let delta = time.delta_secs();

    if let Some(speed) = slow_motion.tick(delta) {
        virtual_time.set_relative_speed(speed);
        crate::log(&format!("⏱️ Time speed → {}", speed));
    }

    let Some(mut mission) = mission else {
        return;
    };

    if mission.is_awaiting_game_context() && context.is_some_and(|context| context.initialized) {
        signals.write_batch(mission.game_context_ready());
    }

    signals.write_batch(mission.tick_victory_poll(delta));
}

/// Система: MissionSignal → MissionLog
pub fn record_mission_signals(mut signals: EventReader<MissionSignal>, mut log: ResMut<MissionLog>) {
    for signal in signals.read() {
        crate::log_info(&format!("📣 {:?}", signal));
        log.signals.push(*signal);
    }
}

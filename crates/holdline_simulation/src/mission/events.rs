//! Mission broadcasts, signals and commands.

use bevy::prelude::*;

use crate::combat::WeaponKind;
use crate::components::ActorTeam;

/// Actor lifecycle broadcast.
///
/// One event type so spawns and deaths keep their relative order.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorBroadcast {
    EnemySpawned,
    FriendlySpawned,
    ActorKilled { team: ActorTeam },
}

/// Mission-level notifications for UI, spawners, building manager.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionSignal {
    /// `won == false`: all friendlies dead
    MissionEnd { won: bool },
    AttackStart,
    AttackEnd,
    NewTurn { turn: u32 },
    LeaveBuildMode,
}

/// Button-style mission inputs.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum MissionCommand {
    BeginAttack,
    ToggleBuildMode,
    SpawnFriendly { weapon: WeaponKind },
    StartSlowMotion { delay_secs: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Siren,
}

/// Output: play a one-shot sound.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SoundRequest {
    pub cue: SoundCue,
    pub volume: f32,
}

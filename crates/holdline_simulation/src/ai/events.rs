//! AI Events: входы от хоста (триггеры обнаружения, активация) и выходы AI.

use bevy::prelude::*;

/// Detection trigger: `target` entered the observer's detection area.
///
/// `in_emergency_range`: цель достаточно близко, чтобы перебить текущий приоритет.
#[derive(Event, Debug, Clone)]
pub struct TargetDetected {
    pub observer: Entity,
    pub target: Entity,
    pub in_emergency_range: bool,
}

/// Detection trigger: `target` left the observer's detection area.
#[derive(Event, Debug, Clone)]
pub struct TargetLost {
    pub observer: Entity,
    pub target: Entity,
}

/// Activate (show + resume attacks) or deactivate (hide + halt) an actor.
#[derive(Event, Debug, Clone)]
pub struct SetActorActive {
    pub entity: Entity,
    pub active: bool,
}

/// Hit reaction finished: the actor may shoot again.
#[derive(Event, Debug, Clone)]
pub struct RecoverFromDaze {
    pub entity: Entity,
}

/// Output: a sapper reached its wall. Host instantiates the bomb.
#[derive(Event, Debug, Clone)]
pub struct BombPlaced {
    pub sapper: Entity,
    pub position: Vec3,
    pub rotation: Quat,
}

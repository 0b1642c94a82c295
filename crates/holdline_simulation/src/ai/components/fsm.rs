//! AI FSM: states + pure transitions over a sensor snapshot.

use bevy::prelude::*;

/// Within this distance the sapper counts as arrived and plants the bomb.
pub const BOMB_ARRIVAL_DISTANCE: f32 = 0.75;

/// AI FSM состояния
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum AIState {
    /// Stand still, shoot whatever comes into range
    HoldingPosition,

    /// Chase the follow target (or the attack target)
    FollowTarget,

    /// Sapper: walk to the stand-off point in front of a wall
    DeliveringBomb {
        destination: Vec3,
    },

    /// In range + LOS: stop and fire
    Attacking,
}

/// Side effects requested by a transition. Executed by the FSM system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AIAction {
    /// Sapper arrived: plant the bomb at its position
    PlaceBomb,
    /// Nothing to follow: pick a random friendly
    AcquireFollowTarget,
}

/// Immutable per-tick view of the controller + world.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AISensors {
    pub has_attack_target: bool,
    pub target_in_range: bool,
    pub target_in_los: bool,
    pub has_follow_target: bool,
    /// Only meaningful while delivering a bomb
    pub distance_to_destination: Option<f32>,
}

impl AISensors {
    pub fn can_engage(&self) -> bool {
        self.has_attack_target && self.target_in_range && self.target_in_los
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: AIState,
    pub actions: Vec<AIAction>,
}

impl Transition {
    fn stay(state: AIState) -> Self {
        Self {
            next: state,
            actions: Vec::new(),
        }
    }
}

impl AIState {
    /// Next state for this tick. No side effects; see [`AIAction`].
    pub fn transition(&self, sensors: &AISensors) -> Transition {
        match *self {
            AIState::HoldingPosition => Transition::stay(AIState::HoldingPosition),

            AIState::FollowTarget => {
                if sensors.can_engage() {
                    return Transition::stay(AIState::Attacking);
                }
                follow_target(sensors, Vec::new())
            }

            AIState::Attacking => {
                if sensors.can_engage() {
                    return Transition::stay(AIState::Attacking);
                }
                follow_target(sensors, Vec::new())
            }

            AIState::DeliveringBomb { destination } => match sensors.distance_to_destination {
                Some(distance) if distance <= BOMB_ARRIVAL_DISTANCE => {
                    follow_target(sensors, vec![AIAction::PlaceBomb])
                }
                _ => Transition::stay(AIState::DeliveringBomb { destination }),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AIState::HoldingPosition => "HoldingPosition",
            AIState::FollowTarget => "FollowTarget",
            AIState::DeliveringBomb { .. } => "DeliveringBomb",
            AIState::Attacking => "Attacking",
        }
    }
}

/// Entering FollowTarget with nothing to chase asks for a follow target.
fn follow_target(sensors: &AISensors, mut actions: Vec<AIAction>) -> Transition {
    if !sensors.has_follow_target && !sensors.has_attack_target {
        actions.push(AIAction::AcquireFollowTarget);
    }
    Transition {
        next: AIState::FollowTarget,
        actions,
    }
}

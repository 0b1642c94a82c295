//! AIController: per-actor AI state, targets and combat flags.

use bevy::prelude::*;

use crate::ai::AIState;
use crate::ai::AttackRoutine;
use crate::combat::{EquippedWeapon, FireBursts};
use crate::components::{MovementCommand, WeaponAim};
use crate::config::ControllerData;

/// Candidate attack targets reported by detection triggers.
///
/// Insertion-ordered: "first live candidate" means first detected.
/// The flag is "in emergency range" (close enough to take priority).
/// Re-adding a known target overwrites its flag in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PossibleTargets {
    entries: Vec<(Entity, bool)>,
}

impl PossibleTargets {
    pub fn insert(&mut self, target: Entity, in_emergency_range: bool) {
        match self.entries.iter_mut().find(|(e, _)| *e == target) {
            Some(entry) => entry.1 = in_emergency_range,
            None => self.entries.push((target, in_emergency_range)),
        }
    }

    pub fn remove(&mut self, target: Entity) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(e, _)| *e != target);
        self.entries.len() != before
    }

    pub fn contains(&self, target: Entity) -> bool {
        self.entries.iter().any(|(e, _)| *e == target)
    }

    pub fn is_emergency(&self, target: Entity) -> Option<bool> {
        self.entries.iter().find(|(e, _)| *e == target).map(|(_, flag)| *flag)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, bool)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// AI brain of a non-player actor
///
/// Friendlies carry one too (the player can swap bodies); their state
/// does not advance on its own.
#[derive(Component, Debug, Clone)]
#[require(MovementCommand, WeaponAim, AttackRoutine, FireBursts, EquippedWeapon, ControllerData)]
pub struct AIController {
    state: Option<AIState>,
    attack_target: Option<Entity>,
    follow_target: Option<Entity>,
    move_position: Option<Vec3>,
    possible_targets: PossibleTargets,

    /// Recomputed every tick before the state transition
    pub target_in_range: bool,
    /// Recomputed every tick before the state transition
    pub target_in_los: bool,

    is_reloading: bool,
    is_dazed: bool,
    is_player_controlled: bool,
    attacks_paused: bool,
    pathfinder_enabled: bool,

    /// Training dummy: never targets, never moves
    pub is_dummy: bool,
    /// Object is live in the scene (pre-placed bodies start disabled)
    pub enabled: bool,
    pub activate_on_start: bool,
}

impl Default for AIController {
    fn default() -> Self {
        Self {
            state: None,
            attack_target: None,
            follow_target: None,
            move_position: None,
            possible_targets: PossibleTargets::default(),
            target_in_range: false,
            target_in_los: false,
            is_reloading: false,
            is_dazed: false,
            is_player_controlled: false,
            attacks_paused: false,
            pathfinder_enabled: true,
            is_dummy: false,
            enabled: true,
            activate_on_start: true,
        }
    }
}

impl AIController {
    pub fn dummy() -> Self {
        Self {
            is_dummy: true,
            ..default()
        }
    }

    /// Controller that stays inactive until something activates it (pre-placed bodies).
    pub fn inactive() -> Self {
        Self {
            activate_on_start: false,
            ..default()
        }
    }

    // --- State ---

    pub fn state(&self) -> Option<&AIState> {
        self.state.as_ref()
    }

    pub fn set_state(&mut self, state: AIState) {
        self.state = Some(state);
    }

    // --- Targeting ---

    pub fn attack_target(&self) -> Option<Entity> {
        self.attack_target
    }

    pub fn possible_targets(&self) -> &PossibleTargets {
        &self.possible_targets
    }

    /// Pick a new attack target from the detected candidates.
    ///
    /// Dead candidates are pruned. The first live candidate is the default,
    /// the first emergency-range candidate wins and ends the scan.
    pub fn pick_new_attack_target(&mut self, is_alive: impl Fn(Entity) -> bool) -> bool {
        self.attack_target = None;
        let mut dead = Vec::new();

        for (candidate, in_emergency_range) in self.possible_targets.iter() {
            if !is_alive(candidate) {
                dead.push(candidate);
                continue;
            }

            if self.attack_target.is_none() || in_emergency_range {
                self.attack_target = Some(candidate);
                if in_emergency_range {
                    break;
                }
            }
        }

        for candidate in dead {
            self.possible_targets.remove(candidate);
        }

        self.attack_target.is_some()
    }

    /// Detection trigger entered. Becomes the attack target only if there is none.
    pub fn add_attack_target(&mut self, target: Entity, in_emergency_range: bool) {
        if self.attack_target.is_none() {
            self.attack_target = Some(target);
        }
        self.possible_targets.insert(target, in_emergency_range);
    }

    /// Detection trigger exited.
    pub fn remove_attack_target(&mut self, target: Entity) {
        if self.possible_targets.remove(target) && self.attack_target == Some(target) {
            self.attack_target = None;
        }
    }

    pub fn clear_attack_target(&mut self) {
        self.attack_target = None;
    }

    // --- Movement intent ---

    pub fn should_go_to_position(&self) -> bool {
        self.move_position.is_some()
    }

    pub fn move_position(&self) -> Option<Vec3> {
        self.move_position
    }

    pub fn go_to_position(&mut self, position: Vec3) {
        // Same destination: don't re-path.
        if self.move_position == Some(position) {
            return;
        }
        self.move_position = Some(position);
    }

    pub fn stop_going_to_position(&mut self) {
        self.move_position = None;
    }

    pub fn should_follow_something(&self) -> bool {
        self.follow_target.is_some()
    }

    pub fn follow_target(&self) -> Option<Entity> {
        self.follow_target
    }

    pub fn follow(&mut self, target: Entity) {
        self.follow_target = Some(target);
    }

    pub fn stop_following_something(&mut self) {
        self.follow_target = None;
    }

    pub fn pathfinder_enabled(&self) -> bool {
        self.pathfinder_enabled
    }

    // --- Combat flags ---

    pub fn is_reloading(&self) -> bool {
        self.is_reloading
    }

    pub fn set_reloading(&mut self, reloading: bool) {
        self.is_reloading = reloading;
    }

    pub fn is_dazed(&self) -> bool {
        self.is_dazed
    }

    pub fn handle_get_hit(&mut self) {
        self.is_dazed = true;
    }

    pub fn stop_being_dazed(&mut self) {
        self.is_dazed = false;
    }

    pub fn attacks_paused(&self) -> bool {
        self.attacks_paused
    }

    pub fn is_player_controlled(&self) -> bool {
        self.is_player_controlled
    }

    /// Hand the body to (or take it back from) the player.
    pub fn set_player_controlled(&mut self, controlled: bool, is_alive: bool) {
        self.is_player_controlled = controlled;
        self.pathfinder_enabled = is_alive && !controlled;
    }

    /// All conditions for opening fire this cycle.
    pub fn can_open_fire(&self, can_move_and_shoot: bool) -> bool {
        self.attack_target.is_some()
            && !self.is_reloading
            && !self.is_dazed
            && self.target_in_los
            && self.target_in_range
            && can_move_and_shoot
            && !self.attacks_paused
    }

    // --- Lifecycle ---

    pub fn resume_attacks(&mut self) {
        self.attacks_paused = false;
    }

    /// Deactivation: pause fire and forget the current target.
    pub fn halt_attacks(&mut self) {
        self.attacks_paused = true;
        self.attack_target = None;
    }

    pub fn handle_death(&mut self) {
        self.attack_target = None;
        self.pathfinder_enabled = false;
        self.target_in_range = false;
        self.target_in_los = false;
    }
}

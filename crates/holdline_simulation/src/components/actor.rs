//! Base actor components: Actor, ActorTeam, Health, Dead

use bevy::prelude::*;

/// Team affiliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum ActorTeam {
    Friendly,
    #[default]
    Enemy,
    Neutral,
}

/// Actor (soldier, enemy, civilian): base component for living things.
///
/// Health, HitVolume and Transform come in through required components.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Health, crate::components::HitVolume, Transform)]
pub struct Actor {
    pub team: ActorTeam,
    /// Vertical tier (ground, wall top, tower). Compared against obstacle heights for LOS.
    pub height_level: i32,
    /// The player's own soldier.
    pub is_player: bool,
    /// Rendered / shown to the player. Toggled by activation.
    pub visible: bool,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            team: ActorTeam::Enemy,
            height_level: 0,
            is_player: false,
            visible: true,
        }
    }
}

impl Actor {
    pub fn new(team: ActorTeam) -> Self {
        Self { team, ..default() }
    }

    pub fn with_height(mut self, height_level: i32) -> Self {
        self.height_level = height_level;
        self
    }

    pub fn set_visibility(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// Actor health
///
/// Invariant: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }
}

/// How an actor died (host picks ragdoll vs gib).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum DeathCause {
    Normal,
    Explosive,
}

/// Marker: actor is dead. Bodies stay in the world.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dead {
    pub cause: DeathCause,
}

//! Static gameplay data: missions and per-actor controller tuning.
//!
//! Данные read-only во время миссии. Defaults + presets в коде,
//! JSON (serde) для всего что приходит из контента.

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Data that can sanity-check itself after deserialization.
pub trait Validate {
    fn validate(&self) -> Result<(), ConfigError>;
}

pub fn from_json_str<T: DeserializeOwned + Validate>(json: &str) -> Result<T, ConfigError> {
    let value: T = serde_json::from_str(json)?;
    value.validate()?;
    Ok(value)
}

pub fn load_json_file<T: DeserializeOwned + Validate>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    from_json_str(&json)
}

/// How a mission is won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryCondition {
    #[default]
    EliminateAllEnemies,
}

/// Mission configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionData {
    #[serde(default)]
    pub victory_condition: VictoryCondition,
    /// Enemies the spawner will produce over the whole attack.
    pub enemy_count: u32,
    /// Last playable turn; advancing past it wins the mission.
    pub number_of_turns: u32,
    /// Chance of an attack at the end of a turn (0..=1). Read by the host turn flow.
    #[serde(default)]
    pub per_turn_attack_chance: f32,
}

impl Default for MissionData {
    fn default() -> Self {
        Self {
            victory_condition: VictoryCondition::EliminateAllEnemies,
            enemy_count: 5,
            number_of_turns: 3,
            per_turn_attack_chance: 0.5,
        }
    }
}

impl Validate for MissionData {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.number_of_turns == 0 {
            return Err(ConfigError::Invalid("number_of_turns must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.per_turn_attack_chance) {
            return Err(ConfigError::Invalid(format!(
                "per_turn_attack_chance {} is outside 0..=1",
                self.per_turn_attack_chance
            )));
        }
        Ok(())
    }
}

/// Initial AI behaviour, resolved once when the controller starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialState {
    #[default]
    HoldingPosition,
    FollowTarget,
    DeliveringBomb,
}

/// Per-actor AI tuning.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerData {
    /// Seconds the attack routine waits after each cycle.
    pub pause_between_bursts: f32,
    /// Fire is only allowed for actors that may shoot on the move.
    pub can_move_and_shoot: bool,
    #[serde(default)]
    pub initial_state: InitialState,
}

impl Default for ControllerData {
    fn default() -> Self {
        Self::basic()
    }
}

impl ControllerData {
    /// Basic rifleman: chases friendlies.
    pub fn basic() -> Self {
        Self {
            pause_between_bursts: 1.5,
            can_move_and_shoot: true,
            initial_state: InitialState::FollowTarget,
        }
    }

    /// Sapper: walks a bomb to the nearest free wall.
    pub fn sapper() -> Self {
        Self {
            pause_between_bursts: 2.5,
            can_move_and_shoot: true,
            initial_state: InitialState::DeliveringBomb,
        }
    }

    /// Warrior: fast bursts.
    pub fn warrior() -> Self {
        Self {
            pause_between_bursts: 0.75,
            can_move_and_shoot: true,
            initial_state: InitialState::FollowTarget,
        }
    }

    /// Sentry / dummy: never moves.
    pub fn sentry() -> Self {
        Self {
            pause_between_bursts: 1.0,
            can_move_and_shoot: true,
            initial_state: InitialState::HoldingPosition,
        }
    }
}

impl Validate for ControllerData {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.pause_between_bursts < 0.0 {
            return Err(ConfigError::Invalid("pause_between_bursts must not be negative".into()));
        }
        Ok(())
    }
}

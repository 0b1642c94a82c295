//! MissionState: turn counter, alive counters, win/loss bookkeeping.
//!
//! Чистая логика без ECS-зависимостей (кроме Entity): каждый метод
//! возвращает сигналы, которые система потом пишет в `MissionSignal`.

use bevy::prelude::*;

use crate::components::ActorTeam;
use crate::config::{MissionData, VictoryCondition};
use crate::mission::{ActorBroadcast, MissionSignal};

/// Seconds between "all enemies eliminated" checks.
pub const VICTORY_POLL_INTERVAL: f32 = 1.0;

/// The one active mission. Exists while its director does.
#[derive(Resource, Debug, Clone)]
pub struct MissionState {
    pub mission: MissionData,
    pub director: Entity,
    pub test_mode: bool,
    /// Initialized friendlies in deployment order
    pub friendly_actors: Vec<Entity>,

    turn: u32,
    enemies_alive: i32,
    friendlies_alive: i32,
    total_enemies_spawned: u32,
    outcome: Option<bool>,
    /// Seconds until the next elimination check; None = poller not running
    victory_poll: Option<f32>,
    awaiting_game_context: bool,
}

impl MissionState {
    pub fn new(mission: MissionData, director: Entity, test_mode: bool) -> Self {
        Self {
            mission,
            director,
            test_mode,
            friendly_actors: Vec::new(),
            turn: 1,
            enemies_alive: 0,
            friendlies_alive: 0,
            total_enemies_spawned: 0,
            outcome: None,
            victory_poll: None,
            awaiting_game_context: false,
        }
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn enemies_alive(&self) -> i32 {
        self.enemies_alive
    }

    pub fn friendlies_alive(&self) -> i32 {
        self.friendlies_alive
    }

    pub fn total_enemies_spawned(&self) -> u32 {
        self.total_enemies_spawned
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// `Some(true)` won, `Some(false)` lost
    pub fn outcome(&self) -> Option<bool> {
        self.outcome
    }

    pub fn is_victory_poll_armed(&self) -> bool {
        self.victory_poll.is_some()
    }

    /// Counters update on actor lifecycle broadcasts.
    pub fn handle_broadcast(&mut self, broadcast: &ActorBroadcast) -> Vec<MissionSignal> {
        match broadcast {
            ActorBroadcast::EnemySpawned => {
                self.enemies_alive += 1;
                self.total_enemies_spawned += 1;
                Vec::new()
            }
            ActorBroadcast::FriendlySpawned => {
                self.friendlies_alive += 1;
                Vec::new()
            }
            ActorBroadcast::ActorKilled { team } => match team {
                ActorTeam::Enemy => {
                    self.enemies_alive -= 1;
                    Vec::new()
                }
                ActorTeam::Friendly => {
                    self.friendlies_alive -= 1;
                    if self.friendlies_alive <= 0 {
                        self.end_mission(false).into_iter().collect()
                    } else {
                        Vec::new()
                    }
                }
                ActorTeam::Neutral => {
                    crate::log("Neutral actor killed");
                    Vec::new()
                }
            },
        }
    }

    /// Ends the mission once; later calls are ignored.
    pub fn end_mission(&mut self, won: bool) -> Option<MissionSignal> {
        if self.outcome.is_some() {
            return None;
        }
        self.outcome = Some(won);
        self.victory_poll = None;
        crate::log_info(&format!("🏁 Mission end (won: {})", won));
        Some(MissionSignal::MissionEnd { won })
    }

    /// Turn advance. Past the last turn → MissionEnd(true) instead of NewTurn.
    pub fn next_turn(&mut self) -> Vec<MissionSignal> {
        if self.is_over() {
            return Vec::new();
        }

        self.turn += 1;
        if self.turn > self.mission.number_of_turns {
            return self.end_mission(true).into_iter().collect();
        }

        crate::log_info(&format!("📅 Turn {}", self.turn));
        vec![MissionSignal::NewTurn { turn: self.turn }]
    }

    pub fn all_enemies_eliminated(&self) -> bool {
        self.total_enemies_spawned >= self.mission.enemy_count && self.enemies_alive <= 0
    }

    /// Start the poller for the configured victory condition.
    pub fn arm_victory_condition(&mut self) {
        match self.mission.victory_condition {
            VictoryCondition::EliminateAllEnemies => {
                // первая проверка сразу
                self.victory_poll = Some(0.0);
            }
        }
    }

    /// Advance the poller. On success: AttackEnd + turn advance, poller stops.
    pub fn tick_victory_poll(&mut self, delta: f32) -> Vec<MissionSignal> {
        let Some(remaining) = self.victory_poll else {
            return Vec::new();
        };

        if remaining > 0.0 {
            self.victory_poll = Some(remaining - delta);
            return Vec::new();
        }

        if !self.all_enemies_eliminated() {
            self.victory_poll = Some(VICTORY_POLL_INTERVAL);
            return Vec::new();
        }

        self.victory_poll = None;
        let mut signals = vec![MissionSignal::AttackEnd];
        signals.extend(self.next_turn());
        signals
    }

    /// Incoming! Re-arms the victory poller.
    pub fn begin_attack(&mut self) -> Vec<MissionSignal> {
        if self.is_over() {
            return Vec::new();
        }
        self.arm_victory_condition();
        vec![MissionSignal::AttackStart]
    }

    /// Build-mode button.
    pub fn toggle_build_mode(&self, in_build_mode: bool) -> Vec<MissionSignal> {
        if in_build_mode {
            vec![MissionSignal::LeaveBuildMode]
        } else {
            vec![
                MissionSignal::AttackEnd,
                MissionSignal::NewTurn { turn: self.turn },
            ]
        }
    }

    /// Wait for the game context before the first NewTurn.
    pub fn await_game_context(&mut self) {
        self.awaiting_game_context = true;
    }

    pub fn is_awaiting_game_context(&self) -> bool {
        self.awaiting_game_context
    }

    /// Game context reported initialized: first NewTurn (once).
    pub fn game_context_ready(&mut self) -> Option<MissionSignal> {
        if !self.awaiting_game_context {
            return None;
        }
        self.awaiting_game_context = false;
        Some(MissionSignal::NewTurn { turn: self.turn })
    }

    pub fn register_friendly(&mut self, actor: Entity) {
        if !self.friendly_actors.contains(&actor) {
            self.friendly_actors.push(actor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mission(turns: u32, enemies: u32) -> MissionState {
        MissionState::new(
            MissionData {
                number_of_turns: turns,
                enemy_count: enemies,
                ..Default::default()
            },
            Entity::from_raw(0),
            true,
        )
    }

    #[test]
    fn test_turns_advance_to_victory() {
        let mut state = mission(3, 0);
        assert_eq!(state.turn(), 1);

        assert_eq!(state.next_turn(), vec![MissionSignal::NewTurn { turn: 2 }]);
        assert_eq!(state.next_turn(), vec![MissionSignal::NewTurn { turn: 3 }]);
        assert_eq!(state.next_turn(), vec![MissionSignal::MissionEnd { won: true }]);
        assert_eq!(state.outcome(), Some(true));

        // после конца: тишина
        assert!(state.next_turn().is_empty());
    }

    #[test]
    fn test_last_friendly_death_loses_once() {
        let mut state = mission(3, 5);
        state.handle_broadcast(&ActorBroadcast::FriendlySpawned);
        state.handle_broadcast(&ActorBroadcast::FriendlySpawned);

        let killed = ActorBroadcast::ActorKilled {
            team: ActorTeam::Friendly,
        };
        assert!(state.handle_broadcast(&killed).is_empty());
        assert_eq!(
            state.handle_broadcast(&killed),
            vec![MissionSignal::MissionEnd { won: false }]
        );
        assert!(state.handle_broadcast(&killed).is_empty());
        assert_eq!(state.friendlies_alive(), -1);
    }

    #[test]
    fn test_enemy_counters() {
        let mut state = mission(3, 2);
        state.handle_broadcast(&ActorBroadcast::EnemySpawned);
        state.handle_broadcast(&ActorBroadcast::EnemySpawned);
        state.handle_broadcast(&ActorBroadcast::ActorKilled { team: ActorTeam::Enemy });
        state.handle_broadcast(&ActorBroadcast::ActorKilled { team: ActorTeam::Neutral });

        assert_eq!(state.enemies_alive(), 1);
        assert_eq!(state.total_enemies_spawned(), 2);
        assert!(!state.all_enemies_eliminated());

        state.handle_broadcast(&ActorBroadcast::ActorKilled { team: ActorTeam::Enemy });
        assert!(state.all_enemies_eliminated());
    }

    #[test]
    fn test_elimination_needs_full_spawn_count() {
        let mut state = mission(3, 3);
        state.handle_broadcast(&ActorBroadcast::EnemySpawned);
        state.handle_broadcast(&ActorBroadcast::ActorKilled { team: ActorTeam::Enemy });
        assert!(!state.all_enemies_eliminated());
    }

    #[test]
    fn test_victory_poll_checks_immediately_then_every_second() {
        let mut state = mission(3, 1);
        state.arm_victory_condition();

        // нет врагов ещё → ждём
        assert!(state.tick_victory_poll(0.1).is_empty());
        state.handle_broadcast(&ActorBroadcast::EnemySpawned);
        state.handle_broadcast(&ActorBroadcast::ActorKilled { team: ActorTeam::Enemy });

        // до следующей проверки ~1s
        assert!(state.tick_victory_poll(0.5).is_empty());
        assert!(state.tick_victory_poll(0.6).is_empty());

        assert_eq!(
            state.tick_victory_poll(0.1),
            vec![MissionSignal::AttackEnd, MissionSignal::NewTurn { turn: 2 }]
        );
        assert!(!state.is_victory_poll_armed());
        assert!(state.tick_victory_poll(5.0).is_empty());
    }

    #[test]
    fn test_begin_attack_rearms_poll() {
        let mut state = mission(3, 0);
        assert_eq!(state.begin_attack(), vec![MissionSignal::AttackStart]);
        assert!(state.is_victory_poll_armed());
    }

    #[test]
    fn test_toggle_build_mode() {
        let state = mission(3, 0);
        assert_eq!(state.toggle_build_mode(true), vec![MissionSignal::LeaveBuildMode]);
        assert_eq!(
            state.toggle_build_mode(false),
            vec![MissionSignal::AttackEnd, MissionSignal::NewTurn { turn: 1 }]
        );
    }

    #[test]
    fn test_game_context_ready_once() {
        let mut state = mission(3, 0);
        assert_eq!(state.game_context_ready(), None);

        state.await_game_context();
        assert_eq!(state.game_context_ready(), Some(MissionSignal::NewTurn { turn: 1 }));
        assert_eq!(state.game_context_ready(), None);
    }
}

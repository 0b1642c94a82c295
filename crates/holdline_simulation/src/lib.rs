//! HOLDLINE Simulation Core
//!
//! ECS-симуляция на Bevy 0.16 (strategic layer): enemy AI, attack bursts,
//! mission lifecycle.
//!
//! - ECS = game state, AI decisions, combat rules, mission bookkeeping
//! - Host engine = rendering, physics (ray casts), pathfinding, audio, UI

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod mission;
pub mod physics;

// Re-export базовых типов для удобства
pub use ai::{AIController, AIPlugin, AIState};
pub use combat::{CombatPlugin, DamageDealt, EntityDied, EquippedWeapon, WeaponData, WeaponFired, WeaponKind};
pub use components::*;
pub use config::{ConfigError, ControllerData, InitialState, MissionData, VictoryCondition};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use mission::{ActorBroadcast, MissionCommand, MissionDirector, MissionPlugin, MissionSignal, MissionState};

/// Порядок внутри FixedUpdate тика
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Start-up, activation, detection triggers
    Detection,
    /// Collision world, range / LOS
    Sensors,
    /// FSM, movement, attack routine
    Decisions,
    /// Bursts, damage, deaths
    Combat,
    /// Counters, turns, victory / defeat
    Mission,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Fixed timestep 60Hz для simulation tick
        app.insert_resource(Time::<Fixed>::from_hz(60.0));

        // Seed из create_headless_app не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.init_resource::<physics::CollisionWorld>()
            .init_resource::<physics::NavigationService>()
            .configure_sets(
                FixedUpdate,
                (
                    SimSet::Detection,
                    SimSet::Sensors,
                    SimSet::Decisions,
                    SimSet::Combat,
                    SimSet::Mission,
                )
                    .chain(),
            )
            // Подсистемы (ECS strategic layer)
            .add_plugins((AIPlugin, CombatPlugin, MissionPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot компонента по всем entity (для сравнения детерминизма)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

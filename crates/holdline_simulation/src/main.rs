//! Headless симуляция HOLDLINE
//!
//! Демо-миссия без движка: три солдата держат стену, враги идут волной.
//! Хостовые части (обнаружение, движение, попадания): упрощённые системы ниже.

use std::collections::HashMap;
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use holdline_simulation::ai::{AIController, RecoverFromDaze, TargetDetected};
use holdline_simulation::combat::{DamageDealt, WeaponFired};
use holdline_simulation::components::{Actor, ActorTeam, Building, Dead, MovementCommand};
use holdline_simulation::config::ControllerData;
use holdline_simulation::mission::{
    ActorBroadcast, Company, CompanySoldier, FriendlyBody, GameContext, MissionDirector, MissionLog,
    MissionState,
};
use holdline_simulation::{create_headless_app, MissionData, SimSet, SimulationPlugin, WeaponKind};

/// Demo: detection trigger radius
const DETECTION_RADIUS: f32 = 12.0;
/// Demo: detection "emergency" radius
const EMERGENCY_RADIUS: f32 = 4.0;
/// Demo: walking speed (m/s)
const WALK_SPEED: f32 = 2.5;
/// Demo: seconds between enemy spawns
const SPAWN_INTERVAL: f32 = 1.5;
/// Demo: seconds a hit actor stays dazed
const DAZE_TIME: f32 = 0.4;

const MAX_FRAMES: u32 = 60 * 180;

fn main() {
    let seed = 42;
    println!("Starting HOLDLINE headless mission (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .insert_resource(GameContext { initialized: true })
        .insert_resource(demo_company())
        .add_systems(
            FixedUpdate,
            (demo_spawn_enemies, demo_proximity_detection)
                .chain()
                .in_set(SimSet::Detection)
                .before(holdline_simulation::ai::start_controllers),
        )
        .add_systems(
            FixedUpdate,
            demo_walk
                .after(SimSet::Decisions)
                .before(SimSet::Combat),
        )
        .add_systems(
            FixedUpdate,
            (demo_hitscan, demo_daze_recovery)
                .after(SimSet::Combat)
                .before(SimSet::Mission),
        );

    spawn_demo_scene(app.world_mut().commands());

    for frame in 0..MAX_FRAMES {
        app.update();

        let finished = app
            .world()
            .get_resource::<MissionState>()
            .is_some_and(|mission| mission.is_over());
        if finished {
            println!("Mission finished at frame {}", frame);
            break;
        }
    }

    if let Some(log) = app.world().get_resource::<MissionLog>() {
        println!("Mission signals:");
        for signal in &log.signals {
            println!("  {:?}", signal);
        }
    }

    println!("Simulation complete!");
}

fn demo_company() -> Company {
    let mut company = Company::default();
    for (id, (name, weapon)) in [
        ("Cpl. Ortega", WeaponKind::AssaultRifle),
        ("Pvt. Lindqvist", WeaponKind::Shotgun),
        ("Pvt. Adeyemi", WeaponKind::Pistol),
    ]
    .into_iter()
    .enumerate()
    {
        company.add_recruit(CompanySoldier {
            id: id as u32,
            name: name.to_string(),
            weapon,
            deployed: true,
        });
    }
    company
}

fn spawn_demo_scene(mut commands: Commands) {
    // Стена перед позицией
    for x in [-2.0, 0.0, 2.0] {
        commands.spawn((Building::wall(1), Transform::from_xyz(x, 0.0, -3.0)));
    }

    // Тела солдат (неактивны до деплоя)
    for slot in 0..4 {
        commands.spawn((
            Actor::new(ActorTeam::Friendly),
            FriendlyBody { slot },
            AIController::inactive(),
            ControllerData::sentry(),
            Transform::from_xyz(slot as f32 * 1.5 - 2.25, 0.0, 0.0),
        ));
    }

    commands.spawn(MissionDirector {
        mission: MissionData {
            enemy_count: 6,
            number_of_turns: 2,
            ..Default::default()
        },
        test_mode: false,
    });
}

/// Demo spawner: enemies every SPAWN_INTERVAL up to the mission count
fn demo_spawn_enemies(
    mut commands: Commands,
    mission: Option<Res<MissionState>>,
    time: Res<Time<Fixed>>,
    mut cooldown: Local<f32>,
    mut broadcasts: EventWriter<ActorBroadcast>,
) {
    let Some(mission) = mission else {
        return;
    };
    if mission.is_over() || mission.total_enemies_spawned() >= mission.mission.enemy_count {
        return;
    }

    *cooldown -= time.delta_secs();
    if *cooldown > 0.0 {
        return;
    }
    *cooldown = SPAWN_INTERVAL;

    let index = mission.total_enemies_spawned();
    let data = match index % 3 {
        0 => ControllerData::basic(),
        1 => ControllerData::sapper(),
        _ => ControllerData::warrior(),
    };
    commands.spawn((
        Actor::new(ActorTeam::Enemy),
        AIController::default(),
        data,
        Transform::from_xyz(index as f32 * 1.2 - 3.0, 0.0, -20.0),
    ));
    broadcasts.write(ActorBroadcast::EnemySpawned);
}

/// Demo detection trigger: opposite teams within DETECTION_RADIUS
fn demo_proximity_detection(
    controllers: Query<(Entity, &AIController, &Actor, &Transform), Without<Dead>>,
    actors: Query<(Entity, &Actor, &Transform), Without<Dead>>,
    mut detected: EventWriter<TargetDetected>,
) {
    for (observer, controller, actor, transform) in controllers.iter() {
        if !controller.enabled {
            continue;
        }
        for (target, target_actor, target_transform) in actors.iter() {
            if target_actor.team == actor.team || !target_actor.visible {
                continue;
            }
            let distance = transform.translation.distance(target_transform.translation);
            if distance > DETECTION_RADIUS {
                continue;
            }
            let emergency = distance <= EMERGENCY_RADIUS;
            if controller.possible_targets().is_emergency(target) == Some(emergency) {
                continue;
            }
            detected.write(TargetDetected {
                observer,
                target,
                in_emergency_range: emergency,
            });
        }
    }
}

/// Demo pathfinder: walk straight at the movement target
fn demo_walk(
    mut movers: Query<(Entity, &MovementCommand, &mut Transform), Without<Dead>>,
    time: Res<Time<Fixed>>,
) {
    let step = WALK_SPEED * time.delta_secs();
    let positions: HashMap<Entity, Vec3> = movers
        .iter()
        .map(|(entity, _, transform)| (entity, transform.translation))
        .collect();

    for (_, command, mut transform) in movers.iter_mut() {
        let destination = match command {
            MovementCommand::MoveToPosition { target } => *target,
            MovementCommand::FollowEntity { target } => match positions.get(target) {
                Some(position) => *position,
                None => continue,
            },
            MovementCommand::Idle | MovementCommand::Stop => continue,
        };

        let offset = destination - transform.translation;
        if offset.length() <= step {
            transform.translation = destination;
        } else {
            transform.translation += offset.normalize() * step;
        }
    }
}

/// Demo hit resolution: every shot hits
fn demo_hitscan(mut fired: EventReader<WeaponFired>, mut damage: EventWriter<DamageDealt>) {
    for shot in fired.read() {
        damage.write(DamageDealt {
            attacker: Some(shot.shooter),
            target: shot.target,
            damage: shot.damage,
            explosive: false,
        });
    }
}

/// Demo hit reaction: dazed for DAZE_TIME
fn demo_daze_recovery(
    controllers: Query<(Entity, &AIController)>,
    time: Res<Time<Fixed>>,
    mut timers: Local<Vec<(Entity, f32)>>,
    mut recover: EventWriter<RecoverFromDaze>,
) {
    for (entity, controller) in controllers.iter() {
        if controller.is_dazed() && !timers.iter().any(|(e, _)| *e == entity) {
            timers.push((entity, DAZE_TIME));
        }
    }

    let delta = time.delta_secs();
    timers.retain_mut(|(entity, remaining)| {
        *remaining -= delta;
        if *remaining > 0.0 {
            return true;
        }
        recover.write(RecoverFromDaze { entity: *entity });
        false
    });
}

//! AI combat integration tests
//!
//! Headless App + SimulationPlugin, ручной шаг времени 20ms.
//! Проверяем:
//! - обнаружение → Attacking → bursts (расход патронов)
//! - стена блокирует LOS
//! - dazed / deactivated не стреляют
//! - смена цели после смерти, sapper → BombPlaced
//! - хостовый RaycastBackend вместо встроенного CollisionWorld

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use holdline_simulation::ai::{AttackRoutine, BombPlaced, RecoverFromDaze, SetActorActive, TargetDetected};
use holdline_simulation::combat::FireBursts;
use holdline_simulation::physics::{CollisionWorld, HitCollider, RayHit, RaycastBackend, RaycastService};
use holdline_simulation::*;

/// Helper: App со всеми plugins и фиксированным шагом
fn create_combat_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(20)));
    app
}

fn run(app: &mut App, updates: u32) {
    for _ in 0..updates {
        app.update();
    }
}

fn spawn_enemy(app: &mut App, position: Vec3, data: ControllerData) -> Entity {
    app.world_mut()
        .spawn((
            Actor::new(ActorTeam::Enemy),
            AIController::default(),
            data,
            Transform::from_translation(position),
        ))
        .id()
}

fn spawn_target(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((Actor::new(ActorTeam::Friendly), Transform::from_translation(position)))
        .id()
}

fn ammo(app: &App, entity: Entity) -> u32 {
    app.world()
        .get::<EquippedWeapon>(entity)
        .map(|weapon| weapon.ammo())
        .unwrap_or_default()
}

fn controller(app: &App, entity: Entity) -> AIController {
    app.world()
        .get::<AIController>(entity)
        .cloned()
        .expect("entity has an AIController")
}

fn detect(app: &mut App, observer: Entity, target: Entity, in_emergency_range: bool) {
    app.world_mut().send_event(TargetDetected {
        observer,
        target,
        in_emergency_range,
    });
}

#[derive(Resource, Default)]
struct PlacedBombs(Vec<Entity>);

fn record_bombs(mut events: EventReader<BombPlaced>, mut placed: ResMut<PlacedBombs>) {
    for event in events.read() {
        placed.0.push(event.sapper);
    }
}

#[test]
fn test_enemy_engages_detected_target() {
    let mut app = create_combat_app(42);
    let enemy = spawn_enemy(&mut app, Vec3::ZERO, ControllerData::basic());
    let target = spawn_target(&mut app, Vec3::new(5.0, 0.0, 0.0));

    run(&mut app, 2);
    assert_eq!(controller(&app, enemy).state(), Some(&AIState::FollowTarget));

    detect(&mut app, enemy, target, false);
    run(&mut app, 30);

    let brain = controller(&app, enemy);
    assert_eq!(brain.attack_target(), Some(target));
    assert!(brain.target_in_range);
    assert!(brain.target_in_los);
    assert_eq!(brain.state(), Some(&AIState::Attacking));
    assert!(ammo(&app, enemy) < WeaponData::enemy_rifle().magazine_size);

    // Attacking → стоим и стреляем
    assert_eq!(
        app.world().get::<MovementCommand>(enemy),
        Some(&MovementCommand::Idle)
    );
}

#[test]
fn test_wall_blocks_line_of_sight() {
    let mut app = create_combat_app(42);
    let enemy = spawn_enemy(&mut app, Vec3::ZERO, ControllerData::basic());
    let target = spawn_target(&mut app, Vec3::new(6.0, 0.0, 0.0));
    app.world_mut()
        .spawn((Building::wall(1), Transform::from_xyz(3.0, 0.0, 0.0)));

    run(&mut app, 2);
    detect(&mut app, enemy, target, false);
    run(&mut app, 30);

    let brain = controller(&app, enemy);
    assert!(brain.target_in_range);
    assert!(!brain.target_in_los);
    assert_eq!(brain.state(), Some(&AIState::FollowTarget));
    assert_eq!(ammo(&app, enemy), WeaponData::enemy_rifle().magazine_size);

    // Нет LOS → идём к цели
    assert_eq!(
        app.world().get::<MovementCommand>(enemy),
        Some(&MovementCommand::FollowEntity { target })
    );
}

#[test]
fn test_out_of_range_target_is_not_shot() {
    let mut app = create_combat_app(42);
    let enemy = spawn_enemy(&mut app, Vec3::ZERO, ControllerData::basic());
    let target = spawn_target(&mut app, Vec3::new(30.0, 0.0, 0.0));

    run(&mut app, 2);
    detect(&mut app, enemy, target, false);
    run(&mut app, 30);

    let brain = controller(&app, enemy);
    assert!(!brain.target_in_range);
    assert_eq!(ammo(&app, enemy), WeaponData::enemy_rifle().magazine_size);
}

#[test]
fn test_dazed_enemy_holds_fire_until_recovered() {
    let mut app = create_combat_app(42);
    let enemy = spawn_enemy(&mut app, Vec3::ZERO, ControllerData::basic());
    let target = spawn_target(&mut app, Vec3::new(5.0, 0.0, 0.0));

    run(&mut app, 2);
    app.world_mut().send_event(DamageDealt {
        attacker: Some(target),
        target: enemy,
        damage: 5,
        explosive: false,
    });
    run(&mut app, 2);
    assert!(controller(&app, enemy).is_dazed());

    detect(&mut app, enemy, target, false);
    run(&mut app, 40);
    assert_eq!(ammo(&app, enemy), WeaponData::enemy_rifle().magazine_size);

    app.world_mut().send_event(RecoverFromDaze { entity: enemy });
    run(&mut app, 150);
    assert!(!controller(&app, enemy).is_dazed());
    assert!(ammo(&app, enemy) < WeaponData::enemy_rifle().magazine_size);
}

#[test]
fn test_deactivation_halts_attacks() {
    let mut app = create_combat_app(42);
    let enemy = spawn_enemy(&mut app, Vec3::ZERO, ControllerData::basic());
    let target = spawn_target(&mut app, Vec3::new(5.0, 0.0, 0.0));

    run(&mut app, 2);
    app.world_mut().send_event(SetActorActive {
        entity: enemy,
        active: false,
    });
    run(&mut app, 2);

    detect(&mut app, enemy, target, false);
    run(&mut app, 60);

    let brain = controller(&app, enemy);
    assert!(brain.attacks_paused());
    assert!(!app.world().get::<Actor>(enemy).map(|a| a.visible).unwrap_or(true));
    assert!(!app
        .world()
        .get::<AttackRoutine>(enemy)
        .map(|routine| routine.is_running())
        .unwrap_or(true));
    assert!(app.world().get::<FireBursts>(enemy).map(|b| b.is_empty()).unwrap_or(false));
    assert_eq!(ammo(&app, enemy), WeaponData::enemy_rifle().magazine_size);

    // Активация → снова стреляет
    app.world_mut().send_event(SetActorActive {
        entity: enemy,
        active: true,
    });
    run(&mut app, 60);
    assert!(ammo(&app, enemy) < WeaponData::enemy_rifle().magazine_size);
}

#[test]
fn test_dead_target_replaced_by_next_candidate() {
    let mut app = create_combat_app(42);
    let enemy = spawn_enemy(&mut app, Vec3::ZERO, ControllerData::basic());
    let first = spawn_target(&mut app, Vec3::new(5.0, 0.0, 0.0));
    let second = spawn_target(&mut app, Vec3::new(0.0, 0.0, 5.0));

    run(&mut app, 2);
    detect(&mut app, enemy, first, false);
    detect(&mut app, enemy, second, true);
    run(&mut app, 2);
    assert_eq!(controller(&app, enemy).attack_target(), Some(first));

    app.world_mut().send_event(DamageDealt {
        attacker: None,
        target: first,
        damage: 1000,
        explosive: false,
    });
    run(&mut app, 150);

    assert!(app.world().get::<Dead>(first).is_some());
    let brain = controller(&app, enemy);
    assert_eq!(brain.attack_target(), Some(second));
    assert!(!brain.possible_targets().contains(first));
}

#[test]
fn test_enemy_death_stops_everything() {
    let mut app = create_combat_app(42);
    let enemy = spawn_enemy(&mut app, Vec3::ZERO, ControllerData::basic());
    let target = spawn_target(&mut app, Vec3::new(5.0, 0.0, 0.0));

    run(&mut app, 2);
    detect(&mut app, enemy, target, false);
    run(&mut app, 10);

    app.world_mut().send_event(DamageDealt {
        attacker: Some(target),
        target: enemy,
        damage: 1000,
        explosive: true,
    });
    run(&mut app, 3);

    assert_eq!(
        app.world().get::<Dead>(enemy).map(|dead| dead.cause),
        Some(DeathCause::Explosive)
    );
    assert_eq!(
        app.world().get::<MovementCommand>(enemy),
        Some(&MovementCommand::Stop)
    );
    assert_eq!(controller(&app, enemy).attack_target(), None);

    let ammo_at_death = ammo(&app, enemy);
    run(&mut app, 120);
    assert_eq!(ammo(&app, enemy), ammo_at_death);
}

#[test]
fn test_sapper_walks_to_wall_and_places_bomb() {
    let mut app = create_combat_app(42);
    app.init_resource::<PlacedBombs>()
        .add_systems(FixedUpdate, record_bombs.after(SimSet::Decisions));

    let wall = app
        .world_mut()
        .spawn((Building::wall(1), Transform::from_xyz(0.0, 0.0, -5.0)))
        .id();
    let sapper = spawn_enemy(&mut app, Vec3::new(0.0, 0.0, -15.0), ControllerData::sapper());
    let late_sapper = spawn_enemy(&mut app, Vec3::new(4.0, 0.0, -15.0), ControllerData::sapper());

    run(&mut app, 2);

    assert!(app.world().get::<Building>(wall).map(|b| b.is_targeted).unwrap_or(false));

    let brain = controller(&app, sapper);
    let Some(AIState::DeliveringBomb { destination }) = brain.state().copied() else {
        panic!("sapper should be delivering a bomb, got {:?}", brain.state());
    };
    assert!((destination - Vec3::new(0.0, 0.0, -6.5)).length() < 1e-4);
    assert_eq!(
        app.world().get::<MovementCommand>(sapper),
        Some(&MovementCommand::MoveToPosition { target: destination })
    );

    // Вторая стена не нашлась → FollowTarget
    assert_eq!(controller(&app, late_sapper).state(), Some(&AIState::FollowTarget));

    // "Дошёл": телепорт в точку
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(sapper) {
        transform.translation = destination;
    }
    run(&mut app, 3);

    let brain = controller(&app, sapper);
    assert_eq!(brain.state(), Some(&AIState::FollowTarget));
    assert!(!brain.should_go_to_position());
    assert_eq!(app.world().resource::<PlacedBombs>().0, vec![sapper]);
}

#[test]
fn test_dummy_never_acts() {
    let mut app = create_combat_app(42);
    let dummy = app
        .world_mut()
        .spawn((
            Actor::new(ActorTeam::Enemy),
            AIController::dummy(),
            ControllerData::basic(),
            Transform::default(),
        ))
        .id();
    let target = spawn_target(&mut app, Vec3::new(3.0, 0.0, 0.0));

    run(&mut app, 2);
    detect(&mut app, dummy, target, true);
    run(&mut app, 60);

    let brain = controller(&app, dummy);
    assert_eq!(brain.state(), Some(&AIState::HoldingPosition));
    assert_eq!(ammo(&app, dummy), WeaponData::enemy_rifle().magazine_size);
    assert!(app.world().get::<Name>(dummy).is_some());
}

/// Хостовый ray cast: всегда чистая линия до одной цели
struct ClearShotAt {
    target: Entity,
}

impl RaycastService for ClearShotAt {
    fn raycast_all(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Vec<RayHit> {
        vec![RayHit {
            collider: HitCollider::Hitbox { actor: self.target },
            distance: 1.0,
        }]
    }
}

/// Хостовый ray cast: луч никуда не попадает
struct SeesNothing;

impl RaycastService for SeesNothing {
    fn raycast_all(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Vec<RayHit> {
        Vec::new()
    }
}

#[test]
fn test_host_raycast_backend_overrides_collision_world() {
    let mut app = create_combat_app(42);
    let enemy = spawn_enemy(&mut app, Vec3::ZERO, ControllerData::basic());
    let target = spawn_target(&mut app, Vec3::new(6.0, 0.0, 0.0));
    // Встроенный мир видел бы стену, хост говорит: чисто
    app.world_mut()
        .spawn((Building::wall(1), Transform::from_xyz(3.0, 0.0, 0.0)));
    app.insert_resource(RaycastBackend::new(ClearShotAt { target }));

    run(&mut app, 2);
    detect(&mut app, enemy, target, false);
    run(&mut app, 30);

    let brain = controller(&app, enemy);
    assert!(brain.target_in_los);
    assert_eq!(brain.state(), Some(&AIState::Attacking));
    assert!(ammo(&app, enemy) < WeaponData::enemy_rifle().magazine_size);
    assert!(
        app.world().resource::<CollisionWorld>().is_empty(),
        "built-in world is not rebuilt while a host backend is installed"
    );
}

#[test]
fn test_host_raycast_backend_can_hide_target() {
    let mut app = create_combat_app(42);
    let enemy = spawn_enemy(&mut app, Vec3::ZERO, ControllerData::basic());
    let target = spawn_target(&mut app, Vec3::new(5.0, 0.0, 0.0));
    app.insert_resource(RaycastBackend::new(SeesNothing));

    run(&mut app, 2);
    detect(&mut app, enemy, target, false);
    run(&mut app, 30);

    let brain = controller(&app, enemy);
    assert!(brain.target_in_range);
    assert!(!brain.target_in_los);
    assert_eq!(brain.state(), Some(&AIState::FollowTarget));
    assert_eq!(ammo(&app, enemy), WeaponData::enemy_rifle().magazine_size);
}

//! Zombie integration test
//!
//! Полный headless App: SimulationPlugin + HeadlessNavigationPlugin + FlatWorld.
//!
//! Проверяем:
//! - спавн → Patrol с точкой в радиусе от spawn point
//! - обнаружение → Chase → Attack, урон по игроку с cooldown
//! - урон по зомби → Chase, смерть → деспавн ровно через задержку

use bevy::prelude::*;
use shambler_simulation::*;

/// Helper: полный App на плоской арене (один warm-up update уже сделан снаружи)
fn create_zombie_app(seed: u64, world: FlatWorld) -> App {
    let mut app = create_headless_app(seed);

    app.add_plugins((SimulationPlugin, HeadlessNavigationPlugin))
        .insert_resource(SpatialQueryService::new(world.clone()))
        .insert_resource(NavSurfaceService::new(world));

    app
}

fn spawn_player(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((Player, Transform::from_translation(position)))
        .id()
}

/// Первый update без fixed тика (Time<Real> стартует с нуля)
fn warm_up(app: &mut App) {
    app.update();
}

fn ticks(app: &mut App, count: usize) {
    for _ in 0..count {
        app.update();
    }
}

fn state_of(app: &App, zombie: Entity) -> ZombieState {
    *app.world().get::<ZombieState>(zombie).expect("zombie alive")
}

#[test]
fn test_spawned_zombie_starts_patrolling_near_spawn() {
    let mut app = create_zombie_app(42, FlatWorld::arena(50.0));
    let config = ZombieConfig {
        initial_health: 80.0,
        ..default()
    };
    let spawn = Vec3::new(5.0, 0.0, 5.0);
    let zombie = spawn_zombie(app.world_mut(), spawn, config.clone(), None);

    warm_up(&mut app);
    ticks(&mut app, 1);

    assert_eq!(state_of(&app, zombie), ZombieState::Patrol);
    assert_eq!(app.world().get::<SpawnPoint>(zombie).map(|p| p.0), Some(spawn));
    assert_eq!(app.world().get::<Health>(zombie).map(|h| h.current), Some(80.0));

    let memory = app.world().get::<ZombieMemory>(zombie).expect("memory");
    let destination = memory.patrol_destination.expect("first patrol point chosen on spawn");
    assert!(destination.distance(spawn) <= config.patrol_radius);
}

#[test]
fn test_zombie_hunts_and_hits_player() {
    let mut app = create_zombie_app(42, FlatWorld::arena(50.0));
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, -8.0));
    let zombie = spawn_zombie(app.world_mut(), Vec3::ZERO, ZombieConfig::default(), Some(player));

    warm_up(&mut app);
    ticks(&mut app, 1);
    assert_eq!(state_of(&app, zombie), ZombieState::Chase);

    // 6м до attack range на 3.5 м/с ≈ 103 тика, дальше удар раз в 1.5с
    ticks(&mut app, 300);

    assert_eq!(state_of(&app, zombie), ZombieState::Attack);

    let zombie_position = app.world().get::<Transform>(zombie).expect("zombie").translation;
    assert!(zombie_position.distance(Vec3::new(0.0, 0.0, -8.0)) <= 2.0 + 1e-3);

    let player_health = app.world().get::<Health>(player).expect("player health").current;
    assert!(player_health < 100.0, "player health = {}", player_health);
    assert_eq!(player_health % 10.0, 0.0, "damage applied in whole hits");
}

#[test]
fn test_wall_blocks_detection() {
    let world = FlatWorld::arena(50.0).with_obstacle(Obstacle::wall(
        Vec3::new(-5.0, 0.0, -5.0),
        Vec3::new(5.0, 3.0, -4.0),
    ));
    let mut app = create_zombie_app(42, world);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, -8.0));
    let zombie = spawn_zombie(app.world_mut(), Vec3::ZERO, ZombieConfig::default(), Some(player));

    warm_up(&mut app);
    ticks(&mut app, 1);

    assert_ne!(state_of(&app, zombie), ZombieState::Chase);
    let memory = app.world().get::<ZombieMemory>(zombie).expect("memory");
    assert!(!memory.target_detected);
}

#[test]
fn test_damage_forces_chase_regardless_of_distance() {
    let mut app = create_zombie_app(42, FlatWorld::arena(100.0));
    let player = spawn_player(&mut app, Vec3::new(60.0, 0.0, 60.0));
    let zombie = spawn_zombie(app.world_mut(), Vec3::ZERO, ZombieConfig::default(), Some(player));

    warm_up(&mut app);
    ticks(&mut app, 1);
    assert_eq!(state_of(&app, zombie), ZombieState::Patrol);

    app.world_mut().send_event(DamageZombie { zombie, amount: 10.0 });
    ticks(&mut app, 1);

    assert_eq!(state_of(&app, zombie), ZombieState::Chase);
    assert_eq!(app.world().get::<Health>(zombie).map(|h| h.current), Some(90.0));

    let nav = app.world().get::<NavAgent>(zombie).expect("nav agent");
    assert_eq!(nav.destination(), Some(Vec3::new(60.0, 0.0, 60.0)));
}

#[test]
fn test_zero_damage_changes_nothing() {
    let mut app = create_zombie_app(42, FlatWorld::arena(100.0));
    let zombie = spawn_zombie(app.world_mut(), Vec3::ZERO, ZombieConfig::default(), None);

    warm_up(&mut app);
    ticks(&mut app, 1);

    app.world_mut().send_event(DamageZombie { zombie, amount: 0.0 });
    ticks(&mut app, 1);

    assert_eq!(state_of(&app, zombie), ZombieState::Patrol);
    assert_eq!(app.world().get::<Health>(zombie).map(|h| h.current), Some(100.0));
}

#[test]
fn test_dead_zombie_despawns_after_delay() {
    let mut app = create_zombie_app(42, FlatWorld::arena(50.0));
    let config = ZombieConfig {
        initial_health: 50.0,
        death_despawn_delay: 0.5,
        ..default()
    };
    let zombie = spawn_zombie(app.world_mut(), Vec3::ZERO, config, None);

    warm_up(&mut app);
    ticks(&mut app, 1);

    app.world_mut().send_event(DamageZombie { zombie, amount: 55.0 });
    ticks(&mut app, 1);

    assert!(app.world().get::<Dead>(zombie).is_some());
    assert_eq!(app.world().get::<Health>(zombie).map(|h| h.current), Some(-5.0));
    let died = app.world().resource::<Events<ZombieDied>>();
    assert_eq!(died.get_cursor().read(died).count(), 1);

    let nav = app.world().get::<NavAgent>(zombie).expect("nav agent");
    assert!(nav.is_halted());

    // Повторный урон по мёртвому — игнор (ZombieDied не дублируется)
    app.world_mut().send_event(DamageZombie { zombie, amount: 10.0 });

    // 0.5s @ 60Hz = 30 тиков после смерти
    ticks(&mut app, 29);
    assert!(app.world().get::<ZombieState>(zombie).is_some(), "despawned too early");
    assert_eq!(app.world().get::<Health>(zombie).map(|h| h.current), Some(-5.0));

    ticks(&mut app, 1);
    assert!(app.world().get::<ZombieState>(zombie).is_none(), "still alive after delay");
}

#[test]
fn test_dead_zombie_stops_thinking() {
    let mut app = create_zombie_app(42, FlatWorld::arena(50.0));
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, -1.5));
    let config = ZombieConfig {
        death_despawn_delay: 10.0,
        ..default()
    };
    let zombie = spawn_zombie(app.world_mut(), Vec3::ZERO, config, Some(player));

    warm_up(&mut app);
    app.world_mut().send_event(DamageZombie { zombie, amount: 500.0 });
    ticks(&mut app, 120);

    // Убит до первого тика AI → по игроку ни одного удара
    assert_eq!(app.world().get::<Health>(player).map(|h| h.current), Some(100.0));
}

#[test]
fn test_config_file_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/zombie.ron");
    let config = ZombieConfig::load(path).expect("bundled config is valid");

    assert_eq!(config, ZombieConfig::default());
}

/// SimulationPlugin сам задаёт 60Hz, даже поверх TimePlugin (64Hz по умолчанию)
#[test]
fn test_simulation_plugin_sets_fixed_timestep() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, SimulationPlugin));

    let timestep = app.world().resource::<Time<Fixed>>().timestep();
    assert_eq!(timestep, Time::<Fixed>::from_hz(SIMULATION_HZ).timestep());
    assert!((timestep.as_secs_f64() - 1.0 / 60.0).abs() < 1e-6);
}

//! Тесты детерминизма
//!
//! Проверяем что симуляция с одинаковым seed даёт идентичные результаты
//! (patrol точки из DeterministicRng, движение, переходы FSM).

use bevy::prelude::*;
use shambler_simulation::*;

const ZOMBIE_COUNT: usize = 8;
const TICK_COUNT: usize = 600;

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;

    let snapshot1 = run_simulation(SEED);
    let snapshot2 = run_simulation(SEED);

    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;

    // Запускаем 3 раза — все должны быть идентичны
    let snapshots: Vec<_> = (0..3).map(|_| run_simulation(SEED)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(snapshots[0], *snapshot, "Прогон {} дал результат отличный от прогона 0", i);
    }
}

#[test]
fn test_different_seeds_patrol_differently() {
    let snapshot1 = run_simulation(1);
    let snapshot2 = run_simulation(2);

    assert_ne!(snapshot1, snapshot2);
}

/// Запускает симуляцию и возвращает snapshot мира
fn run_simulation(seed: u64) -> Vec<u8> {
    let world = FlatWorld::arena(40.0).with_obstacle(Obstacle::wall(
        Vec3::new(4.0, 0.0, -6.0),
        Vec3::new(5.0, 3.0, 6.0),
    ));

    let mut app = create_headless_app(seed);
    app.add_plugins((SimulationPlugin, HeadlessNavigationPlugin))
        .insert_resource(SpatialQueryService::new(world.clone()))
        .insert_resource(NavSurfaceService::new(world));

    let player = app
        .world_mut()
        .spawn((Player, Transform::from_xyz(0.0, 0.0, 0.0)))
        .id();

    // Часть зомби в радиусе обнаружения, часть — далеко (патруль)
    for i in 0..ZOMBIE_COUNT {
        let angle = i as f32 / ZOMBIE_COUNT as f32 * std::f32::consts::TAU;
        let radius = if i % 2 == 0 { 10.0 } else { 30.0 };
        let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * radius;
        spawn_zombie(app.world_mut(), position, ZombieConfig::default(), Some(player));
    }

    for _ in 0..TICK_COUNT {
        app.update();
    }

    let mut snapshot = world_snapshot::<Transform>(app.world_mut());
    snapshot.extend(world_snapshot::<ZombieState>(app.world_mut()));
    snapshot.extend(world_snapshot::<ZombieMemory>(app.world_mut()));
    snapshot.extend(world_snapshot::<Health>(app.world_mut()));
    snapshot
}

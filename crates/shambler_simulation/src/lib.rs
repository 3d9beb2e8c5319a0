//! SHAMBLER Simulation Core
//!
//! ECS-симуляция враждебного агента (зомби) на Bevy 0.16.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = решения (FSM, perception, урон, таймеры)
//! - Движок = физика, навмеш, анимации (SpatialQuery / NavSurface / NavAgent контракт)
//!
//! Headless сборка подставляет FlatWorld + kinematic NavAgent driver вместо движка.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod logger;
pub mod physics;
pub mod player;
pub mod spatial;

// Re-export базовых компонентов для удобства
pub use ai::{
    AIPlugin, AnimationSignal, Perception, TransitionCause, Zombie, ZombieConfig, ZombieMemory, ZombieSet,
    ZombieState, ZombieStateChanged, ZombieTarget,
};
pub use combat::{CombatPlugin, DamageZombie, Dead, DespawnAfter, TargetDamaged, ZombieDied};
pub use components::*;
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use physics::HeadlessNavigationPlugin;
pub use player::{Player, PlayerDied};
pub use spatial::{FlatWorld, NavSurfaceService, Obstacle, SpatialQueryService};

/// Частота simulation tick
pub const SIMULATION_HZ: f64 = 60.0;

/// Главный plugin симуляции (ядро: урон + AI)
///
/// Движок подключает только его и сам двигает NavAgent'ов.
/// Headless сборке нужен ещё HeadlessNavigationPlugin.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz (TimePlugin по умолчанию ставит 64Hz — перезаписываем)
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            // Детерминистичный RNG (seed по умолчанию, если не задан раньше)
            .init_resource::<DeterministicRng>()
            .add_plugins((CombatPlugin, AIPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Единственный источник случайности (patrol точки) — порядок вызовов
/// фиксирован порядком систем, так что один seed = один прогон.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub const DEFAULT_SEED: u64 = 42;

    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время ручное: каждый app.update() = ровно один fixed tick.
/// Первый update прогревочный (Time<Real> стартует с нулевой дельтой).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();

    let fixed = Time::<Fixed>::from_hz(SIMULATION_HZ);
    let timestep = fixed.timestep();

    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(fixed)
        .insert_resource(TimeUpdateStrategy::ManualDuration(timestep));

    app
}

/// Спавн зомби с конфигом и целью (остальное — required components)
pub fn spawn_zombie(world: &mut World, position: Vec3, config: ZombieConfig, target: Option<Entity>) -> Entity {
    world
        .spawn((
            Zombie,
            Transform::from_translation(position),
            config,
            ZombieTarget(target),
        ))
        .id()
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Debug формат — достаточно для побайтового сравнения
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

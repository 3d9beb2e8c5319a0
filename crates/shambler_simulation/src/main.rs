//! Headless симуляция SHAMBLER
//!
//! Запускает Bevy App без рендера: игрок + N зомби на FlatWorld арене.

use std::path::PathBuf;

use bevy::prelude::*;
use clap::Parser;
use shambler_simulation::ai::components::ConfigError;
use shambler_simulation::logger::{set_log_level, LogLevel};
use shambler_simulation::*;

/// Headless прогон зомби AI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed детерминистичного RNG
    #[arg(long, default_value_t = DeterministicRng::DEFAULT_SEED)]
    seed: u64,

    /// Сколько fixed тиков прогнать (60 Hz)
    #[arg(long, default_value_t = 1000)]
    ticks: u32,

    /// Сколько зомби заспавнить по кольцу вокруг игрока
    #[arg(long, default_value_t = 4)]
    zombies: u32,

    /// RON файл с ZombieConfig (иначе defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug логи (переходы FSM, атаки)
    #[arg(short, long)]
    verbose: bool,
}

const ARENA_HALF_EXTENT: f32 = 40.0;
const SPAWN_RING_RADIUS: f32 = 18.0;

fn main() -> Result<(), ConfigError> {
    let args = Args::parse();
    set_log_level(if args.verbose { LogLevel::Debug } else { LogLevel::Info });

    let config = match &args.config {
        Some(path) => ZombieConfig::load(path)?,
        None => ZombieConfig::default(),
    };

    log_info(&format!(
        "Starting SHAMBLER headless simulation (seed: {}, ticks: {}, zombies: {})",
        args.seed, args.ticks, args.zombies
    ));

    let mut app = create_headless_app(args.seed);
    app.add_plugins((SimulationPlugin, HeadlessNavigationPlugin))
        .insert_resource(SpatialQueryService::new(arena()))
        .insert_resource(NavSurfaceService::new(arena()));

    let player = app.world_mut().spawn((Player, Transform::from_xyz(0.0, 0.0, 0.0))).id();

    for index in 0..args.zombies {
        let angle = index as f32 / args.zombies.max(1) as f32 * std::f32::consts::TAU;
        let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * SPAWN_RING_RADIUS;
        spawn_zombie(app.world_mut(), position, config.clone(), Some(player));
    }

    // Прогревочный update: Time<Real> стартует с нулевой дельтой
    app.update();

    for tick in 0..args.ticks {
        app.update();

        if tick % 100 == 0 {
            log_info(&format!("Tick {}: {}", tick, summary(app.world_mut())));
        }
    }

    log_info(&format!("Simulation complete: {}", summary(app.world_mut())));
    Ok(())
}

/// Арена с парой стен — есть где прятаться от зрения
fn arena() -> FlatWorld {
    FlatWorld::arena(ARENA_HALF_EXTENT)
        .with_obstacle(Obstacle::wall(Vec3::new(6.0, 0.0, -8.0), Vec3::new(7.0, 3.0, 8.0)))
        .with_obstacle(Obstacle::wall(Vec3::new(-12.0, 0.0, 10.0), Vec3::new(-4.0, 3.0, 11.0)))
}

fn summary(world: &mut World) -> String {
    let mut counts = [0usize; 4];
    let mut query = world.query_filtered::<&ZombieState, Without<Dead>>();
    for state in query.iter(world) {
        let slot = match state {
            ZombieState::Idle => 0,
            ZombieState::Patrol => 1,
            ZombieState::Chase => 2,
            ZombieState::Attack => 3,
        };
        counts[slot] += 1;
    }

    let mut players = world.query_filtered::<&Health, With<Player>>();
    let player_health = players.iter(world).next().map_or(0.0, |health| health.current);

    format!(
        "idle {} / patrol {} / chase {} / attack {}, player health {:.1}",
        counts[0], counts[1], counts[2], counts[3], player_health
    )
}

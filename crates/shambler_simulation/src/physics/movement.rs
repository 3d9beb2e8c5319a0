//! Kinematic NavAgent driver (headless stand-in для path solver движка)
//!
//! Путь = прямая до destination (FlatWorld без обхода препятствий).
//! Движок с настоящим навмешем заменяет эту систему своей.

use bevy::prelude::*;

use crate::components::NavAgent;
use crate::spatial::{self, NavSurfaceService};

/// Один шаг агента к destination
///
/// Возвращает новую позицию. Halted / без destination / speed 0 — стоим.
pub fn step_towards(position: Vec3, agent: &NavAgent, delta: f32) -> Vec3 {
    let Some(destination) = agent.destination() else {
        return position;
    };
    if agent.is_halted() || !agent.is_on_nav_mesh() {
        return position;
    }

    let to_destination = destination - position;
    let distance = to_destination.length();
    let step = agent.speed() * delta;

    if distance <= step {
        destination
    } else {
        position + to_destination / distance * step
    }
}

/// Система: двигаем NavAgent'ов и пишем обратно статус пути
///
/// 1. on_nav_mesh из NavSurfaceService (нет сервиса — считаем что на поверхности)
/// 2. перемещение со скоростью агента, поворот по направлению движения
/// 3. report_path(remaining) — снимает path_pending
pub fn drive_nav_agents(
    mut agents: Query<(&mut NavAgent, &mut Transform)>,
    navmesh: Option<Res<NavSurfaceService>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let navmesh = navmesh.as_deref().map(NavSurfaceService::surface);

    for (mut agent, mut transform) in agents.iter_mut() {
        if let Some(navmesh) = navmesh {
            let on_surface = navmesh.is_on_surface(transform.translation);
            if agent.is_on_nav_mesh() != on_surface {
                agent.set_on_nav_mesh(on_surface);
            }
        }

        let Some(destination) = agent.destination() else {
            continue;
        };

        let position = transform.translation;
        let next = step_towards(position, &agent, delta);

        if next != position {
            // Halt/Attack сам поворачивает зомби — здесь только при движении
            if let Some(look) = spatial::horizontal_look_rotation(position, next) {
                transform.rotation = look;
            }
            transform.translation = next;
        }

        agent.report_path(transform.translation.distance(destination));
    }
}

//! World positioning компоненты: SpawnPoint

use bevy::prelude::*;

/// Позиция в момент спавна — центр патрулирования
///
/// Записывается один раз при инициализации зомби (Added<Zombie>),
/// дальше только читается при выборе patrol точки.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SpawnPoint(pub Vec3);

impl SpawnPoint {
    /// Точка лежит в пределах `radius` от spawn position
    pub fn contains(&self, point: Vec3, radius: f32) -> bool {
        self.0.distance(point) <= radius
    }
}

//! Spatial queries — контракт с физикой/навигацией движка
//!
//! ECS не владеет геометрией мира. Движок предоставляет:
//! - SpatialQuery: raycast для line-of-sight
//! - NavSurface: сэмплинг точки на навмеше + проверка "стоим ли на поверхности"
//!
//! Сервисы лежат в ресурсах как trait objects. Отсутствие ресурса —
//! не ошибка: perception считает цель невидимой, patrol не выбирает точку.

use bevy::prelude::*;
use thiserror::Error;

pub mod flat_world;

pub use flat_world::{FlatWorld, Obstacle};

// ============================================================================
// Collision layers (битовые маски для raycast фильтрации)
// ============================================================================

/// Layer 2: Actors (players, NPCs)
pub const COLLISION_LAYER_ACTORS: u32 = 0b10; // 2

/// Layer 3: Environment (стены, препятствия, terrain)
pub const COLLISION_LAYER_ENVIRONMENT: u32 = 0b100; // 4

/// Mask: LOS блокируют только препятствия окружения (акторы не закрывают обзор)
pub const COLLISION_MASK_OBSTRUCTION: u32 = COLLISION_LAYER_ENVIRONMENT;

/// Попадание луча
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
    pub layer: u32,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpatialQueryError {
    /// Геометрия уничтожена / невалидна во время запроса
    #[error("collider geometry is no longer valid: {0}")]
    InvalidGeometry(String),
    #[error("ray direction must be non-zero and finite, got {0:?}")]
    BadDirection(Vec3),
}

/// Raycast сервис движка
pub trait SpatialQuery: Send + Sync + 'static {
    /// Первое попадание по лучу `origin + direction * t`, `t ∈ [0, max_distance]`,
    /// учитываются только коллайдеры из `layer_mask`.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layer_mask: u32,
    ) -> Result<Option<RayHit>, SpatialQueryError>;
}

/// Навигационная поверхность движка
pub trait NavSurface: Send + Sync + 'static {
    /// Ближайшая навигируемая точка в пределах `max_distance` от `center`
    fn sample_point(&self, center: Vec3, max_distance: f32) -> Option<Vec3>;

    /// Стоит ли точка на навигируемой поверхности
    fn is_on_surface(&self, point: Vec3) -> bool;
}

/// Resource: line-of-sight сервис
#[derive(Resource)]
pub struct SpatialQueryService(pub Box<dyn SpatialQuery>);

impl SpatialQueryService {
    pub fn new(query: impl SpatialQuery) -> Self {
        Self(Box::new(query))
    }

    pub fn query(&self) -> &dyn SpatialQuery {
        self.0.as_ref()
    }
}

/// Resource: navmesh сервис
#[derive(Resource)]
pub struct NavSurfaceService(pub Box<dyn NavSurface>);

impl NavSurfaceService {
    pub fn new(surface: impl NavSurface) -> Self {
        Self(Box::new(surface))
    }

    pub fn surface(&self) -> &dyn NavSurface {
        self.0.as_ref()
    }
}

/// Евклидово расстояние
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}

/// Угол между векторами в градусах, 0 для вырожденных векторов
pub fn angle_deg(v1: Vec3, v2: Vec3) -> f32 {
    if v1.length_squared() <= f32::EPSILON || v2.length_squared() <= f32::EPSILON {
        return 0.0;
    }
    v1.angle_between(v2).to_degrees()
}

/// Поворот "смотреть на target" в горизонтальной плоскости (Y выкинут).
/// None если target строго над/под нами.
pub fn horizontal_look_rotation(from: Vec3, to: Vec3) -> Option<Quat> {
    let flat = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
    if flat.length_squared() <= 1e-6 {
        return None;
    }
    Some(Transform::IDENTITY.looking_to(flat, Vec3::Y).rotation)
}

//! FlatWorld — headless реализация SpatialQuery + NavSurface
//!
//! Плоский прямоугольный пол (y = ground_height) + axis-aligned box препятствия.
//! Используется в тестах и headless runner'е вместо физики движка.

use bevy::prelude::*;

use super::{NavSurface, RayHit, SpatialQuery, SpatialQueryError, COLLISION_LAYER_ENVIRONMENT};

/// Допуск по высоте: агент "на поверхности" если стоит не выше/ниже этого
const SURFACE_HEIGHT_TOLERANCE: f32 = 0.5;

/// Axis-aligned box коллайдер
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub min: Vec3,
    pub max: Vec3,
    pub layer: u32,
}

impl Obstacle {
    /// Стена окружения (блокирует LOS и навмеш)
    pub fn wall(min: Vec3, max: Vec3) -> Self {
        Self {
            min,
            max,
            layer: COLLISION_LAYER_ENVIRONMENT,
        }
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
    }

    fn contains_xz(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.z && point.z <= self.max.z
    }

    /// Slab test: расстояние входа луча в box (None если мимо)
    fn ray_entry(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = max_distance;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < 1e-8 {
                // Луч параллелен slab'у — должен быть внутри
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let (t0, t1) = {
                let a = (lo - o) * inv;
                let b = (hi - o) * inv;
                if a <= b { (a, b) } else { (b, a) }
            };

            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}

/// Плоский мир с препятствиями
#[derive(Debug, Clone, PartialEq)]
pub struct FlatWorld {
    /// Угол прямоугольника пола (min x/z)
    pub min: Vec2,
    /// Угол прямоугольника пола (max x/z)
    pub max: Vec2,
    pub ground_height: f32,
    pub obstacles: Vec<Obstacle>,
}

impl FlatWorld {
    /// Квадратная арена со стороной `2 * half_extent` вокруг начала координат
    pub fn arena(half_extent: f32) -> Self {
        Self {
            min: Vec2::splat(-half_extent),
            max: Vec2::splat(half_extent),
            ground_height: 0.0,
            obstacles: Vec::new(),
        }
    }

    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    fn within_bounds(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.y && point.z <= self.max.y
    }

    fn blocked(&self, point: Vec3) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.layer & COLLISION_LAYER_ENVIRONMENT != 0 && o.contains_xz(point))
    }
}

impl SpatialQuery for FlatWorld {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layer_mask: u32,
    ) -> Result<Option<RayHit>, SpatialQueryError> {
        let Some(direction) = direction.try_normalize() else {
            return Err(SpatialQueryError::BadDirection(direction));
        };

        let mut closest: Option<RayHit> = None;

        for obstacle in self.obstacles.iter().filter(|o| o.layer & layer_mask != 0) {
            if !obstacle.is_valid() {
                return Err(SpatialQueryError::InvalidGeometry(format!(
                    "obstacle min {:?} / max {:?}",
                    obstacle.min, obstacle.max
                )));
            }

            let Some(t) = obstacle.ray_entry(origin, direction, max_distance) else {
                continue;
            };

            if closest.map_or(true, |hit| t < hit.distance) {
                closest = Some(RayHit {
                    point: origin + direction * t,
                    distance: t,
                    layer: obstacle.layer,
                });
            }
        }

        Ok(closest)
    }
}

impl NavSurface for FlatWorld {
    fn sample_point(&self, center: Vec3, max_distance: f32) -> Option<Vec3> {
        let point = Vec3::new(
            center.x.clamp(self.min.x, self.max.x),
            self.ground_height,
            center.z.clamp(self.min.y, self.max.y),
        );

        if self.blocked(point) || point.distance(center) > max_distance {
            return None;
        }

        Some(point)
    }

    fn is_on_surface(&self, point: Vec3) -> bool {
        self.within_bounds(point)
            && (point.y - self.ground_height).abs() <= SURFACE_HEIGHT_TOLERANCE
            && !self.blocked(point)
    }
}

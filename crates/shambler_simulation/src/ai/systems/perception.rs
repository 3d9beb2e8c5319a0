//! Perception: distance → field of view → line of sight.
//!
//! Детекция бинарная per tick. Результат не меняет ZombieState напрямую —
//! ZombieBrain::observe превращает его в TransitionRequest.

use bevy::prelude::*;

use crate::ai::ZombieConfig;
use crate::spatial::{self, SpatialQuery};

/// Что зомби "видит" в этом тике
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Perception {
    /// Target не назначен или entity уже despawned
    NoTarget,
    /// Дальше detection_radius
    OutOfRange { distance: f32 },
    /// За пределами угла обзора
    OutsideFieldOfView { distance: f32, angle: f32 },
    /// Луч упёрся в препятствие (или LOS проверить нечем)
    Obstructed { distance: f32 },
    /// Видим цель
    Visible { distance: f32 },
}

impl Perception {
    pub fn is_perceivable(&self) -> bool {
        matches!(self, Perception::Visible { .. })
    }
}

/// Проверка видимости цели
///
/// 1. distance > detection_radius → OutOfRange
/// 2. angle(forward, to_target) ≥ fov / 2 → OutsideFieldOfView
/// 3. raycast из глаз (position + up * eye_height) к цели на distance,
///    фильтр obstruction_mask → Obstructed / Visible
///
/// Нет SpatialQuery сервиса или raycast вернул ошибку → Obstructed
/// (деградация до "не видим", tick не прерывается).
pub fn perceive(
    config: &ZombieConfig,
    transform: &Transform,
    target_position: Option<Vec3>,
    spatial_query: Option<&dyn SpatialQuery>,
) -> Perception {
    let Some(target_position) = target_position else {
        return Perception::NoTarget;
    };

    let position = transform.translation;
    let distance = spatial::distance(position, target_position);

    if distance > config.detection_radius {
        return Perception::OutOfRange { distance };
    }

    // Стоим в цели — направление вырождено, смотреть некуда, считаем видимой
    let Some(direction) = (target_position - position).try_normalize() else {
        return Perception::Visible { distance };
    };

    let angle = spatial::angle_deg(*transform.forward(), direction);
    if angle >= config.field_of_view_angle / 2.0 {
        return Perception::OutsideFieldOfView { distance, angle };
    }

    let Some(spatial_query) = spatial_query else {
        return Perception::Obstructed { distance };
    };

    let eye = position + Vec3::Y * config.eye_height;
    match spatial_query.raycast(eye, direction, distance, config.obstruction_mask) {
        Ok(None) => Perception::Visible { distance },
        Ok(Some(_hit)) => Perception::Obstructed { distance },
        Err(error) => {
            crate::log_warning(&format!("Perception: LOS raycast failed ({}), treating target as hidden", error));
            Perception::Obstructed { distance }
        }
    }
}

//! ZombieConfig — tunables одного зомби (immutable после спавна)
//!
//! Загружается снаружи (RON) и передаётся при создании entity.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spatial::COLLISION_MASK_OBSTRUCTION;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Параметры зомби
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct ZombieConfig {
    // Detection
    /// Радиус обнаружения цели (метры)
    pub detection_radius: f32,
    /// Радиус атаки (метры)
    pub attack_range: f32,
    /// Полный угол обзора (градусы), видим если угол < fov / 2
    pub field_of_view_angle: f32,
    /// Какие слои закрывают line-of-sight
    pub obstruction_mask: u32,
    /// Высота глаз над позицией (origin LOS луча)
    pub eye_height: f32,
    /// Дистанция до last-known позиции, ближе которой цель считается потерянной
    pub lost_target_threshold: f32,

    // Behavior
    pub patrol_radius: f32,
    /// Ожидание в Idle между патрулями (секунды)
    pub patrol_wait_time: f32,
    pub chase_speed: f32,
    pub patrol_speed: f32,
    /// Скорость доворота в Attack (slerp factor в секунду)
    pub turn_rate: f32,

    // Combat
    pub attack_damage: f32,
    /// Секунды между атаками
    pub attack_cooldown: f32,
    pub initial_health: f32,
    /// Задержка деспавна после смерти (death effects успевают отыграть)
    pub death_despawn_delay: f32,
}

impl Default for ZombieConfig {
    fn default() -> Self {
        Self {
            detection_radius: 15.0,
            attack_range: 2.0,
            field_of_view_angle: 110.0,
            obstruction_mask: COLLISION_MASK_OBSTRUCTION,
            eye_height: 1.0,
            lost_target_threshold: 1.0,
            patrol_radius: 10.0,
            patrol_wait_time: 2.0,
            chase_speed: 3.5,
            patrol_speed: 1.5,
            turn_rate: 5.0,
            attack_damage: 10.0,
            attack_cooldown: 1.5,
            initial_health: 100.0,
            death_despawn_delay: 0.5,
        }
    }
}

impl ZombieConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("detection_radius", self.detection_radius),
            ("attack_range", self.attack_range),
            ("eye_height", self.eye_height),
            ("lost_target_threshold", self.lost_target_threshold),
            ("patrol_radius", self.patrol_radius),
            ("patrol_wait_time", self.patrol_wait_time),
            ("chase_speed", self.chase_speed),
            ("patrol_speed", self.patrol_speed),
            ("turn_rate", self.turn_rate),
            ("attack_damage", self.attack_damage),
            ("attack_cooldown", self.attack_cooldown),
            ("death_despawn_delay", self.death_despawn_delay),
        ];

        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a finite value >= 0, got {}", value),
                });
            }
        }

        if !(self.field_of_view_angle > 0.0 && self.field_of_view_angle <= 360.0) {
            return Err(ConfigError::Invalid {
                field: "field_of_view_angle",
                reason: format!("expected (0, 360] degrees, got {}", self.field_of_view_angle),
            });
        }

        if !(self.initial_health > 0.0 && self.initial_health.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "initial_health",
                reason: format!("expected a finite value > 0, got {}", self.initial_health),
            });
        }

        Ok(())
    }
}

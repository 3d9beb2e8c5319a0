//! Player — цель зомби (TakeDamage capability)
//!
//! Ядро AI ничего не знает про игрока: только Entity в ZombieTarget
//! и TargetDamaged события. Здесь — минимальная сторона цели для headless.

use bevy::prelude::*;

use crate::combat::TargetDamaged;
use crate::components::{DamageResult, Health};

/// Marker component для player-controlled entity (цель зомби)
///
/// Без Health цель всё равно валидна для perception — урон тогда просто
/// не применяется.
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(Health, Transform)]
pub struct Player;

/// Событие: игрок умер
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerDied {
    pub entity: Entity,
    pub killer: Entity,
}

/// Система: применение TargetDamaged к Health цели
///
/// Каждое событие независимо (несколько зомби в одном тике — несколько ударов).
pub fn apply_target_damage(
    mut damage_events: EventReader<TargetDamaged>,
    mut targets: Query<&mut Health, With<Player>>,
    mut died_events: EventWriter<PlayerDied>,
) {
    for event in damage_events.read() {
        let Ok(mut health) = targets.get_mut(event.target) else {
            continue;
        };

        match health.take_damage(event.amount) {
            DamageResult::Killed => {
                died_events.write(PlayerDied {
                    entity: event.target,
                    killer: event.attacker,
                });
                crate::log_info(&format!("☠️ Player {:?} killed by {:?}", event.target, event.attacker));
            }
            DamageResult::Wounded => {
                crate::log(&format!(
                    "Player {:?} hit for {:.1} (health {:.1}/{:.1})",
                    event.target, event.amount, health.current, health.max
                ));
            }
            DamageResult::Ignored | DamageResult::AlreadyDead => {}
        }
    }
}

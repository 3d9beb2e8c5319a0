//! Combat system module
//!
//! ECS ответственность:
//! - Health зомби, входящий урон (DamageZombie), смерть + отложенный деспавн
//! - PerformAttack: TargetDamaged + анимация, gate по attack_timer (в ZombieBrain)
//!
//! Сторона цели (Health игрока) — вне ядра, см. crate::player.

use bevy::prelude::*;

pub mod attack;
pub mod damage;

#[cfg(test)]
mod damage_tests;

// Re-export основных типов
pub use attack::{perform_attack, AttackExecuted, TargetDamaged};
pub use damage::{apply_damage, DamageResponse, DamageZombie, Dead, DespawnAfter, ZombieDied};

use crate::ai::ZombieSet;

/// Combat Plugin
///
/// Порядок выполнения (FixedUpdate, см. ZombieSet):
/// 1. despawn_after_timeout — Cleanup, первым в тике
/// 2. apply_zombie_damage — Damage, до perception
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        crate::ai::configure_zombie_sets(app);

        app.init_resource::<crate::DeterministicRng>()
            .add_event::<DamageZombie>()
            .add_event::<ZombieDied>()
            .add_event::<TargetDamaged>()
            .add_event::<crate::ai::ZombieStateChanged>()
            .add_systems(
                FixedUpdate,
                (
                    damage::despawn_after_timeout.in_set(ZombieSet::Cleanup),
                    damage::apply_zombie_damage.in_set(ZombieSet::Damage),
                ),
            );
    }
}

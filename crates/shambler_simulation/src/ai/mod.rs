//! AI decision-making module
//!
//! FSM зомби: Idle / Patrol / Chase / Attack.
//! Perception (distance → FOV → LOS) запрашивает переходы, ZombieBrain применяет
//! их через единый apply_transition с exit/entry hooks.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::*;
pub use events::{AnimationSignal, ZombieStateChanged, ANIMATION_ATTACK};
pub use systems::{Perception, TickOutcome, WorldServices, ZombieBrain};

/// Порядок фаз тика симуляции (FixedUpdate)
///
/// 1. Cleanup — деспавн мёртвых с истёкшим DespawnAfter (граница тика)
/// 2. Spawn — инициализация новых зомби
/// 3. Damage — входящий урон (может сразу перевести в Chase)
/// 4. Think — perception + FSM + атаки
/// 5. Engine — навигация / цели (headless stand-in движка)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZombieSet {
    Cleanup,
    Spawn,
    Damage,
    Think,
    Engine,
}

pub(crate) fn configure_zombie_sets(app: &mut App) {
    app.configure_sets(
        FixedUpdate,
        (
            ZombieSet::Cleanup,
            ZombieSet::Spawn,
            ZombieSet::Damage,
            ZombieSet::Think,
            ZombieSet::Engine,
        )
            .chain(),
    );
}

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        configure_zombie_sets(app);

        app.init_resource::<crate::DeterministicRng>()
            .add_event::<ZombieStateChanged>()
            .add_event::<AnimationSignal>()
            .add_event::<crate::combat::TargetDamaged>()
            .add_systems(
                FixedUpdate,
                (
                    systems::init_spawned_zombies.in_set(ZombieSet::Spawn),
                    systems::zombie_ai_tick.in_set(ZombieSet::Think),
                ),
            );
    }
}

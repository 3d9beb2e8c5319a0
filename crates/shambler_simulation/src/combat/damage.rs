//! Урон по зомби и смерть.
//!
//! DamageZombie (снаружи) → apply_damage → Health
//! - non-lethal: aggro (target_detected, last-known, Idle/Patrol → Chase)
//! - lethal: Dead + DespawnAfter(death_despawn_delay), ZombieDied ровно один раз

use bevy::prelude::*;
use rand::RngCore;

use crate::ai::{
    TransitionCause, TransitionRequest, Zombie, ZombieBrain, ZombieConfig, ZombieMemory, ZombieState,
    ZombieStateChanged, ZombieTarget,
};
use crate::components::{DamageResult, Health, NavAgent, SpawnPoint};
use crate::spatial::{NavSurface, NavSurfaceService};
use crate::DeterministicRng;

/// Допуск на накопление float ошибки при отсчёте задержки деспавна
const DESPAWN_EPSILON: f32 = 1e-4;

/// Событие: входящий урон по зомби (TakeDamage)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageZombie {
    pub zombie: Entity,
    pub amount: f32,
}

/// Событие: зомби умер (health ≤ 0), отправляется один раз
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ZombieDied {
    pub entity: Entity,
}

/// Компонент-маркер: entity мертв, AI больше не тикает
#[derive(Component, Debug, Clone, Copy)]
pub struct Dead;

/// Компонент: деспавн после задержки (death effects успевают отыграть)
///
/// Отсчёт на fixed clock, деспавн только на границе тика.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct DespawnAfter {
    pub remaining: f32,
}

impl DespawnAfter {
    pub fn new(delay: f32) -> Self {
        Self { remaining: delay }
    }

    /// true когда задержка истекла
    pub fn tick(&mut self, delta: f32) -> bool {
        self.remaining -= delta;
        self.remaining <= DESPAWN_EPSILON
    }
}

/// Что произошло с зомби после удара
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageResponse {
    pub result: DamageResult,
    pub state_change: Option<ZombieStateChanged>,
}

/// ApplyDamage
///
/// - amount ≤ 0 → no-op (health, state, память не меняются)
/// - смертельный → навигация сброшена и остановлена, Killed
/// - non-lethal → target_detected = true, last-known = позиция цели
///   (нет цели — сохраняем прежнюю, нет и её — собственная позиция),
///   Idle/Patrol → Chase независимо от perception
pub fn apply_damage(
    brain: &mut ZombieBrain<'_>,
    health: &mut Health,
    amount: f32,
    target_position: Option<Vec3>,
    navmesh: Option<&dyn NavSurface>,
    rng: &mut dyn RngCore,
) -> DamageResponse {
    let result = health.take_damage(amount);

    let state_change = match result {
        DamageResult::Ignored | DamageResult::AlreadyDead => None,

        DamageResult::Killed => {
            brain.nav.reset_path();
            brain.nav.halt(true);
            None
        }

        DamageResult::Wounded => {
            brain.memory.target_detected = true;
            brain.memory.last_known_target_position = target_position
                .or(brain.memory.last_known_target_position)
                .or(Some(brain.transform.translation));

            if matches!(*brain.state, ZombieState::Idle | ZombieState::Patrol) {
                brain.apply_transition(
                    TransitionRequest::new(ZombieState::Chase, TransitionCause::Damaged),
                    navmesh,
                    rng,
                )
            } else {
                None
            }
        }
    };

    DamageResponse { result, state_change }
}

/// Система: применение DamageZombie событий
pub fn apply_zombie_damage(
    mut commands: Commands,
    mut damage_events: EventReader<DamageZombie>,
    mut zombies: Query<
        (
            &ZombieConfig,
            &ZombieTarget,
            &SpawnPoint,
            &mut Health,
            &mut ZombieState,
            &mut ZombieMemory,
            &mut NavAgent,
            &mut Transform,
        ),
        (With<Zombie>, Without<Dead>),
    >,
    targets: Query<&Transform, Without<Zombie>>,
    navmesh: Option<Res<NavSurfaceService>>,
    mut rng: ResMut<DeterministicRng>,
    mut state_events: EventWriter<ZombieStateChanged>,
    mut died_events: EventWriter<ZombieDied>,
) {
    let navmesh = navmesh.as_deref().map(NavSurfaceService::surface);

    for event in damage_events.read() {
        let Ok((config, target, spawn_point, mut health, mut state, mut memory, mut nav, mut transform)) =
            zombies.get_mut(event.zombie)
        else {
            // Уже мёртв / despawned / не зомби
            continue;
        };

        let target_position = target
            .0
            .and_then(|target| targets.get(target).ok())
            .map(|target_transform| target_transform.translation);

        let mut brain = ZombieBrain {
            entity: event.zombie,
            config,
            spawn_point: spawn_point.0,
            state: &mut *state,
            memory: &mut *memory,
            nav: &mut *nav,
            transform: &mut *transform,
        };

        let response = apply_damage(&mut brain, &mut health, event.amount, target_position, navmesh, &mut rng.rng);

        if let Some(change) = response.state_change {
            state_events.write(change);
        }

        match response.result {
            DamageResult::Wounded => {
                crate::log(&format!(
                    "🔥 {:?} took {:.1} damage (health {:.1}/{:.1})",
                    event.zombie, event.amount, health.current, health.max
                ));
            }
            DamageResult::Killed => {
                commands
                    .entity(event.zombie)
                    .insert((Dead, DespawnAfter::new(config.death_despawn_delay)));
                died_events.write(ZombieDied { entity: event.zombie });

                crate::log_info(&format!(
                    "💀 {:?} died (health {:.1}), despawn in {:.2}s",
                    event.zombie, health.current, config.death_despawn_delay
                ));
            }
            DamageResult::Ignored | DamageResult::AlreadyDead => {}
        }
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter
///
/// Стоит первой в тике: смерть в тике N начинает отсчёт с тика N+1,
/// удаление не раньше полной задержки.
pub fn despawn_after_timeout(
    mut commands: Commands,
    mut query: Query<(Entity, &mut DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut despawn_after) in query.iter_mut() {
        if despawn_after.tick(delta) {
            crate::log(&format!("⚰️ Despawning entity {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}

//! FSM AI systems: ZombieBrain (perception → transition → per-state logic).
//!
//! Порядок внутри тика (на одного зомби):
//! 1. perceive + observe → возможный TransitionRequest
//! 2. apply_transition (exit hook старого state → entry hook нового)
//! 3. per-state логика текущего state (движение, атака) → возможный TransitionRequest
//! 4. attack_timer -= delta (clamp 0)
//!
//! Все переходы идут через apply_transition: exit(Attack) всегда снимает halt
//! до того как новый state начнёт двигать агента.

use bevy::prelude::*;
use rand::{Rng, RngCore};

use crate::ai::events::{AnimationSignal, ZombieStateChanged};
use crate::ai::systems::perception::{perceive, Perception};
use crate::ai::{
    TransitionCause, TransitionRequest, Zombie, ZombieConfig, ZombieMemory, ZombieState, ZombieTarget,
};
use crate::combat::{self, AttackExecuted, Dead, TargetDamaged};
use crate::components::{Health, NavAgent, SpawnPoint};
use crate::spatial::{self, NavSurface, NavSurfaceService, SpatialQuery, SpatialQueryService};
use crate::DeterministicRng;

/// Внешние сервисы движка на время тика (любой может отсутствовать)
#[derive(Clone, Copy, Default)]
pub struct WorldServices<'a> {
    pub spatial: Option<&'a dyn SpatialQuery>,
    pub navmesh: Option<&'a dyn NavSurface>,
}

/// Результат одного тика ZombieBrain
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub perception: Perception,
    /// Переход запрошенный perception (detection / loss)
    pub perception_change: Option<ZombieStateChanged>,
    /// Переход запрошенный логикой state (таймер, arrival, out of range)
    pub behavior_change: Option<ZombieStateChanged>,
    pub attack: Option<AttackExecuted>,
}

impl TickOutcome {
    pub fn changes(&self) -> impl Iterator<Item = ZombieStateChanged> + '_ {
        self.perception_change.iter().chain(self.behavior_change.iter()).copied()
    }
}

/// Мозг зомби: view на компоненты одного entity
///
/// Собирается в системе из Query на время тика, в тестах — из локальных значений.
pub struct ZombieBrain<'a> {
    pub entity: Entity,
    pub config: &'a ZombieConfig,
    pub spawn_point: Vec3,
    pub state: &'a mut ZombieState,
    pub memory: &'a mut ZombieMemory,
    pub nav: &'a mut NavAgent,
    pub transform: &'a mut Transform,
}

impl ZombieBrain<'_> {
    /// Entry hook начального state (спавн: Patrol → сразу выбираем точку)
    pub fn enter_initial_state(&mut self, navmesh: Option<&dyn NavSurface>, rng: &mut dyn RngCore) {
        let state = *self.state;
        self.on_enter(state, navmesh, rng);
    }

    /// Полный тик: perception → transition → per-state логика → cooldown
    pub fn tick(
        &mut self,
        target_position: Option<Vec3>,
        delta: f32,
        services: WorldServices<'_>,
        rng: &mut dyn RngCore,
    ) -> TickOutcome {
        let perception = perceive(self.config, self.transform, target_position, services.spatial);

        let perception_change = self
            .observe(perception, target_position)
            .and_then(|request| self.apply_transition(request, services.navmesh, rng));

        let (request, attack) = self.run_state(target_position, delta);
        let behavior_change = request.and_then(|request| self.apply_transition(request, services.navmesh, rng));

        self.memory.attack_timer = (self.memory.attack_timer - delta).max(0.0);

        TickOutcome {
            perception,
            perception_change,
            behavior_change,
            attack,
        }
    }

    /// Perception → память + запрос перехода
    pub fn observe(&mut self, perception: Perception, target_position: Option<Vec3>) -> Option<TransitionRequest> {
        match perception {
            // Нет цели — ничего не трогаем (ни память, ни state)
            Perception::NoTarget => None,

            Perception::Visible { distance } => {
                self.memory.target_detected = true;
                self.memory.last_known_target_position = target_position;

                if distance <= self.config.attack_range {
                    Some(TransitionRequest::new(ZombieState::Attack, TransitionCause::TargetInAttackRange))
                } else if *self.state != ZombieState::Attack {
                    Some(TransitionRequest::new(ZombieState::Chase, TransitionCause::TargetSpotted))
                } else {
                    // Attack сам уйдёт в Chase когда цель выйдет из радиуса
                    None
                }
            }

            Perception::OutOfRange { .. }
            | Perception::OutsideFieldOfView { .. }
            | Perception::Obstructed { .. } => self.check_target_lost(),
        }
    }

    /// Дошли до last-known позиции в Chase и цели не видно → цель потеряна
    fn check_target_lost(&mut self) -> Option<TransitionRequest> {
        if !self.memory.target_detected || *self.state != ZombieState::Chase {
            return None;
        }

        let last_known = self.memory.last_known_target_position?;
        if self.transform.translation.distance(last_known) >= self.config.lost_target_threshold {
            return None;
        }

        self.memory.target_detected = false;
        Some(TransitionRequest::new(ZombieState::Patrol, TransitionCause::TargetLost))
    }

    /// Применяет переход: exit hook → смена state → entry hook
    ///
    /// Запрос в текущий state — no-op. Ребро не из таблицы — отклоняется (warning).
    pub fn apply_transition(
        &mut self,
        request: TransitionRequest,
        navmesh: Option<&dyn NavSurface>,
        rng: &mut dyn RngCore,
    ) -> Option<ZombieStateChanged> {
        let from = *self.state;
        if from == request.to {
            return None;
        }

        if !from.allows(request.to) {
            crate::log_warning(&format!(
                "AI: {:?} rejected transition {} → {} ({:?})",
                self.entity,
                from.as_str(),
                request.to.as_str(),
                request.cause
            ));
            return None;
        }

        self.on_exit(from);
        *self.state = request.to;
        self.on_enter(request.to, navmesh, rng);

        crate::log(&format!(
            "AI: {:?} {} → {} ({:?})",
            self.entity,
            from.as_str(),
            request.to.as_str(),
            request.cause
        ));

        Some(ZombieStateChanged {
            entity: self.entity,
            from,
            to: request.to,
            cause: request.cause,
        })
    }

    fn on_exit(&mut self, state: ZombieState) {
        if state == ZombieState::Attack {
            // Без этого агент остаётся стоять навсегда
            self.nav.halt(false);
        }
    }

    fn on_enter(&mut self, state: ZombieState, navmesh: Option<&dyn NavSurface>, rng: &mut dyn RngCore) {
        match state {
            ZombieState::Idle => {
                self.nav.reset_path();
                self.memory.patrol_wait_timer = self.config.patrol_wait_time;
            }
            ZombieState::Patrol => {
                self.nav.set_speed(self.config.patrol_speed);
                self.choose_patrol_destination(navmesh, rng);
            }
            ZombieState::Chase => {}
            ZombieState::Attack => {
                self.nav.halt(true);
            }
        }
    }

    /// Случайная точка на навмеше в пределах patrol_radius от spawn point
    ///
    /// Сэмплинг не удался (нет навмеша / точка вне радиуса / агент вне поверхности)
    /// → destination не меняется, на следующем arrival зомби уйдёт в Idle и попробует снова.
    pub fn choose_patrol_destination(&mut self, navmesh: Option<&dyn NavSurface>, rng: &mut dyn RngCore) -> Option<Vec3> {
        self.memory.patrol_destination = None;

        let Some(navmesh) = navmesh else {
            crate::log(&format!("AI: {:?} no navmesh bound, patrol destination skipped", self.entity));
            return None;
        };

        let radius = self.config.patrol_radius;
        let candidate = self.spawn_point + random_in_unit_sphere(rng) * radius;

        let destination = navmesh
            .sample_point(candidate, radius)
            .filter(|point| SpawnPoint(self.spawn_point).contains(*point, radius))?;

        if !self.nav.set_destination(destination) {
            return None;
        }

        self.memory.patrol_destination = Some(destination);
        Some(destination)
    }

    /// Per-state логика (после perception, в том же тике)
    pub fn run_state(
        &mut self,
        target_position: Option<Vec3>,
        delta: f32,
    ) -> (Option<TransitionRequest>, Option<AttackExecuted>) {
        match *self.state {
            ZombieState::Idle => {
                self.memory.patrol_wait_timer = (self.memory.patrol_wait_timer - delta).max(0.0);
                if self.memory.patrol_wait_timer <= 0.0 {
                    return (
                        Some(TransitionRequest::new(ZombieState::Patrol, TransitionCause::WaitExpired)),
                        None,
                    );
                }
                (None, None)
            }

            ZombieState::Patrol => {
                self.nav.set_speed(self.config.patrol_speed);
                if self.nav.has_arrived() {
                    return (
                        Some(TransitionRequest::new(ZombieState::Idle, TransitionCause::ArrivedAtDestination)),
                        None,
                    );
                }
                (None, None)
            }

            ZombieState::Chase => {
                self.nav.set_speed(self.config.chase_speed);

                let destination = match target_position {
                    Some(position) if self.memory.target_detected => Some(position),
                    _ => self.memory.last_known_target_position,
                };
                if let Some(destination) = destination {
                    self.nav.set_destination(destination);
                }
                (None, None)
            }

            ZombieState::Attack => self.run_attack(target_position, delta),
        }
    }

    fn run_attack(
        &mut self,
        target_position: Option<Vec3>,
        delta: f32,
    ) -> (Option<TransitionRequest>, Option<AttackExecuted>) {
        self.nav.reset_path();

        // Цель исчезла — как будто вышла из радиуса: Chase к last-known
        let Some(target_position) = target_position else {
            return (
                Some(TransitionRequest::new(ZombieState::Chase, TransitionCause::TargetLost)),
                None,
            );
        };

        self.face_towards(target_position, delta);

        let distance = self.transform.translation.distance(target_position);
        if distance > self.config.attack_range {
            return (
                Some(TransitionRequest::new(ZombieState::Chase, TransitionCause::TargetLeftAttackRange)),
                None,
            );
        }

        if self.memory.attack_timer <= 0.0 {
            self.memory.attack_timer = self.config.attack_cooldown;
            return (
                None,
                Some(AttackExecuted {
                    damage: self.config.attack_damage,
                }),
            );
        }

        (None, None)
    }

    /// Плавный доворот к цели в горизонтальной плоскости (slerp, не snap)
    fn face_towards(&mut self, target_position: Vec3, delta: f32) {
        let Some(look) = spatial::horizontal_look_rotation(self.transform.translation, target_position) else {
            return;
        };
        let t = (delta * self.config.turn_rate).clamp(0.0, 1.0);
        self.transform.rotation = self.transform.rotation.slerp(look, t);
    }
}

fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let point = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if point.length_squared() <= 1.0 {
            return point;
        }
    }
}

/// Система: инициализация только что заспавненных зомби
///
/// spawn point = позиция при спавне, Health из config, entry hook Patrol
/// (первая patrol точка выбирается сразу).
pub fn init_spawned_zombies(
    mut zombies: Query<
        (
            Entity,
            &ZombieConfig,
            &mut SpawnPoint,
            &mut Health,
            &mut ZombieState,
            &mut ZombieMemory,
            &mut NavAgent,
            &mut Transform,
        ),
        Added<Zombie>,
    >,
    navmesh: Option<Res<NavSurfaceService>>,
    mut rng: ResMut<DeterministicRng>,
) {
    let navmesh = navmesh.as_deref().map(NavSurfaceService::surface);

    for (entity, config, mut spawn_point, mut health, mut state, mut memory, mut nav, mut transform) in
        zombies.iter_mut()
    {
        spawn_point.0 = transform.translation;
        *health = Health::new(config.initial_health);
        if let Some(navmesh) = navmesh {
            nav.set_on_nav_mesh(navmesh.is_on_surface(transform.translation));
        }

        let mut brain = ZombieBrain {
            entity,
            config,
            spawn_point: spawn_point.0,
            state: &mut *state,
            memory: &mut *memory,
            nav: &mut *nav,
            transform: &mut *transform,
        };
        brain.enter_initial_state(navmesh, &mut rng.rng);

        crate::log_info(&format!(
            "🧟 {:?} spawned at {:?} ({}, patrol → {:?})",
            entity,
            spawn_point.0,
            state.as_str(),
            memory.patrol_destination
        ));
    }
}

/// Система: тик AI всех живых зомби
///
/// ADR: Perception всегда раньше per-state логики в том же тике —
/// детекция этого тика влияет на движение этого же тика.
pub fn zombie_ai_tick(
    mut zombies: Query<
        (
            Entity,
            &ZombieConfig,
            &ZombieTarget,
            &SpawnPoint,
            &Health,
            &mut ZombieState,
            &mut ZombieMemory,
            &mut NavAgent,
            &mut Transform,
        ),
        (With<Zombie>, Without<Dead>),
    >,
    targets: Query<&Transform, Without<Zombie>>,
    spatial_query: Option<Res<SpatialQueryService>>,
    navmesh: Option<Res<NavSurfaceService>>,
    mut rng: ResMut<DeterministicRng>,
    mut state_events: EventWriter<ZombieStateChanged>,
    mut damage_events: EventWriter<TargetDamaged>,
    mut animation_events: EventWriter<AnimationSignal>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let services = WorldServices {
        spatial: spatial_query.as_deref().map(SpatialQueryService::query),
        navmesh: navmesh.as_deref().map(NavSurfaceService::surface),
    };

    for (entity, config, target, spawn_point, health, mut state, mut memory, mut nav, mut transform) in
        zombies.iter_mut()
    {
        // Убит в этом же тике — Dead marker ещё в Commands
        if !health.is_alive() {
            continue;
        }

        // Target despawned → Query::get падает → None (не ошибка)
        let target_position = target
            .0
            .and_then(|target| targets.get(target).ok())
            .map(|target_transform| target_transform.translation);

        let mut brain = ZombieBrain {
            entity,
            config,
            spawn_point: spawn_point.0,
            state: &mut *state,
            memory: &mut *memory,
            nav: &mut *nav,
            transform: &mut *transform,
        };

        let outcome = brain.tick(target_position, delta, services, &mut rng.rng);

        for change in outcome.changes() {
            state_events.write(change);
        }

        if let Some(attack) = outcome.attack {
            combat::perform_attack(entity, target.0, attack, &mut damage_events, &mut animation_events);
        }
    }
}

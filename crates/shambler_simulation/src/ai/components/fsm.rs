//! FSM AI components (zombie marker, state, memory, target binding).

use bevy::prelude::*;

use crate::ai::ZombieConfig;
use crate::components::{Health, NavAgent, SpawnPoint};

/// Зомби — враждебный NPC под управлением ZombieBrain
///
/// Required Components собирают полный набор для AI: state, память, config,
/// target binding, навигацию, spawn point и здоровье.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(ZombieState, ZombieMemory, ZombieConfig, ZombieTarget, NavAgent, SpawnPoint, Health, Transform)]
pub struct Zombie;

/// Состояния FSM зомби (закрытый набор)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum ZombieState {
    /// Стоим на месте, ждём patrol_wait_time
    Idle,
    /// Идём к случайной точке вокруг spawn point
    Patrol,
    /// Преследуем цель (или её last-known позицию)
    Chase,
    /// В радиусе атаки: навигация остановлена, бьём по cooldown
    Attack,
}

impl Default for ZombieState {
    fn default() -> Self {
        Self::Patrol
    }
}

impl ZombieState {
    /// Таблица переходов. Всё что не здесь — недостижимо.
    pub fn allows(self, to: ZombieState) -> bool {
        use ZombieState::*;
        matches!(
            (self, to),
            (Idle, Patrol)
                | (Patrol, Idle)
                | (Idle | Patrol, Chase)
                | (Idle | Patrol, Attack)
                | (Chase, Attack)
                | (Chase, Patrol)
                | (Attack, Chase)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ZombieState::Idle => "Idle",
            ZombieState::Patrol => "Patrol",
            ZombieState::Chase => "Chase",
            ZombieState::Attack => "Attack",
        }
    }
}

/// Почему запрошен переход (для логов и ZombieStateChanged)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum TransitionCause {
    WaitExpired,
    ArrivedAtDestination,
    TargetSpotted,
    TargetInAttackRange,
    TargetLeftAttackRange,
    TargetLost,
    Damaged,
}

/// Запрос перехода. Perception и per-state логика не трогают ZombieState
/// напрямую — только возвращают запрос, применяет его ZombieBrain::apply_transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRequest {
    pub to: ZombieState,
    pub cause: TransitionCause,
}

impl TransitionRequest {
    pub fn new(to: ZombieState, cause: TransitionCause) -> Self {
        Self { to, cause }
    }
}

/// Рабочая память зомби (таймеры, детекция, last-known позиция)
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ZombieMemory {
    /// Цель была обнаружена и ещё не потеряна
    pub target_detected: bool,
    /// Последняя позиция где цель была видна (None пока ни разу не видели)
    pub last_known_target_position: Option<Vec3>,
    /// Cooldown атаки, ≥ 0. Сбрасывается только успешной атакой
    pub attack_timer: f32,
    /// Ожидание в Idle перед следующим патрулём, ≥ 0
    pub patrol_wait_timer: f32,
    /// Текущая patrol точка (None если сэмплинг не удался)
    pub patrol_destination: Option<Vec3>,
}

/// Injected target. None — цели нет (или ещё не назначена), не ошибка.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ZombieTarget(pub Option<Entity>);

impl ZombieTarget {
    pub fn new(target: Entity) -> Self {
        Self(Some(target))
    }
}

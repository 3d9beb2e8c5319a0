//! Базовые компоненты акторов: Health

use bevy::prelude::*;

/// Здоровье актора
///
/// Инвариант: current не растёт (лечения нет). На летальном ударе может уйти
/// ниже нуля (50 HP − 55 урона = −5), смерть фиксируется по переходу через 0.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

/// Результат применения урона к Health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageResult {
    /// amount ≤ 0 (или NaN) — ничего не изменилось
    Ignored,
    /// Урон прошёл, актор жив
    Wounded,
    /// Этот удар убил актора (переход alive → dead, ровно один раз)
    Killed,
    /// Актор уже был мёртв до удара
    AlreadyDead,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) -> DamageResult {
        // `!(amount > 0.0)` ловит и NaN
        if !(amount > 0.0) {
            return DamageResult::Ignored;
        }

        let was_alive = self.is_alive();
        self.current -= amount;

        match (was_alive, self.is_alive()) {
            (true, true) => DamageResult::Wounded,
            (true, false) => DamageResult::Killed,
            _ => DamageResult::AlreadyDead,
        }
    }
}

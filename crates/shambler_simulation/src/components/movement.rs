//! Movement компоненты: NavAgent (контракт с навигацией движка)

use bevy::prelude::*;

/// Навигационный агент актора
///
/// Архитектура:
/// - AI пишет intent: destination, speed, halt (set_destination / reset_path / halt)
/// - Движок (NavMesh + path solver) читает intent, двигает Transform
///   и пишет обратно статус пути (report_path / set_on_nav_mesh)
///
/// AI не владеет навмешем и не считает пути — только потребитель статуса.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    destination: Option<Vec3>,
    speed: f32,
    halted: bool,
    path_pending: bool,
    remaining_distance: f32,
    stopping_distance: f32,
    on_nav_mesh: bool,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            destination: None,
            speed: 0.0,
            halted: false,
            path_pending: false,
            remaining_distance: 0.0,
            stopping_distance: 0.2,
            on_nav_mesh: true,
        }
    }
}

impl NavAgent {
    pub fn with_stopping_distance(mut self, stopping_distance: f32) -> Self {
        self.stopping_distance = stopping_distance.max(0.0);
        self
    }

    /// Новый destination. Вне навмеша запрос игнорируется (false),
    /// движение подавлено пока агент не вернётся на поверхность.
    pub fn set_destination(&mut self, point: Vec3) -> bool {
        if !self.on_nav_mesh {
            return false;
        }
        if self.destination != Some(point) {
            self.path_pending = true;
        }
        self.destination = Some(point);
        true
    }

    pub fn reset_path(&mut self) {
        self.destination = None;
        self.path_pending = false;
        self.remaining_distance = 0.0;
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    pub fn halt(&mut self, halted: bool) {
        self.halted = halted;
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn is_path_pending(&self) -> bool {
        self.path_pending
    }

    pub fn remaining_distance(&self) -> f32 {
        self.remaining_distance
    }

    pub fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    pub fn is_on_nav_mesh(&self) -> bool {
        self.on_nav_mesh
    }

    /// Агент стоит у цели: путь посчитан и осталось не больше stopping distance
    pub fn has_arrived(&self) -> bool {
        self.on_nav_mesh && !self.path_pending && self.remaining_distance <= self.stopping_distance
    }

    // === Сторона движка ===

    /// Path solver посчитал путь: снимаем pending, обновляем остаток
    pub fn report_path(&mut self, remaining_distance: f32) {
        self.path_pending = false;
        self.remaining_distance = remaining_distance.max(0.0);
    }

    pub fn set_on_nav_mesh(&mut self, on_nav_mesh: bool) {
        self.on_nav_mesh = on_nav_mesh;
    }
}

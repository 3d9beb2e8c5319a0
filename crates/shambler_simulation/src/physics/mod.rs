//! Headless "движок": навигация агентов + сторона цели.
//!
//! В игре эти системы заменяются движком (NavMesh agent, Health игрока).
//! Все системы в ZombieSet::Engine — после решений AI в том же тике.

use bevy::prelude::*;

pub mod movement;

pub use movement::{drive_nav_agents, step_towards};

use crate::ai::ZombieSet;
use crate::player::{apply_target_damage, PlayerDied};

/// Headless Navigation Plugin
pub struct HeadlessNavigationPlugin;

impl Plugin for HeadlessNavigationPlugin {
    fn build(&self, app: &mut App) {
        crate::ai::configure_zombie_sets(app);

        app.add_event::<crate::combat::TargetDamaged>()
            .add_event::<PlayerDied>()
            .add_systems(
                FixedUpdate,
                (apply_target_damage, drive_nav_agents)
                    .chain()
                    .in_set(ZombieSet::Engine),
            );
    }
}

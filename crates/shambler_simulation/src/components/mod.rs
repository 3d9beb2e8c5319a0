//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: здоровье (Health) и исход урона
//! - movement: NavAgent (контракт с навигацией движка)
//! - world: позиционирование в мире (SpawnPoint)
//! - ai: re-export компонентов зомби (ZombieState, ZombieMemory, ZombieConfig)

pub mod actor;
pub mod ai;
pub mod movement;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use ai::*;
pub use movement::*;
pub use world::*;

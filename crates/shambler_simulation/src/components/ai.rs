//! AI компоненты: state machine, память, config

// NOTE: определены в crate::ai (ai/components), здесь только re-export для единообразия
pub use crate::ai::{TransitionCause, TransitionRequest, Zombie, ZombieConfig, ZombieMemory, ZombieState, ZombieTarget};

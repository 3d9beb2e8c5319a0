//! AI systems (perception + FSM)

pub mod fsm;
pub mod perception;


// Re-export all systems
pub use fsm::*;
pub use perception::*;

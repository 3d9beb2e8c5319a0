//! AI Events — что зомби сообщает наружу
//!
//! Fire-and-forget: если никто не читает, события просто протухают.

use bevy::prelude::*;

use crate::ai::{TransitionCause, ZombieState};

/// Переход FSM применён (после exit/entry hooks)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ZombieStateChanged {
    pub entity: Entity,
    pub from: ZombieState,
    pub to: ZombieState,
    pub cause: TransitionCause,
}

/// Сигнал для анимации (Animator trigger на стороне движка)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AnimationSignal {
    pub entity: Entity,
    pub name: &'static str,
}

pub const ANIMATION_ATTACK: &str = "Attack";

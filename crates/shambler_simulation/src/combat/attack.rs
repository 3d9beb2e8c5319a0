//! PerformAttack — единственный путь урона по цели.

use bevy::prelude::*;

use crate::ai::{AnimationSignal, ANIMATION_ATTACK};

/// Событие: урон по цели (TakeDamage capability цели)
///
/// Несколько зомби могут ударить одну цель в одном тике — сторона цели
/// применяет каждое событие независимо.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TargetDamaged {
    pub attacker: Entity,
    pub target: Entity,
    pub amount: f32,
}

/// Атака прошла cooldown gate в Attack state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackExecuted {
    pub damage: f32,
}

/// Анимация + урон по цели. Цели нет — только анимация.
pub fn perform_attack(
    attacker: Entity,
    target: Option<Entity>,
    attack: AttackExecuted,
    damage_events: &mut EventWriter<TargetDamaged>,
    animation_events: &mut EventWriter<AnimationSignal>,
) {
    animation_events.write(AnimationSignal {
        entity: attacker,
        name: ANIMATION_ATTACK,
    });

    let Some(target) = target else {
        return;
    };

    damage_events.write(TargetDamaged {
        attacker,
        target,
        amount: attack.damage,
    });

    crate::log(&format!("🧟 {:?} attacks {:?} ({:.1} damage)", attacker, target, attack.damage));
}

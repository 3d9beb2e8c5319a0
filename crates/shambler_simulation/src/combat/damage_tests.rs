//! Tests for damage intake and death.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::super::damage::{apply_damage, DespawnAfter};
    use crate::ai::{TransitionCause, ZombieBrain, ZombieConfig, ZombieMemory, ZombieState};
    use crate::components::{DamageResult, Health, NavAgent};

    struct Fixture {
        config: ZombieConfig,
        state: ZombieState,
        memory: ZombieMemory,
        nav: NavAgent,
        transform: Transform,
        health: Health,
        rng: ChaCha8Rng,
    }

    impl Fixture {
        fn new(state: ZombieState, health: f32) -> Self {
            Self {
                config: ZombieConfig::default(),
                state,
                memory: ZombieMemory::default(),
                nav: NavAgent::default(),
                transform: Transform::default(),
                health: Health::new(health),
                rng: ChaCha8Rng::seed_from_u64(7),
            }
        }

        fn hit(&mut self, amount: f32, target_position: Option<Vec3>) -> super::super::damage::DamageResponse {
            let mut brain = ZombieBrain {
                entity: Entity::PLACEHOLDER,
                config: &self.config,
                spawn_point: Vec3::ZERO,
                state: &mut self.state,
                memory: &mut self.memory,
                nav: &mut self.nav,
                transform: &mut self.transform,
            };
            apply_damage(&mut brain, &mut self.health, amount, target_position, None, &mut self.rng)
        }
    }

    #[test]
    fn test_zero_damage_is_noop() {
        let mut fixture = Fixture::new(ZombieState::Patrol, 100.0);
        let memory_before = fixture.memory.clone();

        let response = fixture.hit(0.0, Some(Vec3::X));

        assert_eq!(response.result, DamageResult::Ignored);
        assert!(response.state_change.is_none());
        assert_eq!(fixture.health.current, 100.0);
        assert_eq!(fixture.state, ZombieState::Patrol);
        assert_eq!(fixture.memory, memory_before);
    }

    #[test]
    fn test_damage_decrements_exactly() {
        let mut fixture = Fixture::new(ZombieState::Chase, 100.0);

        fixture.hit(30.0, None);
        fixture.hit(12.5, None);

        assert_eq!(fixture.health.current, 57.5);
        assert_eq!(fixture.state, ZombieState::Chase);
    }

    #[test]
    fn test_overkill_dies_once_and_stops_navigation() {
        let mut fixture = Fixture::new(ZombieState::Chase, 50.0);
        fixture.nav.set_destination(Vec3::new(5.0, 0.0, 0.0));

        let response = fixture.hit(55.0, Some(Vec3::X));
        assert_eq!(response.result, DamageResult::Killed);
        assert_eq!(fixture.health.current, -5.0);
        assert!(fixture.nav.is_halted());
        assert_eq!(fixture.nav.destination(), None);

        let response = fixture.hit(10.0, Some(Vec3::X));
        assert_eq!(response.result, DamageResult::AlreadyDead);
        assert!(response.state_change.is_none());
    }

    #[test]
    fn test_idle_damage_forces_chase() {
        let mut fixture = Fixture::new(ZombieState::Idle, 100.0);
        let attacker = Vec3::new(8.0, 0.0, 3.0);

        let response = fixture.hit(10.0, Some(attacker));

        let change = response.state_change.expect("Idle → Chase on damage");
        assert_eq!(change.from, ZombieState::Idle);
        assert_eq!(change.to, ZombieState::Chase);
        assert_eq!(change.cause, TransitionCause::Damaged);
        assert_eq!(fixture.state, ZombieState::Chase);
        assert!(fixture.memory.target_detected);
        assert_eq!(fixture.memory.last_known_target_position, Some(attacker));
    }

    #[test]
    fn test_damage_without_target_keeps_last_known_or_own_position() {
        let mut fixture = Fixture::new(ZombieState::Patrol, 100.0);
        fixture.transform.translation = Vec3::new(1.0, 0.0, 2.0);

        fixture.hit(5.0, None);
        assert_eq!(fixture.memory.last_known_target_position, Some(Vec3::new(1.0, 0.0, 2.0)));

        let mut fixture = Fixture::new(ZombieState::Chase, 100.0);
        fixture.memory.last_known_target_position = Some(Vec3::new(9.0, 0.0, 9.0));

        fixture.hit(5.0, None);
        assert_eq!(fixture.memory.last_known_target_position, Some(Vec3::new(9.0, 0.0, 9.0)));
    }

    #[test]
    fn test_attack_damage_keeps_state() {
        let mut fixture = Fixture::new(ZombieState::Attack, 100.0);

        let response = fixture.hit(10.0, Some(Vec3::X));

        assert!(response.state_change.is_none());
        assert_eq!(fixture.state, ZombieState::Attack);
    }

    #[test]
    fn test_despawn_after_delay() {
        let mut despawn = DespawnAfter::new(0.5);
        let dt = 1.0 / 60.0;

        let ticks = (0..100).take_while(|_| !despawn.tick(dt)).count() + 1;

        // 0.5s @ 60Hz = 30 тиков
        assert_eq!(ticks, 30);
    }

    #[test]
    fn test_zero_delay_despawns_on_first_tick() {
        let mut despawn = DespawnAfter::new(0.0);
        assert!(despawn.tick(1.0 / 60.0));
    }
}

//! Unit tests for npc-engagement.

#[cfg(test)]
mod helpers {
    use npc_core::{TargetId, TargetInfo, Vec3};

    use crate::{Engagement, EngagementConfig};

    pub fn engagement() -> Engagement {
        Engagement::new(EngagementConfig::default()).unwrap()
    }

    pub fn target_at(x: f32) -> TargetInfo {
        TargetInfo { id: TargetId(1), position: Vec3::flat(x, 0.0), velocity: Vec3::ZERO, alive: true }
    }
}

#[cfg(test)]
mod attack {
    use npc_core::{TargetId, Vec3};

    use super::helpers::{engagement, target_at};
    use crate::{EngagementConfig, EngagementError};

    #[test]
    fn no_target_is_noop() {
        let mut e = engagement();
        assert!(!e.attack());
        assert!(e.pending_hit().is_none());
        assert!(e.attack_ready());
    }

    #[test]
    fn attack_starts_cooldown_and_windup() {
        let mut e = engagement();
        e.set_target(Some(TargetId(1)));
        assert!(e.attack());
        assert!(e.state().attacking);
        assert!(!e.attack_ready());
        assert!(!e.attack(), "cooldown blocks a second attack");
    }

    #[test]
    fn hit_lands_after_windup_in_range() {
        let mut e = engagement();
        let t = target_at(1.5);
        e.set_target(Some(t.id));
        e.attack();
        // 0.35 s wind-up: nothing on the first three 0.1 s ticks.
        for _ in 0..3 {
            assert!(e.update(Vec3::ZERO, Some(&t), 0.1).is_none());
        }
        let hit = e.update(Vec3::ZERO, Some(&t), 0.1).expect("hit should land");
        assert_eq!(hit.target, t.id);
        assert_eq!(hit.amount, EngagementConfig::default().attack_damage);
        assert!(hit.direction.distance(Vec3::flat(1.0, 0.0)) < 1e-5);
        assert!(!e.state().attacking);
    }

    #[test]
    fn attack_whiffs_if_target_leaves_range() {
        let mut e = engagement();
        let near = target_at(1.5);
        let far = target_at(6.0);
        e.set_target(Some(near.id));
        e.attack();
        e.update(Vec3::ZERO, Some(&near), 0.1);
        for _ in 0..5 {
            assert!(e.update(Vec3::ZERO, Some(&far), 0.1).is_none());
        }
        assert!(e.pending_hit().is_none());
    }

    #[test]
    fn cooldown_elapses() {
        let mut e = engagement();
        let t = target_at(1.0);
        e.set_target(Some(t.id));
        e.attack();
        for _ in 0..13 {
            e.update(Vec3::ZERO, Some(&t), 0.1);
        }
        assert!(e.attack_ready());
        assert!(e.attack());
    }

    #[test]
    fn lost_target_is_cleared() {
        let mut e = engagement();
        let mut t = target_at(1.0);
        e.set_target(Some(t.id));
        e.attack();
        t.alive = false;
        assert!(e.update(Vec3::ZERO, Some(&t), 0.1).is_none());
        assert_eq!(e.target(), None);
        assert!(!e.state().in_combat);
        assert!(e.pending_hit().is_none());

        e.set_target(Some(TargetId(1)));
        assert!(e.update(Vec3::ZERO, None, 0.1).is_none());
        assert_eq!(e.target(), None);
    }

    #[test]
    fn frequency_sets_cooldown() {
        let cfg = EngagementConfig::with_attack_frequency(2.0).unwrap();
        assert!((cfg.attack_cooldown_secs - 0.5).abs() < 1e-6);
        assert!(matches!(
            EngagementConfig::with_attack_frequency(0.0),
            Err(EngagementError::InvalidConfig(_))
        ));
    }
}

#[cfg(test)]
mod damage {
    use npc_core::{AgentId, AgentRng, TargetId, Vec3};

    use super::helpers::engagement;
    use crate::{Engagement, EngagementConfig, Temperament};

    const CALM: Temperament = Temperament { morale: 100.0, intelligence: 50.0 };

    #[test]
    fn health_is_clamped() {
        let mut e = engagement();
        let mut rng = AgentRng::new(1, AgentId(0));
        let mut health = 10.0;
        let out = e.take_damage(&mut health, 100.0, 50.0, Vec3::FORWARD, CALM, &mut rng);
        assert_eq!(health, 0.0);
        assert!(out.lethal);
        assert!(!out.flee && out.dodge.is_none());

        let mut health = 90.0;
        e.take_damage(&mut health, 100.0, -20.0, Vec3::FORWARD, CALM, &mut rng);
        assert_eq!(health, 90.0);
    }

    #[test]
    fn zero_morale_always_flees_when_low() {
        let fearless = Temperament { morale: 0.0, intelligence: 50.0 };
        for seed in 0..200 {
            let mut e = engagement();
            let mut rng = AgentRng::new(seed, AgentId(3));
            let mut health = 20.0;
            let out = e.take_damage(&mut health, 100.0, 5.0, Vec3::FORWARD, fearless, &mut rng);
            assert!(out.flee, "seed {seed}");
        }
    }

    #[test]
    fn full_morale_never_flees() {
        for seed in 0..200 {
            let mut e = engagement();
            let mut rng = AgentRng::new(seed, AgentId(3));
            let mut health = 20.0;
            let out = e.take_damage(&mut health, 100.0, 5.0, Vec3::FORWARD, CALM, &mut rng);
            assert!(!out.flee, "seed {seed}");
        }
    }

    #[test]
    fn no_flee_roll_above_low_health() {
        let fearless = Temperament { morale: 0.0, intelligence: 50.0 };
        let mut e = engagement();
        let mut rng = AgentRng::new(5, AgentId(0));
        let mut health = 100.0;
        let out = e.take_damage(&mut health, 100.0, 10.0, Vec3::FORWARD, fearless, &mut rng);
        assert!(!out.flee);
    }

    #[test]
    fn heavy_hit_stuns_and_cancels_windup() {
        let mut e = engagement();
        let mut rng = AgentRng::new(5, AgentId(0));
        e.set_target(Some(TargetId(1)));
        e.attack();
        let mut health = 100.0;
        let out = e.take_damage(&mut health, 100.0, 30.0, Vec3::FORWARD, CALM, &mut rng);
        assert!(out.stunned);
        assert!(e.is_stunned());
        assert!(e.pending_hit().is_none());
        assert!(out.knockback.z > 0.0, "pushed along the hit direction");
    }

    #[test]
    fn stun_wears_off() {
        let mut e = engagement();
        let mut rng = AgentRng::new(5, AgentId(0));
        let mut health = 100.0;
        e.take_damage(&mut health, 100.0, 30.0, Vec3::FORWARD, CALM, &mut rng);
        for _ in 0..11 {
            e.update(Vec3::ZERO, None, 0.1);
        }
        assert!(!e.is_stunned());
    }

    #[test]
    fn dodge_is_lateral_and_gated() {
        let cfg = EngagementConfig { dodge_base_chance: 1.0, ..EngagementConfig::default() };
        let mut e = Engagement::new(cfg).unwrap();
        let mut rng = AgentRng::new(11, AgentId(0));
        let side = e.try_dodge(Vec3::FORWARD, 100.0, &mut rng).expect("certain dodge");
        assert!(side.z.abs() < 1e-5, "sidestep is perpendicular to the threat");
        assert!((side.length() - 1.5).abs() < 1e-4);
        assert!(e.is_dodging());
        assert!(e.try_dodge(Vec3::FORWARD, 100.0, &mut rng).is_none());
    }

    #[test]
    fn nan_intelligence_never_dodges() {
        let cfg = EngagementConfig { dodge_base_chance: 1.0, ..EngagementConfig::default() };
        let mut e = Engagement::new(cfg).unwrap();
        let mut rng = AgentRng::new(11, AgentId(0));
        assert!(e.try_dodge(Vec3::FORWARD, f32::NAN, &mut rng).is_none());
        assert!(!e.is_dodging());
    }

    #[test]
    fn dodge_chance_scales_with_intelligence() {
        let e = engagement();
        assert!(e.dodge_chance(90.0) > e.dodge_chance(10.0));
        assert!((e.dodge_chance(50.0) - 0.3).abs() < 1e-6);
    }
}

//! Unit tests for npc-sensor.

#[cfg(test)]
mod helpers {
    use npc_core::{TargetId, TargetInfo, Vec3};
    use npc_spatial::{NavField, NavFieldBuilder};

    pub fn open() -> NavField {
        NavField::open(50.0)
    }

    /// Wall at x = 5 between the agent at the origin and anything beyond.
    pub fn walled() -> NavField {
        let mut b = NavFieldBuilder::new(Vec3::flat(-50.0, -50.0), Vec3::flat(50.0, 50.0));
        b.add_obstacle(Vec3::flat(4.5, -20.0), Vec3::flat(5.5, 20.0));
        b.build().unwrap()
    }

    pub fn target_at(x: f32, z: f32, speed: f32) -> TargetInfo {
        TargetInfo {
            id: TargetId(0),
            position: Vec3::flat(x, z),
            velocity: Vec3::flat(speed, 0.0),
            alive: true,
        }
    }

    /// Facing +X.
    pub const EAST: Vec3 = Vec3::flat(1.0, 0.0);
}

#[cfg(test)]
mod vision {
    use npc_core::Vec3;

    use super::helpers::{open, target_at, walled, EAST};
    use crate::{Sensor, SensorConfig};

    #[test]
    fn sees_target_in_cone() {
        let nav = open();
        let mut s = Sensor::new(SensorConfig::default()).unwrap();
        let t = target_at(10.0, 0.0, 0.0);
        s.update(Vec3::ZERO, EAST, Some(&t), &nav, 0.1);
        assert!(s.snapshot().can_see_target);
        assert_eq!(s.snapshot().last_known_position, Some(t.position));
        assert!((s.alertness() - 6.0).abs() < 1e-4);
    }

    #[test]
    fn target_behind_is_invisible() {
        let nav = open();
        let mut s = Sensor::new(SensorConfig::default()).unwrap();
        let t = target_at(-10.0, 0.0, 0.0);
        s.update(Vec3::ZERO, EAST, Some(&t), &nav, 0.1);
        assert!(!s.snapshot().can_see_target);
        assert_eq!(s.snapshot().last_known_position, None);
    }

    #[test]
    fn target_beyond_radius_is_invisible() {
        let nav = open();
        let mut s = Sensor::new(SensorConfig::default()).unwrap();
        let t = target_at(16.0, 0.0, 0.0);
        s.update(Vec3::ZERO, EAST, Some(&t), &nav, 0.1);
        assert!(!s.snapshot().can_see_target);
    }

    #[test]
    fn wall_blocks_sight() {
        let nav = walled();
        let mut s = Sensor::new(SensorConfig::default()).unwrap();
        let t = target_at(10.0, 0.0, 0.0);
        s.update(Vec3::ZERO, EAST, Some(&t), &nav, 0.1);
        assert!(!s.snapshot().can_see_target);
    }

    #[test]
    fn dead_target_is_ignored() {
        let nav = open();
        let mut s = Sensor::new(SensorConfig::default()).unwrap();
        let mut t = target_at(5.0, 0.0, 3.0);
        t.alive = false;
        s.update(Vec3::ZERO, EAST, Some(&t), &nav, 0.1);
        assert!(!s.snapshot().has_stimulus());
    }

    #[test]
    fn memory_is_evicted_after_timeout() {
        let nav = open();
        let cfg = SensorConfig { memory_duration_secs: 1.0, ..SensorConfig::default() };
        let mut s = Sensor::new(cfg).unwrap();
        let t = target_at(10.0, 0.0, 0.0);
        s.update(Vec3::ZERO, EAST, Some(&t), &nav, 0.1);
        for _ in 0..9 {
            s.update(Vec3::ZERO, EAST, None, &nav, 0.1);
        }
        assert!(s.snapshot().last_known_position.is_some(), "still within memory window");
        for _ in 0..3 {
            s.update(Vec3::ZERO, EAST, None, &nav, 0.1);
        }
        assert_eq!(s.snapshot().last_known_position, None);
        assert_eq!(s.snapshot().secs_since_sighting, None);
    }
}

#[cfg(test)]
mod hearing {
    use npc_core::Vec3;

    use super::helpers::{open, target_at, walled, EAST};
    use crate::{Sensor, SensorConfig};

    #[test]
    fn hears_fast_target_behind_wall() {
        let nav = walled();
        let mut s = Sensor::new(SensorConfig::default()).unwrap();
        let t = target_at(8.0, 0.0, 4.0);
        s.update(Vec3::ZERO, EAST, Some(&t), &nav, 0.1);
        assert!(!s.snapshot().can_see_target);
        assert!(s.snapshot().can_hear_target);
        assert_eq!(s.snapshot().last_sound.map(|m| m.position), Some(t.position));
        assert!((s.alertness() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn slow_target_is_silent() {
        let nav = open();
        let mut s = Sensor::new(SensorConfig::default()).unwrap();
        let t = target_at(-8.0, 0.0, 0.5);
        s.update(Vec3::ZERO, EAST, Some(&t), &nav, 0.1);
        assert!(!s.snapshot().can_hear_target);
    }

    #[test]
    fn sight_boosts_more_than_hearing() {
        let nav = open();
        let cfg = SensorConfig::default();
        assert!(cfg.sight_gain_per_sec > cfg.hearing_gain_per_sec);

        let mut seen = Sensor::new(cfg.clone()).unwrap();
        seen.update(Vec3::ZERO, EAST, Some(&target_at(8.0, 0.0, 0.0)), &nav, 0.1);
        let mut heard = Sensor::new(cfg).unwrap();
        heard.update(Vec3::ZERO, EAST, Some(&target_at(-8.0, 0.0, 3.0)), &nav, 0.1);
        assert!(seen.alertness() > heard.alertness());
    }

    #[test]
    fn registered_sound_attenuates_with_distance() {
        let mut near = Sensor::new(SensorConfig::default()).unwrap();
        let mut far = Sensor::new(SensorConfig::default()).unwrap();
        assert!(near.register_sound(Vec3::ZERO, Vec3::flat(2.0, 0.0), 50.0));
        assert!(far.register_sound(Vec3::ZERO, Vec3::flat(8.0, 0.0), 50.0));
        assert!((near.alertness() - 40.0).abs() < 1e-3);
        assert!((far.alertness() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn registered_sound_out_of_range_is_ignored() {
        let mut s = Sensor::new(SensorConfig::default()).unwrap();
        assert!(!s.register_sound(Vec3::ZERO, Vec3::flat(25.0, 0.0), 100.0));
        assert_eq!(s.alertness(), 0.0);
        assert!(s.snapshot().last_sound.is_none());
    }
}

#[cfg(test)]
mod alertness {
    use npc_core::Vec3;

    use super::helpers::{open, EAST};
    use crate::{Awareness, Sensor, SensorConfig};

    #[test]
    fn decays_to_zero_within_budget_and_never_below() {
        let nav = open();
        let cfg = SensorConfig { decay_per_sec: 10.0, ..SensorConfig::default() };
        let mut s = Sensor::new(cfg).unwrap();
        s.raise_alertness(50.0);

        // 50 / 10 = 5 s = 50 ticks of 0.1 s.
        let mut prev = s.alertness();
        for _ in 0..50 {
            s.update(Vec3::ZERO, EAST, None, &nav, 0.1);
            assert!(s.alertness() <= prev);
            assert!(s.alertness() >= 0.0);
            prev = s.alertness();
        }
        assert!(s.alertness() < 1e-3, "left {}", s.alertness());
        for _ in 0..20 {
            s.update(Vec3::ZERO, EAST, None, &nav, 0.1);
        }
        assert_eq!(s.alertness(), 0.0);
    }

    #[test]
    fn clamped_to_hundred() {
        let mut s = Sensor::new(SensorConfig::default()).unwrap();
        s.raise_alertness(80.0);
        s.raise_alertness(80.0);
        assert_eq!(s.alertness(), 100.0);
    }

    #[test]
    fn should_be_alert_gate() {
        let mut s = Sensor::new(SensorConfig::default()).unwrap();
        assert!(!s.should_be_alert());
        assert_eq!(s.awareness(), Awareness::Unaware);
        s.raise_alertness(30.0);
        assert_eq!(s.awareness(), Awareness::Suspicious);
        assert!(!s.should_be_alert());
        s.raise_alertness(30.0);
        assert!(s.should_be_alert());
        assert_eq!(s.awareness(), Awareness::Alerted);
    }

    #[test]
    fn restore_and_reset() {
        let mut s = Sensor::new(SensorConfig::default()).unwrap();
        s.restore(140.0, Some(Vec3::flat(3.0, 4.0)));
        assert_eq!(s.alertness(), 100.0);
        assert_eq!(s.snapshot().last_known_position, Some(Vec3::flat(3.0, 4.0)));
        s.reset();
        assert_eq!(s.snapshot(), &crate::SensorSnapshot::default());
    }
}

#[cfg(test)]
mod config {
    use crate::{Sensor, SensorConfig, SensorError};

    #[test]
    fn default_is_valid() {
        SensorConfig::default().validate().unwrap();
    }

    #[test]
    fn bad_radii_and_cone_rejected() {
        let bad = [
            SensorConfig { perception_radius: -1.0, ..SensorConfig::default() },
            SensorConfig { hearing_radius: f32::NAN, ..SensorConfig::default() },
            SensorConfig { fov_degrees: f32::NAN, ..SensorConfig::default() },
            SensorConfig { fov_degrees: 0.0, ..SensorConfig::default() },
            SensorConfig { decay_per_sec: f32::INFINITY, ..SensorConfig::default() },
            SensorConfig { alert_threshold: 120.0, ..SensorConfig::default() },
        ];
        for cfg in bad {
            assert!(matches!(Sensor::new(cfg), Err(SensorError::InvalidConfig(_))));
        }
    }

    #[test]
    fn zero_hearing_is_allowed() {
        let cfg = SensorConfig { hearing_radius: 0.0, ..SensorConfig::default() };
        assert!(Sensor::new(cfg).is_ok());
    }
}

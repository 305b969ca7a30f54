//! Per-archetype numeric parameters and the subsystem configs derived
//! from them.

use npc_core::Archetype;
use npc_engagement::{EngagementConfig, Temperament};
use npc_locomotion::LocomotionConfig;
use npc_sensor::SensorConfig;

use crate::{AgentError, AgentResult, Gait};

/// Everything that distinguishes one archetype from another.
///
/// Personality values (`aggression`, `intelligence`, `morale`) are on a
/// 0–100 scale.  Speeds in m/s, times in seconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArchetypeParams {
    pub archetype: Archetype,

    pub walk_speed: f32,
    pub run_speed: f32,

    pub max_health: f32,
    pub max_stamina: f32,
    pub stamina_drain_per_sec: f32,
    pub stamina_regen_per_sec: f32,

    pub perception_radius: f32,
    pub fov_degrees: f32,
    pub hearing_radius: f32,

    pub aggression: f32,
    pub intelligence: f32,
    pub morale: f32,

    /// Attacks per second.
    pub attack_frequency: f32,
    pub attack_range: f32,
    pub attack_damage: f32,
    /// Health fraction below which hits trigger a flee roll.
    pub flee_health_fraction: f32,

    /// Minimum time between decision tree passes.
    pub behavior_interval_secs: f32,
    /// Minimum time between two alarms or backup calls raised by one agent.
    pub alarm_cooldown_secs: f32,
}

impl ArchetypeParams {
    /// Built-in tuning for `archetype`.
    pub fn for_archetype(archetype: Archetype) -> Self {
        let base = Self {
            archetype,
            walk_speed: 1.6,
            run_speed: 4.0,
            max_health: 100.0,
            max_stamina: 100.0,
            stamina_drain_per_sec: 15.0,
            stamina_regen_per_sec: 10.0,
            perception_radius: 15.0,
            fov_degrees: 110.0,
            hearing_radius: 10.0,
            aggression: 60.0,
            intelligence: 50.0,
            morale: 50.0,
            attack_frequency: 0.8,
            attack_range: 2.0,
            attack_damage: 12.0,
            flee_health_fraction: 0.3,
            behavior_interval_secs: 0.2,
            alarm_cooldown_secs: 10.0,
        };
        match archetype {
            Archetype::Grunt => base,
            Archetype::Scout => Self {
                walk_speed: 2.0,
                run_speed: 5.5,
                max_health: 60.0,
                max_stamina: 120.0,
                stamina_drain_per_sec: 12.0,
                stamina_regen_per_sec: 14.0,
                perception_radius: 22.0,
                fov_degrees: 130.0,
                hearing_radius: 14.0,
                aggression: 25.0,
                intelligence: 75.0,
                morale: 30.0,
                attack_frequency: 1.0,
                attack_range: 1.8,
                attack_damage: 6.0,
                flee_health_fraction: 0.5,
                behavior_interval_secs: 0.15,
                alarm_cooldown_secs: 6.0,
                ..base
            },
            Archetype::Brute => Self {
                walk_speed: 1.2,
                run_speed: 3.0,
                max_health: 200.0,
                max_stamina: 80.0,
                stamina_drain_per_sec: 20.0,
                stamina_regen_per_sec: 8.0,
                perception_radius: 12.0,
                fov_degrees: 90.0,
                hearing_radius: 8.0,
                aggression: 90.0,
                intelligence: 30.0,
                morale: 85.0,
                attack_frequency: 0.5,
                attack_range: 2.5,
                attack_damage: 25.0,
                flee_health_fraction: 0.15,
                behavior_interval_secs: 0.25,
                ..base
            },
            Archetype::Sentry => Self {
                walk_speed: 1.4,
                run_speed: 3.5,
                max_health: 90.0,
                max_stamina: 80.0,
                perception_radius: 28.0,
                fov_degrees: 80.0,
                hearing_radius: 12.0,
                aggression: 45.0,
                intelligence: 65.0,
                morale: 60.0,
                attack_frequency: 0.7,
                attack_damage: 10.0,
                alarm_cooldown_secs: 8.0,
                ..base
            },
        }
    }

    pub fn validate(&self) -> AgentResult<()> {
        let fail = |reason: &str| {
            Err(AgentError::InvalidParams { archetype: self.archetype, reason: reason.to_string() })
        };
        if !(self.walk_speed > 0.0 && self.run_speed >= self.walk_speed) {
            return fail("speeds must satisfy 0 < walk_speed <= run_speed");
        }
        if !(self.max_health > 0.0 && self.max_stamina >= 0.0) {
            return fail("max_health must be > 0 and max_stamina >= 0");
        }
        if self.stamina_drain_per_sec < 0.0 || self.stamina_regen_per_sec < 0.0 {
            return fail("stamina rates must be >= 0");
        }
        let personality = [self.aggression, self.intelligence, self.morale];
        if personality.iter().any(|v| !(0.0..=100.0).contains(v)) {
            return fail("aggression, intelligence and morale must be in [0, 100]");
        }
        if self.perception_radius < 0.0 || self.hearing_radius < 0.0 {
            return fail("perception and hearing radii must be >= 0");
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees <= 360.0) {
            return fail("fov_degrees must be in (0, 360]");
        }
        if self.behavior_interval_secs <= 0.0 {
            return fail("behavior_interval_secs must be > 0");
        }
        Ok(())
    }

    #[inline]
    pub fn speed(&self, gait: Gait) -> f32 {
        match gait {
            Gait::Walk => self.walk_speed,
            Gait::Run => self.run_speed,
        }
    }

    pub fn temperament(&self) -> Temperament {
        Temperament { morale: self.morale, intelligence: self.intelligence }
    }

    pub fn sensor_config(&self) -> SensorConfig {
        SensorConfig {
            perception_radius: self.perception_radius,
            fov_degrees: self.fov_degrees,
            hearing_radius: self.hearing_radius,
            ..SensorConfig::default()
        }
    }

    pub fn locomotion_config(&self) -> LocomotionConfig {
        LocomotionConfig::default()
    }

    pub fn engagement_config(&self) -> AgentResult<EngagementConfig> {
        let config = EngagementConfig {
            attack_range: self.attack_range,
            attack_damage: self.attack_damage,
            low_health_fraction: self.flee_health_fraction,
            ..EngagementConfig::with_attack_frequency(self.attack_frequency)?
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for ArchetypeParams {
    fn default() -> Self {
        Self::for_archetype(Archetype::default())
    }
}

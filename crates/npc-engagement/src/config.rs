use crate::{EngagementError, EngagementResult};

/// Combat tuning.  Times in seconds, distances in metres.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngagementConfig {
    pub attack_cooldown_secs: f32,
    pub attack_range: f32,
    pub attack_damage: f32,
    /// Delay between starting an attack and the hit landing.
    pub windup_secs: f32,
    /// Below `max_health * low_health_fraction` every hit triggers a flee roll.
    pub low_health_fraction: f32,
    pub dodge_cooldown_secs: f32,
    /// Dodge probability for an agent of intelligence 50.
    pub dodge_base_chance: f32,
    pub dodge_distance: f32,
    /// How long the dodging flag blocks another dodge.
    pub dodge_duration_secs: f32,
    pub knockback_per_damage: f32,
    pub max_knockback: f32,
    /// A single hit of at least `max_health * stun_damage_fraction` stuns.
    pub stun_damage_fraction: f32,
    pub stun_secs: f32,
}

impl EngagementConfig {
    /// Default tuning with the cooldown derived from attacks per second.
    pub fn with_attack_frequency(attacks_per_sec: f32) -> EngagementResult<Self> {
        if !(attacks_per_sec > 0.0 && attacks_per_sec.is_finite()) {
            return Err(EngagementError::InvalidConfig(format!(
                "attack frequency must be > 0, got {attacks_per_sec}"
            )));
        }
        Ok(Self { attack_cooldown_secs: 1.0 / attacks_per_sec, ..Self::default() })
    }

    pub fn validate(&self) -> EngagementResult<()> {
        if !(0.0..=1.0).contains(&self.low_health_fraction) {
            return Err(EngagementError::InvalidConfig("low_health_fraction must be in [0, 1]".into()));
        }
        if !(0.0..=1.0).contains(&self.dodge_base_chance) {
            return Err(EngagementError::InvalidConfig("dodge_base_chance must be in [0, 1]".into()));
        }
        if self.attack_range <= 0.0 || self.attack_cooldown_secs < 0.0 || self.windup_secs < 0.0 {
            return Err(EngagementError::InvalidConfig(
                "attack range must be > 0 and timers >= 0".into(),
            ));
        }
        Ok(())
    }
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            attack_cooldown_secs: 1.25,
            attack_range: 2.0,
            attack_damage: 12.0,
            windup_secs: 0.35,
            low_health_fraction: 0.3,
            dodge_cooldown_secs: 3.0,
            dodge_base_chance: 0.3,
            dodge_distance: 1.5,
            dodge_duration_secs: 0.4,
            knockback_per_damage: 0.05,
            max_knockback: 1.5,
            stun_damage_fraction: 0.25,
            stun_secs: 1.0,
        }
    }
}

use crate::{GroupError, GroupResult};

/// How members react to an ally going down.  Shared by groups and the bus.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReactionConfig {
    /// Members with intelligence strictly above this notice a fallen ally.
    pub ally_down_intelligence_threshold: f32,
    /// Alertness added when they do.
    pub ally_down_alertness: f32,
}

impl Default for ReactionConfig {
    fn default() -> Self {
        Self { ally_down_intelligence_threshold: 40.0, ally_down_alertness: 30.0 }
    }
}

/// Group tuning.  Distances in metres, rates per second, morale 0–100.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupConfig {
    /// Members further than this from an event do not hear about it.
    pub communication_range: f32,
    /// Minimum living members for a coordinated attack.
    pub min_size: usize,
    pub max_size: usize,
    /// Seconds an event stays in the group's log.
    pub event_ttl_secs: f32,
    pub morale_loss_per_casualty: f32,
    pub morale_recovery_per_sec: f32,
    /// Morale below this breaks the group.
    pub break_threshold: f32,
    /// A broken group turns cohesive again at or above this morale.
    pub rally_threshold: f32,
    /// Radius of the ring members take around a target when flanking.
    pub flank_distance: f32,
    /// Search radius when snapping tactical positions onto the nav surface.
    pub snap_radius: f32,
    /// How far from the threat a broken group falls back.
    pub retreat_distance: f32,
    /// Agents join an existing group only within this distance of it.
    pub assignment_radius: f32,
    pub reactions: ReactionConfig,
}

impl GroupConfig {
    pub fn validate(&self) -> GroupResult<()> {
        if self.max_size == 0 || self.min_size > self.max_size {
            return Err(GroupError::InvalidConfig("need 0 < max_size and min_size <= max_size".into()));
        }
        if !(0.0..=100.0).contains(&self.break_threshold) || self.rally_threshold < self.break_threshold {
            return Err(GroupError::InvalidConfig(
                "break_threshold must be in [0, 100] and not above rally_threshold".into(),
            ));
        }
        if self.communication_range < 0.0 || self.event_ttl_secs < 0.0 || self.morale_recovery_per_sec < 0.0 {
            return Err(GroupError::InvalidConfig("ranges, ttl and rates must be >= 0".into()));
        }
        Ok(())
    }
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            communication_range: 20.0,
            min_size: 2,
            max_size: 6,
            event_ttl_secs: 10.0,
            morale_loss_per_casualty: 20.0,
            morale_recovery_per_sec: 5.0,
            break_threshold: 25.0,
            rally_threshold: 60.0,
            flank_distance: 4.0,
            snap_radius: 2.0,
            retreat_distance: 15.0,
            assignment_radius: 15.0,
            reactions: ReactionConfig::default(),
        }
    }
}

/// Simulation-wide alert bus tuning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlertBusConfig {
    pub global_range: f32,
    pub event_ttl_secs: f32,
    pub reactions: ReactionConfig,
}

impl Default for AlertBusConfig {
    fn default() -> Self {
        Self { global_range: 40.0, event_ttl_secs: 10.0, reactions: ReactionConfig::default() }
    }
}

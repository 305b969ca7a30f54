//! Per-agent perception result.

use npc_core::Vec3;

/// Upper bound of the alertness scale.
pub const MAX_ALERTNESS: f32 = 100.0;

/// A remembered sound.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoundMemory {
    pub position: Vec3,
    /// Intensity as perceived at the listener (after attenuation).
    pub intensity: f32,
    /// Seconds since the sound was heard.
    pub age_secs: f32,
}

/// Coarse awareness band derived from alertness.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Awareness {
    Unaware,
    Suspicious,
    Alerted,
}

/// What an agent knows right now.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorSnapshot {
    pub can_see_target: bool,
    pub can_hear_target: bool,
    /// Cleared once `secs_since_sighting` exceeds the memory duration.
    pub last_known_position: Option<Vec3>,
    /// `None` until the first sighting and again after eviction.
    pub secs_since_sighting: Option<f32>,
    /// 0–100.
    pub alertness: f32,
    pub last_sound: Option<SoundMemory>,
}

impl SensorSnapshot {
    /// Either raw stimulus is active this tick.
    #[inline]
    pub fn has_stimulus(&self) -> bool {
        self.can_see_target || self.can_hear_target
    }
}

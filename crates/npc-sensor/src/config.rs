use crate::{SensorError, SensorResult, MAX_ALERTNESS};

/// Perception tuning for one agent.  Rates are per second.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorConfig {
    /// Maximum sight distance in metres.
    pub perception_radius: f32,
    /// Full width of the vision cone in degrees.
    pub fov_degrees: f32,
    /// Height of the eyes above the agent's feet, used for sight lines.
    pub eye_height: f32,
    pub hearing_radius: f32,
    /// Target speed (m/s) above which its movement is audible.
    pub motion_velocity_threshold: f32,
    pub sight_gain_per_sec: f32,
    /// Smaller than the sight gain: hearing alone builds suspicion slowly.
    pub hearing_gain_per_sec: f32,
    pub decay_per_sec: f32,
    /// Seconds after the last sighting before the last-known position is
    /// forgotten.
    pub memory_duration_secs: f32,
    /// Seconds before a heard sound is forgotten.
    pub sound_memory_secs: f32,
    /// Alertness added per unit of attenuated injected sound intensity.
    pub sound_alertness_scale: f32,
    /// `should_be_alert` threshold.
    pub alert_threshold: f32,
    /// Lower bound of the "suspicious" band.
    pub suspicious_threshold: f32,
}

impl SensorConfig {
    /// Radii and rates must be finite and non-negative; the vision cone is
    /// in (0, 360] degrees; thresholds are on the alertness scale.
    pub fn validate(&self) -> SensorResult<()> {
        let non_negative = [
            ("perception_radius", self.perception_radius),
            ("eye_height", self.eye_height),
            ("hearing_radius", self.hearing_radius),
            ("motion_velocity_threshold", self.motion_velocity_threshold),
            ("sight_gain_per_sec", self.sight_gain_per_sec),
            ("hearing_gain_per_sec", self.hearing_gain_per_sec),
            ("decay_per_sec", self.decay_per_sec),
            ("memory_duration_secs", self.memory_duration_secs),
            ("sound_memory_secs", self.sound_memory_secs),
            ("sound_alertness_scale", self.sound_alertness_scale),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(SensorError::InvalidConfig(format!("{name} must be >= 0, got {value}")));
            }
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees <= 360.0) {
            return Err(SensorError::InvalidConfig(format!(
                "fov_degrees must be in (0, 360], got {}",
                self.fov_degrees
            )));
        }
        let scale = 0.0..=MAX_ALERTNESS;
        if !scale.contains(&self.suspicious_threshold) || !scale.contains(&self.alert_threshold) {
            return Err(SensorError::InvalidConfig(format!("thresholds must be in [0, {MAX_ALERTNESS}]")));
        }
        Ok(())
    }

    /// Half-angle of the vision cone in radians.
    #[inline]
    pub fn half_fov_radians(&self) -> f32 {
        (self.fov_degrees * 0.5).to_radians()
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            perception_radius: 15.0,
            fov_degrees: 110.0,
            eye_height: 1.6,
            hearing_radius: 10.0,
            motion_velocity_threshold: 1.5,
            sight_gain_per_sec: 60.0,
            hearing_gain_per_sec: 20.0,
            decay_per_sec: 10.0,
            memory_duration_secs: 8.0,
            sound_memory_secs: 10.0,
            sound_alertness_scale: 1.0,
            alert_threshold: 50.0,
            suspicious_threshold: 20.0,
        }
    }
}

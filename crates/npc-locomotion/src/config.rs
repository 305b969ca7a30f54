use crate::{LocomotionError, LocomotionResult};

/// Locomotion tuning.  Distances in metres, times in seconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocomotionConfig {
    /// Seconds between path requests while a target is set.
    pub repath_interval_secs: f32,
    /// Within this distance of the target the agent has arrived.
    pub arrive_distance: f32,
    /// A new target closer than this to the current one keeps the path.
    pub retarget_tolerance: f32,
    /// Per-tick displacement below which the agent counts as not moving.
    pub stuck_displacement: f32,
    /// Seconds of no movement before the agent is flagged stuck.
    pub stuck_duration_secs: f32,
    /// Length of the forward escape probe.
    pub forward_probe_distance: f32,
    /// Radius of the circle of radial escape probes.
    pub radial_probe_distance: f32,
    /// Search radius when snapping probes and nudges onto the surface.
    pub probe_snap_radius: f32,
    /// Seconds spent at each patrol point.
    pub patrol_dwell_secs: f32,
}

impl LocomotionConfig {
    pub fn validate(&self) -> LocomotionResult<()> {
        let positive = [
            ("repath_interval_secs", self.repath_interval_secs),
            ("arrive_distance", self.arrive_distance),
            ("stuck_duration_secs", self.stuck_duration_secs),
            ("forward_probe_distance", self.forward_probe_distance),
            ("radial_probe_distance", self.radial_probe_distance),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(LocomotionError::InvalidConfig(format!("{name} must be > 0, got {value}")));
            }
        }
        if self.patrol_dwell_secs < 0.0 {
            return Err(LocomotionError::InvalidConfig("patrol_dwell_secs must be >= 0".into()));
        }
        Ok(())
    }
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            repath_interval_secs: 0.5,
            arrive_distance: 0.4,
            retarget_tolerance: 0.25,
            stuck_displacement: 0.01,
            stuck_duration_secs: 1.5,
            forward_probe_distance: 1.5,
            radial_probe_distance: 2.0,
            probe_snap_radius: 0.75,
            patrol_dwell_secs: 2.0,
        }
    }
}

//! Per-agent locomotion state.

use npc_core::Vec3;

/// Fixed, looping sequence of patrol points.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatrolRoute {
    pub points: Vec<Vec3>,
    /// Index of the point currently being walked to or dwelt at.
    pub current: usize,
    /// Seconds spent at the current point so far.
    pub dwell_timer: f32,
}

impl PatrolRoute {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points, current: 0, dwell_timer: 0.0 }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn current_point(&self) -> Option<Vec3> {
        self.points.get(self.current).copied()
    }

    /// Move to the next point, wrapping to the first after the last.
    /// Returns the new index.
    pub fn advance(&mut self) -> usize {
        if !self.points.is_empty() {
            self.current = (self.current + 1) % self.points.len();
        }
        self.dwell_timer = 0.0;
        self.current
    }

    /// Accumulate dwell time; `true` once `dwell_secs` have passed.
    pub fn tick_dwell(&mut self, dt: f32, dwell_secs: f32) -> bool {
        self.dwell_timer += dt;
        self.dwell_timer >= dwell_secs
    }
}

/// Movement intent and health of the path follower.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocomotionState {
    /// Current destination; `None` while standing.
    pub target: Option<Vec3>,
    /// `false` after the last path request failed.
    pub path_valid: bool,
    pub stuck: bool,
    /// Seconds of accumulated non-movement toward the target.
    pub stuck_secs: f32,
    pub patrol: PatrolRoute,
}

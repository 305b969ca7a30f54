//! Stuck recovery probes.
//!
//! Escalation order per attempt:
//!
//! 1. one probe straight ahead at `forward_probe_distance`;
//! 2. [`RADIAL_PROBES`] probes around a circle of `radial_probe_distance`,
//!    at 45°, 90°, … 360° from the facing direction;
//! 3. give up until the next attempt.
//!
//! A probe succeeds when the provider snaps it to a walkable point that is
//! actually away from the current position.

use std::f32::consts::TAU;

use npc_core::Vec3;
use npc_spatial::NavQuery;

use crate::LocomotionConfig;

pub const RADIAL_PROBES: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RecoveryOutcome {
    /// Escaped with the forward probe.
    Forward(Vec3),
    /// Escaped with radial probe `attempt` (1-based).
    Radial { attempt: usize, point: Vec3 },
    /// Every probe failed; retry after another stuck interval.
    Exhausted,
}

impl RecoveryOutcome {
    pub fn point(self) -> Option<Vec3> {
        match self {
            RecoveryOutcome::Forward(p) | RecoveryOutcome::Radial { point: p, .. } => Some(p),
            RecoveryOutcome::Exhausted => None,
        }
    }
}

fn probe(nav: &dyn NavQuery, from: Vec3, candidate: Vec3, cfg: &LocomotionConfig) -> Option<Vec3> {
    nav.nearest_navigable(candidate, cfg.probe_snap_radius)
        .filter(|p| p.distance_xz(from) > cfg.stuck_displacement)
}

/// Run one bounded recovery attempt from `position`.
pub fn attempt_recovery(
    nav: &dyn NavQuery,
    position: Vec3,
    facing: Vec3,
    cfg: &LocomotionConfig,
) -> RecoveryOutcome {
    let forward = match facing.flatten() {
        f if f == Vec3::ZERO => Vec3::FORWARD,
        f => f,
    };

    if let Some(p) = probe(nav, position, position + forward * cfg.forward_probe_distance, cfg) {
        return RecoveryOutcome::Forward(p);
    }

    for attempt in 1..=RADIAL_PROBES {
        let dir = forward.rotate_y(attempt as f32 * TAU / RADIAL_PROBES as f32);
        if let Some(p) = probe(nav, position, position + dir * cfg.radial_probe_distance, cfg) {
            return RecoveryOutcome::Radial { attempt, point: p };
        }
    }

    RecoveryOutcome::Exhausted
}

//! The per-agent path follower.

use npc_core::Vec3;
use npc_spatial::{NavPath, NavQuery};

use crate::recovery::{attempt_recovery, RecoveryOutcome};
use crate::{LocomotionConfig, LocomotionError, LocomotionResult, LocomotionState, PatrolRoute};

/// Owns an agent's destination, cached path and stuck bookkeeping.
///
/// The agent's position and facing live on the agent; [`update`](Self::update)
/// borrows them mutably for the duration of the step.
pub struct Locomotion {
    config: LocomotionConfig,
    state: LocomotionState,
    path: Option<NavPath>,
    /// Index into `path.points` of the next corner to walk to.
    next_corner: usize,
    speed: f32,
    repath_timer: f32,
    last_position: Option<Vec3>,
    pending_nudge: Vec3,
    arrived: bool,
    stuck_events: u32,
    last_recovery: Option<RecoveryOutcome>,
}

impl Locomotion {
    pub fn new(config: LocomotionConfig) -> LocomotionResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: LocomotionState::default(),
            path: None,
            next_corner: 0,
            speed: 0.0,
            repath_timer: 0.0,
            last_position: None,
            pending_nudge: Vec3::ZERO,
            arrived: false,
            stuck_events: 0,
            last_recovery: None,
        })
    }

    pub fn with_patrol(mut self, points: Vec<Vec3>) -> Self {
        self.state.patrol = PatrolRoute::new(points);
        self
    }

    /// Fail if a patrol behavior is about to be driven by an empty route.
    pub fn require_patrol(&self) -> LocomotionResult<()> {
        if self.state.patrol.is_empty() {
            Err(LocomotionError::EmptyPatrolRoute)
        } else {
            Ok(())
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn state(&self) -> &LocomotionState {
        &self.state
    }

    pub fn patrol(&self) -> &PatrolRoute {
        &self.state.patrol
    }

    pub fn patrol_mut(&mut self) -> &mut PatrolRoute {
        &mut self.state.patrol
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn path(&self) -> Option<&NavPath> {
        self.path.as_ref()
    }

    pub fn is_moving(&self) -> bool {
        self.state.target.is_some() && self.speed > 0.0
    }

    /// `true` from the tick the destination is reached until the next
    /// `move_to_target` or `stop`.
    pub fn has_arrived(&self) -> bool {
        self.arrived
    }

    pub fn is_stuck(&self) -> bool {
        self.state.stuck
    }

    /// Number of distinct freezes detected so far.
    pub fn stuck_events(&self) -> u32 {
        self.stuck_events
    }

    pub fn last_recovery(&self) -> Option<RecoveryOutcome> {
        self.last_recovery
    }

    // ── Commands ──────────────────────────────────────────────────────────

    /// Head for `target` at `speed` m/s.
    ///
    /// Re-issuing (nearly) the same target only updates the speed, so an
    /// action can call this every behavior tick without thrashing paths.
    pub fn move_to_target(&mut self, target: Vec3, speed: f32) {
        self.speed = speed.max(0.0);
        let same = self
            .state
            .target
            .is_some_and(|t| t.distance_xz(target) <= self.config.retarget_tolerance);
        if same {
            return;
        }
        self.state.target = Some(target);
        self.path = None;
        self.next_corner = 0;
        self.repath_timer = 0.0;
        self.arrived = false;
        self.clear_stuck();
    }

    pub fn stop(&mut self) {
        self.state.target = None;
        self.state.path_valid = false;
        self.path = None;
        self.next_corner = 0;
        self.speed = 0.0;
        self.arrived = false;
        self.clear_stuck();
    }

    /// Queue an instant displacement (knockback, dodge).  Applied at the
    /// start of the next update, snapped onto the navigable surface.
    pub fn nudge(&mut self, offset: Vec3) {
        self.pending_nudge += offset;
    }

    /// Drop all movement and transient bookkeeping.  The patrol route and
    /// its index survive.
    pub fn reset(&mut self) {
        self.stop();
        self.pending_nudge = Vec3::ZERO;
        self.last_position = None;
        self.last_recovery = None;
        self.state.patrol.dwell_timer = 0.0;
    }

    fn clear_stuck(&mut self) {
        self.state.stuck = false;
        self.state.stuck_secs = 0.0;
    }

    // ── Per-tick update ───────────────────────────────────────────────────

    pub fn update(&mut self, position: &mut Vec3, facing: &mut Vec3, nav: &dyn NavQuery, dt: f32) {
        if self.pending_nudge != Vec3::ZERO {
            let candidate = *position + self.pending_nudge;
            if let Some(p) = nav.nearest_navigable(candidate, self.config.probe_snap_radius) {
                *position = p;
            }
            self.pending_nudge = Vec3::ZERO;
        }

        let Some(target) = self.state.target else {
            self.clear_stuck();
            self.last_position = Some(*position);
            return;
        };

        // ── Periodic path request ────────────────────────────────────────
        self.repath_timer -= dt;
        if self.repath_timer <= 0.0 {
            self.repath_timer = self.config.repath_interval_secs;
            match nav.find_path(*position, target) {
                Ok(path) => {
                    self.path = Some(path);
                    self.next_corner = 1;
                    self.state.path_valid = true;
                }
                Err(e) => {
                    tracing::debug!(%target, error = %e, "path request failed");
                    self.path = None;
                    self.state.path_valid = false;
                }
            }
        }

        // ── Follow ───────────────────────────────────────────────────────
        if let Some(path) = &self.path {
            let mut budget = self.speed * dt;
            while budget > 0.0 && self.next_corner < path.points.len() {
                let corner = path.points[self.next_corner];
                let gap = position.distance_xz(corner);
                let (step_to, reached) = if gap <= budget {
                    (corner, true)
                } else {
                    (position.move_towards(corner, budget), false)
                };
                if !nav.line_of_sight(*position, step_to) {
                    break;
                }
                let heading = (step_to - *position).flatten();
                if heading != Vec3::ZERO {
                    *facing = heading;
                }
                budget -= position.distance_xz(step_to);
                *position = step_to;
                if reached {
                    self.next_corner += 1;
                } else {
                    break;
                }
            }
        }

        // ── Arrival ──────────────────────────────────────────────────────
        if position.distance_xz(target) <= self.config.arrive_distance {
            self.state.target = None;
            self.path = None;
            self.arrived = true;
            self.clear_stuck();
            self.last_position = Some(*position);
            return;
        }

        // ── Stuck detection ──────────────────────────────────────────────
        let moved = self
            .last_position
            .map_or(f32::INFINITY, |last| last.distance_xz(*position));
        if moved < self.config.stuck_displacement {
            self.state.stuck_secs += dt;
        } else {
            self.clear_stuck();
        }

        if self.state.stuck_secs >= self.config.stuck_duration_secs {
            if !self.state.stuck {
                self.state.stuck = true;
                self.stuck_events += 1;
                tracing::warn!(position = %*position, %target, "agent stuck");
            }
            let before = *position;
            let outcome = attempt_recovery(nav, before, *facing, &self.config);
            match outcome.point() {
                Some(p) => {
                    *position = p;
                    self.repath_timer = 0.0;
                }
                None => tracing::debug!(position = %before, "stuck recovery exhausted"),
            }
            self.last_recovery = Some(outcome);
            self.state.stuck_secs = 0.0;
            // Next displacement is measured from before the warp.
            self.last_position = Some(before);
            return;
        }

        self.last_position = Some(*position);
    }

    /// Horizontal distance still to cover, if a target is set.
    pub fn remaining_distance(&self, position: Vec3) -> Option<f32> {
        self.state.target.map(|t| position.distance_xz(t))
    }
}

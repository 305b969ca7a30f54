//! The per-agent sensor.

use npc_core::{TargetInfo, Vec3};
use npc_spatial::NavQuery;

use crate::snapshot::MAX_ALERTNESS;
use crate::{Awareness, SensorConfig, SensorResult, SensorSnapshot, SoundMemory};

pub struct Sensor {
    config: SensorConfig,
    snapshot: SensorSnapshot,
}

impl Sensor {
    pub fn new(config: SensorConfig) -> SensorResult<Self> {
        config.validate()?;
        Ok(Self { config, snapshot: SensorSnapshot::default() })
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &SensorSnapshot {
        &self.snapshot
    }

    #[inline]
    pub fn alertness(&self) -> f32 {
        self.snapshot.alertness
    }

    /// One perception pass.
    ///
    /// `position` is the agent's feet, `facing` its forward direction.  A
    /// dead or missing target produces no stimulus; memory still ages.
    pub fn update(
        &mut self,
        position: Vec3,
        facing: Vec3,
        target: Option<&TargetInfo>,
        nav: &dyn NavQuery,
        dt: f32,
    ) {
        let cfg = &self.config;
        let snap = &mut self.snapshot;
        snap.can_see_target = false;
        snap.can_hear_target = false;

        if let Some(t) = target.filter(|t| t.alive) {
            // ── Vision ───────────────────────────────────────────────────
            let to_target = t.position - position;
            let distance = to_target.length_xz();
            let in_cone = distance <= f32::EPSILON
                || facing.angle_xz(to_target) <= cfg.half_fov_radians();
            if distance <= cfg.perception_radius && in_cone {
                let lift = Vec3::new(0.0, cfg.eye_height, 0.0);
                if nav.line_of_sight(position + lift, t.position + lift) {
                    snap.can_see_target = true;
                    snap.last_known_position = Some(t.position);
                    snap.secs_since_sighting = Some(0.0);
                    snap.alertness += cfg.sight_gain_per_sec * dt;
                }
            }

            // ── Hearing ──────────────────────────────────────────────────
            let speed = t.speed();
            if distance <= cfg.hearing_radius && speed > cfg.motion_velocity_threshold {
                snap.can_hear_target = true;
                snap.last_sound = Some(SoundMemory {
                    position: t.position,
                    intensity: speed,
                    age_secs: 0.0,
                });
                snap.alertness += cfg.hearing_gain_per_sec * dt;
            }
        }

        // ── Decay ────────────────────────────────────────────────────────
        if !snap.has_stimulus() {
            snap.alertness -= cfg.decay_per_sec * dt;
        }
        snap.alertness = snap.alertness.clamp(0.0, MAX_ALERTNESS);

        // ── Memory eviction ──────────────────────────────────────────────
        if !snap.can_see_target {
            if let Some(secs) = snap.secs_since_sighting.as_mut() {
                *secs += dt;
                if *secs > cfg.memory_duration_secs {
                    tracing::debug!(last_known = ?snap.last_known_position, "last known position forgotten");
                    snap.secs_since_sighting = None;
                    snap.last_known_position = None;
                }
            }
        }
        if !snap.can_hear_target {
            if let Some(sound) = snap.last_sound.as_mut() {
                sound.age_secs += dt;
                if sound.age_secs > cfg.sound_memory_secs {
                    tracing::trace!(source = %sound.position, "sound forgotten");
                    snap.last_sound = None;
                }
            }
        }
    }

    /// Inject a sound heard at `listener`.  Intensity falls off linearly to
    /// zero at the hearing radius; alertness rises in proportion.
    ///
    /// Returns `false` if the source is out of earshot.
    pub fn register_sound(&mut self, listener: Vec3, source: Vec3, intensity: f32) -> bool {
        let radius = self.config.hearing_radius;
        let distance = listener.distance_xz(source);
        if radius <= 0.0 || distance > radius || intensity <= 0.0 {
            tracing::debug!(%source, distance, intensity, "sound out of earshot");
            return false;
        }
        let perceived = intensity * (1.0 - distance / radius);
        self.raise_alertness(perceived * self.config.sound_alertness_scale);
        self.snapshot.last_sound = Some(SoundMemory {
            position: source,
            intensity: perceived,
            age_secs: 0.0,
        });
        true
    }

    /// Direct boost used for ally-down reactions and when the agent is hit.
    pub fn raise_alertness(&mut self, amount: f32) {
        self.snapshot.alertness = (self.snapshot.alertness + amount).clamp(0.0, MAX_ALERTNESS);
    }

    /// Point the agent's memory at `position` as if it had just seen the
    /// target there.
    pub fn remember_target_at(&mut self, position: Vec3) {
        self.snapshot.last_known_position = Some(position);
        self.snapshot.secs_since_sighting = Some(0.0);
    }

    /// The gate most conditions query.
    pub fn should_be_alert(&self) -> bool {
        self.snapshot.alertness > self.config.alert_threshold || self.snapshot.has_stimulus()
    }

    pub fn awareness(&self) -> Awareness {
        let a = self.snapshot.alertness;
        if a > self.config.alert_threshold {
            Awareness::Alerted
        } else if a > self.config.suspicious_threshold {
            Awareness::Suspicious
        } else {
            Awareness::Unaware
        }
    }

    pub fn forget_sound(&mut self) {
        self.snapshot.last_sound = None;
    }

    pub fn forget_target(&mut self) {
        self.snapshot.last_known_position = None;
        self.snapshot.secs_since_sighting = None;
    }

    /// Re-seed persisted perception fields.
    pub fn restore(&mut self, alertness: f32, last_known_position: Option<Vec3>) {
        self.snapshot = SensorSnapshot {
            alertness: alertness.clamp(0.0, MAX_ALERTNESS),
            secs_since_sighting: last_known_position.map(|_| 0.0),
            last_known_position,
            ..SensorSnapshot::default()
        };
    }

    pub fn reset(&mut self) {
        self.snapshot = SensorSnapshot::default();
    }
}

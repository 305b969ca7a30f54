//! Per-agent combat state machine.

use npc_core::{AgentRng, TargetId, TargetInfo, Vec3};

use crate::{DamageOutcome, EngagementConfig, EngagementResult, EngagementState, Hit, PendingHit, Temperament};

pub struct Engagement {
    config: EngagementConfig,
    state: EngagementState,
    pending: Option<PendingHit>,
}

impl Engagement {
    pub fn new(config: EngagementConfig) -> EngagementResult<Self> {
        config.validate()?;
        Ok(Self { config, state: EngagementState::default(), pending: None })
    }

    pub fn config(&self) -> &EngagementConfig {
        &self.config
    }

    pub fn state(&self) -> &EngagementState {
        &self.state
    }

    pub fn target(&self) -> Option<TargetId> {
        self.state.target
    }

    pub fn pending_hit(&self) -> Option<&PendingHit> {
        self.pending.as_ref()
    }

    #[inline]
    pub fn is_stunned(&self) -> bool {
        self.state.stun_timer > 0.0
    }

    #[inline]
    pub fn is_dodging(&self) -> bool {
        self.state.dodging_timer > 0.0
    }

    #[inline]
    pub fn attack_ready(&self) -> bool {
        self.state.attack_ready
    }

    pub fn in_range(&self, position: Vec3, target: Vec3) -> bool {
        position.distance_xz(target) <= self.config.attack_range
    }

    /// Dodge probability for a given intelligence (0–100).
    pub fn dodge_chance(&self, intelligence: f32) -> f32 {
        (self.config.dodge_base_chance * (0.5 + intelligence / 100.0)).clamp(0.0, 1.0)
    }

    // ── Target ────────────────────────────────────────────────────────────

    pub fn set_target(&mut self, target: Option<TargetId>) {
        if self.state.target != target {
            self.pending = None;
            self.state.attacking = false;
        }
        self.state.in_combat = target.is_some();
        self.state.target = target;
    }

    pub fn clear_target(&mut self) {
        self.set_target(None);
    }

    // ── Per-tick update ───────────────────────────────────────────────────

    /// Advance timers, drop a vanished target and resolve a matured attack.
    ///
    /// `target` is what the agent can currently locate; a set target that
    /// does not match it (or is dead) counts as removed.
    pub fn update(&mut self, position: Vec3, target: Option<&TargetInfo>, dt: f32) -> Option<Hit> {
        let s = &mut self.state;
        s.cooldown_timer = (s.cooldown_timer - dt).max(0.0);
        s.attack_ready = s.cooldown_timer <= 0.0;
        s.dodge_cooldown = (s.dodge_cooldown - dt).max(0.0);
        s.dodging_timer = (s.dodging_timer - dt).max(0.0);
        s.stun_timer = (s.stun_timer - dt).max(0.0);

        let id = s.target?;
        let Some(info) = target.filter(|t| t.id == id && t.alive) else {
            tracing::debug!(target = %id, "engagement target lost");
            self.clear_target();
            return None;
        };

        let pending = self.pending.as_mut()?;
        pending.remaining_secs -= dt;
        if pending.remaining_secs > 0.0 {
            return None;
        }
        let hit = *pending;
        self.pending = None;
        self.state.attacking = false;

        if position.distance_xz(info.position) > self.config.attack_range {
            tracing::debug!(target = %hit.target, "attack whiffed: target left range during wind-up");
            return None;
        }
        Some(Hit {
            target: hit.target,
            amount: hit.damage,
            direction: (info.position - position).flatten(),
        })
    }

    // ── Attack ────────────────────────────────────────────────────────────

    /// Start an attack on the current target.  No-op (returns `false`)
    /// without a target, while cooling down, stunned, or mid wind-up.
    pub fn attack(&mut self) -> bool {
        let Some(target) = self.state.target else {
            return false;
        };
        if !self.state.attack_ready || self.is_stunned() || self.pending.is_some() {
            return false;
        }
        self.state.cooldown_timer = self.config.attack_cooldown_secs;
        self.state.attack_ready = self.config.attack_cooldown_secs <= 0.0;
        self.state.attacking = true;
        self.state.in_combat = true;
        self.pending = Some(PendingHit {
            target,
            damage: self.config.attack_damage,
            remaining_secs: self.config.windup_secs,
        });
        true
    }

    // ── Damage intake ─────────────────────────────────────────────────────

    /// Apply `amount` to `health` and roll the secondary reactions.
    ///
    /// `direction` points from the attacker toward this agent.
    pub fn take_damage(
        &mut self,
        health: &mut f32,
        max_health: f32,
        amount: f32,
        direction: Vec3,
        temperament: Temperament,
        rng: &mut AgentRng,
    ) -> DamageOutcome {
        let amount = amount.max(0.0);
        *health = (*health - amount).clamp(0.0, max_health);
        let incoming = direction.flatten();
        self.state.last_hit_direction = Some(incoming);
        self.state.in_combat = true;

        let mut outcome = DamageOutcome { health: *health, ..DamageOutcome::default() };
        if *health <= 0.0 {
            outcome.lethal = true;
            self.pending = None;
            self.state.attacking = false;
            return outcome;
        }

        outcome.knockback = incoming * (amount * self.config.knockback_per_damage).min(self.config.max_knockback);

        if max_health > 0.0 && amount >= max_health * self.config.stun_damage_fraction {
            self.state.stun_timer = self.config.stun_secs;
            self.pending = None;
            self.state.attacking = false;
            outcome.stunned = true;
        }

        if *health < max_health * self.config.low_health_fraction {
            outcome.flee = rng.roll_percent() > temperament.morale;
        }

        outcome.dodge = self.try_dodge(incoming, temperament.intelligence, rng);
        outcome
    }

    /// Roll a sidestep away from `threat`.  Gated by the dodge cooldown and
    /// the dodging flag; on success returns the lateral displacement.
    pub fn try_dodge(&mut self, threat: Vec3, intelligence: f32, rng: &mut AgentRng) -> Option<Vec3> {
        if self.state.dodge_cooldown > 0.0 || self.is_dodging() || self.is_stunned() {
            return None;
        }
        if !rng.gen_bool(self.dodge_chance(intelligence) as f64) {
            return None;
        }
        self.state.dodge_cooldown = self.config.dodge_cooldown_secs;
        self.state.dodging_timer = self.config.dodge_duration_secs;
        let side = match threat.flatten() {
            t if t == Vec3::ZERO => Vec3::FORWARD.perpendicular_xz(),
            t => t.perpendicular_xz(),
        };
        Some(side * (rng.sign() * self.config.dodge_distance))
    }

    /// Drop pending attacks, target and timers.
    pub fn reset(&mut self) {
        self.state = EngagementState::default();
        self.pending = None;
    }
}

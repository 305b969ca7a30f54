//! The agent orchestrator.

use npc_behavior::{DecisionTree, NodeResult};
use npc_core::{AgentId, AgentRng, AlertCategory, Archetype, BehaviorState, DamageReceiver, TargetInfo, Vec3};
use npc_engagement::DamageOutcome;
use npc_spatial::NavQuery;

use crate::{
    Act, AgentBody, AgentError, AgentEvent, AgentResult, AgentSnapshot, BrainContext, Command, Cond, Gait, Order,
    TickContext,
};

/// One NPC: its body (state plus subsystems), decision tree and RNG.
///
/// # Tick order
///
/// [`tick`](Self::tick) always runs, in this order: sensor, locomotion,
/// engagement, decision tree (at most once per behavior interval, never
/// while stunned), stamina.  A dead agent does nothing.
///
/// Notifications accumulate in an outbox drained with
/// [`take_events`](Self::take_events).
pub struct Agent {
    body: AgentBody,
    tree: DecisionTree<Cond, Act>,
    rng: AgentRng,
    events: Vec<AgentEvent>,
    /// Seconds until the next tree pass.
    behavior_timer: f32,
    /// Seconds since the previous tree pass.
    since_behavior: f32,
}

impl Agent {
    pub(crate) fn from_parts(body: AgentBody, tree: DecisionTree<Cond, Act>, rng: AgentRng) -> Self {
        Self { body, tree, rng, events: Vec::new(), behavior_timer: 0.0, since_behavior: 0.0 }
    }

    // ── Read-only state ───────────────────────────────────────────────────

    pub fn body(&self) -> &AgentBody {
        &self.body
    }

    #[inline]
    pub fn id(&self) -> AgentId {
        self.body.id
    }

    #[inline]
    pub fn archetype(&self) -> Archetype {
        self.body.archetype()
    }

    #[inline]
    pub fn state(&self) -> BehaviorState {
        self.body.state
    }

    #[inline]
    pub fn previous_state(&self) -> BehaviorState {
        self.body.previous_state
    }

    #[inline]
    pub fn health(&self) -> f32 {
        self.body.health
    }

    #[inline]
    pub fn max_health(&self) -> f32 {
        self.body.max_health()
    }

    #[inline]
    pub fn stamina(&self) -> f32 {
        self.body.stamina
    }

    #[inline]
    pub fn max_stamina(&self) -> f32 {
        self.body.max_stamina()
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.body.is_alive()
    }

    /// Result of the last tree pass.
    pub fn tree_result(&self) -> NodeResult {
        self.tree.result()
    }

    pub fn take_events(&mut self) -> Vec<AgentEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[AgentEvent] {
        &self.events
    }

    // ── State mutation ────────────────────────────────────────────────────

    /// The one place behavior state changes.  Records the previous state and
    /// emits `StateChanged`; does nothing for a dead agent or an unchanged
    /// state.  Returns whether the state changed.
    pub fn set_state(&mut self, state: BehaviorState) -> bool {
        let from = self.body.state;
        if from == state || from.is_terminal() {
            return false;
        }
        self.body.previous_state = from;
        self.body.state = state;
        self.events.push(AgentEvent::StateChanged { agent: self.body.id, from, to: state });
        true
    }

    /// Change state from outside the tree and restart the tree so no stale
    /// `Running` branch resumes.
    pub fn force_state(&mut self, state: BehaviorState) {
        if self.set_state(state) {
            self.interrupt();
        }
    }

    fn interrupt(&mut self) {
        self.tree.reset();
        self.behavior_timer = 0.0;
    }

    /// Impose an [`Order`] from outside the tree and restart the tree so the
    /// order branch runs next.  A fleeing agent only takes another `Flee`
    /// order, an agent that sees a target ignores `Alert` orders, and a
    /// stunned one takes the order up when the stun wears off.  Returns
    /// whether the order was accepted.
    pub fn give_order(&mut self, order: Order) -> bool {
        if !self.is_alive() {
            return false;
        }
        let state = self.body.state;
        if state == BehaviorState::Flee && order.state != BehaviorState::Flee {
            tracing::debug!(agent = %self.body.id, to = %order.state, "fleeing agent ignored an order");
            return false;
        }
        if order.state == BehaviorState::Alert && self.body.sensor.snapshot().can_see_target {
            tracing::debug!(agent = %self.body.id, "engaged agent ignored an alert order");
            return false;
        }
        self.body.order = Some(order);
        self.interrupt();
        if state == BehaviorState::Stunned {
            self.body.resume_state = order.state;
            return true;
        }
        self.set_state(order.state);
        self.apply(Command::MoveTo { destination: order.destination, gait: order.gait });
        true
    }

    /// Head for `destination` outside tree control, keeping the current
    /// state.
    pub fn move_to(&mut self, destination: Vec3, gait: Gait) -> bool {
        self.give_order(Order::new(destination, self.body.state, gait))
    }

    /// Alert-bus injection point.  Returns `false` if the sound was out of
    /// earshot or the agent is dead.
    pub fn register_sound(&mut self, source: Vec3, intensity: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.body.sensor.register_sound(self.body.position, source, intensity)
    }

    pub fn raise_alertness(&mut self, amount: f32) {
        if self.is_alive() {
            self.body.sensor.raise_alertness(amount);
        }
    }

    /// Point the agent's memory at a reported threat position.
    pub fn remember_threat_at(&mut self, position: Vec3) {
        if self.is_alive() {
            self.body.sensor.remember_target_at(position);
        }
    }

    /// Flee toward `fallback` (coordinated retreat or group break).
    pub fn flee_to(&mut self, fallback: Vec3) -> bool {
        self.give_order(Order::new(fallback, BehaviorState::Flee, Gait::Run))
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    pub fn tick(&mut self, ctx: &TickContext<'_>) {
        if !self.is_alive() {
            return;
        }
        let dt = ctx.dt;
        self.body.alarm_cooldown = (self.body.alarm_cooldown - dt).max(0.0);
        let located = ctx.targets.locate(self.body.position);

        // ── Sensor ───────────────────────────────────────────────────────
        let b = &mut self.body;
        let was_alert = b.sensor.should_be_alert();
        let saw = b.sensor.snapshot().can_see_target;
        b.sensor.update(b.position, b.facing, located.as_ref(), ctx.nav, dt);
        let sees = b.sensor.snapshot().can_see_target;
        let mut interrupted = (sees && !saw) || (b.sensor.should_be_alert() && !was_alert);
        if sees && !saw {
            if b.order.is_some_and(|o| o.state != BehaviorState::Flee) {
                b.order = None;
            }
            if let Some(t) = located {
                self.events.push(AgentEvent::Alert {
                    agent: b.id,
                    category: AlertCategory::Sighting,
                    position: t.position,
                    intensity: 100.0,
                });
            }
        }

        // ── Locomotion ───────────────────────────────────────────────────
        b.locomotion.update(&mut b.position, &mut b.facing, ctx.nav, dt);

        // ── Engagement ───────────────────────────────────────────────────
        let engaged = b.engagement.target().and_then(|id| ctx.targets.get(id));
        if let Some(hit) = b.engagement.update(b.position, engaged.as_ref(), dt) {
            self.events.push(AgentEvent::Hit {
                agent: b.id,
                target: hit.target,
                amount: hit.amount,
                direction: hit.direction,
            });
        }
        if b.state == BehaviorState::Stunned && !b.engagement.is_stunned() {
            let resume = b.resume_state;
            self.set_state(resume);
            interrupted = true;
        }

        // ── Decision tree ────────────────────────────────────────────────
        if interrupted {
            tracing::debug!(agent = %self.body.id, "tree interrupted");
            self.interrupt();
        }
        self.since_behavior += dt;
        self.behavior_timer -= dt;
        if self.body.state != BehaviorState::Stunned && self.behavior_timer <= 0.0 {
            self.behavior_timer = self.body.params.behavior_interval_secs;
            let visible = located.filter(|_| self.body.sensor.snapshot().can_see_target);
            self.think(ctx.nav, visible.as_ref());
        }

        // ── Stamina ──────────────────────────────────────────────────────
        self.update_stamina(dt);
    }

    /// One tree pass, then apply the commands it issued.
    fn think(&mut self, nav: &dyn NavQuery, target: Option<&TargetInfo>) {
        let mut brain = BrainContext {
            body: &self.body,
            nav,
            target,
            elapsed: self.since_behavior,
            commands: Vec::new(),
        };
        self.tree.execute(&mut brain);
        let commands = brain.commands;
        self.since_behavior = 0.0;
        for command in commands {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: Command) {
        let b = &mut self.body;
        match command {
            Command::MoveTo { destination, gait } => {
                b.gait = gait;
                let speed = b.pace(gait);
                b.locomotion.move_to_target(destination, speed);
            }
            Command::Stop => {
                b.gait = Gait::Walk;
                b.locomotion.stop();
            }
            Command::SetTarget(target) => b.engagement.set_target(target),
            Command::Attack => {
                b.engagement.attack();
            }
            Command::SetState(state) => {
                self.set_state(state);
            }
            Command::Dwell(secs) => {
                let dwell = b.locomotion.config().patrol_dwell_secs;
                b.locomotion.patrol_mut().tick_dwell(secs, dwell);
            }
            Command::AdvancePatrol => {
                b.locomotion.patrol_mut().advance();
            }
            Command::ForgetSound => b.sensor.forget_sound(),
            Command::ForgetTarget => b.sensor.forget_target(),
            Command::EndOrder => {
                if let Some(threat) = b.order.take().and_then(|o| o.threat) {
                    b.sensor.remember_target_at(threat);
                }
            }
            Command::Broadcast { category, position, intensity } => {
                if matches!(category, AlertCategory::Alarm | AlertCategory::BackupRequest) {
                    b.alarm_cooldown = b.params.alarm_cooldown_secs;
                    tracing::info!(agent = %b.id, %category, %position, "alarm raised");
                }
                self.events.push(AgentEvent::Alert { agent: b.id, category, position, intensity });
            }
        }
    }

    fn update_stamina(&mut self, dt: f32) {
        let b = &mut self.body;
        let max = b.params.max_stamina;
        if b.is_sprinting() {
            b.stamina = (b.stamina - b.params.stamina_drain_per_sec * dt).clamp(0.0, max);
            if b.stamina <= 0.0 {
                // Out of breath: keep the destination, drop to walking pace.
                if let Some(target) = b.locomotion.state().target {
                    let walk = b.params.walk_speed;
                    b.locomotion.move_to_target(target, walk);
                }
            }
        } else {
            b.stamina = (b.stamina + b.params.stamina_regen_per_sec * dt).clamp(0.0, max);
        }
    }

    // ── Damage ────────────────────────────────────────────────────────────

    /// Take a hit.  `direction` points from the attacker toward this agent.
    ///
    /// Lethal hits kill; otherwise a successful flee roll forces `Flee`, a
    /// heavy hit stuns, and knockback / dodge displacements are queued on
    /// locomotion.  Any hit maximises alertness and raises an
    /// attack-detected alert.
    pub fn take_damage(&mut self, amount: f32, direction: Vec3) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome { health: self.body.health, ..DamageOutcome::default() };
        }
        let before = self.body.health;
        let temperament = self.body.params.temperament();
        let max_health = self.body.params.max_health;
        let outcome = self.body.engagement.take_damage(
            &mut self.body.health,
            max_health,
            amount,
            direction,
            temperament,
            &mut self.rng,
        );

        if outcome.health != before {
            self.events.push(AgentEvent::HealthChanged { agent: self.body.id, from: before, to: outcome.health });
        }
        if outcome.lethal {
            self.die();
            return outcome;
        }

        self.body.sensor.raise_alertness(npc_sensor::MAX_ALERTNESS);
        self.events.push(AgentEvent::Alert {
            agent: self.body.id,
            category: AlertCategory::AttackDetected,
            position: self.body.position,
            intensity: 100.0,
        });

        self.body.locomotion.nudge(outcome.knockback + outcome.dodge.unwrap_or(Vec3::ZERO));

        if outcome.flee {
            self.body.order = None;
            self.body.locomotion.stop();
            self.body.engagement.clear_target();
            self.force_state(BehaviorState::Flee);
        } else if outcome.stunned {
            let current = self.body.state;
            if current != BehaviorState::Stunned {
                self.body.resume_state = match current {
                    BehaviorState::Idle | BehaviorState::Patrol => BehaviorState::Alert,
                    other => other,
                };
            }
            self.body.locomotion.stop();
            self.force_state(BehaviorState::Stunned);
        } else {
            // Being hit re-evaluates the tree at once.
            self.interrupt();
        }
        outcome
    }

    fn die(&mut self) {
        self.set_state(BehaviorState::Dead);
        self.body.order = None;
        self.body.locomotion.stop();
        self.body.engagement.reset();
        self.tree.reset();
        tracing::info!(agent = %self.body.id, archetype = %self.archetype(), "agent died");
        self.events.push(AgentEvent::Died { agent: self.body.id, position: self.body.position });
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Halt all subsystem activity and restart the tree.  Health, stamina,
    /// state and position are left alone.
    pub fn reset(&mut self) {
        self.body.locomotion.reset();
        self.body.engagement.reset();
        self.body.order = None;
        self.body.gait = Gait::Walk;
        self.interrupt();
        self.since_behavior = 0.0;
    }

    /// Bring the agent back at `position` with full health and stamina.
    /// The only way out of `Dead`.
    pub fn respawn(&mut self, position: Vec3) {
        self.reset();
        let b = &mut self.body;
        b.sensor.reset();
        b.locomotion.patrol_mut().current = 0;
        b.position = position;
        b.home = position;
        b.health = b.params.max_health;
        b.stamina = b.params.max_stamina;
        b.alarm_cooldown = 0.0;
        let from = b.state;
        b.previous_state = from;
        b.state = BehaviorState::Idle;
        b.resume_state = BehaviorState::Alert;
        if from != BehaviorState::Idle {
            self.events.push(AgentEvent::StateChanged { agent: b.id, from, to: BehaviorState::Idle });
        }
        tracing::debug!(agent = %b.id, %position, "agent respawned");
    }

    // ── Persistence ───────────────────────────────────────────────────────

    pub fn snapshot(&self) -> AgentSnapshot {
        let b = &self.body;
        let snap = b.sensor.snapshot();
        AgentSnapshot {
            id: b.id,
            archetype: b.archetype(),
            position: b.position,
            facing: b.facing,
            health: b.health,
            stamina: b.stamina,
            state: b.state,
            previous_state: b.previous_state,
            alertness: snap.alertness,
            last_known_position: snap.last_known_position,
            patrol_index: b.locomotion.patrol().current,
        }
    }

    /// Re-seed persisted fields without repeating spawn-time setup.  No
    /// notifications are emitted.
    ///
    /// A snapshot of a living state must carry health; a dead agent is only
    /// ever restored as `Dead`.
    pub fn restore(&mut self, snapshot: &AgentSnapshot) -> AgentResult<()> {
        if snapshot.archetype != self.archetype() {
            return Err(AgentError::ArchetypeMismatch { expected: self.archetype(), found: snapshot.archetype });
        }
        if !snapshot.state.is_terminal() && (snapshot.health.is_nan() || snapshot.health <= 0.0) {
            return Err(AgentError::LifelessSnapshot { state: snapshot.state });
        }
        self.reset();
        let b = &mut self.body;
        b.position = snapshot.position;
        b.facing = snapshot.facing;
        b.health = snapshot.health.clamp(0.0, b.params.max_health);
        b.stamina = snapshot.stamina.clamp(0.0, b.params.max_stamina);
        b.state = snapshot.state;
        b.previous_state = snapshot.previous_state;
        b.sensor.restore(snapshot.alertness, snapshot.last_known_position);
        let patrol = b.locomotion.patrol_mut();
        if !patrol.is_empty() {
            patrol.current = snapshot.patrol_index % patrol.len();
            patrol.dwell_timer = 0.0;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.body.id)
            .field("archetype", &self.archetype())
            .field("state", &self.body.state)
            .field("position", &self.body.position)
            .field("health", &self.body.health)
            .field("order", &self.body.order)
            .finish_non_exhaustive()
    }
}

impl DamageReceiver for Agent {
    fn apply_damage(&mut self, amount: f32, direction: Vec3) {
        self.take_damage(amount, direction);
    }
}

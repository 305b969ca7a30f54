//! The `Sim` struct and its tick loop.

use rustc_hash::FxHashSet;

use npc_agent::{
    Agent, AgentArena, AgentBuilder, AgentEvent, AgentSnapshot, DamageOutcome, Gait, Order, TickContext,
};
use npc_core::{AgentId, AlertCategory, BehaviorState, GroupId, SimClock, SimConfig, TargetId, Tick, Vec3};
use npc_group::{AlertBus, AlertEvent, GroupRegistry, Reaction, ReactionKind};
use npc_spatial::NavQuery;

use crate::view::ArenaView;
use crate::{DespawnQueue, SimError, SimObserver, SimResult, TargetRegistry, TickSummary};

/// Intensity of the ally-down alert raised for every death.
const ALLY_DOWN_INTENSITY: f32 = 100.0;

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation service.
///
/// `Sim<N>` owns the population and every cross-agent service, and drives
/// the two-phase tick:
///
/// 1. **Agent phase** (optionally parallel with the `parallel` feature):
///    every living agent runs its fixed-order tick against shared read-only
///    navigation and target data.  Agents only write their own state.
/// 2. **Apply phase** (sequential, ascending `AgentId` for determinism):
///    - `Hit`    → damage the external target.
///    - `Alert`  → broadcast to the origin's group; alarms also go out on
///      the global alert bus.
///    - `Died`   → ally-down broadcast, despawn scheduled after
///      `config.despawn_delay_secs`.
///    - group morale update, then every resulting [`Reaction`] is applied.
///    - agents whose despawn tick has come are removed.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<N: NavQuery> {
    pub config: SimConfig,
    pub clock: SimClock,
    pub agents: AgentArena,
    pub groups: GroupRegistry,
    pub bus: AlertBus,
    pub targets: TargetRegistry,
    pub despawns: DespawnQueue,
    /// Navigation provider shared read-only by every agent.
    pub nav: N,
    /// Assign newly spawned agents to groups by proximity and archetype.
    pub auto_group: bool,
    pub(crate) last_summary: TickSummary,
    /// Dedicated pool when `config.num_threads` is set, else Rayon's global
    /// pool.
    #[cfg(feature = "parallel")]
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl<N: NavQuery> Sim<N> {
    // ── Running ───────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer);
        }
        Ok(())
    }

    /// One full tick including observer callbacks.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> &TickSummary {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        self.last_summary = self.process_tick(now, observer);
        observer.on_tick_end(now, &self.last_summary);
        if self.config.output_interval_ticks > 0 && now.0 % self.config.output_interval_ticks == 0 {
            observer.on_snapshot(now, &self.agents);
        }
        self.clock.advance();
        &self.last_summary
    }

    pub fn last_summary(&self) -> &TickSummary {
        &self.last_summary
    }

    /// Simulated seconds at the current tick.
    pub fn now_secs(&self) -> f64 {
        self.clock.elapsed_secs()
    }

    // ── Population ────────────────────────────────────────────────────────

    /// Spawn an agent seeded from `config.seed`, and group it when
    /// `auto_group` is on.
    pub fn spawn(&mut self, builder: AgentBuilder) -> SimResult<AgentId> {
        let id = self.agents.spawn(builder.seed(self.config.seed))?;
        if self.auto_group {
            self.groups.assign(id, &ArenaView(&self.agents))?;
        }
        Ok(id)
    }

    /// Statically authored group.
    pub fn create_group(&mut self, name: impl Into<String>, members: &[AgentId]) -> SimResult<GroupId> {
        if let Some(&missing) = members.iter().find(|&&id| !self.agents.contains(id)) {
            return Err(SimError::UnknownAgent(missing));
        }
        Ok(self.groups.create_group(name, members, &ArenaView(&self.agents))?)
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn snapshots(&self) -> Vec<AgentSnapshot> {
        self.agents.iter().map(Agent::snapshot).collect()
    }

    pub fn add_target(&mut self, position: Vec3, health: f32) -> TargetId {
        self.targets.insert(position, health)
    }

    // ── World entry points ────────────────────────────────────────────────

    /// External damage on an agent (player weapons, traps).  Notifications
    /// it raises are routed in the next apply phase.
    pub fn damage_agent(&mut self, id: AgentId, amount: f32, direction: Vec3) -> SimResult<DamageOutcome> {
        let agent = self.agents.get_mut(id).ok_or(SimError::UnknownAgent(id))?;
        Ok(agent.take_damage(amount, direction))
    }

    /// A noise in the world, heard by every agent in global range.  Returns
    /// the number of reactions applied.
    pub fn emit_sound(&mut self, position: Vec3, intensity: f32) -> usize {
        let event = AlertEvent::new(AlertCategory::Sound, position, intensity, self.now_secs());
        self.broadcast_global(event)
    }

    /// Environment alarm: every agent in global range goes Alert and heads
    /// for `position`.
    pub fn raise_alarm(&mut self, position: Vec3, intensity: f32) -> usize {
        tracing::info!(%position, intensity, "environment alarm");
        let event = AlertEvent::new(AlertCategory::Alarm, position, intensity, self.now_secs());
        self.broadcast_global(event)
    }

    pub fn coordinate_attack(&mut self, group: GroupId, target: Vec3) -> SimResult<usize> {
        let reactions = self.groups.coordinate_attack(group, target, &ArenaView(&self.agents), &self.nav)?;
        Ok(self.apply_reactions(reactions))
    }

    pub fn coordinate_retreat(&mut self, group: GroupId, fallback: Vec3) -> SimResult<usize> {
        let reactions = self.groups.coordinate_retreat(group, fallback, &ArenaView(&self.agents), &self.nav)?;
        Ok(self.apply_reactions(reactions))
    }

    fn broadcast_global(&mut self, event: AlertEvent) -> usize {
        self.refresh_bus_index();
        let reactions = self.bus.broadcast(event, &ArenaView(&self.agents));
        self.apply_reactions(reactions)
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> TickSummary {
        let dt = self.clock.dt();
        let now_secs = self.clock.elapsed_secs();

        // ── Phase 1: agent phase ──────────────────────────────────────────
        self.tick_agents(now, dt);

        // ── Phase 2: apply phase ──────────────────────────────────────────
        //
        // Outboxes drain in ascending id order, so routing is deterministic
        // even when the agent phase ran in parallel.
        let events: Vec<AgentEvent> = self.agents.iter_mut().flat_map(Agent::take_events).collect();
        self.refresh_bus_index();

        let mut summary = TickSummary { tick: now, events: events.len(), ..TickSummary::default() };
        let mut reactions = Vec::new();
        for event in &events {
            observer.on_agent_event(now, event);
            self.route_event(event, now, now_secs, &mut summary, &mut reactions);
        }
        reactions.extend(self.groups.update_all(dt, now_secs, &ArenaView(&self.agents), &self.nav));
        summary.reactions = self.apply_reactions(reactions);
        summary.despawned = self.despawn_due(now);

        for agent in self.agents.iter().filter(|a| a.is_alive()) {
            summary.living += 1;
            if agent.state().is_hostile() {
                summary.hostile += 1;
            }
            if agent.state() == BehaviorState::Flee {
                summary.fleeing += 1;
            }
        }
        summary
    }

    fn tick_agents(&mut self, now: Tick, dt: f32) {
        let ctx = TickContext::new(&self.nav, &self.targets, now, dt);

        #[cfg(not(feature = "parallel"))]
        for agent in self.agents.iter_mut() {
            agent.tick(&ctx);
        }

        #[cfg(feature = "parallel")]
        {
            let slots = self.agents.slots_mut();
            match &self.pool {
                Some(pool) => pool.install(|| tick_slots_parallel(slots, &ctx)),
                None => tick_slots_parallel(slots, &ctx),
            }
        }
    }

    fn route_event(
        &mut self,
        event: &AgentEvent,
        now: Tick,
        now_secs: f64,
        summary: &mut TickSummary,
        reactions: &mut Vec<Reaction>,
    ) {
        match *event {
            AgentEvent::Hit { agent, target, amount, direction } => {
                summary.hits += 1;
                if self.targets.apply_damage(target, amount, direction) {
                    summary.damage_dealt += amount;
                } else {
                    tracing::debug!(%agent, %target, "hit on a removed target");
                }
            }
            AgentEvent::Alert { agent, category, position, intensity } => {
                summary.alerts += 1;
                let alert = AlertEvent::new(category, position, intensity, now_secs).from_agent(agent);
                reactions.extend(self.broadcast_agent_alert(alert));
            }
            AgentEvent::Died { agent, position } => {
                summary.deaths += 1;
                let alert = AlertEvent::new(AlertCategory::AllyDown, position, ALLY_DOWN_INTENSITY, now_secs)
                    .from_agent(agent);
                reactions.extend(self.broadcast_agent_alert(alert));
                let due = now.offset(self.clock.ticks_for_secs(self.config.despawn_delay_secs));
                self.despawns.push(due, agent);
            }
            AgentEvent::StateChanged { .. } | AgentEvent::HealthChanged { .. } => {}
        }
    }

    /// Group broadcast, plus the global bus for alarms.  An agent reached by
    /// both reacts once.
    fn broadcast_agent_alert(&mut self, alert: AlertEvent) -> Vec<Reaction> {
        let view = ArenaView(&self.agents);
        let mut reactions = self.groups.broadcast(alert, &view, &self.nav);
        if alert.category == AlertCategory::Alarm {
            let reached: FxHashSet<AgentId> = reactions.iter().map(|r| r.agent).collect();
            reactions.extend(
                self.bus
                    .broadcast(alert, &view)
                    .into_iter()
                    .filter(|r| !reached.contains(&r.agent)),
            );
        }
        reactions
    }

    fn refresh_bus_index(&mut self) {
        let positions = self.agents.iter().filter(|a| a.is_alive()).map(|a| (a.id(), a.position()));
        self.bus.rebuild_index(positions);
    }

    /// Apply reactions in order.  Returns how many reached a present agent.
    pub(crate) fn apply_reactions(&mut self, reactions: Vec<Reaction>) -> usize {
        let mut applied = 0;
        for reaction in reactions {
            match self.agents.get_mut(reaction.agent) {
                Some(agent) => {
                    apply_reaction(agent, reaction.kind);
                    applied += 1;
                }
                None => tracing::debug!(agent = %reaction.agent, "reaction for a removed agent dropped"),
            }
        }
        applied
    }

    fn despawn_due(&mut self, now: Tick) -> usize {
        let mut removed = 0;
        for id in self.despawns.drain_due(now) {
            self.groups.remove_agent(id, &ArenaView(&self.agents));
            if self.agents.remove(id).is_some() {
                tracing::info!(agent = %id, tick = %now, "agent despawned");
                removed += 1;
            }
        }
        removed
    }
}

#[cfg(feature = "parallel")]
fn tick_slots_parallel(slots: &mut [Option<Agent>], ctx: &TickContext<'_>) {
    use rayon::prelude::*;

    slots.par_iter_mut().filter_map(Option::as_mut).for_each(|agent| agent.tick(ctx));
}

/// Turn a group or bus reaction into agent calls.  Anything that moves the
/// agent becomes a standing [`Order`], so the next tree passes keep it.
fn apply_reaction(agent: &mut Agent, kind: ReactionKind) {
    match kind {
        ReactionKind::HearSound { position, intensity } => {
            agent.register_sound(position, intensity);
        }
        ReactionKind::Investigate { position, intensity } => {
            agent.register_sound(position, intensity);
            agent.remember_threat_at(position);
            agent.give_order(Order::new(position, BehaviorState::Alert, Gait::Walk));
        }
        ReactionKind::Alert { position } => {
            agent.give_order(Order::new(position, BehaviorState::Alert, Gait::Walk));
        }
        ReactionKind::RaiseAlertness(amount) => agent.raise_alertness(amount),
        ReactionKind::Chase { position } => {
            agent.remember_threat_at(position);
            agent.give_order(Order::new(position, BehaviorState::Chase, Gait::Run));
        }
        ReactionKind::Flank { position, target } => {
            agent.give_order(Order::new(position, BehaviorState::Chase, Gait::Run).then_engage(target));
        }
        ReactionKind::Flee { fallback } => {
            agent.flee_to(fallback);
        }
    }
}

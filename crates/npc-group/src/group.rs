//! A communication group: shared alerts, morale and coordinated tactics.
//!
//! # Morale
//!
//! Every ally-down event costs `morale_loss_per_casualty`.  Morale recovers
//! at `morale_recovery_per_sec` on every [`Group::update`] in which no living
//! member is attacking, and is clamped to `[0, 100]`.
//!
//! ```text
//!             morale < break_threshold
//!  Cohesive ───────────────────────────▶ Broken   (every member flees)
//!     ▲                                    │
//!     └────────────────────────────────────┘
//!             morale >= rally_threshold
//! ```
//!
//! The only way back from `Broken` is recovery over time.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use bitflags::bitflags;

use npc_core::{AgentId, AlertCategory, BehaviorState, GroupId, Vec3};
use npc_spatial::NavQuery;

use crate::reaction::react;
use crate::{AlertEvent, GroupConfig, GroupError, GroupResult, MemberInfo, MemberView, Reaction, ReactionKind};

pub const MAX_MORALE: f32 = 100.0;

bitflags! {
    /// Coordinated behaviors a group is allowed to run.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TacticFlags: u8 {
        /// Spread around a target in [`Group::coordinate_attack`].
        const FLANKING = 1 << 0;
        /// The leader hangs back behind the ring while the others flank.
        const COVERING = 1 << 1;
        /// Allow [`Group::coordinate_retreat`].
        const RETREAT  = 1 << 2;
    }
}

impl Default for TacticFlags {
    fn default() -> Self {
        TacticFlags::FLANKING | TacticFlags::RETREAT
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupMode {
    #[default]
    Cohesive,
    Broken,
}

#[derive(Clone, Debug)]
pub struct Group {
    id: GroupId,
    name: String,
    /// Sorted ascending; broadcasts fan out in this order.
    members: Vec<AgentId>,
    leader: Option<AgentId>,
    morale: f32,
    mode: GroupMode,
    tactics: TacticFlags,
    rally_point: Option<Vec3>,
    events: VecDeque<AlertEvent>,
    config: GroupConfig,
}

impl Group {
    pub fn new(id: GroupId, name: impl Into<String>, config: GroupConfig) -> Self {
        Self {
            id,
            name: name.into(),
            members: Vec::new(),
            leader: None,
            morale: MAX_MORALE,
            mode: GroupMode::Cohesive,
            tactics: TacticFlags::default(),
            rally_point: None,
            events: VecDeque::new(),
            config,
        }
    }

    pub fn with_tactics(mut self, tactics: TacticFlags) -> Self {
        self.tactics = tactics;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[AgentId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.config.max_size
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.members.binary_search(&agent).is_ok()
    }

    pub fn leader(&self) -> Option<AgentId> {
        self.leader
    }

    pub fn morale(&self) -> f32 {
        self.morale
    }

    pub fn mode(&self) -> GroupMode {
        self.mode
    }

    pub fn tactics(&self) -> TacticFlags {
        self.tactics
    }

    pub fn set_tactics(&mut self, tactics: TacticFlags) {
        self.tactics = tactics;
    }

    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    pub fn rally_point(&self) -> Option<Vec3> {
        self.rally_point
    }

    /// Where the group falls back to when it breaks.
    pub fn set_rally_point(&mut self, point: Option<Vec3>) {
        self.rally_point = point;
    }

    /// Events still inside the retention window, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &AlertEvent> + '_ {
        self.events.iter()
    }

    // ── Membership ────────────────────────────────────────────────────────

    pub fn add<V: MemberView + ?Sized>(&mut self, agent: AgentId, view: &V) -> GroupResult<()> {
        match self.members.binary_search(&agent) {
            Ok(_) => Ok(()),
            Err(_) if self.is_full() => {
                Err(GroupError::GroupFull { group: self.id, max: self.config.max_size })
            }
            Err(at) => {
                self.members.insert(at, agent);
                self.refresh_leader(view);
                Ok(())
            }
        }
    }

    /// Drop `agent`.  Returns whether it was a member.
    pub fn remove<V: MemberView + ?Sized>(&mut self, agent: AgentId, view: &V) -> bool {
        let Ok(at) = self.members.binary_search(&agent) else {
            return false;
        };
        self.members.remove(at);
        self.refresh_leader(view);
        true
    }

    /// Prune members that are dead or gone, then elect the most intelligent
    /// survivor (lowest id on ties).  Returns the pruned ids.
    pub fn refresh_leader<V: MemberView + ?Sized>(&mut self, view: &V) -> Vec<AgentId> {
        let mut pruned = Vec::new();
        self.members.retain(|&id| {
            let keep = view.living(id).is_some();
            if !keep {
                pruned.push(id);
            }
            keep
        });

        let mut best: Option<MemberInfo> = None;
        for info in self.members.iter().filter_map(|&id| view.member(id)) {
            if best.is_none_or(|b| info.intelligence > b.intelligence) {
                best = Some(info);
            }
        }
        self.leader = best.map(|m| m.id);
        pruned
    }

    fn living<'v, V: MemberView + ?Sized>(&'v self, view: &'v V) -> impl Iterator<Item = MemberInfo> + 'v {
        self.members.iter().filter_map(move |&id| view.living(id))
    }

    fn centroid<V: MemberView + ?Sized>(&self, view: &V) -> Option<Vec3> {
        let (sum, n) = self
            .living(view)
            .fold((Vec3::ZERO, 0usize), |(sum, n), m| (sum + m.position, n + 1));
        (n > 0).then(|| sum * (1.0 / n as f32))
    }

    /// Centroid of the living members, if any.
    pub fn center<V: MemberView + ?Sized>(&self, view: &V) -> Option<Vec3> {
        self.centroid(view)
    }

    // ── Events ────────────────────────────────────────────────────────────

    fn prune_events(&mut self, now: f64) {
        while self.events.front().is_some_and(|e| e.is_expired(now, self.config.event_ttl_secs)) {
            self.events.pop_front();
        }
    }

    /// Log `event` and map it onto every living member within communication
    /// range, in ascending id order.  The originating agent is skipped.  An
    /// ally-down event also costs morale, which may break the group; the
    /// resulting flee orders are appended.
    pub fn broadcast<V: MemberView + ?Sized>(
        &mut self,
        event: AlertEvent,
        view: &V,
        nav: &dyn NavQuery,
    ) -> Vec<Reaction> {
        self.prune_events(event.created_at);
        self.events.push_back(event);

        let range = self.config.communication_range;
        let mut reactions: Vec<Reaction> = self
            .living(view)
            .filter(|m| Some(m.id) != event.origin)
            .filter(|m| m.position.distance_xz(event.position) <= range)
            .filter_map(|m| react(&event, &m, &self.config.reactions))
            .collect();

        tracing::debug!(
            group = %self.id,
            category = %event.category,
            reached = reactions.len(),
            "group broadcast"
        );

        if event.category == AlertCategory::AllyDown {
            self.morale = (self.morale - self.config.morale_loss_per_casualty).max(0.0);
            if let Some(origin) = event.origin {
                self.remove(origin, view);
            }
            reactions.extend(self.check_break(view, nav));
        }
        reactions
    }

    // ── Morale ────────────────────────────────────────────────────────────

    /// Advance morale by `dt` seconds, prune the dead and run the
    /// cohesive/broken state machine.  Returns flee orders on a break.
    pub fn update<V: MemberView + ?Sized>(
        &mut self,
        dt: f32,
        now: f64,
        view: &V,
        nav: &dyn NavQuery,
    ) -> Vec<Reaction> {
        self.prune_events(now);
        self.refresh_leader(view);

        let fighting = self.living(view).any(|m| m.state == BehaviorState::Attack);
        if !fighting {
            self.morale = (self.morale + self.config.morale_recovery_per_sec * dt).min(MAX_MORALE);
        }

        if self.mode == GroupMode::Broken && self.morale >= self.config.rally_threshold {
            self.mode = GroupMode::Cohesive;
            tracing::info!(group = %self.id, name = %self.name, morale = self.morale, "group rallied");
        }
        self.check_break(view, nav)
    }

    fn check_break<V: MemberView + ?Sized>(&mut self, view: &V, nav: &dyn NavQuery) -> Vec<Reaction> {
        if self.mode == GroupMode::Broken || self.morale >= self.config.break_threshold {
            return Vec::new();
        }
        self.mode = GroupMode::Broken;
        tracing::info!(group = %self.id, name = %self.name, morale = self.morale, "group broke");

        let Some(fallback) = self.fallback_point(view, nav) else {
            return Vec::new();
        };
        self.living(view)
            .map(|m| Reaction::new(m.id, ReactionKind::Flee { fallback }))
            .collect()
    }

    /// Rally point if set, else the centroid pushed away from the most
    /// recent threat, snapped onto the navigable surface.
    fn fallback_point<V: MemberView + ?Sized>(&self, view: &V, nav: &dyn NavQuery) -> Option<Vec3> {
        let center = self.centroid(view)?;
        let raw = self.rally_point.unwrap_or_else(|| {
            let threat = self
                .events
                .iter()
                .rev()
                .find(|e| e.category != AlertCategory::AllyDown)
                .map(|e| e.position);
            match threat.map(|t| (center - t).flatten()) {
                Some(away) if away != Vec3::ZERO => center + away * self.config.retreat_distance,
                _ => center,
            }
        });
        Some(self.snap(raw, nav).unwrap_or(center))
    }

    fn snap(&self, point: Vec3, nav: &dyn NavQuery) -> Option<Vec3> {
        nav.nearest_navigable(point, self.config.snap_radius)
    }

    // ── Tactics ───────────────────────────────────────────────────────────

    /// Spread the living members around `target` at evenly spaced angles,
    /// starting from the bearing of the group's centroid.  With `COVERING`
    /// the leader instead holds a position twice as far out on that bearing.
    ///
    /// Requires `FLANKING`, a cohesive group and at least `min_size` living
    /// members; otherwise returns nothing.  Members whose slot has no
    /// navigable point within the snap radius are left alone.
    pub fn coordinate_attack<V: MemberView + ?Sized>(
        &self,
        target: Vec3,
        view: &V,
        nav: &dyn NavQuery,
    ) -> Vec<Reaction> {
        let living: Vec<MemberInfo> = self.living(view).collect();
        if !self.tactics.contains(TacticFlags::FLANKING)
            || self.mode == GroupMode::Broken
            || living.len() < self.config.min_size
        {
            tracing::debug!(
                group = %self.id,
                living = living.len(),
                mode = ?self.mode,
                "coordinated attack refused"
            );
            return Vec::new();
        }

        let bearing = self
            .centroid(view)
            .map(|c| (c - target).flatten())
            .filter(|d| *d != Vec3::ZERO)
            .unwrap_or(Vec3::FORWARD);
        let distance = self.config.flank_distance;

        let covering = self.tactics.contains(TacticFlags::COVERING);
        let (cover, flankers): (Vec<MemberInfo>, Vec<MemberInfo>) = living
            .into_iter()
            .partition(|m| covering && Some(m.id) == self.leader);

        let step = TAU / flankers.len().max(1) as f32;
        let slots = flankers
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id, target + bearing.rotate_y(step * i as f32) * distance))
            .chain(cover.iter().map(|m| (m.id, target + bearing * (2.0 * distance))));

        slots
            .filter_map(|(agent, slot)| {
                let position = self.snap(slot, nav);
                if position.is_none() {
                    tracing::debug!(group = %self.id, %agent, "no navigable flank slot");
                }
                position.map(|position| Reaction::new(agent, ReactionKind::Flank { position, target }))
            })
            .collect()
    }

    /// Every living member flees toward `fallback`.  Requires `RETREAT`.
    pub fn coordinate_retreat<V: MemberView + ?Sized>(
        &self,
        fallback: Vec3,
        view: &V,
        nav: &dyn NavQuery,
    ) -> Vec<Reaction> {
        if !self.tactics.contains(TacticFlags::RETREAT) {
            tracing::debug!(group = %self.id, "retreat coordination disabled");
            return Vec::new();
        }
        let fallback = self.snap(fallback, nav).unwrap_or(fallback);
        self.living(view)
            .map(|m| Reaction::new(m.id, ReactionKind::Flee { fallback }))
            .collect()
    }
}

//! Simulation-wide alert bus.
//!
//! Same category → reaction mapping as a group broadcast, but fanned out to
//! every living agent within `global_range` of the event regardless of
//! membership.  Used for environment triggers (alarms, explosions).  Ally-down
//! events on the bus raise alertness but carry no morale cost.
//!
//! Candidates come from an R-tree over agent positions, rebuilt once per
//! tick by the simulation before any broadcast.

use std::collections::VecDeque;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use npc_core::{AgentId, Vec3};

use crate::reaction::react;
use crate::{AlertBusConfig, AlertEvent, MemberView, Reaction};

/// R-tree entry: an agent's XZ position.
#[derive(Clone, Copy, Debug)]
struct AgentEntry {
    point: [f32; 2],
    id: AgentId,
}

impl RTreeObject for AgentEntry {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for AgentEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dz = self.point[1] - point[1];
        dx * dx + dz * dz
    }
}

#[derive(Debug)]
pub struct AlertBus {
    config: AlertBusConfig,
    index: RTree<AgentEntry>,
    log: VecDeque<AlertEvent>,
}

impl AlertBus {
    pub fn new(config: AlertBusConfig) -> Self {
        Self { config, index: RTree::new(), log: VecDeque::new() }
    }

    pub fn config(&self) -> &AlertBusConfig {
        &self.config
    }

    /// Replace the spatial index with the given positions.
    pub fn rebuild_index<I>(&mut self, agents: I)
    where
        I: IntoIterator<Item = (AgentId, Vec3)>,
    {
        let entries: Vec<AgentEntry> = agents
            .into_iter()
            .map(|(id, p)| AgentEntry { point: [p.x, p.z], id })
            .collect();
        self.index = RTree::bulk_load(entries);
    }

    pub fn indexed(&self) -> usize {
        self.index.size()
    }

    /// Log `event` and return one reaction per living agent in range, in
    /// ascending id order.  The originating agent is skipped.
    pub fn broadcast<V: MemberView + ?Sized>(&mut self, event: AlertEvent, view: &V) -> Vec<Reaction> {
        self.prune(event.created_at);
        self.log.push_back(event);

        let range = self.config.global_range;
        let mut ids: Vec<AgentId> = self
            .index
            .locate_within_distance([event.position.x, event.position.z], range * range)
            .map(|e| e.id)
            .filter(|&id| Some(id) != event.origin)
            .collect();
        ids.sort_unstable();

        let reactions: Vec<Reaction> = ids
            .into_iter()
            .filter_map(|id| view.living(id))
            .filter(|m| m.position.distance_xz(event.position) <= range)
            .filter_map(|m| react(&event, &m, &self.config.reactions))
            .collect();

        tracing::debug!(category = %event.category, reached = reactions.len(), "bus broadcast");
        reactions
    }

    /// Drop events older than the retention window.
    pub fn prune(&mut self, now: f64) {
        while self.log.front().is_some_and(|e| e.is_expired(now, self.config.event_ttl_secs)) {
            self.log.pop_front();
        }
    }

    /// Retained events, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &AlertEvent> + '_ {
        self.log.iter()
    }
}

impl Default for AlertBus {
    fn default() -> Self {
        Self::new(AlertBusConfig::default())
    }
}

//! Dead agents waiting for removal.

use std::collections::BTreeMap;

use npc_core::{AgentId, Tick};

/// `Tick → agents to remove at that tick`.  Sparse; only ticks with work
/// have an entry.
#[derive(Debug, Default)]
pub struct DespawnQueue {
    inner: BTreeMap<Tick, Vec<AgentId>>,
    total: usize,
}

impl DespawnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tick: Tick, agent: AgentId) {
        self.inner.entry(tick).or_default().push(agent);
        self.total += 1;
    }

    /// Remove and return every agent due at or before `tick`, ascending.
    pub fn drain_due(&mut self, tick: Tick) -> Vec<AgentId> {
        let later = self.inner.split_off(&Tick(tick.0 + 1));
        let due = std::mem::replace(&mut self.inner, later);
        let mut agents: Vec<AgentId> = due.into_values().flatten().collect();
        self.total -= agents.len();
        agents.sort_unstable();
        agents
    }

    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

//! Stable-id agent storage.
//!
//! Ids are slot indices and are never reused, so a stale id held by a
//! group or an event simply fails to resolve once its agent is removed.

use npc_core::AgentId;

use crate::{Agent, AgentBuilder, AgentResult};

#[derive(Default)]
pub struct AgentArena {
    slots: Vec<Option<Agent>>,
    live: usize,
}

impl AgentArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and insert an agent under the next id.
    pub fn spawn(&mut self, builder: AgentBuilder) -> AgentResult<AgentId> {
        let id = AgentId(self.slots.len() as u32);
        let agent = builder.build(id)?;
        self.slots.push(Some(agent));
        self.live += 1;
        Ok(id)
    }

    /// Id the next `spawn` will assign.
    pub fn next_id(&self) -> AgentId {
        AgentId(self.slots.len() as u32)
    }

    /// Remove an agent in O(1).  Its id stays retired.
    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        let agent = self.slots.get_mut(id.index())?.take()?;
        self.live -= 1;
        Some(agent)
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.slots.get(id.index())?.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.get(id).is_some()
    }

    /// Number of agents currently present.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.iter().map(|a| a.id())
    }

    /// Live agents in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> + '_ {
        self.slots.iter_mut().flatten()
    }

    /// All slots, including retired ones, for parallel iteration.
    pub fn slots_mut(&mut self) -> &mut [Option<Agent>] {
        &mut self.slots
    }
}

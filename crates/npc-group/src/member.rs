//! Read-only view of the agents a group refers to.
//!
//! Groups never own agents.  They hold ids and look up the fields they need
//! through [`MemberView`]; an id that no longer resolves is a dead member.

use npc_core::{AgentId, Archetype, BehaviorState, Vec3};

/// The slice of agent state group logic reads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MemberInfo {
    pub id: AgentId,
    pub archetype: Archetype,
    pub position: Vec3,
    pub intelligence: f32,
    pub state: BehaviorState,
    pub alive: bool,
}

pub trait MemberView {
    fn member(&self, id: AgentId) -> Option<MemberInfo>;

    /// Resolves `id` only if the agent is still alive.
    fn living(&self, id: AgentId) -> Option<MemberInfo> {
        self.member(id).filter(|m| m.alive)
    }
}

impl MemberView for [MemberInfo] {
    fn member(&self, id: AgentId) -> Option<MemberInfo> {
        self.iter().find(|m| m.id == id).copied()
    }
}

//! Persistable agent state.

use npc_core::{AgentId, Archetype, BehaviorState, Vec3};

/// What a save system needs to bring an agent back.
///
/// Restoring re-seeds these fields on an already spawned agent of the same
/// archetype; nothing else about spawning is repeated.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub archetype: Archetype,
    pub position: Vec3,
    pub facing: Vec3,
    pub health: f32,
    pub stamina: f32,
    pub state: BehaviorState,
    pub previous_state: BehaviorState,
    pub alertness: f32,
    pub last_known_position: Option<Vec3>,
    pub patrol_index: usize,
}

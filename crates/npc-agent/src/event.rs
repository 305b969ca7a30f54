//! Notifications an agent emits for external observers and for the
//! simulation's apply phase.

use npc_core::{AgentId, AlertCategory, BehaviorState, TargetId, Vec3};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentEvent {
    StateChanged { agent: AgentId, from: BehaviorState, to: BehaviorState },
    HealthChanged { agent: AgentId, from: f32, to: f32 },
    Died { agent: AgentId, position: Vec3 },
    /// Outgoing alert, routed to the agent's group and the alert bus.
    Alert { agent: AgentId, category: AlertCategory, position: Vec3, intensity: f32 },
    /// A wind-up matured in range; the simulation applies the damage.
    Hit { agent: AgentId, target: TargetId, amount: f32, direction: Vec3 },
}

impl AgentEvent {
    pub fn agent(&self) -> AgentId {
        match self {
            AgentEvent::StateChanged { agent, .. }
            | AgentEvent::HealthChanged { agent, .. }
            | AgentEvent::Died { agent, .. }
            | AgentEvent::Alert { agent, .. }
            | AgentEvent::Hit { agent, .. } => *agent,
        }
    }
}

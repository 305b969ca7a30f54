use thiserror::Error;

use npc_behavior::BehaviorError;
use npc_core::{AgentId, Archetype, BehaviorState, NpcError};
use npc_engagement::EngagementError;
use npc_locomotion::LocomotionError;
use npc_sensor::SensorError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("{archetype} tree patrols but the agent has no patrol points")]
    EmptyPatrolRoute { archetype: Archetype },

    #[error("invalid {archetype} parameters: {reason}")]
    InvalidParams { archetype: Archetype, reason: String },

    #[error("snapshot of a {found} cannot be restored into a {expected}")]
    ArchetypeMismatch { expected: Archetype, found: Archetype },

    #[error("snapshot in state {state} has no health left")]
    LifelessSnapshot { state: BehaviorState },

    #[error("agent {0} not found")]
    NotFound(AgentId),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("behavior tree error: {0}")]
    Tree(#[from] BehaviorError),

    #[error("locomotion error: {0}")]
    Locomotion(#[from] LocomotionError),

    #[error("sensor error: {0}")]
    Sensor(#[from] SensorError),

    #[error("engagement error: {0}")]
    Engagement(#[from] EngagementError),

    #[error(transparent)]
    Core(#[from] NpcError),
}

pub type AgentResult<T> = Result<T, AgentError>;

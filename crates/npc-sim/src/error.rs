use thiserror::Error;

use npc_agent::AgentError;
use npc_core::{AgentId, TargetId};
use npc_group::GroupError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("agent {0} not found")]
    UnknownAgent(AgentId),

    #[error("target {0} not found")]
    UnknownTarget(TargetId),

    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("group error: {0}")]
    Group(#[from] GroupError),
}

pub type SimResult<T> = Result<T, SimError>;

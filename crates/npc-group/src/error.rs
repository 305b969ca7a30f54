use thiserror::Error;

use npc_core::{AgentId, GroupId};

#[derive(Debug, Error, PartialEq)]
pub enum GroupError {
    #[error("agent {agent} already belongs to group {group}")]
    AlreadyGrouped { agent: AgentId, group: GroupId },

    #[error("group {group} is full ({max} members)")]
    GroupFull { group: GroupId, max: usize },

    #[error("group {0} not found")]
    UnknownGroup(GroupId),

    #[error("agent {0} is unknown or dead")]
    UnknownAgent(AgentId),

    #[error("a group needs at least one member")]
    EmptyGroup,

    #[error("invalid group config: {0}")]
    InvalidConfig(String),
}

pub type GroupResult<T> = Result<T, GroupError>;

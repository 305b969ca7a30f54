//! Shared error type.
//!
//! Sub-crates define their own enums and wrap `NpcError` as one variant
//! where they surface core failures.

use thiserror::Error;

use crate::{AgentId, GroupId};

#[derive(Debug, Error)]
pub enum NpcError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("group {0} not found")]
    GroupNotFound(GroupId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `npc-*` crates.
pub type NpcResult<T> = Result<T, NpcError>;

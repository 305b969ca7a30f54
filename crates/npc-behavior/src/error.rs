//! Tree construction errors.  Execution itself never fails.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BehaviorError {
    #[error("{kind} node at depth {depth} has no children")]
    EmptyComposite { kind: &'static str, depth: usize },

    #[error("repeater at depth {depth} has an iteration budget of zero")]
    ZeroRepeat { depth: usize },
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;

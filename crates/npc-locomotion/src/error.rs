use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocomotionError {
    #[error("patrol behavior selected but the patrol route has no points")]
    EmptyPatrolRoute,

    #[error("invalid locomotion config: {0}")]
    InvalidConfig(String),
}

pub type LocomotionResult<T> = Result<T, LocomotionError>;

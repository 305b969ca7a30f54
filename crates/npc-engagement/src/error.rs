use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngagementError {
    #[error("invalid engagement config: {0}")]
    InvalidConfig(String),
}

pub type EngagementResult<T> = Result<T, EngagementError>;

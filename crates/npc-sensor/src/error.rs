use thiserror::Error;

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("invalid sensor config: {0}")]
    InvalidConfig(String),
}

pub type SensorResult<T> = Result<T, SensorError>;

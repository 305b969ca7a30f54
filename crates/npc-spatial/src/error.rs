//! Spatial-subsystem error type.

use thiserror::Error;

use npc_core::Vec3;

/// Errors produced by `npc-spatial`.
///
/// `NoPath` and `NotNavigable` are transient environment failures: callers
/// downgrade them to "path invalid" rather than propagating.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no path from {from} to {to}")]
    NoPath { from: Vec3, to: Vec3 },

    #[error("point {0} is not on the navigable surface")]
    NotNavigable(Vec3),

    #[error("invalid navigation field: {0}")]
    InvalidField(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;

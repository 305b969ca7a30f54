//! `npc-locomotion` — moving an agent through the world.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`config`]   | `LocomotionConfig`                                          |
//! | [`state`]    | `LocomotionState`, `PatrolRoute`                            |
//! | [`recovery`] | `RecoveryOutcome`, `attempt_recovery` (stuck escape probes) |
//! | [`engine`]   | `Locomotion` — the per-agent path follower                  |
//! | [`error`]    | `LocomotionError`, `LocomotionResult<T>`                    |
//!
//! # Movement model
//!
//! Kinematic: each tick the agent walks `speed * dt` metres along the
//! current [`NavPath`](npc_spatial::NavPath), never through a segment the
//! provider reports as blocked.  Paths are requested on a fixed interval,
//! not every tick.  If progress stalls for too long the engine runs the
//! three-step recovery in [`recovery`] and otherwise waits for the next
//! interval; it never fails hard.

pub mod config;
pub mod engine;
pub mod error;
pub mod recovery;
pub mod state;


pub use config::LocomotionConfig;
pub use engine::Locomotion;
pub use error::{LocomotionError, LocomotionResult};
pub use recovery::{attempt_recovery, RecoveryOutcome, RADIAL_PROBES};
pub use state::{LocomotionState, PatrolRoute};

//! `npc-engagement` — the combat state machine of one agent.
//!
//! | Module         | Contents                                           |
//! |----------------|----------------------------------------------------|
//! | [`config`]     | `EngagementConfig`                                 |
//! | [`state`]      | `EngagementState`                                  |
//! | [`hit`]        | `Hit`, `PendingHit`                                |
//! | [`outcome`]    | `Temperament`, `DamageOutcome`                     |
//! | [`engagement`] | `Engagement`                                       |
//! | [`error`]      | `EngagementError`, `EngagementResult<T>`           |
//!
//! Engagement never kills anyone.  It lowers health and reports what the
//! hit provoked in a [`DamageOutcome`]; the agent orchestrator decides
//! whether that means death, flight or a stun.

pub mod config;
pub mod engagement;
pub mod error;
pub mod hit;
pub mod outcome;
pub mod state;

#[cfg(test)]
mod tests;

pub use config::EngagementConfig;
pub use engagement::Engagement;
pub use error::{EngagementError, EngagementResult};
pub use hit::{Hit, PendingHit};
pub use outcome::{DamageOutcome, Temperament};
pub use state::EngagementState;

//! `npc-sim` — the simulation service for the NPC decision core.
//!
//! # Two-phase tick
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Agents  — Sensor → Locomotion → Engagement → tree → stamina for every
//!               living agent (parallel with the `parallel` feature).
//!   ② Apply   — drain agent outboxes in ascending AgentId order:
//!                 Hit     → damage the external target
//!                 Alert   → group broadcast (+ global bus for alarms)
//!                 Died    → ally-down broadcast, schedule despawn
//!               group morale update; apply every Reaction; despawn.
//! ```
//!
//! Group registry, alert bus, target registry and despawn queue are plain
//! fields of [`Sim`], constructed once by [`SimBuilder`] and passed by
//! reference to whatever needs them.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the agent phase on Rayon's thread pool.           |
//! | `serde`    | Serde derives on `TickSummary` and the agent types.    |

pub mod builder;
pub mod despawn;
pub mod error;
pub mod observer;
pub mod sim;
pub mod summary;
pub mod target;
mod view;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use despawn::DespawnQueue;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, SummaryLog};
pub use sim::Sim;
pub use summary::TickSummary;
pub use target::{ExternalTarget, TargetRegistry};

//! `npc-core` — foundational types for the NPC decision core.
//!
//! Every other `npc-*` crate depends on this one.  It has no `npc-*`
//! dependencies and only `rand` and `thiserror` externally (plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`alert`]     | `AlertCategory`                                         |
//! | [`ids`]       | `AgentId`, `GroupId`, `TargetId`                        |
//! | [`math`]      | `Vec3` and horizontal-plane helpers                     |
//! | [`time`]      | `Tick`, `SimClock`, `SimConfig`                         |
//! | [`rng`]       | `AgentRng`, one per agent                               |
//! | [`state`]     | `BehaviorState`, `Archetype`                            |
//! | [`target`]    | `TargetInfo`, `TargetLocator`, `DamageReceiver`         |
//! | [`error`]     | `NpcError`, `NpcResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod alert;
pub mod error;
pub mod ids;
pub mod math;
pub mod rng;
pub mod state;
pub mod target;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use alert::AlertCategory;
pub use error::{NpcError, NpcResult};
pub use ids::{AgentId, GroupId, TargetId};
pub use math::Vec3;
pub use rng::AgentRng;
pub use state::{Archetype, BehaviorState};
pub use target::{DamageReceiver, TargetInfo, TargetLocator};
pub use time::{SimClock, SimConfig, Tick};

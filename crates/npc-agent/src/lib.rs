//! `npc-agent` — the agent orchestrator.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`params`]    | `ArchetypeParams` and derived subsystem configs             |
//! | [`loader`]    | `ArchetypeTable` (CSV overrides of the built-ins)           |
//! | [`body`]      | `AgentBody` — state and owned subsystems, read-only         |
//! | [`command`]   | `Command`, `Gait`, `Order` — what actions and callers ask for |
//! | [`event`]     | `AgentEvent` — outgoing notifications                       |
//! | [`context`]   | `TickContext`, `BrainContext`                               |
//! | [`nodes`]     | `Cond`, `Act` — condition and action vocabulary             |
//! | [`templates`] | Built-in tree per archetype                                 |
//! | [`agent`]     | `Agent` — the fixed-order per-tick loop                     |
//! | [`snapshot`]  | `AgentSnapshot`                                             |
//! | [`builder`]   | `AgentBuilder`                                              |
//! | [`arena`]     | `AgentArena` — stable ids, O(1) removal                     |
//! | [`error`]     | `AgentError`, `AgentResult<T>`                              |
//!
//! # Design notes
//!
//! Tree conditions read the [`AgentBody`]; tree actions only push
//! [`Command`]s, which the agent applies after the pass.  Nothing in the
//! tree holds a mutable reference to a subsystem.
//!
//! An agent only touches its own state.  Anything that crosses agents
//! (hits on targets, alerts, deaths) leaves through the [`AgentEvent`]
//! outbox and is routed by the simulation.

pub mod agent;
pub mod arena;
pub mod body;
pub mod builder;
pub mod command;
pub mod context;
pub mod error;
pub mod event;
pub mod loader;
pub mod nodes;
pub mod params;
pub mod snapshot;
pub mod templates;


pub use agent::Agent;
pub use arena::AgentArena;
pub use body::AgentBody;
pub use builder::AgentBuilder;
pub use command::{Command, Gait, Order};
pub use context::{BrainContext, TickContext};
pub use error::{AgentError, AgentResult};
pub use event::AgentEvent;
pub use loader::ArchetypeTable;
pub use nodes::{Act, Cond};
pub use params::ArchetypeParams;
pub use snapshot::AgentSnapshot;
pub use templates::{template, AgentTreeSpec};
pub use npc_engagement::DamageOutcome;

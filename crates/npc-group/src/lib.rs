//! `npc-group` — communication groups and the global alert bus.
//!
//! Agents never touch each other.  Cross-agent effects travel as
//! [`AlertEvent`]s; groups and the bus turn each event into per-member
//! [`Reaction`]s that the simulation applies to its agent arena in the
//! sequential phase of a tick.  Nothing here owns an agent: membership is a
//! list of [`AgentId`](npc_core::AgentId)s resolved through [`MemberView`],
//! and an id that no longer resolves is simply a dead member.
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`alert`]    | `AlertEvent`                                            |
//! | [`reaction`] | `Reaction`, `ReactionKind`, category → reaction mapping |
//! | [`member`]   | `MemberInfo`, `MemberView`                              |
//! | [`group`]    | `Group`: morale, cohesive/broken modes, tactics         |
//! | [`registry`] | `GroupRegistry`: authoring, proximity assignment        |
//! | [`bus`]      | `AlertBus`: range broadcast over an R-tree              |
//! | [`config`]   | `GroupConfig`, `AlertBusConfig`, `ReactionConfig`       |
//! | [`error`]    | `GroupError`, `GroupResult`                             |

pub mod alert;
pub mod bus;
pub mod config;
pub mod error;
pub mod group;
pub mod member;
pub mod reaction;
pub mod registry;


pub use alert::AlertEvent;
pub use bus::AlertBus;
pub use config::{AlertBusConfig, GroupConfig, ReactionConfig};
pub use error::{GroupError, GroupResult};
pub use group::{Group, GroupMode, TacticFlags, MAX_MORALE};
pub use member::{MemberInfo, MemberView};
pub use reaction::{react, Reaction, ReactionKind};
pub use registry::GroupRegistry;

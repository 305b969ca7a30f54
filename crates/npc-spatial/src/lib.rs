//! `npc-spatial` — the navigation seam.
//!
//! Agents never build navigation graphs.  They call a [`NavQuery`]
//! provider (a game engine's navmesh in production) for three things:
//! snapping a point onto the walkable surface, finding a path, and testing
//! line of sight.  [`NavField`] is a small reference provider used by the
//! demo and by tests.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`query`]  | `NavQuery` trait, `NavPath`                                |
//! | [`field`]  | `NavField` (bounds + R-tree of box obstacles), builder     |
//! | [`error`]  | `SpatialError`, `SpatialResult<T>`                         |

pub mod error;
pub mod field;
pub mod query;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use field::{NavField, NavFieldBuilder};
pub use query::{NavPath, NavQuery};

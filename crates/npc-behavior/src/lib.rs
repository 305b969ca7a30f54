//! `npc-behavior` — a small, resumable decision tree interpreter.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`status`]  | `NodeResult` (`Ready`, `Running`, `Success`, `Failure`)       |
//! | [`leaf`]    | `Condition` / `Action` traits, `Phase`                        |
//! | [`spec`]    | `NodeSpec` tree description and builder helpers               |
//! | [`tree`]    | `DecisionTree` — flattened nodes plus per-node memory         |
//! | [`error`]   | `BehaviorError`, `BehaviorResult<T>`                          |
//!
//! # Design notes
//!
//! A tree is described once as a nested [`NodeSpec`] value and compiled
//! into a [`DecisionTree`]: node kinds live in a flat, post-ordered `Vec`
//! and everything that changes between ticks (last result, child cursor,
//! repeat count) lives in a parallel `Vec` of [`NodeMemory`].  Execution is
//! a plain `match` over the node kind; there are no per-node trait objects.
//!
//! A node that returns [`NodeResult::Running`] is resumed at the same child
//! on the next `execute`.  Nothing is re-evaluated above it: callers that
//! need to react to a change in the world call [`DecisionTree::reset`] and
//! run the tree again from the root.
//!
//! Leaves are generic.  The tree is parameterised over a condition type
//! and an action type (usually two enums) and over the context `C` they
//! read and write.

pub mod error;
pub mod leaf;
pub mod spec;
pub mod status;
pub mod tree;

#[cfg(test)]
mod tests;

pub use error::{BehaviorError, BehaviorResult};
pub use leaf::{Action, Condition, Phase};
pub use spec::{action, condition, inverter, repeat, repeat_forever, selector, sequence, NodeSpec, RepeatLimit};
pub use status::NodeResult;
pub use tree::{DecisionTree, NodeMemory};

//! Leaf node traits.

use crate::NodeResult;

/// Whether an action is being entered or resumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// First execute of this activation (the node was not `Running`).
    Start,
    /// The action returned `Running` last time.
    Resume,
}

/// A pure predicate over the context.
pub trait Condition<C> {
    fn check(&self, ctx: &C) -> bool;
}

/// A side-effecting leaf.
///
/// Implementations return `Success`, `Failure` or `Running`.  A stray
/// `Ready` is treated as `Failure`.
pub trait Action<C> {
    fn execute(&self, ctx: &mut C, phase: Phase) -> NodeResult;
}

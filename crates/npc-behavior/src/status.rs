//! Result of executing a node.

/// The state a node is in after (or before) an `execute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeResult {
    /// Not executed since construction or the last reset.
    #[default]
    Ready,
    /// Suspended; resumed at the same point on the next execute.
    Running,
    Success,
    Failure,
}

impl NodeResult {
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, NodeResult::Running)
    }

    /// `Success` or `Failure`.
    #[inline]
    pub fn is_done(self) -> bool {
        matches!(self, NodeResult::Success | NodeResult::Failure)
    }

    /// Swap `Success` and `Failure`; other states pass through.
    #[inline]
    pub fn invert(self) -> NodeResult {
        match self {
            NodeResult::Success => NodeResult::Failure,
            NodeResult::Failure => NodeResult::Success,
            other => other,
        }
    }

    #[inline]
    pub fn from_bool(ok: bool) -> NodeResult {
        if ok { NodeResult::Success } else { NodeResult::Failure }
    }
}

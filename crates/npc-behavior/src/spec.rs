//! Declarative tree description.
//!
//! ```
//! use npc_behavior::{action, condition, selector, sequence, NodeSpec};
//!
//! // Condition type `bool`, action type `&str`, just to show the shape.
//! let spec: NodeSpec<bool, &str> = selector(vec![
//!     sequence(vec![condition(true), action("attack")]),
//!     action("patrol"),
//! ]);
//! assert_eq!(spec.node_count(), 5);
//! ```

/// How many times a repeater runs its child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RepeatLimit {
    Times(u32),
    /// Never succeeds.  One iteration per execute, then `Running`.
    Forever,
}

/// A tree as authored: nested, owning its children.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeSpec<Cd, Ac> {
    Condition(Cd),
    Action(Ac),
    Selector(Vec<NodeSpec<Cd, Ac>>),
    Sequence(Vec<NodeSpec<Cd, Ac>>),
    Inverter(Box<NodeSpec<Cd, Ac>>),
    Repeater { limit: RepeatLimit, child: Box<NodeSpec<Cd, Ac>> },
}

impl<Cd, Ac> NodeSpec<Cd, Ac> {
    pub fn node_count(&self) -> usize {
        match self {
            NodeSpec::Condition(_) | NodeSpec::Action(_) => 1,
            NodeSpec::Selector(children) | NodeSpec::Sequence(children) => {
                1 + children.iter().map(NodeSpec::node_count).sum::<usize>()
            }
            NodeSpec::Inverter(child) | NodeSpec::Repeater { child, .. } => 1 + child.node_count(),
        }
    }

    /// `true` if any leaf satisfies `pred`.
    pub fn any_action(&self, pred: &impl Fn(&Ac) -> bool) -> bool {
        match self {
            NodeSpec::Condition(_) => false,
            NodeSpec::Action(a) => pred(a),
            NodeSpec::Selector(children) | NodeSpec::Sequence(children) => {
                children.iter().any(|c| c.any_action(pred))
            }
            NodeSpec::Inverter(child) | NodeSpec::Repeater { child, .. } => child.any_action(pred),
        }
    }
}

// ── Builder helpers ───────────────────────────────────────────────────────────

#[inline]
pub fn condition<Cd, Ac>(c: Cd) -> NodeSpec<Cd, Ac> {
    NodeSpec::Condition(c)
}

#[inline]
pub fn action<Cd, Ac>(a: Ac) -> NodeSpec<Cd, Ac> {
    NodeSpec::Action(a)
}

#[inline]
pub fn selector<Cd, Ac>(children: Vec<NodeSpec<Cd, Ac>>) -> NodeSpec<Cd, Ac> {
    NodeSpec::Selector(children)
}

#[inline]
pub fn sequence<Cd, Ac>(children: Vec<NodeSpec<Cd, Ac>>) -> NodeSpec<Cd, Ac> {
    NodeSpec::Sequence(children)
}

#[inline]
pub fn inverter<Cd, Ac>(child: NodeSpec<Cd, Ac>) -> NodeSpec<Cd, Ac> {
    NodeSpec::Inverter(Box::new(child))
}

#[inline]
pub fn repeat<Cd, Ac>(times: u32, child: NodeSpec<Cd, Ac>) -> NodeSpec<Cd, Ac> {
    NodeSpec::Repeater { limit: RepeatLimit::Times(times), child: Box::new(child) }
}

#[inline]
pub fn repeat_forever<Cd, Ac>(child: NodeSpec<Cd, Ac>) -> NodeSpec<Cd, Ac> {
    NodeSpec::Repeater { limit: RepeatLimit::Forever, child: Box::new(child) }
}

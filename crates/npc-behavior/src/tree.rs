//! Compiled decision tree and its interpreter.

use crate::{Action, BehaviorError, BehaviorResult, Condition, NodeResult, NodeSpec, Phase, RepeatLimit};

// ── Flat node storage ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Node<Cd, Ac> {
    Condition(Cd),
    Action(Ac),
    Selector(Box<[usize]>),
    Sequence(Box<[usize]>),
    Inverter(usize),
    Repeater { limit: RepeatLimit, child: usize },
}

/// Mutable per-node state, kept outside the node kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeMemory {
    /// Result of the most recent execute of this node.
    pub result: NodeResult,
    /// Index (into the composite's children) of the child to resume.
    pub cursor: u32,
    /// Completed iterations of a repeater.
    pub iterations: u32,
}

/// A decision tree compiled from a [`NodeSpec`].
///
/// Nodes are stored in post-order, so every subtree occupies a contiguous
/// index range ending at its root and the tree root is the last node.
/// Resetting a subtree is a slice fill over that range.
#[derive(Debug, Clone)]
pub struct DecisionTree<Cd, Ac> {
    nodes: Vec<Node<Cd, Ac>>,
    /// `subtree_start[i]..=i` is the subtree rooted at `i`.
    subtree_start: Vec<usize>,
    memory: Vec<NodeMemory>,
}

impl<Cd, Ac> DecisionTree<Cd, Ac> {
    /// Compile `spec`.  Fails on empty composites and zero-count repeaters.
    pub fn new(spec: NodeSpec<Cd, Ac>) -> BehaviorResult<Self> {
        let capacity = spec.node_count();
        let mut tree = DecisionTree {
            nodes: Vec::with_capacity(capacity),
            subtree_start: Vec::with_capacity(capacity),
            memory: Vec::with_capacity(capacity),
        };
        tree.push(spec, 0)?;
        Ok(tree)
    }

    fn push(&mut self, spec: NodeSpec<Cd, Ac>, depth: usize) -> BehaviorResult<usize> {
        let start = self.nodes.len();
        let node = match spec {
            NodeSpec::Condition(c) => Node::Condition(c),
            NodeSpec::Action(a) => Node::Action(a),
            NodeSpec::Selector(children) => {
                if children.is_empty() {
                    return Err(BehaviorError::EmptyComposite { kind: "selector", depth });
                }
                Node::Selector(self.push_children(children, depth)?)
            }
            NodeSpec::Sequence(children) => {
                if children.is_empty() {
                    return Err(BehaviorError::EmptyComposite { kind: "sequence", depth });
                }
                Node::Sequence(self.push_children(children, depth)?)
            }
            NodeSpec::Inverter(child) => Node::Inverter(self.push(*child, depth + 1)?),
            NodeSpec::Repeater { limit, child } => {
                if limit == RepeatLimit::Times(0) {
                    return Err(BehaviorError::ZeroRepeat { depth });
                }
                let child = self.push(*child, depth + 1)?;
                Node::Repeater { limit, child }
            }
        };
        let idx = self.nodes.len();
        self.nodes.push(node);
        self.subtree_start.push(start);
        self.memory.push(NodeMemory::default());
        Ok(idx)
    }

    fn push_children(&mut self, children: Vec<NodeSpec<Cd, Ac>>, depth: usize) -> BehaviorResult<Box<[usize]>> {
        children
            .into_iter()
            .map(|c| self.push(c, depth + 1))
            .collect::<BehaviorResult<Vec<_>>>()
            .map(Vec::into_boxed_slice)
    }

    #[inline]
    fn root(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Result of the most recent `execute` (`Ready` after construction or reset).
    pub fn result(&self) -> NodeResult {
        self.memory[self.root()].result
    }

    pub fn is_running(&self) -> bool {
        self.result().is_running()
    }

    /// Memory of every node, in post-order.
    pub fn memory(&self) -> &[NodeMemory] {
        &self.memory
    }

    /// Every node back to `Ready` with cursors and counters zeroed.
    pub fn reset(&mut self) {
        self.memory.fill(NodeMemory::default());
    }

    /// Run one pass from the root.
    ///
    /// A root left `Running` by the previous call is resumed; otherwise the
    /// pass starts a new activation.
    pub fn execute<C>(&mut self, ctx: &mut C) -> NodeResult
    where
        Cd: Condition<C>,
        Ac: Action<C>,
    {
        let root = self.root();
        let result = run(&self.nodes, &self.subtree_start, &mut self.memory, root, ctx);
        tracing::trace!(?result, "decision tree pass");
        result
    }
}

// ── Interpreter ───────────────────────────────────────────────────────────────

fn reset_children(start: &[usize], memory: &mut [NodeMemory], idx: usize) {
    memory[start[idx]..idx].fill(NodeMemory::default());
}

fn run<Cd, Ac, C>(
    nodes: &[Node<Cd, Ac>],
    start: &[usize],
    memory: &mut [NodeMemory],
    idx: usize,
    ctx: &mut C,
) -> NodeResult
where
    Cd: Condition<C>,
    Ac: Action<C>,
{
    let fresh = !memory[idx].result.is_running();
    if fresh {
        memory[idx].cursor = 0;
        memory[idx].iterations = 0;
        reset_children(start, memory, idx);
    }

    let result = match &nodes[idx] {
        Node::Condition(c) => NodeResult::from_bool(c.check(ctx)),

        Node::Action(a) => {
            let phase = if fresh { Phase::Start } else { Phase::Resume };
            match a.execute(ctx, phase) {
                NodeResult::Ready => NodeResult::Failure,
                r => r,
            }
        }

        Node::Selector(children) => {
            let mut out = NodeResult::Failure;
            while let Some(&child) = children.get(memory[idx].cursor as usize) {
                match run(nodes, start, memory, child, ctx) {
                    NodeResult::Failure => memory[idx].cursor += 1,
                    r => {
                        out = r;
                        break;
                    }
                }
            }
            out
        }

        Node::Sequence(children) => {
            let mut out = NodeResult::Success;
            while let Some(&child) = children.get(memory[idx].cursor as usize) {
                match run(nodes, start, memory, child, ctx) {
                    NodeResult::Success => memory[idx].cursor += 1,
                    r => {
                        out = r;
                        break;
                    }
                }
            }
            out
        }

        Node::Inverter(child) => run(nodes, start, memory, *child, ctx).invert(),

        Node::Repeater { limit: RepeatLimit::Times(n), child } => {
            let child = *child;
            let mut out = NodeResult::Success;
            while memory[idx].iterations < *n {
                if memory[child].result.is_done() {
                    memory[start[child]..=child].fill(NodeMemory::default());
                }
                if run(nodes, start, memory, child, ctx).is_running() {
                    out = NodeResult::Running;
                    break;
                }
                memory[idx].iterations += 1;
            }
            out
        }

        // One iteration per pass; never completes.
        Node::Repeater { limit: RepeatLimit::Forever, child } => {
            let child = *child;
            if memory[child].result.is_done() {
                memory[start[child]..=child].fill(NodeMemory::default());
            }
            if !run(nodes, start, memory, child, ctx).is_running() {
                memory[idx].iterations = memory[idx].iterations.saturating_add(1);
            }
            NodeResult::Running
        }
    };

    memory[idx].result = result;
    result
}

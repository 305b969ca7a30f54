use std::collections::VecDeque;

use crate::*;

// ── Test fixture ──────────────────────────────────────────────────────────────

/// Context: a call log plus scripted results per action name.
#[derive(Default)]
struct Ctx {
    calls: Vec<(&'static str, Phase)>,
    scripts: Vec<(&'static str, VecDeque<NodeResult>)>,
    flag: bool,
}

impl Ctx {
    fn script(mut self, name: &'static str, results: &[NodeResult]) -> Self {
        self.scripts.push((name, results.iter().copied().collect()));
        self
    }

    fn count(&self, name: &str) -> usize {
        self.calls.iter().filter(|(n, _)| *n == name).count()
    }
}

#[derive(Debug, Clone, Copy)]
enum Cond {
    Flag,
    Always(bool),
}

impl Condition<Ctx> for Cond {
    fn check(&self, ctx: &Ctx) -> bool {
        match self {
            Cond::Flag => ctx.flag,
            Cond::Always(b) => *b,
        }
    }
}

/// An action that pops its next result from the script, repeating the last
/// one once the script is exhausted; unscripted names succeed.
#[derive(Debug, Clone, Copy)]
struct Act(&'static str);

impl Action<Ctx> for Act {
    fn execute(&self, ctx: &mut Ctx, phase: Phase) -> NodeResult {
        ctx.calls.push((self.0, phase));
        match ctx.scripts.iter_mut().find(|(n, _)| *n == self.0) {
            Some((_, q)) if q.len() > 1 => q.pop_front().unwrap_or(NodeResult::Success),
            Some((_, q)) => q.front().copied().unwrap_or(NodeResult::Success),
            None => NodeResult::Success,
        }
    }
}

type Spec = NodeSpec<Cond, Act>;

fn tree(spec: Spec) -> DecisionTree<Cond, Act> {
    DecisionTree::new(spec).unwrap()
}

use NodeResult::{Failure, Ready, Running, Success};

// ── Construction ──────────────────────────────────────────────────────────────

mod construction {
    use super::*;

    #[test]
    fn node_count_matches_spec() {
        let spec: Spec = selector(vec![
            sequence(vec![condition(Cond::Flag), action(Act("a"))]),
            inverter(action(Act("b"))),
        ]);
        assert_eq!(spec.node_count(), 6);
        assert_eq!(tree(spec).node_count(), 6);
    }

    #[test]
    fn fresh_tree_is_ready() {
        let t = tree(action(Act("a")));
        assert_eq!(t.result(), Ready);
        assert!(!t.is_running());
    }

    #[test]
    fn empty_selector_rejected() {
        let err = DecisionTree::<Cond, Act>::new(selector(vec![])).unwrap_err();
        assert_eq!(err, BehaviorError::EmptyComposite { kind: "selector", depth: 0 });
    }

    #[test]
    fn nested_empty_sequence_reports_depth() {
        let spec: Spec = selector(vec![action(Act("a")), sequence(vec![])]);
        let err = DecisionTree::new(spec).unwrap_err();
        assert_eq!(err, BehaviorError::EmptyComposite { kind: "sequence", depth: 1 });
    }

    #[test]
    fn zero_repeat_rejected() {
        let err = DecisionTree::new(repeat(0, action::<Cond, Act>(Act("a")))).unwrap_err();
        assert_eq!(err, BehaviorError::ZeroRepeat { depth: 0 });
    }

    #[test]
    fn any_action_walks_whole_spec() {
        let spec: Spec = selector(vec![condition(Cond::Flag), inverter(repeat(2, action(Act("deep"))))]);
        assert!(spec.any_action(&|a: &Act| a.0 == "deep"));
        assert!(!spec.any_action(&|a: &Act| a.0 == "missing"));
    }
}

// ── Leaves ────────────────────────────────────────────────────────────────────

mod leaves {
    use super::*;

    #[test]
    fn condition_maps_to_success_or_failure() {
        let mut t = tree(condition(Cond::Flag));
        let mut ctx = Ctx::default();
        assert_eq!(t.execute(&mut ctx), Failure);
        ctx.flag = true;
        assert_eq!(t.execute(&mut ctx), Success);
    }

    #[test]
    fn action_phase_is_start_then_resume() {
        let mut t = tree(action(Act("walk")));
        let mut ctx = Ctx::default().script("walk", &[Running, Running, Success]);
        assert_eq!(t.execute(&mut ctx), Running);
        assert_eq!(t.execute(&mut ctx), Running);
        assert_eq!(t.execute(&mut ctx), Success);
        let phases: Vec<Phase> = ctx.calls.iter().map(|(_, p)| *p).collect();
        assert_eq!(phases, vec![Phase::Start, Phase::Resume, Phase::Resume]);
    }

    #[test]
    fn ready_from_action_counts_as_failure() {
        let mut t = tree(action(Act("odd")));
        let mut ctx = Ctx::default().script("odd", &[Ready]);
        assert_eq!(t.execute(&mut ctx), Failure);
    }
}

// ── Composites ────────────────────────────────────────────────────────────────

mod composites {
    use super::*;

    #[test]
    fn selector_fail_then_success_once_per_activation() {
        let mut t = tree(selector(vec![action(Act("fail")), action(Act("ok"))]));
        let mut ctx = Ctx::default().script("fail", &[Failure]);

        for activation in 1..=3 {
            assert_eq!(t.execute(&mut ctx), Success);
            // Each activation starts again at the first child.
            assert_eq!(ctx.count("fail"), activation);
            assert_eq!(ctx.count("ok"), activation);
        }
        assert_eq!(t.memory().last().map(|m| m.result), Some(Success));
    }

    #[test]
    fn selector_all_fail() {
        let mut t = tree(selector(vec![condition(Cond::Always(false)), condition(Cond::Always(false))]));
        assert_eq!(t.execute(&mut Ctx::default()), Failure);
    }

    #[test]
    fn selector_resumes_running_child() {
        let mut t = tree(selector(vec![condition(Cond::Flag), action(Act("slow")), action(Act("never"))]));
        let mut ctx = Ctx::default().script("slow", &[Running, Success]);
        assert_eq!(t.execute(&mut ctx), Running);
        // The condition is not re-checked while the selector is resumed.
        ctx.flag = true;
        assert_eq!(t.execute(&mut ctx), Success);
        assert_eq!(ctx.count("slow"), 2);
        assert_eq!(ctx.count("never"), 0);
    }

    #[test]
    fn sequence_success_running_success() {
        let mut t = tree(sequence(vec![action(Act("first")), action(Act("mid")), action(Act("last"))]));
        let mut ctx = Ctx::default().script("mid", &[Running, Running, Success]);

        assert_eq!(t.execute(&mut ctx), Running);
        assert_eq!(t.execute(&mut ctx), Running);
        assert_eq!(t.execute(&mut ctx), Success);

        assert_eq!(ctx.count("first"), 1);
        assert_eq!(ctx.count("mid"), 3);
        assert_eq!(ctx.count("last"), 1);
    }

    #[test]
    fn sequence_stops_on_failure() {
        let mut t = tree(sequence(vec![condition(Cond::Flag), action(Act("act"))]));
        let mut ctx = Ctx::default();
        assert_eq!(t.execute(&mut ctx), Failure);
        assert_eq!(ctx.count("act"), 0);
    }

    #[test]
    fn inverter_flips_and_passes_running() {
        let mut t = tree(inverter(action(Act("a"))));
        let mut ctx = Ctx::default().script("a", &[Running, Success, Failure]);
        assert_eq!(t.execute(&mut ctx), Running);
        assert_eq!(t.execute(&mut ctx), Failure);
        assert_eq!(t.execute(&mut ctx), Success);
    }
}

// ── Repeater ──────────────────────────────────────────────────────────────────

mod repeater {
    use super::*;

    #[test]
    fn fixed_count_runs_child_n_times() {
        let mut t = tree(repeat(3, action(Act("step"))));
        let mut ctx = Ctx::default();
        assert_eq!(t.execute(&mut ctx), Success);
        assert_eq!(ctx.count("step"), 3);
        // Child phases: every iteration is a fresh start.
        assert!(ctx.calls.iter().all(|(_, p)| *p == Phase::Start));
    }

    #[test]
    fn child_failure_still_counts_as_iteration() {
        let mut t = tree(repeat(2, action(Act("f"))));
        let mut ctx = Ctx::default().script("f", &[Failure]);
        assert_eq!(t.execute(&mut ctx), Success);
        assert_eq!(ctx.count("f"), 2);
    }

    #[test]
    fn running_blocks_iteration() {
        let mut t = tree(repeat(2, action(Act("r"))));
        let mut ctx = Ctx::default().script("r", &[Running, Success, Running, Success]);
        assert_eq!(t.execute(&mut ctx), Running); // iteration 1 running
        assert_eq!(t.execute(&mut ctx), Running); // iteration 1 done, iteration 2 running
        assert_eq!(t.execute(&mut ctx), Success);
        assert_eq!(ctx.count("r"), 4);
    }

    #[test]
    fn forever_never_completes() {
        let mut t = tree(repeat_forever(action(Act("loop"))));
        let mut ctx = Ctx::default();
        for _ in 0..5 {
            assert_eq!(t.execute(&mut ctx), Running);
        }
        assert_eq!(ctx.count("loop"), 5);
        assert_eq!(t.memory().last().map(|m| m.iterations), Some(5));
    }

    #[test]
    fn forever_resets_composite_child_between_iterations() {
        let mut t = tree(repeat_forever(sequence(vec![action(Act("a")), action(Act("b"))])));
        let mut ctx = Ctx::default();
        t.execute(&mut ctx);
        t.execute(&mut ctx);
        assert_eq!(ctx.count("a"), 2);
        assert_eq!(ctx.count("b"), 2);
    }
}

// ── Reset ─────────────────────────────────────────────────────────────────────

mod reset {
    use super::*;

    #[test]
    fn reset_clears_running_state() {
        let mut t = tree(sequence(vec![action(Act("first")), action(Act("slow"))]));
        let mut ctx = Ctx::default().script("slow", &[Running]);
        assert_eq!(t.execute(&mut ctx), Running);

        t.reset();
        assert_eq!(t.result(), Ready);
        assert!(t.memory().iter().all(|m| *m == NodeMemory::default()));

        // After a reset the first child runs again and `slow` starts fresh.
        t.execute(&mut ctx);
        assert_eq!(ctx.count("first"), 2);
        assert_eq!(ctx.calls.last().map(|(_, p)| *p), Some(Phase::Start));
    }
}

//! Built-in decision trees, one per archetype.
//!
//! Each tree is a priority selector: the first branch whose guard holds
//! wins.  Branches that return `Running` keep the agent committed until the
//! orchestrator resets the tree (new sighting, alertness rising edge,
//! forced state change, new order).  A standing external order outranks
//! everything else.

use npc_behavior::{action, condition, inverter, selector, sequence, NodeSpec};
use npc_core::{Archetype, BehaviorState};

use crate::{Act, Cond};

pub type AgentTreeSpec = NodeSpec<Cond, Act>;

pub fn template(archetype: Archetype) -> AgentTreeSpec {
    match archetype {
        Archetype::Grunt => grunt(),
        Archetype::Scout => scout(),
        Archetype::Brute => brute(),
        Archetype::Sentry => sentry(),
    }
}

fn follow_order() -> AgentTreeSpec {
    sequence(vec![condition(Cond::HasOrder), action(Act::FollowOrder)])
}

fn keep_fleeing() -> AgentTreeSpec {
    sequence(vec![condition(Cond::InState(BehaviorState::Flee)), action(Act::Flee)])
}

fn attack_if_in_range() -> AgentTreeSpec {
    sequence(vec![
        condition(Cond::CanSeeTarget),
        condition(Cond::TargetInAttackRange),
        action(Act::AttackTarget),
    ])
}

fn hunt_last_known() -> AgentTreeSpec {
    sequence(vec![condition(Cond::HasLastKnownPosition), action(Act::ChaseTarget)])
}

fn investigate_sounds() -> AgentTreeSpec {
    sequence(vec![condition(Cond::HasHeardSound), action(Act::Investigate)])
}

fn hold_if_alert() -> AgentTreeSpec {
    sequence(vec![condition(Cond::ShouldBeAlert), action(Act::HoldAlert)])
}

/// Fights, calls for backup when hurt, patrols otherwise.
fn grunt() -> AgentTreeSpec {
    selector(vec![
        follow_order(),
        keep_fleeing(),
        attack_if_in_range(),
        sequence(vec![
            condition(Cond::CanSeeTarget),
            condition(Cond::HealthBelow(0.5)),
            condition(Cond::AlarmReady),
            action(Act::RequestBackup),
        ]),
        sequence(vec![
            condition(Cond::CanSeeTarget),
            inverter(condition(Cond::TargetInAttackRange)),
            action(Act::ChaseTarget),
        ]),
        hunt_last_known(),
        investigate_sounds(),
        hold_if_alert(),
        action(Act::Patrol),
    ])
}

/// Reports, then hides.  Only fights when cornered.
fn scout() -> AgentTreeSpec {
    selector(vec![
        follow_order(),
        keep_fleeing(),
        sequence(vec![
            condition(Cond::CanSeeTarget),
            condition(Cond::AlarmReady),
            action(Act::RaiseAlarm),
        ]),
        sequence(vec![condition(Cond::CanSeeTarget), action(Act::Hide)]),
        attack_if_in_range(),
        investigate_sounds(),
        hold_if_alert(),
        action(Act::Patrol),
    ])
}

/// Never retreats on its own; charges anything it sees.
fn brute() -> AgentTreeSpec {
    selector(vec![
        follow_order(),
        keep_fleeing(),
        attack_if_in_range(),
        sequence(vec![condition(Cond::CanSeeTarget), action(Act::ChaseTarget)]),
        hunt_last_known(),
        investigate_sounds(),
        action(Act::Guard),
    ])
}

/// Holds its post, raises the alarm and fights only at arm's length.
fn sentry() -> AgentTreeSpec {
    selector(vec![
        follow_order(),
        keep_fleeing(),
        sequence(vec![
            condition(Cond::CanSeeTarget),
            condition(Cond::AlarmReady),
            action(Act::RaiseAlarm),
        ]),
        attack_if_in_range(),
        sequence(vec![condition(Cond::CanSeeTarget), action(Act::HoldAlert)]),
        investigate_sounds(),
        hold_if_alert(),
        action(Act::Guard),
    ])
}

/// `true` if any branch of `spec` walks a patrol route.
pub fn uses_patrol(spec: &AgentTreeSpec) -> bool {
    spec.any_action(&|a: &Act| *a == Act::Patrol)
}

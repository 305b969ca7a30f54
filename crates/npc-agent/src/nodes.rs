//! The condition and action vocabulary agent trees are written in.

use npc_behavior::{Action, Condition, NodeResult, Phase};
use npc_core::{AlertCategory, BehaviorState, Vec3};

use crate::{AgentBody, BrainContext, Command, Gait};

/// How far a fleeing agent tries to run in one leg.
pub const FLEE_DISTANCE: f32 = 12.0;
/// Distance of the candidate cover points a hiding agent probes.
pub const HIDE_DISTANCE: f32 = 6.0;
/// Probe order for cover, in degrees from "directly away from the threat".
const HIDE_OFFSETS_DEG: [f32; 8] = [0.0, 45.0, -45.0, 90.0, -90.0, 135.0, -135.0, 180.0];
const SNAP_RADIUS: f32 = 2.0;
/// Eye height used for the cover line-of-sight test.
const EYE: Vec3 = Vec3::new(0.0, 1.6, 0.0);

// ── Conditions ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cond {
    ShouldBeAlert,
    CanSeeTarget,
    CanHearTarget,
    HasLastKnownPosition,
    HasHeardSound,
    /// Health below this fraction of max.
    HealthBelow(f32),
    TargetInAttackRange,
    AttackReady,
    AlarmReady,
    InState(BehaviorState),
    HasPatrolRoute,
    /// An external order is standing.
    HasOrder,
}

impl Condition<BrainContext<'_>> for Cond {
    fn check(&self, ctx: &BrainContext<'_>) -> bool {
        let body = ctx.body;
        let snap = body.sensor().snapshot();
        match *self {
            Cond::ShouldBeAlert => body.sensor().should_be_alert(),
            Cond::CanSeeTarget => snap.can_see_target,
            Cond::CanHearTarget => snap.can_hear_target,
            Cond::HasLastKnownPosition => snap.last_known_position.is_some(),
            Cond::HasHeardSound => snap.last_sound.is_some(),
            Cond::HealthBelow(fraction) => body.health() < body.max_health() * fraction,
            Cond::TargetInAttackRange => ctx
                .target
                .is_some_and(|t| body.engagement().in_range(body.position(), t.position)),
            Cond::AttackReady => {
                body.engagement().attack_ready() && body.engagement().pending_hit().is_none()
            }
            Cond::AlarmReady => body.alarm_ready(),
            Cond::InState(state) => body.state() == state,
            Cond::HasPatrolRoute => !body.locomotion().patrol().is_empty(),
            Cond::HasOrder => body.order().is_some(),
        }
    }
}

// ── Actions ───────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Act {
    /// Stand still.
    Idle,
    /// Stand still, on alert.
    HoldAlert,
    /// Walk the patrol route, dwelling at each point.
    Patrol,
    /// Return to the spawn point and stand guard.
    Guard,
    /// Run at the visible target, or at its last known position.
    ChaseTarget,
    AttackTarget,
    /// Walk to the last heard sound (or last known position).
    Investigate,
    Flee,
    /// Run to a nearby point out of the threat's line of sight.
    Hide,
    RaiseAlarm,
    RequestBackup,
    /// Carry out the standing external order until arrival.
    FollowOrder,
}

impl Action<BrainContext<'_>> for Act {
    fn execute(&self, ctx: &mut BrainContext<'_>, phase: Phase) -> NodeResult {
        match self {
            Act::Idle => {
                ctx.issue(Command::Stop);
                ctx.issue(Command::SetState(BehaviorState::Idle));
                NodeResult::Success
            }
            Act::HoldAlert => {
                ctx.issue(Command::Stop);
                ctx.issue(Command::SetState(BehaviorState::Alert));
                NodeResult::Success
            }
            Act::Patrol => patrol(ctx),
            Act::Guard => guard(ctx, phase),
            Act::ChaseTarget => chase(ctx),
            Act::AttackTarget => attack(ctx),
            Act::Investigate => investigate(ctx, phase),
            Act::Flee => flee(ctx, phase),
            Act::Hide => hide(ctx, phase),
            Act::RaiseAlarm => broadcast(ctx, AlertCategory::Alarm),
            Act::RequestBackup => broadcast(ctx, AlertCategory::BackupRequest),
            Act::FollowOrder => follow_order(ctx, phase),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Progress of a movement started by an earlier pass.
fn travel_status(body: &AgentBody) -> NodeResult {
    let loco = body.locomotion();
    if loco.has_arrived() {
        NodeResult::Success
    } else if loco.state().target.is_none() || path_failed(body) {
        NodeResult::Failure
    } else {
        NodeResult::Running
    }
}

fn path_failed(body: &AgentBody) -> bool {
    let loco = body.locomotion();
    loco.state().target.is_some() && !loco.state().path_valid && loco.path().is_none()
}

fn within_arrival(body: &AgentBody, point: Vec3) -> bool {
    body.position().distance_xz(point) <= body.locomotion().config().arrive_distance
}

/// Where the agent believes the threat is.
fn threat_position(ctx: &BrainContext<'_>) -> Option<Vec3> {
    let snap = ctx.body.sensor().snapshot();
    ctx.target
        .map(|t| t.position)
        .or(snap.last_known_position)
        .or(snap.last_sound.map(|s| s.position))
}

fn patrol(ctx: &mut BrainContext<'_>) -> NodeResult {
    let body = ctx.body;
    let loco = body.locomotion();
    let Some(point) = loco.patrol().current_point() else {
        return NodeResult::Failure;
    };
    ctx.issue(Command::SetState(BehaviorState::Patrol));

    if !within_arrival(body, point) {
        if path_failed(body) && loco.state().target.is_some_and(|t| t.distance_xz(point) < 1e-3) {
            tracing::debug!(agent = %body.id(), %point, "patrol point unreachable, skipping");
            ctx.issue(Command::AdvancePatrol);
            return NodeResult::Failure;
        }
        ctx.issue(Command::MoveTo { destination: point, gait: Gait::Walk });
        return NodeResult::Running;
    }

    if loco.patrol().dwell_timer + ctx.elapsed >= loco.config().patrol_dwell_secs {
        ctx.issue(Command::AdvancePatrol);
        NodeResult::Success
    } else {
        ctx.issue(Command::Dwell(ctx.elapsed));
        NodeResult::Running
    }
}

fn guard(ctx: &mut BrainContext<'_>, phase: Phase) -> NodeResult {
    let body = ctx.body;
    ctx.issue(Command::SetState(BehaviorState::Idle));
    if within_arrival(body, body.home()) {
        ctx.issue(Command::Stop);
        return NodeResult::Success;
    }
    if phase == Phase::Resume && path_failed(body) {
        return NodeResult::Failure;
    }
    ctx.issue(Command::MoveTo { destination: body.home(), gait: Gait::Walk });
    NodeResult::Running
}

fn chase(ctx: &mut BrainContext<'_>) -> NodeResult {
    let body = ctx.body;
    ctx.issue(Command::SetState(BehaviorState::Chase));

    if let Some(t) = ctx.target {
        ctx.issue(Command::SetTarget(Some(t.id)));
        if body.engagement().in_range(body.position(), t.position) {
            ctx.issue(Command::Stop);
            return NodeResult::Success;
        }
        ctx.issue(Command::MoveTo { destination: t.position, gait: Gait::Run });
        return NodeResult::Running;
    }

    let Some(last_known) = body.sensor().snapshot().last_known_position else {
        return NodeResult::Failure;
    };
    if within_arrival(body, last_known) {
        // Nothing here any more.
        ctx.issue(Command::ForgetTarget);
        return NodeResult::Success;
    }
    if path_failed(body) {
        ctx.issue(Command::ForgetTarget);
        return NodeResult::Failure;
    }
    ctx.issue(Command::MoveTo { destination: last_known, gait: Gait::Run });
    NodeResult::Running
}

fn attack(ctx: &mut BrainContext<'_>) -> NodeResult {
    let body = ctx.body;
    let Some(t) = ctx.target else {
        return NodeResult::Failure;
    };
    if !body.engagement().in_range(body.position(), t.position) {
        return NodeResult::Failure;
    }
    ctx.issue(Command::SetState(BehaviorState::Attack));
    ctx.issue(Command::Stop);
    ctx.issue(Command::SetTarget(Some(t.id)));
    if body.engagement().attack_ready() && body.engagement().pending_hit().is_none() {
        ctx.issue(Command::Attack);
    }
    NodeResult::Running
}

fn investigate(ctx: &mut BrainContext<'_>, phase: Phase) -> NodeResult {
    let body = ctx.body;
    let snap = body.sensor().snapshot();
    let Some(spot) = snap.last_sound.map(|s| s.position).or(snap.last_known_position) else {
        return NodeResult::Failure;
    };
    ctx.issue(Command::SetState(BehaviorState::Investigate));

    if phase == Phase::Resume {
        if within_arrival(body, spot) {
            ctx.issue(Command::ForgetSound);
            ctx.issue(Command::ForgetTarget);
            return NodeResult::Success;
        }
        if path_failed(body) {
            tracing::debug!(agent = %body.id(), %spot, "cannot reach sound source");
            ctx.issue(Command::ForgetSound);
            return NodeResult::Failure;
        }
    }
    ctx.issue(Command::MoveTo { destination: spot, gait: Gait::Walk });
    NodeResult::Running
}

fn flee(ctx: &mut BrainContext<'_>, phase: Phase) -> NodeResult {
    let body = ctx.body;
    ctx.issue(Command::SetState(BehaviorState::Flee));

    if phase == Phase::Resume {
        return travel_status(body);
    }
    // Already sent somewhere (coordinated retreat).
    if body.state() == BehaviorState::Flee && body.locomotion().state().target.is_some() {
        return NodeResult::Running;
    }

    let position = body.position();
    let away = [
        threat_position(ctx).map(|threat| position - threat),
        body.engagement().state().last_hit_direction,
        Some(-body.facing()),
    ]
    .into_iter()
    .flatten()
    .map(Vec3::flatten)
    .find(|v| *v != Vec3::ZERO)
    .unwrap_or(Vec3::FORWARD);

    let spot = [FLEE_DISTANCE, FLEE_DISTANCE * 0.5]
        .into_iter()
        .find_map(|d| ctx.nav.nearest_navigable(position + away * d, SNAP_RADIUS));
    match spot {
        Some(spot) => {
            ctx.issue(Command::MoveTo { destination: spot, gait: Gait::Run });
            NodeResult::Running
        }
        None => {
            tracing::debug!(agent = %body.id(), "no flee point found");
            NodeResult::Failure
        }
    }
}

fn hide(ctx: &mut BrainContext<'_>, phase: Phase) -> NodeResult {
    let body = ctx.body;
    if phase == Phase::Resume {
        return travel_status(body);
    }
    let Some(threat) = threat_position(ctx) else {
        return NodeResult::Failure;
    };
    let position = body.position();
    let away = (position - threat).flatten();
    let base = if away == Vec3::ZERO { body.facing().yaw() } else { away.yaw() };

    for offset in HIDE_OFFSETS_DEG {
        let dir = Vec3::from_yaw(base + offset.to_radians());
        let Some(spot) = ctx.nav.nearest_navigable(position + dir * HIDE_DISTANCE, SNAP_RADIUS) else {
            continue;
        };
        if !ctx.nav.line_of_sight(spot + EYE, threat + EYE) {
            ctx.issue(Command::SetState(BehaviorState::Hide));
            ctx.issue(Command::MoveTo { destination: spot, gait: Gait::Run });
            return NodeResult::Running;
        }
    }
    NodeResult::Failure
}

fn follow_order(ctx: &mut BrainContext<'_>, phase: Phase) -> NodeResult {
    let body = ctx.body;
    let Some(&order) = body.order() else {
        return NodeResult::Failure;
    };
    ctx.issue(Command::SetState(order.state));
    if within_arrival(body, order.destination) {
        ctx.issue(Command::EndOrder);
        return NodeResult::Success;
    }
    if phase == Phase::Resume && path_failed(body) {
        tracing::debug!(agent = %body.id(), destination = %order.destination, "ordered destination unreachable");
        ctx.issue(Command::EndOrder);
        return NodeResult::Failure;
    }
    ctx.issue(Command::MoveTo { destination: order.destination, gait: order.gait });
    NodeResult::Running
}

fn broadcast(ctx: &mut BrainContext<'_>, category: AlertCategory) -> NodeResult {
    let body = ctx.body;
    if !body.alarm_ready() {
        return NodeResult::Failure;
    }
    let position = threat_position(ctx).unwrap_or(body.position());
    ctx.issue(Command::Broadcast { category, position, intensity: 100.0 });
    ctx.issue(Command::SetState(BehaviorState::Alert));
    NodeResult::Success
}

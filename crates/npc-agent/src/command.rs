//! Commands issued by decision tree actions.
//!
//! Actions never touch the subsystems directly.  They push `Command`s into
//! the brain context; the agent applies them in order right after the tree
//! pass.

use npc_core::{AlertCategory, BehaviorState, TargetId, Vec3};

/// Movement pace.  `Run` drains stamina and falls back to walking speed
/// once stamina is exhausted.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gait {
    #[default]
    Walk,
    Run,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Head for `destination`; re-issuing the same destination only
    /// changes the pace.
    MoveTo { destination: Vec3, gait: Gait },
    Stop,
    SetTarget(Option<TargetId>),
    /// Start an attack on the current engagement target.
    Attack,
    SetState(BehaviorState),
    /// Add seconds to the dwell timer at the current patrol point.
    Dwell(f32),
    AdvancePatrol,
    ForgetSound,
    ForgetTarget,
    /// Raise an alert for the group / alert bus to route.
    Broadcast { category: AlertCategory, position: Vec3, intensity: f32 },
    /// Drop the standing [`Order`], remembering its threat position if it
    /// carries one.
    EndOrder,
}

/// A destination imposed from outside the tree (alarms, group tactics).
///
/// While an order stands the agent holds `state` and keeps heading for
/// `destination` until it arrives or the path fails.  A new sighting
/// cancels every order except a `Flee`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    pub destination: Vec3,
    pub state: BehaviorState,
    pub gait: Gait,
    /// Threat position handed to the sensor's memory once the order ends.
    pub threat: Option<Vec3>,
}

impl Order {
    pub fn new(destination: Vec3, state: BehaviorState, gait: Gait) -> Self {
        Self { destination, state, gait, threat: None }
    }

    /// Engage `threat` after reaching the destination (flanking slots).
    pub fn then_engage(mut self, threat: Vec3) -> Self {
        self.threat = Some(threat);
        self
    }
}

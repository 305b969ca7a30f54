use npc_core::{TargetId, Vec3};

/// An attack in its wind-up.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PendingHit {
    pub target: TargetId,
    pub damage: f32,
    pub remaining_secs: f32,
}

/// A hit that connected.  The simulation delivers it to the target's
/// `DamageReceiver`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hit {
    pub target: TargetId,
    pub amount: f32,
    /// Attacker → target, horizontal unit vector.
    pub direction: Vec3,
}

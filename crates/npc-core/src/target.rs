//! Seams to the things NPCs hunt.
//!
//! The core never owns its targets.  Each tick the simulation asks a
//! [`TargetLocator`] for the current target, and the resulting
//! [`TargetInfo`] is a plain value copy; if the target vanishes the next
//! lookup simply returns `None`.

use crate::{TargetId, Vec3};

/// Read-only view of a target as seen at the start of a tick.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetInfo {
    pub id: TargetId,
    pub position: Vec3,
    /// Metres per second; hearing uses its magnitude as motion noise.
    pub velocity: Vec3,
    pub alive: bool,
}

impl TargetInfo {
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// "Find the current player/target" for an observer at `from`.
pub trait TargetLocator: Send + Sync {
    fn locate(&self, from: Vec3) -> Option<TargetInfo>;

    /// Look up a specific handle; `None` once it has been removed.
    fn get(&self, id: TargetId) -> Option<TargetInfo>;
}

/// Anything engagement can hurt.
pub trait DamageReceiver {
    /// `direction` points from the attacker toward the receiver.
    fn apply_damage(&mut self, amount: f32, direction: Vec3);
}

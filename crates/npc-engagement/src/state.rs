use npc_core::{TargetId, Vec3};

/// Observable combat state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngagementState {
    pub in_combat: bool,
    pub attack_ready: bool,
    pub cooldown_timer: f32,
    /// Weak: the target may be gone by the next tick.
    pub target: Option<TargetId>,
    /// Between `attack()` and the hit resolving.
    pub attacking: bool,
    pub dodge_cooldown: f32,
    pub dodging_timer: f32,
    pub stun_timer: f32,
    /// Horizontal direction the last hit came from (attacker → self).
    pub last_hit_direction: Option<Vec3>,
}

impl Default for EngagementState {
    fn default() -> Self {
        Self {
            in_combat: false,
            attack_ready: true,
            cooldown_timer: 0.0,
            target: None,
            attacking: false,
            dodge_cooldown: 0.0,
            dodging_timer: 0.0,
            stun_timer: 0.0,
            last_hit_direction: None,
        }
    }
}

//! The agent's state and owned subsystems, as read by conditions and
//! external observers.

use npc_core::{AgentId, Archetype, BehaviorState, Vec3};
use npc_engagement::Engagement;
use npc_locomotion::Locomotion;
use npc_sensor::Sensor;

use crate::{ArchetypeParams, Gait, Order};

/// Everything about an agent except its decision tree and RNG.
///
/// Exposed read-only; all mutation goes through [`Agent`](crate::Agent).
pub struct AgentBody {
    pub(crate) id: AgentId,
    pub(crate) params: ArchetypeParams,

    pub(crate) position: Vec3,
    pub(crate) facing: Vec3,
    /// Spawn point; guards return here.
    pub(crate) home: Vec3,

    pub(crate) state: BehaviorState,
    pub(crate) previous_state: BehaviorState,
    /// State restored when a stun wears off.
    pub(crate) resume_state: BehaviorState,

    pub(crate) health: f32,
    pub(crate) stamina: f32,
    pub(crate) gait: Gait,
    pub(crate) alarm_cooldown: f32,
    /// Standing external order, if any.
    pub(crate) order: Option<Order>,

    pub(crate) sensor: Sensor,
    pub(crate) locomotion: Locomotion,
    pub(crate) engagement: Engagement,
}

impl AgentBody {
    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[inline]
    pub fn archetype(&self) -> Archetype {
        self.params.archetype
    }

    pub fn params(&self) -> &ArchetypeParams {
        &self.params
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn facing(&self) -> Vec3 {
        self.facing
    }

    pub fn home(&self) -> Vec3 {
        self.home
    }

    #[inline]
    pub fn state(&self) -> BehaviorState {
        self.state
    }

    #[inline]
    pub fn previous_state(&self) -> BehaviorState {
        self.previous_state
    }

    #[inline]
    pub fn health(&self) -> f32 {
        self.health
    }

    #[inline]
    pub fn max_health(&self) -> f32 {
        self.params.max_health
    }

    #[inline]
    pub fn stamina(&self) -> f32 {
        self.stamina
    }

    #[inline]
    pub fn max_stamina(&self) -> f32 {
        self.params.max_stamina
    }

    pub fn gait(&self) -> Gait {
        self.gait
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.state.is_terminal()
    }

    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn alarm_ready(&self) -> bool {
        self.alarm_cooldown <= 0.0
    }

    pub fn sensor(&self) -> &Sensor {
        &self.sensor
    }

    pub fn locomotion(&self) -> &Locomotion {
        &self.locomotion
    }

    pub fn engagement(&self) -> &Engagement {
        &self.engagement
    }

    /// Speed for `gait`.  Running needs stamina left.
    pub fn pace(&self, gait: Gait) -> f32 {
        match gait {
            Gait::Run if self.stamina > 0.0 => self.params.run_speed,
            _ => self.params.walk_speed,
        }
    }

    /// Moving faster than walking pace.
    pub fn is_sprinting(&self) -> bool {
        self.gait == Gait::Run
            && self.locomotion.is_moving()
            && self.locomotion.speed() > self.params.walk_speed
    }
}

//! Alert events: immutable stimuli shared between agents.

use npc_core::{AgentId, AlertCategory, Vec3};

/// One stimulus.  Never mutated after creation; groups and the bus keep
/// them in rolling logs until they expire.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlertEvent {
    /// Agent that raised it, `None` for environment triggers.  The id may no
    /// longer resolve by the time the event is read.
    pub origin: Option<AgentId>,
    pub category: AlertCategory,
    pub position: Vec3,
    /// 0–100.
    pub intensity: f32,
    /// Simulation seconds at creation.
    pub created_at: f64,
}

impl AlertEvent {
    pub fn new(category: AlertCategory, position: Vec3, intensity: f32, created_at: f64) -> Self {
        Self { origin: None, category, position, intensity: intensity.clamp(0.0, 100.0), created_at }
    }

    pub fn from_agent(mut self, origin: AgentId) -> Self {
        self.origin = Some(origin);
        self
    }

    #[inline]
    pub fn age(&self, now: f64) -> f64 {
        now - self.created_at
    }

    #[inline]
    pub fn is_expired(&self, now: f64, ttl_secs: f32) -> bool {
        self.age(now) > f64::from(ttl_secs)
    }
}

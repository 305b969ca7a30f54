//! External targets: the player or any scripted intruder.
//!
//! Agents never hold a target.  The registry answers [`TargetLocator`]
//! lookups with value copies during the agent phase and receives landed hits
//! in the apply phase.

use std::collections::BTreeMap;

use npc_core::{DamageReceiver, TargetId, TargetInfo, TargetLocator, Vec3};

#[derive(Clone, Debug, PartialEq)]
pub struct ExternalTarget {
    id: TargetId,
    pub position: Vec3,
    pub velocity: Vec3,
    health: f32,
    max_health: f32,
}

impl ExternalTarget {
    pub fn id(&self) -> TargetId {
        self.id
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn info(&self) -> TargetInfo {
        TargetInfo { id: self.id, position: self.position, velocity: self.velocity, alive: self.is_alive() }
    }
}

impl DamageReceiver for ExternalTarget {
    fn apply_damage(&mut self, amount: f32, _direction: Vec3) {
        self.health = (self.health - amount.max(0.0)).clamp(0.0, self.max_health);
    }
}

#[derive(Debug, Default)]
pub struct TargetRegistry {
    targets: BTreeMap<TargetId, ExternalTarget>,
    next_id: u32,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target with `health` hit points at `position`.
    pub fn insert(&mut self, position: Vec3, health: f32) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        let max_health = health.max(0.0);
        self.targets.insert(
            id,
            ExternalTarget { id, position, velocity: Vec3::ZERO, health: max_health, max_health },
        );
        id
    }

    pub fn target(&self, id: TargetId) -> Option<&ExternalTarget> {
        self.targets.get(&id)
    }

    pub fn target_mut(&mut self, id: TargetId) -> Option<&mut ExternalTarget> {
        self.targets.get_mut(&id)
    }

    pub fn remove(&mut self, id: TargetId) -> Option<ExternalTarget> {
        self.targets.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExternalTarget> + '_ {
        self.targets.values()
    }

    /// Teleport-and-velocity update for scripted movement.  Returns `false`
    /// for an unknown id.
    pub fn set_motion(&mut self, id: TargetId, position: Vec3, velocity: Vec3) -> bool {
        match self.targets.get_mut(&id) {
            Some(t) => {
                t.position = position;
                t.velocity = velocity;
                true
            }
            None => false,
        }
    }

    /// Route a landed hit.  Returns `false` if the target is gone.
    pub fn apply_damage(&mut self, id: TargetId, amount: f32, direction: Vec3) -> bool {
        match self.targets.get_mut(&id) {
            Some(t) => {
                t.apply_damage(amount, direction);
                true
            }
            None => false,
        }
    }
}

impl TargetLocator for TargetRegistry {
    /// Nearest living target; lowest id on ties.
    fn locate(&self, from: Vec3) -> Option<TargetInfo> {
        let mut best: Option<(f32, &ExternalTarget)> = None;
        for t in self.targets.values().filter(|t| t.is_alive()) {
            let d = t.position.distance_xz(from);
            if best.is_none_or(|(b, _)| d < b) {
                best = Some((d, t));
            }
        }
        best.map(|(_, t)| t.info())
    }

    fn get(&self, id: TargetId) -> Option<TargetInfo> {
        self.targets.get(&id).map(ExternalTarget::info)
    }
}

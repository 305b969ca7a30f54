//! Per-member reactions to alert events.
//!
//! Group and bus logic never touch agents.  They return [`Reaction`] values
//! which the simulation applies to the arena in its sequential phase.

use npc_core::{AgentId, AlertCategory, Vec3};

use crate::{AlertEvent, MemberInfo, ReactionConfig};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reaction {
    pub agent: AgentId,
    pub kind: ReactionKind,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReactionKind {
    /// Feed the sensor a sound at `position`.
    HearSound { position: Vec3, intensity: f32 },
    /// A reported sighting: hear it, remember the position, go Alert and
    /// walk there.
    Investigate { position: Vec3, intensity: f32 },
    /// Force Alert and head for `position`.
    Alert { position: Vec3 },
    RaiseAlertness(f32),
    /// Force Chase toward `position` at a run.
    Chase { position: Vec3 },
    /// Take up `position` around a threat at `target` (coordinated attack).
    Flank { position: Vec3, target: Vec3 },
    /// Force Flee toward `fallback`.
    Flee { fallback: Vec3 },
}

impl Reaction {
    #[inline]
    pub fn new(agent: AgentId, kind: ReactionKind) -> Self {
        Self { agent, kind }
    }
}

/// Map an event onto one member.  `None` when the category asks nothing of
/// this member (a dull agent ignoring a fallen ally).
pub fn react(event: &AlertEvent, member: &MemberInfo, config: &ReactionConfig) -> Option<Reaction> {
    let position = event.position;
    let kind = match event.category {
        AlertCategory::Sighting => ReactionKind::Investigate { position, intensity: event.intensity },
        AlertCategory::Sound => ReactionKind::HearSound { position, intensity: event.intensity },
        AlertCategory::AttackDetected | AlertCategory::Alarm => ReactionKind::Alert { position },
        AlertCategory::AllyDown => {
            if member.intelligence <= config.ally_down_intelligence_threshold {
                return None;
            }
            ReactionKind::RaiseAlertness(config.ally_down_alertness)
        }
        AlertCategory::BackupRequest => ReactionKind::Chase { position },
    };
    Some(Reaction::new(member.id, kind))
}

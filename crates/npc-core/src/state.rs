//! Discrete behavior states and archetype tags.
//!
//! Both are plain `Copy` enums read by external collaborators (animation,
//! UI, persistence) through the agent's read-only accessors.

use std::str::FromStr;

use crate::NpcError;

// ── BehaviorState ─────────────────────────────────────────────────────────────

/// What an agent is currently doing.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorState {
    #[default]
    Idle,
    Alert,
    Chase,
    Flee,
    Hide,
    Attack,
    Patrol,
    Investigate,
    /// Held by an external dialogue system; the core never enters it itself.
    Dialogue,
    Stunned,
    /// Terminal.  No subsystem ticks once set.
    Dead,
}

impl BehaviorState {
    pub const ALL: [BehaviorState; 11] = [
        BehaviorState::Idle,
        BehaviorState::Alert,
        BehaviorState::Chase,
        BehaviorState::Flee,
        BehaviorState::Hide,
        BehaviorState::Attack,
        BehaviorState::Patrol,
        BehaviorState::Investigate,
        BehaviorState::Dialogue,
        BehaviorState::Stunned,
        BehaviorState::Dead,
    ];

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, BehaviorState::Dead)
    }

    /// States in which the agent is actively pursuing or fighting a target.
    #[inline]
    pub fn is_hostile(self) -> bool {
        matches!(self, BehaviorState::Chase | BehaviorState::Attack)
    }

    /// Label used in CSV/SQLite output columns.
    pub fn as_str(self) -> &'static str {
        match self {
            BehaviorState::Idle        => "idle",
            BehaviorState::Alert       => "alert",
            BehaviorState::Chase       => "chase",
            BehaviorState::Flee        => "flee",
            BehaviorState::Hide        => "hide",
            BehaviorState::Attack      => "attack",
            BehaviorState::Patrol      => "patrol",
            BehaviorState::Investigate => "investigate",
            BehaviorState::Dialogue    => "dialogue",
            BehaviorState::Stunned     => "stunned",
            BehaviorState::Dead        => "dead",
        }
    }
}

impl std::fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Archetype ─────────────────────────────────────────────────────────────────

/// Authoring tag selecting an agent's parameter set and tree template.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Archetype {
    /// Balanced patrolling fighter.
    #[default]
    Grunt,
    /// Fast, fragile; reports and hides instead of fighting.
    Scout,
    /// Slow, heavy hitter that never breaks off.
    Brute,
    /// Stationary watcher with long sight lines.
    Sentry,
}

impl Archetype {
    pub const ALL: [Archetype; 4] =
        [Archetype::Grunt, Archetype::Scout, Archetype::Brute, Archetype::Sentry];

    pub fn as_str(self) -> &'static str {
        match self {
            Archetype::Grunt  => "grunt",
            Archetype::Scout  => "scout",
            Archetype::Brute  => "brute",
            Archetype::Sentry => "sentry",
        }
    }
}

impl FromStr for Archetype {
    type Err = NpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grunt"  => Ok(Archetype::Grunt),
            "scout"  => Ok(Archetype::Scout),
            "brute"  => Ok(Archetype::Brute),
            "sentry" => Ok(Archetype::Sentry),
            other    => Err(NpcError::Parse(format!("unknown archetype '{other}'"))),
        }
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

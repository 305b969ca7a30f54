//! Plain data row types written by output backends.

use npc_agent::Agent;
use npc_core::Tick;
use npc_sim::TickSummary;

/// One agent's observable state at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id:  u32,
    pub tick:      u64,
    pub archetype: &'static str,
    pub state:     &'static str,
    pub x:         f32,
    pub y:         f32,
    pub z:         f32,
    pub health:    f32,
    pub stamina:   f32,
    pub alertness: f32,
}

impl AgentSnapshotRow {
    pub fn from_agent(tick: Tick, agent: &Agent) -> Self {
        let snapshot = agent.snapshot();
        Self {
            agent_id:  agent.id().0,
            tick:      tick.0,
            archetype: agent.archetype().as_str(),
            state:     agent.state().as_str(),
            x:         snapshot.position.x,
            y:         snapshot.position.y,
            z:         snapshot.position.z,
            health:    snapshot.health,
            stamina:   snapshot.stamina,
            alertness: snapshot.alertness,
        }
    }
}

/// Per-tick counters plus the simulated time the tick started at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:         u64,
    pub time_secs:    f64,
    pub living:       u64,
    pub hostile:      u64,
    pub fleeing:      u64,
    pub alerts:       u64,
    pub hits:         u64,
    pub damage_dealt: f32,
    pub deaths:       u64,
    pub despawned:    u64,
}

impl TickSummaryRow {
    pub fn from_summary(summary: &TickSummary, time_secs: f64) -> Self {
        Self {
            tick:         summary.tick.0,
            time_secs,
            living:       summary.living as u64,
            hostile:      summary.hostile as u64,
            fleeing:      summary.fleeing as u64,
            alerts:       summary.alerts as u64,
            hits:         summary.hits as u64,
            damage_dealt: summary.damage_dealt,
            deaths:       summary.deaths as u64,
            despawned:    summary.despawned as u64,
        }
    }
}

use npc_core::Tick;

/// What happened in one tick.  Counts cover the apply phase of that tick;
/// population figures are taken after despawns.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickSummary {
    pub tick: Tick,
    pub living: usize,
    /// Living agents in Chase or Attack.
    pub hostile: usize,
    pub fleeing: usize,
    pub events: usize,
    pub alerts: usize,
    pub hits: usize,
    pub damage_dealt: f32,
    pub deaths: usize,
    pub despawned: usize,
    pub reactions: usize,
}

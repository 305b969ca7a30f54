//! Simulation observer trait for progress reporting and data collection.

use npc_agent::{AgentArena, AgentEvent};
use npc_core::Tick;

use crate::TickSummary;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: death counter
///
/// ```rust,ignore
/// struct Deaths(usize);
///
/// impl SimObserver for Deaths {
///     fn on_agent_event(&mut self, _tick: Tick, event: &AgentEvent) {
///         if matches!(event, AgentEvent::Died { .. }) {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called for every agent notification in the apply phase, in ascending
    /// agent id order.  Notifications raised by reactions applied late in a
    /// tick are reported with the following tick.
    fn on_agent_event(&mut self, _tick: Tick, _event: &AgentEvent) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _tick: Tick, _summary: &TickSummary) {}

    /// Called every `config.output_interval_ticks` ticks with read-only
    /// access to the whole population.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &AgentArena) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Keeps every summary.  Handy in tests and short scripted runs.
#[derive(Debug, Default)]
pub struct SummaryLog {
    pub summaries: Vec<TickSummary>,
    pub events: Vec<(Tick, AgentEvent)>,
}

impl SimObserver for SummaryLog {
    fn on_agent_event(&mut self, tick: Tick, event: &AgentEvent) {
        self.events.push((tick, event.clone()));
    }

    fn on_tick_end(&mut self, _tick: Tick, summary: &TickSummary) {
        self.summaries.push(summary.clone());
    }
}

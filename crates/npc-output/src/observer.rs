//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use npc_agent::AgentArena;
use npc_core::{SimConfig, Tick};
use npc_sim::{SimObserver, TickSummary};

use crate::row::{AgentSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes agent snapshots and tick summaries to any
/// [`OutputWriter`] backend.
///
/// `SimObserver` hooks return nothing, so the first writer error is kept and
/// logged; later writes still go through.  Check it with
/// [`take_error`][Self::take_error] once `sim.run()` returns.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:             W,
    tick_duration_secs: f64,
    last_error:         Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` to convert ticks
    /// to simulated seconds.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            tick_duration_secs: config.tick_duration_secs as f64,
            last_error:         None,
        }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, tick: Tick, result: OutputResult<()>) {
        if let Err(e) = result {
            tracing::warn!(%tick, error = %e, "output write failed");
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        let row = TickSummaryRow::from_summary(summary, tick.0 as f64 * self.tick_duration_secs);
        let result = self.writer.write_tick_summary(&row);
        self.store_err(tick, result);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &AgentArena) {
        let rows: Vec<AgentSnapshotRow> =
            agents.iter().map(|agent| AgentSnapshotRow::from_agent(tick, agent)).collect();
        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(tick, result);
        }
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(final_tick, result);
    }
}

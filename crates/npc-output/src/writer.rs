use crate::{AgentSnapshotRow, OutputResult, TickSummaryRow};

/// Implemented by every output backend.
///
/// The observer never sees these errors directly; it stores the first one
/// for [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of agent snapshots taken at the same tick.
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()>;

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `agent_snapshots.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, OutputResult, TickSummaryRow};

pub(crate) const SNAPSHOT_HEADER: [&str; 10] =
    ["agent_id", "tick", "archetype", "state", "x", "y", "z", "health", "stamina", "alertness"];

pub(crate) const SUMMARY_HEADER: [&str; 10] = [
    "tick", "time_secs", "living", "hostile", "fleeing", "alerts", "hits", "damage_dealt", "deaths", "despawned",
];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the two CSV files inside it and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        Ok(Self { snapshots, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.archetype.to_owned(),
                row.state.to_owned(),
                row.x.to_string(),
                row.y.to_string(),
                row.z.to_string(),
                row.health.to_string(),
                row.stamina.to_string(),
                row.alertness.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.time_secs.to_string(),
            row.living.to_string(),
            row.hostile.to_string(),
            row.fleeing.to_string(),
            row.alerts.to_string(),
            row.hits.to_string(),
            row.damage_dealt.to_string(),
            row.deaths.to_string(),
            row.despawned.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}

//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `agent_snapshots` and `tick_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, OutputResult, TickSummaryRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS agent_snapshots (
                 agent_id  INTEGER NOT NULL,
                 tick      INTEGER NOT NULL,
                 archetype TEXT    NOT NULL,
                 state     TEXT    NOT NULL,
                 x         REAL    NOT NULL,
                 y         REAL    NOT NULL,
                 z         REAL    NOT NULL,
                 health    REAL    NOT NULL,
                 stamina   REAL    NOT NULL,
                 alertness REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick         INTEGER PRIMARY KEY,
                 time_secs    REAL    NOT NULL,
                 living       INTEGER NOT NULL,
                 hostile      INTEGER NOT NULL,
                 fleeing      INTEGER NOT NULL,
                 alerts       INTEGER NOT NULL,
                 hits         INTEGER NOT NULL,
                 damage_dealt REAL    NOT NULL,
                 deaths       INTEGER NOT NULL,
                 despawned    INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_snapshots \
                 (agent_id, tick, archetype, state, x, y, z, health, stamina, alertness) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.agent_id,
                    row.tick as i64,
                    row.archetype,
                    row.state,
                    row.x as f64,
                    row.y as f64,
                    row.z as f64,
                    row.health as f64,
                    row.stamina as f64,
                    row.alertness as f64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries \
             (tick, time_secs, living, hostile, fleeing, alerts, hits, damage_dealt, deaths, despawned) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                row.tick as i64,
                row.time_secs,
                row.living as i64,
                row.hostile as i64,
                row.fleeing as i64,
                row.alerts as i64,
                row.hits as i64,
                row.damage_dealt as f64,
                row.deaths as i64,
                row.despawned as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}

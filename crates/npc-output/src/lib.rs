//! `npc-output` — simulation output writers for the NPC decision core.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature  | Backend | Files created                               |
//! |----------|---------|---------------------------------------------|
//! | *(none)* | CSV     | `agent_snapshots.csv`, `tick_summaries.csv` |
//! | `sqlite` | SQLite  | `output.db`                                 |
//!
//! Both backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `npc_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use npc_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, &sim.config);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{AgentSnapshotRow, TickSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

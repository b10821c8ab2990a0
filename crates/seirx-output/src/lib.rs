//! `seirx-output` — simulation output writers for the seirx simulator.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature  | Backend | Files created                            |
//! |----------|---------|------------------------------------------|
//! | *(none)* | CSV     | `agent_states.csv`, `day_summaries.csv`  |
//! | `sqlite` | SQLite  | `output.db`                              |
//!
//! Both backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `seirx_sim::SimObserver` and
//! records one row per agent per day plus one summary row per day — the
//! time series an external analysis pipeline consumes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use seirx_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
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
pub use row::{AgentDayRow, DaySummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

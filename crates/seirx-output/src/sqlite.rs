//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `agent_states` and `day_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{AgentDayRow, DaySummaryRow, OutputResult};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn: Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS agent_states (
                 day         INTEGER NOT NULL,
                 agent_id    INTEGER NOT NULL,
                 agent_type  TEXT    NOT NULL,
                 state       TEXT    NOT NULL,
                 quarantined INTEGER NOT NULL,
                 symptomatic INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS day_summaries (
                 day                INTEGER PRIMARY KEY,
                 weekday            TEXT    NOT NULL,
                 susceptible        INTEGER NOT NULL,
                 exposed            INTEGER NOT NULL,
                 infectious         INTEGER NOT NULL,
                 removed            INTEGER NOT NULL,
                 quarantined        INTEGER NOT NULL,
                 new_infections     INTEGER NOT NULL,
                 tests_administered INTEGER NOT NULL,
                 positive_results   INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_agent_states(&mut self, rows: &[AgentDayRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_states \
                 (day, agent_id, agent_type, state, quarantined, symptomatic) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.day,
                    row.agent_id,
                    row.agent_type,
                    row.state,
                    row.quarantined as i64,
                    row.symptomatic as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_day_summary(&mut self, row: &DaySummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO day_summaries \
             (day, weekday, susceptible, exposed, infectious, removed, quarantined, \
              new_infections, tests_administered, positive_results) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                row.day,
                row.weekday,
                row.susceptible,
                row.exposed,
                row.infectious,
                row.removed,
                row.quarantined,
                row.new_infections,
                row.tests_administered,
                row.positive_results,
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

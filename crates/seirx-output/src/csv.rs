//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `agent_states.csv`
//! - `day_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentDayRow, DaySummaryRow, OutputResult};

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    agent_states: Writer<File>,
    day_summaries: Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut agent_states = Writer::from_path(dir.join("agent_states.csv"))?;
        agent_states.write_record([
            "day",
            "agent_id",
            "agent_type",
            "state",
            "quarantined",
            "symptomatic",
        ])?;

        let mut day_summaries = Writer::from_path(dir.join("day_summaries.csv"))?;
        day_summaries.write_record([
            "day",
            "weekday",
            "susceptible",
            "exposed",
            "infectious",
            "removed",
            "quarantined",
            "new_infections",
            "tests_administered",
            "positive_results",
        ])?;

        Ok(Self {
            agent_states,
            day_summaries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_agent_states(&mut self, rows: &[AgentDayRow]) -> OutputResult<()> {
        for row in rows {
            self.agent_states.write_record(&[
                row.day.to_string(),
                row.agent_id.to_string(),
                row.agent_type.to_string(),
                row.state.to_string(),
                (row.quarantined as u8).to_string(),
                (row.symptomatic as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_day_summary(&mut self, row: &DaySummaryRow) -> OutputResult<()> {
        self.day_summaries.write_record(&[
            row.day.to_string(),
            row.weekday.to_string(),
            row.susceptible.to_string(),
            row.exposed.to_string(),
            row.infectious.to_string(),
            row.removed.to_string(),
            row.quarantined.to_string(),
            row.new_infections.to_string(),
            row.tests_administered.to_string(),
            row.positive_results.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.agent_states.flush()?;
        self.day_summaries.flush()?;
        Ok(())
    }
}

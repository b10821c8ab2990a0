//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use seirx_core::Day;
use seirx_agent::AgentStore;
use seirx_sim::{DayReport, SimObserver};
use seirx_testing::TestCounters;

use crate::row::{AgentDayRow, DaySummaryRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that records one summary row per day and one state row
/// per agent per day into any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer: W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_day_end(&mut self, report: &DayReport) {
        let row = DaySummaryRow {
            day: report.day.0,
            weekday: report.weekday.as_str(),
            susceptible: report.counts.susceptible,
            exposed: report.counts.exposed,
            infectious: report.counts.infectious,
            removed: report.counts.removed,
            quarantined: report.counts.quarantined,
            new_infections: report.transmissions + report.index_exposures,
            tests_administered: report.tests_administered,
            positive_results: report.positive_results,
        };
        let result = self.writer.write_day_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, day: Day, store: &AgentStore, _counters: &TestCounters) {
        let rows: Vec<AgentDayRow> = (0..store.count)
            .map(|i| AgentDayRow {
                day: day.0,
                agent_id: i as u32,
                agent_type: store.agent_type[i].as_str(),
                state: store.state[i].as_str(),
                quarantined: store.quarantined[i],
                symptomatic: store.symptomatic[i],
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_agent_states(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_day: Day) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}

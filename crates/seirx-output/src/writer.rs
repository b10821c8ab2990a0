//! The `OutputWriter` trait implemented by all backend writers.

use crate::{AgentDayRow, DaySummaryRow, OutputResult};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors are surfaced through `SimOutputObserver::take_error` because the
/// observer callbacks driving these methods have no return value.
pub trait OutputWriter {
    /// Write a batch of per-agent state rows (one day's worth).
    fn write_agent_states(&mut self, rows: &[AgentDayRow]) -> OutputResult<()>;

    /// Write one day-summary row.
    fn write_day_summary(&mut self, row: &DaySummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

//! Simulation observer trait for progress reporting and data collection.

use seirx_core::Day;
use seirx_agent::AgentStore;
use seirx_testing::TestCounters;

use crate::report::DayReport;

/// Callbacks invoked by [`Simulation::run`][crate::Simulation::run] at key
/// points in the day loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — console progress
///
/// ```rust,ignore
/// struct Progress;
///
/// impl SimObserver for Progress {
///     fn on_day_end(&mut self, report: &DayReport) {
///         println!("{}: {} infectious", report.day, report.counts.infectious);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each day, before any processing.
    fn on_day_start(&mut self, _day: Day) {}

    /// Called at the end of each day with the day's report.
    fn on_day_end(&mut self, _report: &DayReport) {}

    /// Called once per day after all phases, with read access to the full
    /// agent state and cumulative test counters — the hook output writers
    /// record per-agent rows from.
    fn on_snapshot(&mut self, _day: Day, _store: &AgentStore, _counters: &TestCounters) {}

    /// Called once after the final day completes.
    fn on_sim_end(&mut self, _final_day: Day) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

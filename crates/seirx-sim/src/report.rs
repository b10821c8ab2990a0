//! The per-day report returned by [`Simulation::step`][crate::Simulation::step].

use seirx_core::{AgentType, Day, Weekday};
use seirx_agent::StateCounts;
use seirx_testing::ScreenKind;

/// What happened during one simulated day.
///
/// Counts are for this day only; cumulative counters live in
/// `TestingState::counters`.  The population `counts` are taken after all
/// phases, i.e. they describe the state the next day starts from.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DayReport {
    pub day: Day,
    pub weekday: Weekday,
    pub counts: StateCounts,

    /// Successful transmissions over network contacts.
    pub transmissions: u32,
    /// External (continuous-mode) index-case introductions.
    pub index_exposures: u32,

    pub tests_administered: u32,
    pub positive_results: u32,
    pub negative_results: u32,

    pub newly_quarantined: u32,
    pub released_from_quarantine: u32,

    /// Full-group screens that ran today.
    pub screens: Vec<(AgentType, ScreenKind)>,
}

impl DayReport {
    pub(crate) fn new(day: Day, weekday: Weekday) -> Self {
        DayReport { day, weekday, ..DayReport::default() }
    }
}

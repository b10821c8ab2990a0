//! Epidemiological states and the events emitted when they change.

use std::fmt;

/// An agent's epidemiological state.
///
/// Transitions are strictly monotonic:
///
/// ```text
/// susceptible → exposed → infectious → removed
/// ```
///
/// No skips, no reversals.  Quarantine is deliberately *not* part of this
/// enum — it is an orthogonal flag on the agent store that can be set and
/// cleared independently of disease progression.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SeirState {
    #[default]
    Susceptible,
    Exposed,
    Infectious,
    Removed,
}

impl SeirState {
    /// `true` while the agent carries the pathogen (exposed or infectious).
    #[inline]
    pub fn is_infected(self) -> bool {
        matches!(self, SeirState::Exposed | SeirState::Infectious)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeirState::Susceptible => "susceptible",
            SeirState::Exposed => "exposed",
            SeirState::Infectious => "infectious",
            SeirState::Removed => "removed",
        }
    }
}

impl fmt::Display for SeirState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events produced by [`AgentStore::advance_disease`][crate::AgentStore::advance_disease].
///
/// The step driver reacts to these: `SymptomOnset` of a non-quarantined agent
/// feeds the diagnostic-testing path.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DiseaseEvent {
    /// Exposure period ended; the agent can transmit from the next
    /// transmission phase on.
    BecameInfectious,
    /// The symptom roll succeeded; the `symptomatic` flag is now set.
    SymptomOnset,
    /// Infection ran its course; the agent is removed from the dynamics.
    Recovered,
}

//! Scenario configuration passed into the simulation builder.

use std::collections::BTreeMap;

use seirx_core::AgentType;
use seirx_agent::{EpiDistributions, GroupConfig, SymptomProfile};
use seirx_testing::TestingConfig;
use seirx_tracing::QuarantinePolicy;
use seirx_transmission::TransmissionConfig;

// ── IndexCase ─────────────────────────────────────────────────────────────────

/// How infections enter the facility.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IndexCase {
    /// One uniformly chosen agent of this type starts the run exposed;
    /// no further external introductions.
    Single(AgentType),
    /// Every susceptible agent rolls its group's `index_probability` each
    /// day, for the whole run.
    Continuous,
}

// ── SimParams ─────────────────────────────────────────────────────────────────

/// Run-level parameters.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimParams {
    /// Hard upper bound on simulated days; the run may end earlier once no
    /// exposed or infectious agents remain.
    pub max_days: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Weekday of day 0, as an offset into the week (0 = Monday).  `None`
    /// draws the offset from the run's RNG, which decorrelates the index
    /// case's timeline from the Monday-anchored screening schedules across
    /// an ensemble.
    pub weekday_offset: Option<u8>,
}

impl Default for SimParams {
    fn default() -> Self {
        SimParams { max_days: 365, seed: 0, weekday_offset: None }
    }
}

// ── ScenarioConfig ────────────────────────────────────────────────────────────

/// Everything that defines a scenario besides the contact network.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioConfig {
    pub params: SimParams,
    pub index_case: IndexCase,
    /// Per-group policy; every agent type present in the network needs an
    /// entry.
    pub groups: BTreeMap<AgentType, GroupConfig>,
    pub epi: EpiDistributions,
    pub symptom: SymptomProfile,
    pub transmission: TransmissionConfig,
    pub testing: TestingConfig,
    pub quarantine: QuarantinePolicy,
}

impl ScenarioConfig {
    /// A minimal scenario: single index case in `index_type`, default
    /// epidemiology, diagnostic-only testing, one default-configured group
    /// per provided type.
    pub fn single_index(
        index_type: AgentType,
        group_types: impl IntoIterator<Item = AgentType>,
    ) -> Self {
        let groups = group_types
            .into_iter()
            .map(|t| (t, GroupConfig::default()))
            .collect();
        ScenarioConfig {
            params: SimParams::default(),
            index_case: IndexCase::Single(index_type),
            groups,
            epi: EpiDistributions::default(),
            symptom: SymptomProfile::default(),
            transmission: TransmissionConfig::default(),
            testing: TestingConfig::default(),
            quarantine: QuarantinePolicy::default(),
        }
    }
}

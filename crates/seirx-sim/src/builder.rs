//! Fluent builder for constructing (or resuming) a [`Simulation`].
//!
//! All fatal configuration checking happens in [`build`](SimulationBuilder::build):
//! out-of-range probabilities, unknown test technologies, unsupported
//! screening intervals, missing group configurations, unsatisfiable duration
//! distributions.  No partially initialized simulation is ever returned.

use seirx_core::{SimClock, SimRng};
use seirx_agent::{AgentSeed, AgentStoreBuilder, TimelineSampler};
use seirx_network::ContactNetwork;
use seirx_testing::{TestCatalog, TestingState, TestingStrategy};
use seirx_tracing::QuarantineController;
use seirx_transmission::TransmissionModel;

use crate::error::{SimError, SimResult};
use crate::params::{IndexCase, ScenarioConfig};
use crate::sim::{Simulation, SimulationState};

/// Fluent builder for [`Simulation`].
///
/// # Example
///
/// ```rust,ignore
/// let sim = SimulationBuilder::new(network, config)
///     .catalog(custom_catalog)   // optional; defaults to the built-ins
///     .build()?;
/// ```
pub struct SimulationBuilder {
    network: ContactNetwork,
    config: ScenarioConfig,
    catalog: Option<TestCatalog>,
    resume_state: Option<SimulationState>,
}

impl SimulationBuilder {
    pub fn new(network: ContactNetwork, config: ScenarioConfig) -> Self {
        Self { network, config, catalog: None, resume_state: None }
    }

    /// Use a custom test-technology catalog instead of
    /// [`TestCatalog::builtin`].
    pub fn catalog(mut self, catalog: TestCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Resume from a checkpointed state instead of initializing day 0.
    ///
    /// The network and configuration must be the ones the state was created
    /// with.
    pub fn resume_from(mut self, state: SimulationState) -> Self {
        self.resume_state = Some(state);
        self
    }

    /// Validate everything and construct the simulation.
    pub fn build(self) -> SimResult<Simulation> {
        let SimulationBuilder { network, config, catalog, resume_state } = self;

        // ── Group configuration ───────────────────────────────────────────
        for (agent_type, group) in &config.groups {
            for (name, value) in [
                ("index_probability", group.index_probability),
                ("vaccination_ratio", group.vaccination_ratio),
                ("voluntary_testing_rate", group.voluntary_testing_rate),
            ] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(SimError::Config(format!(
                        "group '{agent_type}': {name} = {value} is outside [0, 1]"
                    )));
                }
            }
        }
        for agent_type in network.present_types() {
            if !config.groups.contains_key(&agent_type) {
                return Err(SimError::Config(format!(
                    "network contains agent type '{agent_type}' with no group configuration"
                )));
            }
        }
        TestingStrategy::validate_intervals(
            config.groups.values().map(|g| &g.screening_interval),
        )?;

        // ── Components ────────────────────────────────────────────────────
        let model = TransmissionModel::new(config.transmission)?;
        let controller = QuarantineController::new(config.quarantine.clone())?;

        let screened_groups = if config.testing.screened_groups.is_empty() {
            network.present_types()
        } else {
            for group in &config.testing.screened_groups {
                if !config.groups.contains_key(group) {
                    return Err(SimError::Config(format!(
                        "screened group '{group}' has no group configuration"
                    )));
                }
            }
            config.testing.screened_groups.clone()
        };
        let strategy = TestingStrategy::new(
            catalog.unwrap_or_else(TestCatalog::builtin),
            &config.testing,
            screened_groups,
        )?;

        // ── State: fresh initialization or checkpoint ─────────────────────
        let state = match resume_state {
            Some(state) => {
                if state.store.count != network.node_count() {
                    return Err(SimError::Config(format!(
                        "checkpoint has {} agents but the network has {} nodes",
                        state.store.count,
                        network.node_count()
                    )));
                }
                state
            }
            None => Self::fresh_state(&network, &config, &strategy)?,
        };

        Ok(Simulation {
            network,
            model,
            strategy,
            controller,
            groups: config.groups,
            symptom: config.symptom,
            index_case: config.index_case,
            max_days: config.params.max_days,
            state,
        })
    }

    /// Build the day-0 state: population, RNGs, index case, screening phase.
    fn fresh_state(
        network: &ContactNetwork,
        config: &ScenarioConfig,
        strategy: &TestingStrategy,
    ) -> SimResult<SimulationState> {
        let mut sim_rng = SimRng::new(config.params.seed);
        let weekday_offset = match config.params.weekday_offset {
            Some(offset) => offset % 7,
            None => sim_rng.gen_range(0..7u8),
        };

        let sampler = TimelineSampler::new(&config.epi)?;
        let mut store_builder = AgentStoreBuilder::new(config.params.seed);
        for (_, attrs) in network.nodes() {
            store_builder.push(AgentSeed {
                agent_type: attrs.agent_type,
                age: attrs.age,
                mask_override: attrs.mask,
            });
        }
        let (mut store, rngs) = store_builder.build(&sampler, &config.groups, &mut sim_rng)?;

        // Seed the index case in single mode.
        if let IndexCase::Single(index_type) = config.index_case {
            let members = network.agents_of_type(index_type);
            match sim_rng.choose(&members) {
                Some(&agent) => store.expose(agent),
                None => {
                    return Err(SimError::Config(format!(
                        "index-case group '{index_type}' has no members in the network"
                    )));
                }
            }
        }

        let mut testing = TestingState::new(
            store.count,
            strategy.screened_groups.iter().copied(),
        );

        // In single index-case mode the outbreak always starts at day 0, so
        // a screening calendar that also starts at day 0 would couple the
        // two across every ensemble member.  Start each group's
        // since-last-screen counter at a random phase of its interval.
        if matches!(config.index_case, IndexCase::Single(_)) {
            for &group in &strategy.screened_groups {
                if let Some(interval) =
                    config.groups.get(&group).and_then(|g| g.screening_interval)
                {
                    let phase = sim_rng.gen_range(0..=u16::from(interval));
                    testing.days_since_last_screen.insert(group, phase);
                }
            }
        }

        Ok(SimulationState {
            clock: SimClock::new(weekday_offset),
            store,
            rngs,
            sim_rng,
            testing,
        })
    }
}

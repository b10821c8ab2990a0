//! The `Simulation` struct and its day loop.

use std::collections::BTreeMap;

use seirx_core::{AgentId, AgentType, Day, SimClock, SimRng, Weekday};
use seirx_agent::{AgentRngs, AgentStore, GroupConfig, SeirState, SymptomProfile};
use seirx_network::ContactNetwork;
use seirx_testing::{ScreenKind, TestPurpose, TestingState, TestingStrategy};
use seirx_tracing::QuarantineController;
use seirx_transmission::TransmissionModel;

use crate::builder::SimulationBuilder;
use crate::error::SimResult;
use crate::observer::SimObserver;
use crate::params::{IndexCase, ScenarioConfig};
use crate::report::DayReport;

// ── SimulationState ───────────────────────────────────────────────────────────

/// The complete mutable state of a run.
///
/// Everything stochastic or day-dependent lives here — including every RNG —
/// so that serializing this struct at day *k* and resuming produces a
/// trajectory bit-identical to the uninterrupted run.  The immutable half
/// (network, validated configuration) is supplied again at resume time.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationState {
    pub clock: SimClock,
    pub store: AgentStore,
    pub rngs: AgentRngs,
    pub sim_rng: SimRng,
    pub testing: TestingState,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Holds the immutable run inputs (contact network, transmission model,
/// testing strategy, quarantine controller, per-group policies) and the
/// mutable [`SimulationState`], and drives the five-phase day loop described
/// in the [crate docs](crate).
///
/// Create via [`Simulation::initialize`] or a [`SimulationBuilder`].
pub struct Simulation {
    pub(crate) network: ContactNetwork,
    pub(crate) model: TransmissionModel,
    pub(crate) strategy: TestingStrategy,
    pub(crate) controller: QuarantineController,
    pub(crate) groups: BTreeMap<AgentType, GroupConfig>,
    pub(crate) symptom: SymptomProfile,
    pub(crate) index_case: IndexCase,
    pub(crate) max_days: u64,
    pub(crate) state: SimulationState,
}

impl Simulation {
    // ── Construction ──────────────────────────────────────────────────────

    /// Validate the configuration, build the population from the network,
    /// seed the index case, and return a ready-to-step simulation.
    pub fn initialize(network: ContactNetwork, config: ScenarioConfig) -> SimResult<Self> {
        SimulationBuilder::new(network, config).build()
    }

    /// Rebuild a simulation around a checkpointed [`SimulationState`].
    ///
    /// `network` and `config` must be the ones the state was created with;
    /// continuing from the returned simulation reproduces the uninterrupted
    /// trajectory exactly.
    pub fn resume(
        network: ContactNetwork,
        config: ScenarioConfig,
        state: SimulationState,
    ) -> SimResult<Self> {
        SimulationBuilder::new(network, config).resume_from(state).build()
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Surrender the mutable state, e.g. for checkpoint serialization.
    pub fn into_state(self) -> SimulationState {
        self.state
    }

    pub fn network(&self) -> &ContactNetwork {
        &self.network
    }

    pub fn day(&self) -> Day {
        self.state.clock.current_day
    }

    // ── Public run API ────────────────────────────────────────────────────

    /// `true` once the run is over: the day limit is reached, or no exposed
    /// or infectious agents remain (and, in continuous index-case mode, no
    /// further introductions are possible).
    pub fn is_done(&self) -> bool {
        if self.state.clock.current_day.0 >= self.max_days {
            return true;
        }
        if self.state.store.has_active_infections() {
            return false;
        }
        !self.continuous_seeding_possible()
    }

    fn continuous_seeding_possible(&self) -> bool {
        self.index_case == IndexCase::Continuous
            && self.groups.values().any(|g| g.index_probability > 0.0)
            && self.state.store.state.iter().any(|&s| s == SeirState::Susceptible)
    }

    /// Run until [`is_done`][Self::is_done], calling observer hooks at every
    /// day boundary.  Use [`NoopObserver`][crate::NoopObserver] if you don't
    /// need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        while !self.is_done() {
            observer.on_day_start(self.state.clock.current_day);
            let report = self.step();
            observer.on_day_end(&report);
            observer.on_snapshot(report.day, &self.state.store, &self.state.testing.counters);
        }
        observer.on_sim_end(self.state.clock.current_day);
    }

    /// Run exactly `n` days from the current position (ignores `is_done`).
    ///
    /// Useful for tests and checkpoint/resume.
    pub fn run_days<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            observer.on_day_start(self.state.clock.current_day);
            let report = self.step();
            observer.on_day_end(&report);
            observer.on_snapshot(report.day, &self.state.store, &self.state.testing.counters);
        }
    }

    /// Process one simulated day and advance the clock.
    pub fn step(&mut self) -> DayReport {
        let day = self.state.clock.current_day;
        let weekday = self.state.clock.weekday();
        let mut report = DayReport::new(day, weekday);

        self.state.store.reset_daily_flags();

        self.introduce_index_cases(&mut report);
        self.transmission_phase(&mut report);
        self.advance_phase(&mut report);
        if self.strategy.policy.is_active() {
            self.testing_phase(day, weekday, &mut report);
        }

        report.counts = self.state.store.counts();
        self.state.clock.advance();
        report
    }

    // ── Phase ①: external introductions ───────────────────────────────────

    fn introduce_index_cases(&mut self, report: &mut DayReport) {
        if self.index_case != IndexCase::Continuous {
            return;
        }
        let SimulationState { store, rngs, .. } = &mut self.state;
        for i in 0..store.count {
            if store.state[i] != SeirState::Susceptible {
                continue;
            }
            let agent = AgentId(i as u32);
            let p = self.groups[&store.agent_type[i]].index_probability;
            if p > 0.0 && rngs.get_mut(agent).gen_bool(p) {
                store.expose(agent);
                report.index_exposures += 1;
            }
        }
    }

    // ── Phase ②: transmission ─────────────────────────────────────────────

    /// One Bernoulli trial per (infectious transmitter, susceptible
    /// neighbor) pair.  The transmitter set is snapshotted before the phase,
    /// so agents exposed today never transmit today; a receiver infected by
    /// an earlier transmitter is skipped by every later one — each agent is
    /// infected at most once per day.
    fn transmission_phase(&mut self, report: &mut DayReport) {
        let SimulationState { store, rngs, .. } = &mut self.state;

        let transmitters = store.eligible_transmitters();
        for transmitter in transmitters {
            for (receiver, contact) in self.network.neighbors(transmitter) {
                if store.state(receiver) != SeirState::Susceptible
                    || store.is_quarantined(receiver)
                {
                    continue;
                }
                let p = self
                    .model
                    .transmission_probability(store, transmitter, receiver, contact);
                if rngs.get_mut(transmitter).gen_bool(p) {
                    store.expose(receiver);
                    report.transmissions += 1;
                }
            }
        }
    }

    // ── Phase ③: state machines & quarantine countdown ────────────────────

    fn advance_phase(&mut self, report: &mut DayReport) {
        let SimulationState { store, rngs, .. } = &mut self.state;
        for i in 0..store.count {
            let agent = AgentId(i as u32);
            store.advance_disease(agent, &self.symptom, rngs.get_mut(agent));
        }
        report.released_from_quarantine = self.controller.tick(store) as u32;
    }

    // ── Phase ④: testing & tracing ────────────────────────────────────────

    fn testing_phase(&mut self, day: Day, weekday: Weekday, report: &mut DayReport) {
        let SimulationState { store, rngs, testing, .. } = &mut self.state;
        let strategy = &self.strategy;
        let controller = &self.controller;

        // (a) Symptomatic agents self-quarantine and get a diagnostic test.
        //     The scan covers all currently symptomatic, untested,
        //     unquarantined agents — today's onsets and agents whose
        //     quarantine ended while still symptomatic alike.
        if strategy.policy.includes_diagnostic() {
            for i in 0..store.count {
                if store.symptomatic[i] && !store.tested_today[i] && !store.quarantined[i] {
                    let agent = AgentId(i as u32);
                    controller.quarantine(store, agent);
                    report.newly_quarantined += 1;
                    if strategy.request_test(
                        testing,
                        store,
                        agent,
                        strategy.diagnostic_test(),
                        TestPurpose::Diagnostic,
                        day,
                    ) {
                        report.tests_administered += 1;
                    }
                }
            }
        }

        // (b) Resolve due results.  Negatives may liberate quarantined
        //     agents; positives queue up in `testing.newly_positive`.
        let results = strategy.resolve_due(testing, store, rngs, day);
        for result in &results {
            if result.positive {
                report.positive_results += 1;
            } else {
                report.negative_results += 1;
                controller.on_negative_result(store, result.agent);
            }
        }

        // (c) Trace today's positives: quarantine the agent and its K1
        //     contacts, true result or not.
        let positives = std::mem::take(&mut testing.newly_positive);
        let had_new_positives = !positives.is_empty();
        for agent in positives {
            if !store.quarantined[agent.index()] {
                report.newly_quarantined += 1;
            }
            let neighbors = controller.trace_positive(store, &self.network, agent);
            report.newly_quarantined += neighbors.len() as u32;
        }

        // (d) Screens.  Reactive screens take precedence over a due
        //     follow-up, which takes precedence over the preventive
        //     calendar; at most one screen kind runs per day.
        let mut screened_today: Vec<AgentType> = Vec::new();

        let reactive_today = strategy.policy.includes_background() && had_new_positives;
        let follow_up_today = !reactive_today
            && strategy.policy.includes_background()
            && strategy.follow_up_interval.is_some()
            && testing.follow_up_scheduled.values().any(|&scheduled| scheduled);

        if reactive_today {
            for &group in &strategy.screened_groups {
                let n = strategy.screen_group(testing, store, group, ScreenKind::Reactive, day);
                report.tests_administered += n as u32;
                if n > 0 {
                    screened_today.push(group);
                    report.screens.push((group, ScreenKind::Reactive));
                }
                testing.follow_up_scheduled.insert(group, true);
            }
        } else if follow_up_today {
            if let Some(interval) = strategy.follow_up_interval {
                for &group in &strategy.screened_groups {
                    let scheduled =
                        testing.follow_up_scheduled.get(&group).copied().unwrap_or(false);
                    let elapsed =
                        testing.days_since_last_screen.get(&group).copied().unwrap_or(0);
                    if scheduled && elapsed >= interval {
                        let n = strategy.screen_group(
                            testing,
                            store,
                            group,
                            ScreenKind::FollowUp,
                            day,
                        );
                        report.tests_administered += n as u32;
                        if n > 0 {
                            screened_today.push(group);
                            report.screens.push((group, ScreenKind::FollowUp));
                        }
                        testing.follow_up_scheduled.insert(group, false);
                    }
                }
            }
        } else if strategy.policy.includes_preventive() {
            for &group in &strategy.screened_groups {
                let interval = self.groups.get(&group).and_then(|g| g.screening_interval);
                if strategy.preventive_due(interval, weekday) {
                    let n =
                        strategy.screen_group(testing, store, group, ScreenKind::Preventive, day);
                    report.tests_administered += n as u32;
                    if n > 0 {
                        screened_today.push(group);
                        report.screens.push((group, ScreenKind::Preventive));
                    }
                }
            }
        }

        testing.bump_unscreened(&screened_today);
    }
}

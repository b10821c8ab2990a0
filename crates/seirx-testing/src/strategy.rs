//! The testing strategy: swabbing agents, resolving pending results,
//! running full-group screens.
//!
//! `TestingStrategy` is the immutable, validated configuration half;
//! `TestingState` is the mutable runtime half that lives inside the
//! checkpointable simulation state.  All strategy methods take the state
//! explicitly.

use std::collections::BTreeMap;

use seirx_core::{AgentId, AgentType, Day, Weekday};
use seirx_agent::{AgentRngs, AgentStore, SeirState};

use crate::error::TestingResult;
use crate::policy::{screening_weekdays, ScreenKind, TestingConfig, TestingPolicy};
use crate::technology::{TestCatalog, TestId};

// ── PendingTest ───────────────────────────────────────────────────────────────

/// A swab whose result has not come back yet.
///
/// The sample's truth is frozen at administration time: the detection-window
/// check uses `days_since_transmission_at_admin`, not the agent's state on
/// the day the result arrives.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingTest {
    pub tech: TestId,
    pub day_administered: Day,
    pub days_since_transmission_at_admin: i32,
    pub state_at_admin: SeirState,
    pub due_day: Day,
}

/// One resolved test.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct TestResult {
    pub agent: AgentId,
    pub tech: TestId,
    pub positive: bool,
}

/// Whether a test is counted as diagnostic or screening in the statistics.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TestPurpose {
    Diagnostic,
    Screening,
}

// ── TestCounters ──────────────────────────────────────────────────────────────

/// Cumulative testing statistics over one run.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestCounters {
    pub diagnostic_tests: u64,
    pub screening_tests: u64,
    pub positive_results: u64,
    pub negative_results: u64,
    /// Samples taken while the agent was infectious but outside the
    /// technology's detection window — infections the strategy missed.
    pub undetected_infections: u64,
    /// Positive samples taken while the agent was still exposed — infections
    /// caught before the agent could transmit.
    pub predetected_infections: u64,
}

// ── TestingState ──────────────────────────────────────────────────────────────

/// Mutable testing bookkeeping, part of the checkpointable simulation state.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestingState {
    /// At most one pending test per agent; further requests are rejected.
    pending: Vec<Option<PendingTest>>,

    /// Days since each group was last screened (any kind).
    pub days_since_last_screen: BTreeMap<AgentType, u16>,

    /// Groups with a follow-up screen scheduled by an earlier reactive screen.
    pub follow_up_scheduled: BTreeMap<AgentType, bool>,

    /// Positive results that have not been traced yet.  Filled on result
    /// arrival, drained by the tracing phase.
    pub newly_positive: Vec<AgentId>,

    pub counters: TestCounters,
}

impl TestingState {
    pub fn new(agent_count: usize, groups: impl IntoIterator<Item = AgentType>) -> Self {
        let mut days_since_last_screen = BTreeMap::new();
        let mut follow_up_scheduled = BTreeMap::new();
        for group in groups {
            days_since_last_screen.insert(group, 0);
            follow_up_scheduled.insert(group, false);
        }
        TestingState {
            pending: vec![None; agent_count],
            days_since_last_screen,
            follow_up_scheduled,
            newly_positive: Vec::new(),
            counters: TestCounters::default(),
        }
    }

    #[inline]
    pub fn has_pending(&self, agent: AgentId) -> bool {
        self.pending[agent.index()].is_some()
    }

    #[inline]
    pub fn pending(&self, agent: AgentId) -> Option<&PendingTest> {
        self.pending[agent.index()].as_ref()
    }

    /// Bump the since-last-screen counter for every group that was not
    /// screened today.
    pub fn bump_unscreened(&mut self, screened_today: &[AgentType]) {
        for (group, days) in self.days_since_last_screen.iter_mut() {
            if !screened_today.contains(group) {
                *days = days.saturating_add(1);
            }
        }
    }
}

// ── TestingStrategy ───────────────────────────────────────────────────────────

/// Validated testing configuration plus the technology catalog.
pub struct TestingStrategy {
    catalog: TestCatalog,
    pub policy: TestingPolicy,
    diagnostic: TestId,
    preventive: TestId,
    pub follow_up_interval: Option<u16>,
    pub screened_groups: Vec<AgentType>,
}

impl TestingStrategy {
    /// Resolve technology names and build the strategy.
    ///
    /// `screened_groups` must already be resolved to a non-empty list (the
    /// simulation builder substitutes "all groups in the network" for an
    /// empty config).  Unknown technology names fail here — fatal at
    /// initialization, before any stepping.
    pub fn new(
        catalog: TestCatalog,
        config: &TestingConfig,
        screened_groups: Vec<AgentType>,
    ) -> TestingResult<Self> {
        let diagnostic = catalog.lookup(&config.diagnostic_test)?;
        let preventive = catalog.lookup(&config.preventive_test)?;
        Ok(TestingStrategy {
            catalog,
            policy: config.policy,
            diagnostic,
            preventive,
            follow_up_interval: config.follow_up_interval,
            screened_groups,
        })
    }

    /// Validate every group's screening interval against the supported
    /// cadences.  Called once at simulation initialization.
    pub fn validate_intervals<'a>(
        intervals: impl IntoIterator<Item = &'a Option<u8>>,
    ) -> TestingResult<()> {
        for interval in intervals.into_iter().flatten() {
            screening_weekdays(*interval)?;
        }
        Ok(())
    }

    #[inline]
    pub fn catalog(&self) -> &TestCatalog {
        &self.catalog
    }

    #[inline]
    pub fn diagnostic_test(&self) -> TestId {
        self.diagnostic
    }

    #[inline]
    pub fn preventive_test(&self) -> TestId {
        self.preventive
    }

    // ── Swabbing ──────────────────────────────────────────────────────────

    /// Administer a test to `agent` on `day`.
    ///
    /// Returns `false` (a non-fatal no-op) if the agent already has a pending
    /// test — one swab at a time per agent.  Otherwise records the sample
    /// truth, schedules the result, and latches the agent's `tested_today`
    /// flag.
    pub fn request_test(
        &self,
        state:   &mut TestingState,
        store:   &mut AgentStore,
        agent:   AgentId,
        tech:    TestId,
        purpose: TestPurpose,
        day:     Day,
    ) -> bool {
        let i = agent.index();
        if state.pending[i].is_some() {
            return false;
        }

        let technology = self.catalog.get(tech);
        state.pending[i] = Some(PendingTest {
            tech,
            day_administered: day,
            days_since_transmission_at_admin: store.days_since_transmission[i],
            state_at_admin: store.state[i],
            due_day: day + u64::from(technology.turnover_days),
        });
        store.tested_today[i] = true;

        match purpose {
            TestPurpose::Diagnostic => state.counters.diagnostic_tests += 1,
            TestPurpose::Screening => state.counters.screening_tests += 1,
        }
        true
    }

    // ── Result resolution ─────────────────────────────────────────────────

    /// Resolve every pending test due on or before `day`, in ascending agent
    /// order.  (Screens run after the resolve phase, so a same-day-turnover
    /// test administered by a screen is picked up one phase-cycle later.)
    ///
    /// The sample is positive with probability `sensitivity` if the agent
    /// was inside the technology's detection window at administration, and
    /// with probability `1 − specificity` (a false positive) otherwise.
    /// Positive results also mark the agent `known_positive` and join the
    /// `newly_positive` queue for the tracing phase.
    pub fn resolve_due(
        &self,
        state: &mut TestingState,
        store: &mut AgentStore,
        rngs:  &mut AgentRngs,
        day:   Day,
    ) -> Vec<TestResult> {
        let mut results = Vec::new();

        for i in 0..state.pending.len() {
            let due = match &state.pending[i] {
                Some(pending) if pending.due_day <= day => *pending,
                _ => continue,
            };
            state.pending[i] = None;

            let agent = AgentId(i as u32);
            let technology = self.catalog.get(due.tech);
            let testable = technology.testable_at(due.days_since_transmission_at_admin);

            let rng = rngs.get_mut(agent);
            let positive = if testable {
                rng.gen_bool(technology.sensitivity)
            } else {
                rng.gen_bool(1.0 - technology.specificity)
            };

            if positive {
                state.counters.positive_results += 1;
                if due.state_at_admin == SeirState::Exposed {
                    state.counters.predetected_infections += 1;
                }
                store.known_positive[i] = true;
                state.newly_positive.push(agent);
            } else {
                state.counters.negative_results += 1;
                if due.state_at_admin == SeirState::Infectious {
                    state.counters.undetected_infections += 1;
                }
            }

            results.push(TestResult { agent, tech: due.tech, positive });
        }

        results
    }

    // ── Screens ───────────────────────────────────────────────────────────

    /// Swab every eligible member of `group`.
    ///
    /// Skips agents already tested today, agents already known positive, and
    /// — for preventive screens only — agents not participating in voluntary
    /// testing.  Returns the number of tests administered; a positive count
    /// resets the group's since-last-screen counter.
    pub fn screen_group(
        &self,
        state: &mut TestingState,
        store: &mut AgentStore,
        group: AgentType,
        kind:  ScreenKind,
        day:   Day,
    ) -> usize {
        let tech = match kind {
            ScreenKind::Preventive => self.preventive,
            ScreenKind::Reactive | ScreenKind::FollowUp => self.diagnostic,
        };

        let mut administered = 0;
        for i in 0..store.count {
            if store.agent_type[i] != group
                || store.tested_today[i]
                || store.known_positive[i]
            {
                continue;
            }
            if kind == ScreenKind::Preventive && !store.voluntary_testing[i] {
                continue;
            }
            if self.request_test(state, store, AgentId(i as u32), tech, TestPurpose::Screening, day)
            {
                administered += 1;
            }
        }

        if administered > 0 {
            state.days_since_last_screen.insert(group, 0);
        }
        administered
    }

    /// Whether a preventive screen for a group with `interval` runs today.
    pub fn preventive_due(&self, interval: Option<u8>, weekday: Weekday) -> bool {
        match interval {
            // Intervals were validated at initialization; an invalid value
            // here would be a logic error, not user input.
            Some(days) => screening_weekdays(days)
                .map(|schedule| schedule.contains(&weekday))
                .unwrap_or(false),
            None => false,
        }
    }
}

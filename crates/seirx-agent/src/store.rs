//! Core agent storage: `AgentStore` (SoA data) and `AgentRngs` (per-agent RNG).
//!
//! # Why two structs?
//!
//! Several simulation phases need `&mut AgentRngs` (a transmitter's RNG for
//! its Bernoulli trials) and `&AgentStore` (read access to the receiver's
//! state) at the same time, before finally mutating the store.  Rust's borrow
//! checker forbids this if both live inside a single struct; keeping RNGs in
//! a separate `AgentRngs` struct resolves the conflict cleanly.

use seirx_core::{AgentId, AgentRng, AgentType};

use crate::group::SymptomProfile;
use crate::state::{DiseaseEvent, SeirState};
use crate::timeline::DiseaseTimeline;

/// Sentinel for `days_since_transmission` of a never-infected agent.
pub const NEVER_INFECTED: i32 = -1;

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, separated from [`AgentStore`] to allow
/// simultaneous `&mut AgentRngs` + `&AgentStore` borrows.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner }
    }

    /// Mutable reference to one agent's RNG.
    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── StateCounts ───────────────────────────────────────────────────────────────

/// Population counts of one day, for summaries and convergence checks.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateCounts {
    pub susceptible: u32,
    pub exposed: u32,
    pub infectious: u32,
    pub removed: u32,
    /// Orthogonal to the four disease states.
    pub quarantined: u32,
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agent state.
///
/// Every `Vec` field has exactly `count` elements; the `AgentId` value is the
/// index into all of them:
///
/// ```ignore
/// let state = store.state[agent.index()];  // O(1), cache-friendly
/// ```
///
/// Static attributes (`agent_type`, `age`, `mask`, `vaccinated`,
/// `voluntary_testing`, `timeline`) are written once by the builder; the
/// mutable epidemic state is owned exclusively by the step driver and the
/// testing/tracing components for the duration of a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentStore {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    // ── Static attributes ─────────────────────────────────────────────────
    pub agent_type: Vec<AgentType>,
    pub age: Vec<Option<f32>>,
    pub mask: Vec<bool>,
    pub vaccinated: Vec<bool>,
    pub voluntary_testing: Vec<bool>,
    pub timeline: Vec<DiseaseTimeline>,

    // ── Disease state ─────────────────────────────────────────────────────
    pub state: Vec<SeirState>,
    /// Days since the transmission event; [`NEVER_INFECTED`] before it.
    pub days_since_transmission: Vec<i32>,
    /// Set at most once, at symptom onset; cleared on removal.
    pub symptomatic: Vec<bool>,
    /// Latch ensuring the symptom-onset probability is rolled exactly once.
    pub symptom_rolled: Vec<bool>,

    // ── Containment state ─────────────────────────────────────────────────
    pub quarantined: Vec<bool>,
    /// Days of quarantine left; meaningful only while `quarantined`.
    pub quarantine_remaining: Vec<u16>,
    /// The agent returned a positive test and is excluded from screens.
    pub known_positive: Vec<bool>,
    /// Already swabbed today — screens skip these.  Reset every day.
    pub tested_today: Vec<bool>,
}

impl AgentStore {
    pub(crate) fn new(count: usize) -> Self {
        Self {
            count,
            agent_type: vec![AgentType::Resident; count],
            age: vec![None; count],
            mask: vec![false; count],
            vaccinated: vec![false; count],
            voluntary_testing: vec![true; count],
            timeline: vec![DiseaseTimeline::default(); count],
            state: vec![SeirState::Susceptible; count],
            days_since_transmission: vec![NEVER_INFECTED; count],
            symptomatic: vec![false; count],
            symptom_rolled: vec![false; count],
            quarantined: vec![false; count],
            quarantine_remaining: vec![0; count],
            known_positive: vec![false; count],
            tested_today: vec![false; count],
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    // ── State queries ─────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self, agent: AgentId) -> SeirState {
        self.state[agent.index()]
    }

    #[inline]
    pub fn is_quarantined(&self, agent: AgentId) -> bool {
        self.quarantined[agent.index()]
    }

    /// `true` before the agent's first (and only) transmission event.
    #[inline]
    pub fn never_infected(&self, agent: AgentId) -> bool {
        self.days_since_transmission[agent.index()] == NEVER_INFECTED
    }

    /// Agents that can currently transmit: infectious and not quarantined.
    pub fn eligible_transmitters(&self) -> Vec<AgentId> {
        self.agent_ids()
            .filter(|&a| self.state(a) == SeirState::Infectious && !self.is_quarantined(a))
            .collect()
    }

    /// `true` while any agent is exposed or infectious.
    pub fn has_active_infections(&self) -> bool {
        self.state.iter().any(|s| s.is_infected())
    }

    /// Population counts for the current day.
    pub fn counts(&self) -> StateCounts {
        let mut c = StateCounts::default();
        for (state, &quarantined) in self.state.iter().zip(&self.quarantined) {
            match state {
                SeirState::Susceptible => c.susceptible += 1,
                SeirState::Exposed => c.exposed += 1,
                SeirState::Infectious => c.infectious += 1,
                SeirState::Removed => c.removed += 1,
            }
            if quarantined {
                c.quarantined += 1;
            }
        }
        c
    }

    // ── State mutation ────────────────────────────────────────────────────

    /// Apply a successful transmission: susceptible → exposed, day counter
    /// reset to 0.
    ///
    /// # Panics
    /// Debug-asserts that the agent was susceptible; the transmission phase
    /// must never evaluate a pair against an already-infected receiver.
    pub fn expose(&mut self, agent: AgentId) {
        let i = agent.index();
        debug_assert_eq!(self.state[i], SeirState::Susceptible);
        self.state[i] = SeirState::Exposed;
        self.days_since_transmission[i] = 0;
    }

    /// Advance one agent's disease state machine by one day.
    ///
    /// Increments `days_since_transmission` for infected agents, then fires
    /// the due transitions:
    ///
    /// - exposed → infectious at `days == exposure_duration`,
    /// - the one-shot symptom roll at `days == time_until_symptoms`
    ///   (vaccinated agents never develop a symptomatic course),
    /// - infectious → removed at `days == infection_duration`.
    ///
    /// Returns the events that fired, in that order.
    pub fn advance_disease(
        &mut self,
        agent:   AgentId,
        symptom: &SymptomProfile,
        rng:     &mut AgentRng,
    ) -> Vec<DiseaseEvent> {
        let i = agent.index();
        let mut events = Vec::new();

        if !self.state[i].is_infected() {
            return events;
        }

        self.days_since_transmission[i] += 1;
        let days = self.days_since_transmission[i];
        let timeline = self.timeline[i];

        if self.state[i] == SeirState::Exposed && days == i32::from(timeline.exposure_duration) {
            self.state[i] = SeirState::Infectious;
            events.push(DiseaseEvent::BecameInfectious);
        }

        if days == i32::from(timeline.time_until_symptoms) && !self.symptom_rolled[i] {
            self.symptom_rolled[i] = true;
            if !self.vaccinated[i] && rng.gen_bool(symptom.probability(self.age[i])) {
                self.symptomatic[i] = true;
                events.push(DiseaseEvent::SymptomOnset);
            }
        }

        if self.state[i] == SeirState::Infectious && days == i32::from(timeline.infection_duration)
        {
            self.state[i] = SeirState::Removed;
            self.symptomatic[i] = false;
            events.push(DiseaseEvent::Recovered);
        }

        events
    }

    /// Clear the per-day testing latch.  Called once at the start of each day.
    pub fn reset_daily_flags(&mut self) {
        self.tested_today.fill(false);
    }
}

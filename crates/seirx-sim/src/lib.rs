//! `seirx-sim` — day-loop orchestrator for the seirx epidemic simulator.
//!
//! # The simulated day
//!
//! ```text
//! for each day until is_done():
//!   ① Introductions — continuous-mode index cases roll their daily risk.
//!   ② Transmission  — every infectious, non-quarantined agent runs one
//!                     Bernoulli trial against each susceptible,
//!                     non-quarantined neighbor.
//!   ③ Advance       — per-agent state machines tick (exposed→infectious,
//!                     symptom onset, infectious→removed); quarantine
//!                     countdowns decrement.
//!   ④ Testing       — symptomatic agents are swabbed and self-quarantine;
//!                     due results resolve; positives are traced (self + K1
//!                     contacts quarantined); reactive / follow-up /
//!                     preventive screens run.
//!   ⑤ Snapshot      — observers receive the day report and full state.
//! ```
//!
//! Within a day the phases are strictly ordered and each phase processes
//! agents in ascending `AgentId` order, so a run is a pure function of
//! (network, configuration, seed).
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `serde`    | (default) serializable `SimulationState` for checkpoints |
//! | `parallel` | Runs ensemble replications on Rayon's thread pool        |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use seirx_sim::{NoopObserver, ScenarioConfig, Simulation};
//!
//! let mut sim = Simulation::initialize(network, config)?;
//! sim.run(&mut NoopObserver);
//! let counts = sim.state().store.counts();
//! ```

pub mod builder;
pub mod ensemble;
pub mod error;
pub mod observer;
pub mod params;
pub mod report;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimulationBuilder;
pub use ensemble::{replication_seed, run_ensemble};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use params::{IndexCase, ScenarioConfig, SimParams};
pub use report::DayReport;
pub use sim::{Simulation, SimulationState};

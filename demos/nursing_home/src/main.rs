//! nursing_home — smallest runnable scenario for the seirx simulator.
//!
//! Simulates an outbreak in a two-unit nursing home (16 residents, 6
//! employees) under twice-weekly preventive antigen screening of employees
//! plus background screens after every positive result.  Writes per-day CSV
//! output for one run, then estimates the outbreak-size distribution over a
//! small ensemble.

mod network;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use seirx_core::AgentType;
use seirx_agent::{EpiDistributions, GroupConfig, SymptomProfile};
use seirx_output::{CsvWriter, SimOutputObserver};
use seirx_sim::{
    run_ensemble, DayReport, IndexCase, NoopObserver, ScenarioConfig, SimObserver, SimParams,
    Simulation,
};
use seirx_testing::{TestingConfig, TestingPolicy};
use seirx_tracing::QuarantinePolicy;
use seirx_transmission::{AgeDiscount, TransmissionConfig};

use network::build_network;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED: u64 = 42;
const MAX_DAYS: u64 = 120;
const ENSEMBLE_RUNS: usize = 200;
const OUTPUT_DIR: &str = "./output";

// ── Scenario ──────────────────────────────────────────────────────────────────

fn scenario(seed: u64) -> ScenarioConfig {
    let mut groups = BTreeMap::new();
    groups.insert(
        AgentType::Resident,
        GroupConfig { screening_interval: Some(7), ..GroupConfig::default() },
    );
    groups.insert(
        AgentType::Employee,
        GroupConfig { screening_interval: Some(3), ..GroupConfig::default() },
    );

    ScenarioConfig {
        params: SimParams { max_days: MAX_DAYS, seed, weekday_offset: None },
        // Outbreaks enter the facility through staff.
        index_case: IndexCase::Single(AgentType::Employee),
        groups,
        epi: EpiDistributions::default(),
        // Symptom probability rises with age; residents ≈ 0.65, staff ≈ 0.24.
        symptom: SymptomProfile { intercept: -0.022, slope: 0.0078 },
        transmission: TransmissionConfig {
            base_risk: 0.074,
            age_transmission_discount: AgeDiscount::none(),
            ..TransmissionConfig::default()
        },
        testing: TestingConfig {
            policy: TestingPolicy::BackgroundAndPreventive,
            diagnostic_test: "one_day_PCR".to_owned(),
            preventive_test: "same_day_antigen".to_owned(),
            follow_up_interval: Some(4),
            ..TestingConfig::default()
        },
        quarantine: QuarantinePolicy::default(),
    }
}

// ── Console progress ──────────────────────────────────────────────────────────

struct Progress;

impl SimObserver for Progress {
    fn on_day_end(&mut self, report: &DayReport) {
        if report.transmissions > 0 || report.positive_results > 0 || !report.screens.is_empty() {
            println!(
                "day {:>3} ({:<9}) E={:<2} I={:<2} R={:<2} X={:<2}  +{} infected, {} tests, {} positive",
                report.day.0,
                report.weekday.as_str(),
                report.counts.exposed,
                report.counts.infectious,
                report.counts.removed,
                report.counts.quarantined,
                report.transmissions,
                report.tests_administered,
                report.positive_results,
            );
        }
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let out_dir = Path::new(OUTPUT_DIR);
    std::fs::create_dir_all(out_dir)?;

    // ── Single run with full CSV output ───────────────────────────────────
    println!(
        "nursing home: {} residents, {} employees",
        network::resident_count(),
        network::employee_count()
    );

    let mut sim = Simulation::initialize(build_network()?, scenario(SEED))?;
    let writer = CsvWriter::new(out_dir)?;
    let mut output = SimOutputObserver::new(writer);

    struct Tee<'a>(Progress, &'a mut SimOutputObserver<CsvWriter>);
    impl SimObserver for Tee<'_> {
        fn on_day_end(&mut self, report: &DayReport) {
            self.0.on_day_end(report);
            self.1.on_day_end(report);
        }
        fn on_snapshot(
            &mut self,
            day: seirx_core::Day,
            store: &seirx_agent::AgentStore,
            counters: &seirx_testing::TestCounters,
        ) {
            self.1.on_snapshot(day, store, counters);
        }
        fn on_sim_end(&mut self, final_day: seirx_core::Day) {
            self.1.on_sim_end(final_day);
        }
    }

    sim.run(&mut Tee(Progress, &mut output));
    if let Some(e) = output.take_error() {
        eprintln!("output error: {e}");
    }

    let counts = sim.state().store.counts();
    let testing = &sim.state().testing.counters;
    println!(
        "run finished after {} days: {} infected, {} diagnostic + {} screening tests\n\
         csv written to {OUTPUT_DIR}",
        sim.day().0,
        counts.removed + counts.exposed + counts.infectious,
        testing.diagnostic_tests,
        testing.screening_tests,
    );

    // ── Ensemble: outbreak-size distribution ──────────────────────────────
    let outbreak_sizes = run_ensemble(ENSEMBLE_RUNS, SEED, |seed, _run| {
        let mut sim = Simulation::initialize(
            build_network().map_err(|e| seirx_sim::SimError::Config(e.to_string()))?,
            scenario(seed),
        )?;
        sim.run(&mut NoopObserver);
        let counts = sim.state().store.counts();
        Ok(counts.exposed + counts.infectious + counts.removed)
    })?;

    let total_agents = (network::resident_count() + network::employee_count()) as f64;
    let mean = outbreak_sizes.iter().map(|&n| f64::from(n)).sum::<f64>()
        / outbreak_sizes.len() as f64;
    let contained = outbreak_sizes.iter().filter(|&&n| n <= 1).count();
    println!(
        "ensemble ({ENSEMBLE_RUNS} runs): mean outbreak size {:.1} agents ({:.0}% of facility), \
         {:.0}% of runs contained at the index case",
        mean,
        100.0 * mean / total_agents,
        100.0 * contained as f64 / ENSEMBLE_RUNS as f64,
    );

    Ok(())
}

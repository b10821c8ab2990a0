//! Unit tests for seirx-agent.

use std::collections::BTreeMap;

use seirx_core::{AgentId, AgentRng, AgentType, SimRng};

use crate::{
    AgentSeed, AgentStoreBuilder, DiseaseEvent, DiseaseTimeline, DurationDistribution,
    EpiDistributions, GroupConfig, SeirState, SymptomProfile, TimelineSampler,
};

fn fixed_distributions(ed: u16, ts: u16, inf: u16) -> EpiDistributions {
    EpiDistributions {
        exposure_duration: DurationDistribution::Fixed(ed),
        time_until_symptoms: DurationDistribution::Fixed(ts),
        infection_duration: DurationDistribution::Fixed(inf),
    }
}

fn one_group(agent_type: AgentType, config: GroupConfig) -> BTreeMap<AgentType, GroupConfig> {
    let mut groups = BTreeMap::new();
    groups.insert(agent_type, config);
    groups
}

/// Store with `n` residents, fixed (5, 6, 11) timelines.
fn resident_store(n: usize) -> (crate::AgentStore, crate::AgentRngs) {
    let sampler = TimelineSampler::new(&fixed_distributions(5, 6, 11)).unwrap();
    let groups = one_group(AgentType::Resident, GroupConfig::default());
    let mut builder = AgentStoreBuilder::new(42);
    for _ in 0..n {
        builder.push(AgentSeed {
            agent_type: AgentType::Resident,
            age: None,
            mask_override: None,
        });
    }
    builder.build(&sampler, &groups, &mut SimRng::new(42)).unwrap()
}

// ── Timeline sampling ─────────────────────────────────────────────────────────

#[cfg(test)]
mod timeline_tests {
    use super::*;
    use crate::timeline::shape_for_test;

    #[test]
    fn ordering_invariant() {
        let ok = DiseaseTimeline {
            exposure_duration: 5,
            time_until_symptoms: 6,
            infection_duration: 11,
        };
        assert!(ok.satisfies_ordering());

        // symptoms == exposure end is allowed; symptoms == infection end is not.
        assert!(DiseaseTimeline {
            exposure_duration: 5,
            time_until_symptoms: 5,
            infection_duration: 11,
        }
        .satisfies_ordering());
        assert!(!DiseaseTimeline {
            exposure_duration: 5,
            time_until_symptoms: 11,
            infection_duration: 11,
        }
        .satisfies_ordering());
        assert!(!DiseaseTimeline {
            exposure_duration: 0,
            time_until_symptoms: 1,
            infection_duration: 2,
        }
        .satisfies_ordering());
    }

    #[test]
    fn shape_recovers_exponential() {
        // CV = 1 is the exponential special case: shape = 1.
        let k = shape_for_test(2.0, 4.0);
        assert!((k - 1.0).abs() < 1e-6, "got shape {k}");
    }

    #[test]
    fn shape_recovers_known_moments() {
        // For k = 2: Γ(1.5) ≈ 0.886227, CV² = 1/Γ(1.5)² − 1 ≈ 0.273240.
        let mean = 10.0;
        let var = mean * mean * 0.273_239_5;
        let k = shape_for_test(mean, var);
        assert!((k - 2.0).abs() < 1e-4, "got shape {k}");
    }

    #[test]
    fn fixed_sampler_returns_exact_values() {
        let sampler = TimelineSampler::new(&fixed_distributions(5, 6, 11)).unwrap();
        let mut rng = AgentRng::new(1, AgentId(0));
        let t = sampler.sample(&mut rng).unwrap();
        assert_eq!((t.exposure_duration, t.time_until_symptoms, t.infection_duration), (5, 6, 11));
    }

    #[test]
    fn weibull_draws_always_satisfy_ordering() {
        let sampler = TimelineSampler::new(&EpiDistributions::default()).unwrap();
        let mut rng = AgentRng::new(7, AgentId(0));
        for _ in 0..500 {
            let t = sampler.sample(&mut rng).unwrap();
            assert!(t.satisfies_ordering(), "invalid draw {t:?}");
        }
    }

    #[test]
    fn unsatisfiable_fixed_config_fails() {
        // infection before symptoms — no amount of resampling fixes this.
        let sampler = TimelineSampler::new(&fixed_distributions(5, 12, 11)).unwrap();
        let mut rng = AgentRng::new(1, AgentId(0));
        assert!(sampler.sample(&mut rng).is_err());
    }

    #[test]
    fn nonpositive_moments_rejected() {
        let dists = EpiDistributions {
            exposure_duration: DurationDistribution::Weibull { mean: 0.0, std_dev: 1.0 },
            ..EpiDistributions::default()
        };
        assert!(TimelineSampler::new(&dists).is_err());
    }
}

// ── Disease state machine ─────────────────────────────────────────────────────

#[cfg(test)]
mod advance_tests {
    use super::*;

    #[test]
    fn full_trajectory_is_monotonic() {
        let (mut store, mut rngs) = resident_store(1);
        let symptom = SymptomProfile::flat(1.0);
        let agent = AgentId(0);

        store.expose(agent);
        assert_eq!(store.state(agent), SeirState::Exposed);
        assert_eq!(store.days_since_transmission[0], 0);

        let mut seen = vec![store.state(agent)];
        for _ in 0..20 {
            store.advance_disease(agent, &symptom, rngs.get_mut(agent));
            seen.push(store.state(agent));
        }

        // susceptible never reappears; states only move forward.
        for pair in seen.windows(2) {
            assert!(pair[1] >= pair[0], "reversal: {seen:?}");
        }
        assert_eq!(*seen.last().unwrap(), SeirState::Removed);
    }

    #[test]
    fn transition_days_match_timeline() {
        let (mut store, mut rngs) = resident_store(1);
        let symptom = SymptomProfile::flat(1.0);
        let agent = AgentId(0);
        store.expose(agent);

        for day in 1..=12 {
            let events = store.advance_disease(agent, &symptom, rngs.get_mut(agent));
            match day {
                5 => assert_eq!(events, vec![DiseaseEvent::BecameInfectious]),
                6 => assert_eq!(events, vec![DiseaseEvent::SymptomOnset]),
                11 => assert_eq!(events, vec![DiseaseEvent::Recovered]),
                _ => assert!(events.is_empty(), "day {day}: {events:?}"),
            }
        }
        assert!(!store.symptomatic[0], "symptoms clear on removal");
    }

    #[test]
    fn symptom_roll_fires_once() {
        let (mut store, mut rngs) = resident_store(1);
        let symptom = SymptomProfile::flat(0.0);
        let agent = AgentId(0);
        store.expose(agent);

        for _ in 0..12 {
            store.advance_disease(agent, &symptom, rngs.get_mut(agent));
        }
        assert!(store.symptom_rolled[0]);
        assert!(!store.symptomatic[0], "probability 0 must never produce symptoms");
    }

    #[test]
    fn vaccinated_agents_stay_asymptomatic() {
        let (mut store, mut rngs) = resident_store(1);
        store.vaccinated[0] = true;
        let symptom = SymptomProfile::flat(1.0);
        let agent = AgentId(0);
        store.expose(agent);

        for _ in 0..12 {
            store.advance_disease(agent, &symptom, rngs.get_mut(agent));
        }
        assert!(!store.symptomatic[0]);
    }

    #[test]
    fn uninfected_agents_do_not_age() {
        let (mut store, mut rngs) = resident_store(1);
        let symptom = SymptomProfile::default();
        let agent = AgentId(0);

        let events = store.advance_disease(agent, &symptom, rngs.get_mut(agent));
        assert!(events.is_empty());
        assert!(store.never_infected(agent));
    }

    #[test]
    fn counts_track_states() {
        let (mut store, mut rngs) = resident_store(3);
        let symptom = SymptomProfile::flat(1.0);
        store.expose(AgentId(0));
        store.quarantined[1] = true;

        let c = store.counts();
        assert_eq!((c.susceptible, c.exposed, c.quarantined), (2, 1, 1));

        for _ in 0..5 {
            store.advance_disease(AgentId(0), &symptom, rngs.get_mut(AgentId(0)));
        }
        let c = store.counts();
        assert_eq!((c.susceptible, c.infectious), (2, 1));
    }

    #[test]
    fn quarantined_infectious_agents_are_not_eligible_transmitters() {
        let (mut store, mut rngs) = resident_store(2);
        let symptom = SymptomProfile::flat(1.0);
        for agent in [AgentId(0), AgentId(1)] {
            store.expose(agent);
            for _ in 0..5 {
                store.advance_disease(agent, &symptom, rngs.get_mut(agent));
            }
        }
        store.quarantined[1] = true;
        assert_eq!(store.eligible_transmitters(), vec![AgentId(0)]);
    }
}

// ── Symptom profile ───────────────────────────────────────────────────────────

#[cfg(test)]
mod symptom_tests {
    use super::*;

    #[test]
    fn age_slope_applies() {
        let profile = SymptomProfile { intercept: 0.1, slope: 0.01 };
        assert!((profile.probability(Some(50.0)) - 0.6).abs() < 1e-9);
        assert!((profile.probability(None) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn probability_is_clamped() {
        let profile = SymptomProfile { intercept: 0.9, slope: 0.05 };
        assert_eq!(profile.probability(Some(90.0)), 1.0);
        let negative = SymptomProfile { intercept: -0.5, slope: 0.0 };
        assert_eq!(negative.probability(None), 0.0);
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn missing_group_config_fails() {
        let sampler = TimelineSampler::new(&fixed_distributions(5, 6, 11)).unwrap();
        let groups = one_group(AgentType::Resident, GroupConfig::default());
        let mut builder = AgentStoreBuilder::new(1);
        builder.push(AgentSeed {
            agent_type: AgentType::Employee,
            age: None,
            mask_override: None,
        });
        assert!(builder.build(&sampler, &groups, &mut SimRng::new(1)).is_err());
    }

    #[test]
    fn vaccination_ratio_picks_exact_count() {
        let sampler = TimelineSampler::new(&fixed_distributions(5, 6, 11)).unwrap();
        let groups = one_group(
            AgentType::Resident,
            GroupConfig { vaccination_ratio: 0.5, ..GroupConfig::default() },
        );
        let mut builder = AgentStoreBuilder::new(3);
        for _ in 0..10 {
            builder.push(AgentSeed {
                agent_type: AgentType::Resident,
                age: None,
                mask_override: None,
            });
        }
        let (store, _) = builder.build(&sampler, &groups, &mut SimRng::new(3)).unwrap();
        assert_eq!(store.vaccinated.iter().filter(|&&v| v).count(), 5);
    }

    #[test]
    fn mask_override_beats_group_default() {
        let sampler = TimelineSampler::new(&fixed_distributions(5, 6, 11)).unwrap();
        let groups = one_group(
            AgentType::Resident,
            GroupConfig { mask: true, ..GroupConfig::default() },
        );
        let mut builder = AgentStoreBuilder::new(1);
        builder.push(AgentSeed {
            agent_type: AgentType::Resident,
            age: None,
            mask_override: Some(false),
        });
        builder.push(AgentSeed {
            agent_type: AgentType::Resident,
            age: None,
            mask_override: None,
        });
        let (store, _) = builder.build(&sampler, &groups, &mut SimRng::new(1)).unwrap();
        assert!(!store.mask[0]);
        assert!(store.mask[1]);
    }

    #[test]
    fn same_seed_reproduces_population() {
        let (a, _) = resident_store(20);
        let (b, _) = resident_store(20);
        assert_eq!(a.timeline, b.timeline);
        assert_eq!(a.voluntary_testing, b.voluntary_testing);
    }
}

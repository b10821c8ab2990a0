//! Per-agent disease timelines and the distributions they are drawn from.
//!
//! # Duration model
//!
//! Each agent carries three integer durations, all counted in days since
//! transmission:
//!
//! - `exposure_duration` — transmission → infectious,
//! - `time_until_symptoms` — transmission → (potential) symptom onset,
//! - `infection_duration` — transmission → removed.
//!
//! A timeline is only valid when
//! `0 < exposure_duration ≤ time_until_symptoms < infection_duration`.
//!
//! Durations are drawn per agent, either as a fixed value or from a Weibull
//! distribution specified by mean and standard deviation.  The Weibull shape
//! parameter is recovered from the moments by solving
//!
//!   var/μ² = Γ(1 + 2/k)/Γ(1 + 1/k)² − 1
//!
//! for `k` (bisection; the right-hand side is strictly decreasing in `k`),
//! then `scale = μ/Γ(1 + 1/k)`.  Draws are rounded to the nearest whole day.
//!
//! Independent draws can violate the ordering invariant (e.g. symptoms after
//! recovery); such combinations are rejected and redrawn.  If no valid
//! combination appears within [`MAX_RESAMPLE_ATTEMPTS`], the configuration
//! itself is unsatisfiable and construction fails.

use rand::distributions::Distribution;
use rand_distr::Weibull;

use seirx_core::AgentRng;

use crate::error::{AgentError, AgentResult};

/// Upper bound on reject-and-resample attempts per agent before the duration
/// configuration is declared unsatisfiable.
pub const MAX_RESAMPLE_ATTEMPTS: u32 = 1_000;

/// Bisection bracket for the Weibull shape parameter.
const SHAPE_BRACKET: (f64, f64) = (0.2, 500.0);

// ── DiseaseTimeline ───────────────────────────────────────────────────────────

/// One agent's sampled disease timeline, in days since transmission.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiseaseTimeline {
    pub exposure_duration: u16,
    pub time_until_symptoms: u16,
    pub infection_duration: u16,
}

impl DiseaseTimeline {
    /// `0 < exposure ≤ symptoms < infection`.
    #[inline]
    pub fn satisfies_ordering(&self) -> bool {
        self.exposure_duration > 0
            && self.exposure_duration <= self.time_until_symptoms
            && self.time_until_symptoms < self.infection_duration
    }
}

impl Default for DiseaseTimeline {
    /// Placeholder for agents whose timeline has not been sampled yet.
    fn default() -> Self {
        DiseaseTimeline {
            exposure_duration: 1,
            time_until_symptoms: 1,
            infection_duration: 2,
        }
    }
}

// ── Distributions ─────────────────────────────────────────────────────────────

/// How one duration parameter is specified.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DurationDistribution {
    /// Every agent gets the same value (deterministic timelines).
    Fixed(u16),
    /// Per-agent draws from a Weibull distribution with the given moments.
    Weibull { mean: f64, std_dev: f64 },
}

/// The three duration distributions of a scenario.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpiDistributions {
    pub exposure_duration: DurationDistribution,
    pub time_until_symptoms: DurationDistribution,
    pub infection_duration: DurationDistribution,
}

impl Default for EpiDistributions {
    /// Literature values for wild-type SARS-CoV-2 (days).
    fn default() -> Self {
        EpiDistributions {
            exposure_duration: DurationDistribution::Weibull { mean: 5.0, std_dev: 1.9 },
            time_until_symptoms: DurationDistribution::Weibull { mean: 6.4, std_dev: 0.8 },
            infection_duration: DurationDistribution::Weibull { mean: 10.91, std_dev: 3.95 },
        }
    }
}

// ── TimelineSampler ───────────────────────────────────────────────────────────

/// A compiled duration parameter: either a constant or a ready-to-draw
/// Weibull distribution.
#[derive(Copy, Clone, Debug)]
enum CompiledDuration {
    Fixed(u16),
    Weibull(Weibull<f64>),
}

impl CompiledDuration {
    fn compile(dist: &DurationDistribution) -> AgentResult<Self> {
        match *dist {
            DurationDistribution::Fixed(days) => Ok(CompiledDuration::Fixed(days)),
            DurationDistribution::Weibull { mean, std_dev } => {
                Ok(CompiledDuration::Weibull(weibull_from_moments(mean, std_dev)?))
            }
        }
    }

    fn draw(&self, rng: &mut AgentRng) -> u16 {
        match self {
            CompiledDuration::Fixed(days) => *days,
            CompiledDuration::Weibull(dist) => {
                let days = dist.sample(rng.inner()).round();
                days.clamp(0.0, f64::from(u16::MAX)) as u16
            }
        }
    }
}

/// Samples valid [`DiseaseTimeline`]s for new agents.
///
/// Built once per run from the scenario's [`EpiDistributions`]; the Weibull
/// shape solve happens here rather than per draw.
#[derive(Copy, Clone, Debug)]
pub struct TimelineSampler {
    exposure: CompiledDuration,
    symptoms: CompiledDuration,
    infection: CompiledDuration,
}

impl TimelineSampler {
    pub fn new(dists: &EpiDistributions) -> AgentResult<Self> {
        Ok(TimelineSampler {
            exposure: CompiledDuration::compile(&dists.exposure_duration)?,
            symptoms: CompiledDuration::compile(&dists.time_until_symptoms)?,
            infection: CompiledDuration::compile(&dists.infection_duration)?,
        })
    }

    /// Draw a timeline satisfying the ordering invariant.
    ///
    /// Rejects and redraws invalid combinations; fails after
    /// [`MAX_RESAMPLE_ATTEMPTS`] so an unsatisfiable configuration (e.g.
    /// `Fixed` values in the wrong order) surfaces as a setup error instead
    /// of an endless loop.
    pub fn sample(&self, rng: &mut AgentRng) -> AgentResult<DiseaseTimeline> {
        for _ in 0..MAX_RESAMPLE_ATTEMPTS {
            let timeline = DiseaseTimeline {
                exposure_duration: self.exposure.draw(rng),
                time_until_symptoms: self.symptoms.draw(rng),
                infection_duration: self.infection.draw(rng),
            };
            if timeline.satisfies_ordering() {
                return Ok(timeline);
            }
        }
        Err(AgentError::PathologicalDurations { attempts: MAX_RESAMPLE_ATTEMPTS })
    }
}

// ── Weibull moment matching ───────────────────────────────────────────────────

/// Build a Weibull distribution whose mean and standard deviation match the
/// given moments.
fn weibull_from_moments(mean: f64, std_dev: f64) -> AgentResult<Weibull<f64>> {
    if !(mean > 0.0) || !(std_dev > 0.0) {
        return Err(AgentError::Config(format!(
            "Weibull moments must be positive (mean {mean}, std_dev {std_dev})"
        )));
    }

    let shape = solve_shape(mean, std_dev * std_dev)?;
    let scale = mean / libm::tgamma(1.0 + 1.0 / shape);

    Weibull::new(scale, shape)
        .map_err(|e| AgentError::Config(format!("invalid Weibull parameters: {e}")))
}

/// Squared coefficient of variation of a Weibull with shape `k`.
#[inline]
fn weibull_cv2(k: f64) -> f64 {
    let g1 = libm::tgamma(1.0 + 1.0 / k);
    libm::tgamma(1.0 + 2.0 / k) / (g1 * g1) - 1.0
}

/// Solve `var/μ² = CV²(k)` for the shape `k` by bisection.
///
/// `CV²(k)` is strictly decreasing, so `f(k) = var/μ² − CV²(k)` has a single
/// sign change in the bracket.
fn solve_shape(mean: f64, var: f64) -> AgentResult<f64> {
    let target = var / (mean * mean);
    let f = |k: f64| target - weibull_cv2(k);

    let (mut lo, mut hi) = SHAPE_BRACKET;
    if f(lo) > 0.0 || f(hi) < 0.0 {
        return Err(AgentError::Config(format!(
            "Weibull moments (mean {mean}, var {var}) have no shape in [{lo}, {hi}]"
        )));
    }

    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if f(mid) < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < 1e-12 {
            break;
        }
    }
    Ok(0.5 * (lo + hi))
}

#[cfg(test)]
pub(crate) fn shape_for_test(mean: f64, var: f64) -> f64 {
    solve_shape(mean, var).unwrap()
}

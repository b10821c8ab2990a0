//! Transmission-model configuration.
//!
//! All "efficiency"/"modifier" fields are **risk-reduction fractions** in
//! [0, 1]: 0 leaves the risk untouched, 1 eliminates it.  The model turns a
//! reduction `q` into a multiplicative weight `1 − q` on the base risk.
//! Contact-type and subclinical values are expressed directly as weights
//! because that is how they are calibrated.

use seirx_network::ContactType;

use crate::error::{ModelError, ModelResult};

// ── ContactWeights ────────────────────────────────────────────────────────────

/// Multiplicative risk weight per contact closeness.
///
/// `close` is pinned to 1.0 by definition — the base transmission risk *is*
/// the risk of a household-equivalent contact; all other labels scale it
/// down.  Validation rejects any other value for `close`.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactWeights {
    pub very_far: f64,
    pub far: f64,
    pub intermediate: f64,
    pub close: f64,
}

impl ContactWeights {
    #[inline]
    pub fn weight(&self, contact: ContactType) -> f64 {
        match contact {
            ContactType::VeryFar => self.very_far,
            ContactType::Far => self.far,
            ContactType::Intermediate => self.intermediate,
            ContactType::Close => self.close,
        }
    }
}

impl Default for ContactWeights {
    fn default() -> Self {
        ContactWeights { very_far: 0.1, far: 0.25, intermediate: 0.5, close: 1.0 }
    }
}

// ── AgeDiscount ───────────────────────────────────────────────────────────────

/// Linear age discount for transmission and reception risk.
///
/// `weight = clamp(intercept + slope · min(0, age − 18), 0, 1)`: adults carry
/// the full risk (`intercept`, 1 by definition), every year below 18 removes
/// `slope` from it.  Agents without an age attribute are treated as adults.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgeDiscount {
    pub intercept: f64,
    pub slope: f64,
}

impl AgeDiscount {
    const ADULT_AGE: f64 = 18.0;

    #[inline]
    pub fn weight(&self, age: Option<f32>) -> f64 {
        match age {
            Some(age) => {
                let below = (f64::from(age) - Self::ADULT_AGE).min(0.0);
                (self.intercept + self.slope * below).clamp(0.0, 1.0)
            }
            None => 1.0,
        }
    }

    /// No age dependence at all: every agent gets weight 1.
    pub fn none() -> Self {
        AgeDiscount { intercept: 1.0, slope: 0.0 }
    }
}

impl Default for AgeDiscount {
    fn default() -> Self {
        AgeDiscount { intercept: 1.0, slope: 0.02 }
    }
}

// ── MaskFilter ────────────────────────────────────────────────────────────────

/// Mask filter efficiencies as risk-reduction fractions.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaskFilter {
    /// Reduction of exhaled viral load (transmitter side).
    pub exhale: f64,
    /// Reduction of inhaled viral load (receiver side).
    pub inhale: f64,
}

// ── VaccinationEffect ─────────────────────────────────────────────────────────

/// Vaccination risk reductions, split by direction.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VaccinationEffect {
    /// Reduction of the risk of *receiving* an infection when vaccinated.
    pub reception: f64,
    /// Reduction of the risk of *transmitting* an infection when vaccinated.
    pub transmission: f64,
}

impl Default for VaccinationEffect {
    /// Sterilizing immunity on reception, no effect on onward transmission.
    fn default() -> Self {
        VaccinationEffect { reception: 1.0, transmission: 0.0 }
    }
}

// ── ProgressionWeighting ──────────────────────────────────────────────────────

/// How infectiousness varies over the course of an infection.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ProgressionWeighting {
    /// Full infectiousness from the end of the exposure period through
    /// symptom onset, then a linear ramp down to the end of the infection.
    #[default]
    Trapezoid,
    /// Constant full infectiousness for the whole infectious period.
    /// Used for calibration against household secondary attack rates.
    Uniform,
}

// ── TransmissionConfig ────────────────────────────────────────────────────────

/// All transmission-model parameters of one scenario.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransmissionConfig {
    /// Daily transmission probability of an unmitigated household contact.
    /// Calibrated against empirical household secondary attack rates.
    pub base_risk: f64,

    pub contact_weights: ContactWeights,
    pub age_transmission_discount: AgeDiscount,
    pub progression: ProgressionWeighting,

    /// Weight applied to asymptomatic transmitters (e.g. 0.6 → a subclinical
    /// course is 60 % as infectious).
    pub subclinical_modifier: f64,

    pub mask_filter: MaskFilter,

    /// Room-ventilation risk reduction, applied to non-household contacts.
    pub ventilation_reduction: f64,

    pub vaccination: VaccinationEffect,
}

impl TransmissionConfig {
    /// Check every parameter is a probability/weight in [0, 1] and that the
    /// close-contact weight is exactly 1.  Fatal at initialization.
    pub fn validate(&self) -> ModelResult<()> {
        let unit_interval = [
            ("base_risk", self.base_risk),
            ("contact_weights.very_far", self.contact_weights.very_far),
            ("contact_weights.far", self.contact_weights.far),
            ("contact_weights.intermediate", self.contact_weights.intermediate),
            ("contact_weights.close", self.contact_weights.close),
            ("age_transmission_discount.intercept", self.age_transmission_discount.intercept),
            ("subclinical_modifier", self.subclinical_modifier),
            ("mask_filter.exhale", self.mask_filter.exhale),
            ("mask_filter.inhale", self.mask_filter.inhale),
            ("ventilation_reduction", self.ventilation_reduction),
            ("vaccination.reception", self.vaccination.reception),
            ("vaccination.transmission", self.vaccination.transmission),
        ];
        for (name, value) in unit_interval {
            if !(0.0..=1.0).contains(&value) {
                return Err(ModelError::OutOfRange { name, value });
            }
        }
        if self.contact_weights.close != 1.0 {
            return Err(ModelError::CloseWeightNotUnit(self.contact_weights.close));
        }
        Ok(())
    }
}

impl Default for TransmissionConfig {
    fn default() -> Self {
        TransmissionConfig {
            base_risk: 0.05,
            contact_weights: ContactWeights::default(),
            age_transmission_discount: AgeDiscount::default(),
            progression: ProgressionWeighting::Trapezoid,
            subclinical_modifier: 0.6,
            mask_filter: MaskFilter::default(),
            ventilation_reduction: 0.0,
            vaccination: VaccinationEffect::default(),
        }
    }
}

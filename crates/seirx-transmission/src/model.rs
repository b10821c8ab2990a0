//! The pairwise transmission-probability computation.

use seirx_core::AgentId;
use seirx_agent::AgentStore;
use seirx_network::ContactType;

use crate::config::{ProgressionWeighting, TransmissionConfig};
use crate::error::ModelResult;

/// Computes the success probability of one contact's Bernoulli trial.
///
/// The probability for a (transmitter, receiver, contact) triple is
///
/// ```text
/// p = 1 − (1 − b · w_contact · w_age_t · w_age_r · w_progress(d)
///               · w_subclinical · w_exhale · w_inhale · w_vent
///               · w_vacc_t · w_vacc_r)
/// ```
///
/// where `b` is the calibrated base risk and each `w` is 1 unless the pair is
/// subject to the corresponding effect.  Masks and ventilation only apply to
/// mask-susceptible (non-household) contacts, and only to agents that
/// actually wear a mask.
pub struct TransmissionModel {
    config: TransmissionConfig,
}

impl TransmissionModel {
    /// Validate the configuration and build the model.  Fails fast on any
    /// out-of-range parameter (fatal at initialization).
    pub fn new(config: TransmissionConfig) -> ModelResult<Self> {
        config.validate()?;
        Ok(TransmissionModel { config })
    }

    pub fn config(&self) -> &TransmissionConfig {
        &self.config
    }

    /// Transmission probability for one ordered contact, in [0, 1].
    ///
    /// The caller guarantees the transmitter is infectious and the receiver
    /// susceptible; this function only computes the probability and draws
    /// nothing.
    pub fn transmission_probability(
        &self,
        store:       &AgentStore,
        transmitter: AgentId,
        receiver:    AgentId,
        contact:     ContactType,
    ) -> f64 {
        let t = transmitter.index();
        let r = receiver.index();
        let cfg = &self.config;

        let mut weight = cfg.contact_weights.weight(contact);
        weight *= cfg.age_transmission_discount.weight(store.age[t]);
        weight *= cfg.age_transmission_discount.weight(store.age[r]);
        weight *= self.progression_weight(store, transmitter);

        if !store.symptomatic[t] {
            weight *= cfg.subclinical_modifier;
        }

        if contact.mask_susceptible() {
            if store.mask[t] {
                weight *= 1.0 - cfg.mask_filter.exhale;
            }
            if store.mask[r] {
                weight *= 1.0 - cfg.mask_filter.inhale;
            }
            weight *= 1.0 - cfg.ventilation_reduction;
        }

        if store.vaccinated[t] {
            weight *= 1.0 - cfg.vaccination.transmission;
        }
        if store.vaccinated[r] {
            weight *= 1.0 - cfg.vaccination.reception;
        }

        let p = 1.0 - (1.0 - cfg.base_risk * weight);
        p.clamp(0.0, 1.0)
    }

    /// Infectiousness over the course of an infection: zero while exposed,
    /// full from the end of the exposure period through symptom onset, then
    /// a linear ramp down that keeps the last day slightly infectious.
    ///
    /// Under [`ProgressionWeighting::Uniform`] the ramp is disabled and the
    /// whole infectious period carries full weight.
    fn progression_weight(&self, store: &AgentStore, transmitter: AgentId) -> f64 {
        if self.config.progression == ProgressionWeighting::Uniform {
            // Caller guarantees the transmitter is infectious.
            return 1.0;
        }

        let i = transmitter.index();
        let days = store.days_since_transmission[i];
        let timeline = store.timeline[i];

        let exposure = i32::from(timeline.exposure_duration);
        let symptoms = i32::from(timeline.time_until_symptoms);
        let end = i32::from(timeline.infection_duration);

        if days < exposure {
            0.0
        } else if days <= symptoms {
            1.0
        } else if days <= end {
            // The +1 keeps the weight positive on the final infectious day.
            f64::from(end - days + 1) / f64::from(end - symptoms + 1)
        } else {
            0.0
        }
    }
}

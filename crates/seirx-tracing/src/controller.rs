//! The quarantine controller.

use seirx_core::AgentId;
use seirx_agent::AgentStore;
use seirx_network::{ContactNetwork, ContactType};

use crate::error::{TracingError, TracingResult};

// ── QuarantinePolicy ──────────────────────────────────────────────────────────

/// Containment policy of one scenario.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuarantinePolicy {
    /// Days an agent stays quarantined after being traced or testing
    /// positive.
    pub duration: u16,

    /// Contact types whose neighbors count as K1 contact persons and are
    /// quarantined together with a positively tested agent.
    pub k1_contact_types: Vec<ContactType>,

    /// Release quarantined agents early on any negative test result.
    ///
    /// Deliberate quirk, kept from the reference model: the negative result
    /// may come from a swab taken *before* the quarantine began and still
    /// liberates the agent.
    pub liberating_testing: bool,
}

impl QuarantinePolicy {
    pub fn validate(&self) -> TracingResult<()> {
        if self.duration == 0 {
            return Err(TracingError::ZeroDuration);
        }
        Ok(())
    }

    #[inline]
    fn is_k1(&self, contact: ContactType) -> bool {
        self.k1_contact_types.contains(&contact)
    }
}

impl Default for QuarantinePolicy {
    fn default() -> Self {
        QuarantinePolicy {
            duration: 10,
            k1_contact_types: vec![ContactType::Close],
            liberating_testing: false,
        }
    }
}

// ── QuarantineController ──────────────────────────────────────────────────────

/// Applies the quarantine policy to the agent store.
///
/// The controller is stateless beyond its policy; all mutable bookkeeping
/// (the `quarantined` flag and countdown) lives in the store so it
/// checkpoints with the rest of the simulation state.
pub struct QuarantineController {
    policy: QuarantinePolicy,
}

impl QuarantineController {
    pub fn new(policy: QuarantinePolicy) -> TracingResult<Self> {
        policy.validate()?;
        Ok(QuarantineController { policy })
    }

    pub fn policy(&self) -> &QuarantinePolicy {
        &self.policy
    }

    /// Put one agent into quarantine (or restart the countdown of an agent
    /// already quarantined for a fresh positive).
    pub fn quarantine(&self, store: &mut AgentStore, agent: AgentId) {
        let i = agent.index();
        store.quarantined[i] = true;
        store.quarantine_remaining[i] = self.policy.duration;
    }

    /// React to a positive result for `agent`: quarantine the agent itself
    /// plus every K1 neighbor in the contact network.
    ///
    /// Returns the neighbors that were newly quarantined (for observers and
    /// logs).  The positive agent is quarantined regardless of whether the
    /// result was true — test noise is invisible to the tracing layer.
    pub fn trace_positive(
        &self,
        store:   &mut AgentStore,
        network: &ContactNetwork,
        agent:   AgentId,
    ) -> Vec<AgentId> {
        if !store.quarantined[agent.index()] {
            self.quarantine(store, agent);
        }

        let k1_contacts: Vec<AgentId> = network
            .neighbors(agent)
            .filter(|&(_, contact)| self.policy.is_k1(contact))
            .map(|(neighbor, _)| neighbor)
            .collect();

        let mut newly_quarantined = Vec::new();
        for neighbor in k1_contacts {
            if !store.quarantined[neighbor.index()] {
                newly_quarantined.push(neighbor);
            }
            self.quarantine(store, neighbor);
        }
        newly_quarantined
    }

    /// React to a negative result: under liberating testing, a quarantined
    /// agent is released immediately.
    pub fn on_negative_result(&self, store: &mut AgentStore, agent: AgentId) {
        let i = agent.index();
        if self.policy.liberating_testing && store.quarantined[i] {
            store.quarantined[i] = false;
            store.quarantine_remaining[i] = 0;
        }
        store.known_positive[i] = false;
    }

    /// Daily countdown: decrement every quarantined agent's remaining days
    /// and release those that reach zero.  Returns the number released.
    pub fn tick(&self, store: &mut AgentStore) -> usize {
        let mut released = 0;
        for i in 0..store.count {
            if !store.quarantined[i] {
                continue;
            }
            store.quarantine_remaining[i] = store.quarantine_remaining[i].saturating_sub(1);
            if store.quarantine_remaining[i] == 0 {
                store.quarantined[i] = false;
                released += 1;
            }
        }
        released
    }
}

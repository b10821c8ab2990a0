//! Fluent builder for constructing `AgentStore` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut builder = AgentStoreBuilder::new(seed);
//! for node in network.nodes() {
//!     builder.push(AgentSeed {
//!         agent_type:    node.agent_type,
//!         age:           node.age,
//!         mask_override: node.mask,
//!     });
//! }
//! let (store, rngs) = builder.build(&sampler, &groups, &mut sim_rng)?;
//! ```
//!
//! Agents receive their IDs in push order, which must match the node order of
//! the contact network — network nodes and agents share one index space.

use std::collections::BTreeMap;

use seirx_core::{AgentId, AgentType, SimRng};

use crate::error::{AgentError, AgentResult};
use crate::group::GroupConfig;
use crate::store::{AgentRngs, AgentStore};
use crate::timeline::TimelineSampler;

/// Static attributes of one agent-to-be, taken from a network node.
#[derive(Copy, Clone, Debug)]
pub struct AgentSeed {
    pub agent_type: AgentType,
    pub age: Option<f32>,
    /// Per-node mask override; `None` falls back to the group's `mask` flag.
    pub mask_override: Option<bool>,
}

/// Fluent builder for [`AgentStore`] + [`AgentRngs`].
pub struct AgentStoreBuilder {
    seed: u64,
    rows: Vec<AgentSeed>,
}

impl AgentStoreBuilder {
    /// Create a builder using `seed` as the global RNG seed.
    pub fn new(seed: u64) -> Self {
        Self { seed, rows: Vec::new() }
    }

    /// Append one agent; returns its `AgentId` (sequential from 0).
    pub fn push(&mut self, seed: AgentSeed) -> AgentId {
        let id = AgentId(self.rows.len() as u32);
        self.rows.push(seed);
        id
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Construct the store and the per-agent RNGs.
    ///
    /// Every agent type that occurs among the pushed rows must have a
    /// [`GroupConfig`]; timelines are drawn from `sampler` with each agent's
    /// own RNG, and the per-group vaccination subsets are drawn from
    /// `sim_rng`.
    ///
    /// Fails fast on a missing group config or an unsatisfiable duration
    /// configuration — no partially initialized population is returned.
    pub fn build(
        self,
        sampler: &TimelineSampler,
        groups:  &BTreeMap<AgentType, GroupConfig>,
        sim_rng: &mut SimRng,
    ) -> AgentResult<(AgentStore, AgentRngs)> {
        let count = self.rows.len();
        let mut store = AgentStore::new(count);
        let mut rngs = AgentRngs::new(count, self.seed);

        for (i, row) in self.rows.iter().enumerate() {
            let group = groups
                .get(&row.agent_type)
                .ok_or(AgentError::MissingGroupConfig(row.agent_type))?;
            let rng = rngs.get_mut(AgentId(i as u32));

            store.agent_type[i] = row.agent_type;
            store.age[i] = row.age;
            store.mask[i] = row.mask_override.unwrap_or(group.mask);
            store.timeline[i] = sampler.sample(rng)?;
            store.voluntary_testing[i] = rng.gen_bool(group.voluntary_testing_rate);
        }

        // Vaccinate round(ratio * n) members of each group, chosen without
        // replacement from the simulation-level RNG.
        for (&agent_type, group) in groups {
            if group.vaccination_ratio <= 0.0 {
                continue;
            }
            let mut members: Vec<usize> = (0..count)
                .filter(|&i| store.agent_type[i] == agent_type)
                .collect();
            let n = (group.vaccination_ratio * members.len() as f64).round() as usize;
            sim_rng.shuffle(&mut members);
            for &i in members.iter().take(n) {
                store.vaccinated[i] = true;
            }
        }

        Ok((store, rngs))
    }
}

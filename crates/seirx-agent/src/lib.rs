//! `seirx-agent` — agent storage and the SEIRX disease state machine.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`state`]    | `SeirState`, `DiseaseEvent`                                |
//! | [`timeline`] | `DiseaseTimeline`, Weibull duration sampling               |
//! | [`group`]    | `GroupConfig` (per-`AgentType` policy), `SymptomProfile`   |
//! | [`store`]    | `AgentStore` (SoA arrays), `AgentRngs` (per-agent RNG)     |
//! | [`builder`]  | `AgentStoreBuilder` (construction from network node rows)  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                    |
//! |---------|-----------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on all state types.     |

pub mod builder;
pub mod error;
pub mod group;
pub mod state;
pub mod store;
pub mod timeline;

#[cfg(test)]
mod tests;

pub use builder::{AgentSeed, AgentStoreBuilder};
pub use error::{AgentError, AgentResult};
pub use group::{GroupConfig, SymptomProfile};
pub use state::{DiseaseEvent, SeirState};
pub use store::{AgentRngs, AgentStore, StateCounts};
pub use timeline::{
    DiseaseTimeline, DurationDistribution, EpiDistributions, TimelineSampler,
    MAX_RESAMPLE_ATTEMPTS,
};

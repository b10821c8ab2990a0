//! `seirx-core` — foundational types for the `seirx` epidemic simulator.
//!
//! This crate is a dependency of every other `seirx-*` crate.  It intentionally
//! has no `seirx-*` dependencies and minimal external ones (`rand`,
//! `rand_chacha`, `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`ids`]        | `AgentId`, `EdgeId`                                   |
//! | [`group`]      | `AgentType` enum                                      |
//! | [`time`]       | `Day`, `Weekday`, `SimClock`                          |
//! | [`rng`]        | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`error`]      | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required for simulation checkpoint/resume.                 |

pub mod error;
pub mod group;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use group::AgentType;
pub use ids::{AgentId, EdgeId};
pub use rng::{AgentRng, SimRng};
pub use time::{Day, SimClock, Weekday};

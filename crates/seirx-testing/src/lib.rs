//! `seirx-testing` — test technologies and the testing strategy.
//!
//! Testing is the simulator's only (noisy, delayed) window into the true
//! infection states: an agent is swabbed on one day, the sample's outcome is
//! governed by where the agent was in its infection at *that* moment, and the
//! result arrives `turnover_days` later — by which point the dynamics have
//! moved on.
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`technology`] | `TestTechnology`, `TestCatalog`, `TestId`             |
//! | [`policy`]     | `TestingPolicy`, `ScreenKind`, `TestingConfig`,       |
//! |                | weekday schedules for screening intervals             |
//! | [`strategy`]   | `TestingStrategy` (behavior), `TestingState` (runtime)|
//! | [`error`]      | `TestingError`, `TestingResult`                       |

pub mod error;
pub mod policy;
pub mod strategy;
pub mod technology;


pub use error::{TestingError, TestingResult};
pub use policy::{screening_weekdays, ScreenKind, TestingConfig, TestingPolicy};
pub use strategy::{
    PendingTest, TestCounters, TestPurpose, TestResult, TestingState, TestingStrategy,
};
pub use technology::{TestCatalog, TestId, TestTechnology};

//! `seirx-tracing` — reaction to positive test results: quarantine of the
//! tested agent and of its close (K1) contacts, daily quarantine countdown,
//! and optional early release on negative results.
//!
//! The controller acts on *test results*, not on true infection states — a
//! false positive quarantines a whole contact neighborhood exactly like a
//! true one, because the system has no way to tell them apart.

pub mod controller;
pub mod error;


pub use controller::{QuarantineController, QuarantinePolicy};
pub use error::{TracingError, TracingResult};

//! Testing-mode configuration and screening schedules.

use seirx_core::{AgentType, Weekday};

use crate::error::{TestingError, TestingResult};

// ── TestingPolicy ─────────────────────────────────────────────────────────────

/// Which testing mechanisms are active.
///
/// The modes compose upwards: every active mode performs diagnostic testing
/// of symptomatic agents; `Background` adds reactive full-group screens after
/// a positive result; `Preventive` adds calendar-driven screens; the combined
/// mode runs both.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TestingPolicy {
    /// No testing, no tracing, no quarantine from test results.
    Disabled,
    #[default]
    Diagnostic,
    Background,
    Preventive,
    BackgroundAndPreventive,
}

impl TestingPolicy {
    #[inline]
    pub fn is_active(self) -> bool {
        self != TestingPolicy::Disabled
    }

    #[inline]
    pub fn includes_diagnostic(self) -> bool {
        self.is_active()
    }

    #[inline]
    pub fn includes_background(self) -> bool {
        matches!(self, TestingPolicy::Background | TestingPolicy::BackgroundAndPreventive)
    }

    #[inline]
    pub fn includes_preventive(self) -> bool {
        matches!(self, TestingPolicy::Preventive | TestingPolicy::BackgroundAndPreventive)
    }
}

// ── ScreenKind ────────────────────────────────────────────────────────────────

/// Why a full-group screen is running.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScreenKind {
    /// Triggered by a new positive test result.
    Reactive,
    /// Scheduled repeat of an earlier reactive screen.
    FollowUp,
    /// Calendar-driven, independent of any test result.
    Preventive,
}

impl ScreenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScreenKind::Reactive => "reactive",
            ScreenKind::FollowUp => "follow_up",
            ScreenKind::Preventive => "preventive",
        }
    }
}

// ── Screening schedules ───────────────────────────────────────────────────────

/// Weekdays on which a preventive screen with the given interval runs.
///
/// Only three cadences exist, anchored to the working week:
/// every 7 days → Mondays; every 3 days → Mondays and Thursdays; every
/// 2 days → Mondays, Wednesdays, and Fridays.  Any other interval is a fatal
/// configuration error.
pub fn screening_weekdays(interval: u8) -> TestingResult<&'static [Weekday]> {
    match interval {
        7 => Ok(&[Weekday::Monday]),
        3 => Ok(&[Weekday::Monday, Weekday::Thursday]),
        2 => Ok(&[Weekday::Monday, Weekday::Wednesday, Weekday::Friday]),
        other => Err(TestingError::InvalidScreeningInterval(other)),
    }
}

// ── TestingConfig ─────────────────────────────────────────────────────────────

/// Scenario-level testing configuration.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestingConfig {
    pub policy: TestingPolicy,

    /// Technology used for diagnostic tests and reactive/follow-up screens.
    pub diagnostic_test: String,

    /// Technology used for preventive screens.
    pub preventive_test: String,

    /// Days after a reactive screen at which its one follow-up repeat runs;
    /// `None` disables follow-up screening.
    pub follow_up_interval: Option<u16>,

    /// Agent groups included in background/follow-up/preventive screens.
    /// Empty means "every group present in the network".
    pub screened_groups: Vec<AgentType>,
}

impl Default for TestingConfig {
    fn default() -> Self {
        TestingConfig {
            policy: TestingPolicy::Diagnostic,
            diagnostic_test: "one_day_PCR".to_owned(),
            preventive_test: "same_day_antigen".to_owned(),
            follow_up_interval: None,
            screened_groups: Vec::new(),
        }
    }
}

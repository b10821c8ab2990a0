//! Test technologies and the catalog they are looked up in.
//!
//! A technology is characterized by its detection window (in days since
//! transmission), its error rates, and how long the laboratory takes to
//! return a result.  The built-in catalog models the three technology
//! families used in practice — antigen, PCR, and LAMP — each in same-day,
//! one-day, and two-day turnover variants:
//!
//! | Family  | Window (days since transmission) | Rationale               |
//! |---------|----------------------------------|-------------------------|
//! | antigen | 6 .. 10                          | needs high viral load   |
//! | LAMP    | 5 .. 11                          | roughly tracks culture  |
//! | PCR     | 4 .. 11                          | detects low viral loads |
//!
//! Scenario code can [`register`][TestCatalog::register] additional
//! technologies (e.g. reduced-sensitivity antigen variants for sensitivity
//! sweeps) before the simulation is initialized.

use std::fmt;

use crate::error::{TestingError, TestingResult};

// ── TestId ────────────────────────────────────────────────────────────────────

/// Compact handle for a technology in a [`TestCatalog`].
///
/// Stable for the lifetime of the catalog; pending tests store this instead
/// of the technology name.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestId(pub u16);

impl TestId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TestId({})", self.0)
    }
}

// ── TestTechnology ────────────────────────────────────────────────────────────

/// Immutable description of one test technology.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestTechnology {
    pub name: String,
    /// P(positive | agent testable at administration).
    pub sensitivity: f64,
    /// P(negative | agent not testable at administration).
    pub specificity: f64,
    /// First day since transmission on which the infection is detectable.
    pub days_until_testable: u16,
    /// Length of the detection window; the agent is testable on days
    /// `days_until_testable .. days_until_testable + days_testable`.
    pub days_testable: u16,
    /// Days until the result is available (0 = same day).
    pub turnover_days: u16,
}

impl TestTechnology {
    /// `true` if an agent swabbed `days_since_transmission` days into its
    /// infection would yield a true-positive sample.  Never-infected agents
    /// pass a negative value and are not testable.
    #[inline]
    pub fn testable_at(&self, days_since_transmission: i32) -> bool {
        let start = i32::from(self.days_until_testable);
        let end = start + i32::from(self.days_testable);
        (start..end).contains(&days_since_transmission)
    }

    fn validate(&self) -> TestingResult<()> {
        for (name, value) in [("sensitivity", self.sensitivity), ("specificity", self.specificity)]
        {
            if !(0.0..=1.0).contains(&value) {
                return Err(TestingError::Config(format!(
                    "test '{}': {name} = {value} is outside [0, 1]",
                    self.name
                )));
            }
        }
        if self.days_testable == 0 {
            return Err(TestingError::Config(format!(
                "test '{}': detection window is empty",
                self.name
            )));
        }
        Ok(())
    }
}

// ── TestCatalog ───────────────────────────────────────────────────────────────

/// Registry of test technologies, looked up by name at configuration time
/// and by [`TestId`] afterwards.
#[derive(Clone, Debug)]
pub struct TestCatalog {
    tests: Vec<TestTechnology>,
}

impl TestCatalog {
    /// Empty catalog; useful when a scenario defines all its own tests.
    pub fn new() -> Self {
        TestCatalog { tests: Vec::new() }
    }

    /// Catalog of the built-in technologies.
    pub fn builtin() -> Self {
        let perfect = |name: &str, until: u16, window: u16, turnover: u16| TestTechnology {
            name: name.to_owned(),
            sensitivity: 1.0,
            specificity: 1.0,
            days_until_testable: until,
            days_testable: window,
            turnover_days: turnover,
        };

        TestCatalog {
            tests: vec![
                perfect("same_day_antigen", 6, 4, 0),
                perfect("one_day_antigen", 6, 4, 1),
                perfect("two_day_antigen", 6, 4, 2),
                perfect("same_day_PCR", 4, 7, 0),
                perfect("one_day_PCR", 4, 7, 1),
                perfect("two_day_PCR", 4, 7, 2),
                perfect("same_day_LAMP", 5, 6, 0),
                perfect("one_day_LAMP", 5, 6, 1),
                perfect("two_day_LAMP", 5, 6, 2),
            ],
        }
    }

    /// Register an additional technology.  Names must be unique.
    pub fn register(&mut self, tech: TestTechnology) -> TestingResult<TestId> {
        tech.validate()?;
        if self.tests.iter().any(|t| t.name == tech.name) {
            return Err(TestingError::DuplicateTestType(tech.name));
        }
        let id = TestId(self.tests.len() as u16);
        self.tests.push(tech);
        Ok(id)
    }

    /// Resolve a technology name.  Unknown names are a fatal configuration
    /// error at simulation initialization.
    pub fn lookup(&self, name: &str) -> TestingResult<TestId> {
        self.tests
            .iter()
            .position(|t| t.name == name)
            .map(|i| TestId(i as u16))
            .ok_or_else(|| TestingError::UnknownTestType(name.to_owned()))
    }

    #[inline]
    pub fn get(&self, id: TestId) -> &TestTechnology {
        &self.tests[id.index()]
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

impl Default for TestCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

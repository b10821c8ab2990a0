//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Day` counter; the simulation has no
//! sub-day resolution.  The mapping to a calendar weekday is held in
//! `SimClock`:
//!
//!   weekday = (day + weekday_offset) mod 7
//!
//! The weekday offset exists because preventive screening schedules are keyed
//! to weekdays (Mondays, Mon+Thu, Mon/Wed/Fri).  A run that always started on
//! a Monday would couple the index case's incubation phase to the screening
//! schedule and bias ensemble statistics; randomizing the offset per run
//! decorrelates the two.

use std::fmt;

// ── Day ──────────────────────────────────────────────────────────────────────

/// An absolute simulated-day counter, starting at 0.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Day(pub u64);

impl Day {
    pub const ZERO: Day = Day(0);

    /// Return the day `n` days after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Day {
        Day(self.0 + n)
    }

    /// Days elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Day) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Day {
    type Output = Day;
    #[inline]
    fn add(self, rhs: u64) -> Day {
        Day(self.0 + rhs)
    }
}

impl std::ops::Sub for Day {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Day) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

// ── Weekday ──────────────────────────────────────────────────────────────────

/// Day of the simulated week.  Screening schedules are expressed in weekdays.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weekday {
    #[default]
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Weekday for an index in `0..7` (0 = Monday).
    #[inline]
    pub fn from_index(i: u64) -> Weekday {
        Weekday::ALL[(i % 7) as usize]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── SimClock ─────────────────────────────────────────────────────────────────

/// Tracks the current simulated day and its calendar weekday.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// The current day — advanced by [`SimClock::advance`] once per step.
    pub current_day: Day,
    /// Offset in `0..7` applied before the weekday is derived.  Day 0 falls
    /// on `Weekday::from_index(weekday_offset)`.
    pub weekday_offset: u8,
}

impl SimClock {
    /// Create a clock at day 0 with the given weekday offset (`0..7`).
    pub fn new(weekday_offset: u8) -> Self {
        Self {
            current_day: Day::ZERO,
            weekday_offset: weekday_offset % 7,
        }
    }

    /// Advance the clock by one day.
    #[inline]
    pub fn advance(&mut self) {
        self.current_day = Day(self.current_day.0 + 1);
    }

    /// Weekday of the current day.
    #[inline]
    pub fn weekday(&self) -> Weekday {
        self.weekday_of(self.current_day)
    }

    /// Weekday of an arbitrary day under this clock's offset.
    #[inline]
    pub fn weekday_of(&self, day: Day) -> Weekday {
        Weekday::from_index(day.0 + u64::from(self.weekday_offset))
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.current_day, self.weekday())
    }
}

//! Per-group policy configuration and the age-dependent symptom profile.

/// Policy knobs applied to every agent of one [`AgentType`][seirx_core::AgentType].
///
/// Groups replace per-type agent subclasses: an agent is a plain record, and
/// everything that varies between residents, employees, students, … is looked
/// up here.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupConfig {
    /// Days between preventive screens of this group.  Only 7 (Mondays),
    /// 3 (Mon + Thu) and 2 (Mon/Wed/Fri) are valid; `None` disables
    /// preventive screening for the group.
    pub screening_interval: Option<u8>,

    /// Daily probability for a member of this group to become an index case
    /// in continuous index-case mode.
    pub index_probability: f64,

    /// Whether members of this group wear masks (individual network nodes may
    /// override this).
    pub mask: bool,

    /// Fraction of the group that is vaccinated at setup.
    pub vaccination_ratio: f64,

    /// Fraction of the group participating in voluntary (preventive)
    /// testing.  Diagnostic and reactive tests ignore this.
    pub voluntary_testing_rate: f64,
}

impl Default for GroupConfig {
    fn default() -> Self {
        GroupConfig {
            screening_interval: None,
            index_probability: 0.0,
            mask: false,
            vaccination_ratio: 0.0,
            voluntary_testing_rate: 1.0,
        }
    }
}

/// Age-dependent probability of developing a symptomatic course.
///
/// `probability = clamp(intercept + slope · age, 0, 1)`; agents without an
/// age attribute use the intercept alone.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymptomProfile {
    pub intercept: f64,
    pub slope: f64,
}

impl SymptomProfile {
    /// A flat, age-independent symptom probability.
    pub fn flat(probability: f64) -> Self {
        SymptomProfile { intercept: probability, slope: 0.0 }
    }

    pub fn probability(&self, age: Option<f32>) -> f64 {
        let p = match age {
            Some(a) => self.intercept + self.slope * f64::from(a),
            None => self.intercept,
        };
        p.clamp(0.0, 1.0)
    }
}

impl Default for SymptomProfile {
    /// Adult symptom probability without age information.
    fn default() -> Self {
        SymptomProfile::flat(0.6)
    }
}

//! The ordinal contact-closeness label carried by every network edge.

use std::fmt;

/// Closeness of the interaction an edge represents.
///
/// Ordered from weakest to strongest: `very_far < far < intermediate < close`.
/// `Close` is the household-equivalent contact: it carries the full base
/// transmission risk by definition, and masks or room ventilation are assumed
/// ineffective for it (household members share air regardless).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ContactType {
    VeryFar,
    Far,
    Intermediate,
    Close,
}

impl ContactType {
    pub const ALL: [ContactType; 4] = [
        ContactType::VeryFar,
        ContactType::Far,
        ContactType::Intermediate,
        ContactType::Close,
    ];

    /// Whether masks and room ventilation modify transmission over this
    /// contact.  Household-equivalent contacts are exempt.
    #[inline]
    pub fn mask_susceptible(self) -> bool {
        self != ContactType::Close
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContactType::VeryFar => "very_far",
            ContactType::Far => "far",
            ContactType::Intermediate => "intermediate",
            ContactType::Close => "close",
        }
    }
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

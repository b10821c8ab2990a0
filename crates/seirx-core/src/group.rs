//! Agent group vocabulary shared by the network, the agent store, and the
//! testing/tracing configuration.

use std::fmt;

/// The group an agent belongs to.
///
/// Groups carry the scenario semantics: a nursing-home run uses residents and
/// employees, a school run uses teachers, students, and family members.  Every
/// per-group policy (screening interval, index probability, mask wearing,
/// vaccination ratio) is looked up by this tag — there is no per-group
/// subtyping of agents.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AgentType {
    Resident,
    Employee,
    Teacher,
    Student,
    FamilyMember,
}

impl AgentType {
    /// All groups, in a fixed order (used for deterministic iteration).
    pub const ALL: [AgentType; 5] = [
        AgentType::Resident,
        AgentType::Employee,
        AgentType::Teacher,
        AgentType::Student,
        AgentType::FamilyMember,
    ];

    /// Stable snake_case name, matching network-file attributes and output
    /// column values.
    pub fn as_str(self) -> &'static str {
        match self {
            AgentType::Resident => "resident",
            AgentType::Employee => "employee",
            AgentType::Teacher => "teacher",
            AgentType::Student => "student",
            AgentType::FamilyMember => "family_member",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Synthetic nursing-home contact network.
//!
//! Layout: `UNITS` living units, each with `ROOMS_PER_UNIT` double rooms and
//! a fixed care team.  Contact intensities:
//!
//! - roommates: `close` (shared room ≈ household contact),
//! - residents of the same unit: `intermediate` (shared meals, common areas),
//! - employee ↔ resident of their unit: `far` (brief care contacts),
//! - employees of the same unit: `far` (shift overlap).
//!
//! Units do not mix; the only inter-unit path is via nothing at all — which
//! is what makes per-unit containment observable in the output.

use seirx_core::{AgentId, AgentType};
use seirx_network::{ContactNetwork, ContactNetworkBuilder, ContactType, NodeAttributes};

pub const UNITS: usize = 2;
pub const ROOMS_PER_UNIT: usize = 4;
pub const EMPLOYEES_PER_UNIT: usize = 3;

const RESIDENT_AGE: f32 = 86.0;
const EMPLOYEE_AGE: f32 = 34.0;

pub fn resident_count() -> usize {
    UNITS * ROOMS_PER_UNIT * 2
}

pub fn employee_count() -> usize {
    UNITS * EMPLOYEES_PER_UNIT
}

/// Build the facility network described above.
pub fn build_network() -> anyhow::Result<ContactNetwork> {
    let mut b = ContactNetworkBuilder::with_capacity(
        resident_count() + employee_count(),
        resident_count() * 8,
    );

    let mut units: Vec<(Vec<AgentId>, Vec<AgentId>)> = Vec::with_capacity(UNITS);

    for _ in 0..UNITS {
        let residents: Vec<AgentId> = (0..ROOMS_PER_UNIT * 2)
            .map(|_| {
                b.add_agent(NodeAttributes {
                    agent_type: AgentType::Resident,
                    age: Some(RESIDENT_AGE),
                    mask: None,
                })
            })
            .collect();
        let employees: Vec<AgentId> = (0..EMPLOYEES_PER_UNIT)
            .map(|_| {
                b.add_agent(NodeAttributes {
                    agent_type: AgentType::Employee,
                    age: Some(EMPLOYEE_AGE),
                    mask: None,
                })
            })
            .collect();
        units.push((residents, employees));
    }

    for (residents, employees) in &units {
        // Residents: roommates are close, everyone else in the unit is
        // intermediate.  Rooms are consecutive pairs in the resident list.
        for i in 0..residents.len() {
            for j in (i + 1)..residents.len() {
                let same_room = i / 2 == j / 2;
                let contact = if same_room {
                    ContactType::Close
                } else {
                    ContactType::Intermediate
                };
                b.add_contact(residents[i], residents[j], contact)?;
            }
        }

        // Care contacts and shift overlap.
        for &employee in employees {
            for &resident in residents {
                b.add_contact(employee, resident, ContactType::Far)?;
            }
        }
        for i in 0..employees.len() {
            for j in (i + 1)..employees.len() {
                b.add_contact(employees[i], employees[j], ContactType::Far)?;
            }
        }
    }

    Ok(b.build()?)
}

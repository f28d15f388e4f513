//! Fleet composition import.
//!
//! The game client can copy a fleet's composition as tab-separated text,
//! one pilot per row. This module turns such a paste into members ready
//! to be added to a [`Fleet`](crate::fleet::Fleet). Participant and ship
//! lookups are delegated to the persistence layer through the
//! [`ParticipantDirectory`] and [`ShipRoles`] traits.

use crate::error::CompositionError;
use crate::models::Participant;
use crate::role::Role;
use std::collections::HashMap;

const COLUMNS: usize = 7;
const NAME_COLUMN: usize = 0;
const SHIP_COLUMN: usize = 2;
const POSITION_COLUMN: usize = 4;
const BOSS_MARKER: &str = "(Boss)";

/// Resolves a pilot name to a known participant profile.
pub trait ParticipantDirectory {
    fn find_by_name(&self, name: &str) -> Option<Participant>;
}

/// Resolves a ship type to the role it is usually flown in.
pub trait ShipRoles {
    fn role_for_ship(&self, ship: &str) -> Option<Role>;
}

/// Participants keyed by lowercase name.
impl ParticipantDirectory for HashMap<String, Participant> {
    fn find_by_name(&self, name: &str) -> Option<Participant> {
        self.get(&name.to_lowercase()).cloned()
    }
}

/// Roles keyed by lowercase ship type name.
impl ShipRoles for HashMap<String, Role> {
    fn role_for_ship(&self, ship: &str) -> Option<Role> {
        self.get(&ship.to_lowercase()).copied()
    }
}

/// One row of a composition paste, resolved against the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMember {
    pub participant: Participant,
    pub ship: String,
    pub role: Role,
}

/// Parse a composition paste. Fails on the first malformed row or
/// unknown pilot.
pub fn parse_composition(
    paste: &str,
    directory: &dyn ParticipantDirectory,
    ships: &dyn ShipRoles,
) -> Result<Vec<ParsedMember>, CompositionError> {
    let mut members = Vec::new();
    for row in paste.lines() {
        let row = row.trim_end_matches('\r');
        if row.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = row.split('\t').collect();
        if columns.len() != COLUMNS {
            return Err(CompositionError::InvalidRow(row.to_string()));
        }

        let name = columns[NAME_COLUMN].trim();
        let ship = columns[SHIP_COLUMN].trim();
        let participant = directory
            .find_by_name(name)
            .ok_or_else(|| CompositionError::UnknownParticipant(name.to_string()))?;

        let role = if columns[POSITION_COLUMN].contains(BOSS_MARKER) {
            Role::FleetCommander
        } else {
            ships.role_for_ship(ship).unwrap_or(Role::None)
        };

        members.push(ParsedMember {
            participant,
            ship: ship.to_string(),
            role,
        });
    }
    Ok(members)
}

//! Fleet roles and the role weight table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The role a member flew in a fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Unknown,
    None,
    Scout,
    Salvage,
    Logistics,
    Dps,
    FleetCommander,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Unknown,
        Role::None,
        Role::Scout,
        Role::Salvage,
        Role::Logistics,
        Role::Dps,
        Role::FleetCommander,
    ];

    /// Badge class used when the role is shown in a member list.
    pub fn label_class(&self) -> &'static str {
        match self {
            Role::Unknown | Role::None => "",
            Role::Scout => "label-default",
            Role::Salvage => "label-info",
            Role::Logistics => "label-success",
            Role::Dps => "label-primary",
            Role::FleetCommander => "label-warning",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Unknown => "Unknown",
            Role::None => "None",
            Role::Scout => "Scout",
            Role::Salvage => "Salvage",
            Role::Logistics => "Logistics",
            Role::Dps => "DPS",
            Role::FleetCommander => "Fleetcommander",
        };
        f.write_str(name)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid fleet role {s:?}"))
    }
}

/// Default payout weight per role.
///
/// `Unknown` resolves to a baseline of `0.0`: a member whose role could
/// not be determined earns nothing unless given an explicit payment
/// modifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleWeights {
    pub unknown: f64,
    pub none: f64,
    pub scout: f64,
    pub salvage: f64,
    pub logistics: f64,
    pub dps: f64,
    pub fleet_commander: f64,
}

impl Default for RoleWeights {
    fn default() -> Self {
        Self {
            unknown: 0.0,
            none: 1.0,
            scout: 1.0,
            salvage: 1.0,
            logistics: 1.5,
            dps: 2.0,
            fleet_commander: 2.0,
        }
    }
}

impl RoleWeights {
    pub fn weight_of(&self, role: Role) -> f64 {
        match role {
            Role::Unknown => self.unknown,
            Role::None => self.none,
            Role::Scout => self.scout,
            Role::Salvage => self.salvage,
            Role::Logistics => self.logistics,
            Role::Dps => self.dps,
            Role::FleetCommander => self.fleet_commander,
        }
    }
}

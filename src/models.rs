//! Data models for the fleet payout engine.
//!
//! The `models` module defines the identifiers, participant profiles
//! and small value types shared by fleets, reports and ledgers. These
//! types derive `Serialize` and `Deserialize` so that the persistence
//! collaborator can hand them to the engine and store them again once a
//! calculation has run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifier of a participant (a pilot) known to the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub i64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a single fleet-running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FleetId(pub i64);

impl fmt::Display for FleetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The sponsoring organisation that takes a cut of every fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corporation {
    pub id: i64,
    pub name: String,
    pub ticker: String,
    /// Fraction of a fleet's net profit reserved for the corporation,
    /// e.g. `0.28` for 28%.
    pub corporation_cut: f64,
}

/// A single capability a participant may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Member,
    JuniorFleetCommander,
    SeniorFleetCommander,
    Officer,
    Director,
    Ceo,
    Admin,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Member => "member",
            Capability::JuniorFleetCommander => "juniorfleetcommander",
            Capability::SeniorFleetCommander => "seniorfleetcommander",
            Capability::Officer => "officer",
            Capability::Director => "director",
            Capability::Ceo => "ceo",
            Capability::Admin => "admin",
        }
    }
}

/// The set of capabilities granted to a participant.
///
/// Several capabilities may be held at once, so this is a set rather
/// than a single level. Queries go through [`AccessRights::has_capability`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessRights(BTreeSet<Capability>);

impl AccessRights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.grant(capability);
        self
    }

    pub fn grant(&mut self, capability: Capability) {
        self.0.insert(capability);
    }

    pub fn revoke(&mut self, capability: Capability) {
        self.0.remove(&capability);
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AccessRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = self.0.iter().map(Capability::as_str).collect();
        f.write_str(&names.join("|"))
    }
}

/// A participant profile as created by the roster import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// In-game character name. Names are matched case-insensitively.
    pub name: String,
    #[serde(default)]
    pub corporation: Option<i64>,
    #[serde(default)]
    pub access: AccessRights,
}

impl Participant {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId(id),
            name: name.into(),
            corporation: None,
            access: AccessRights::new(),
        }
    }
}

/// Whether a loot paste adds to a fleet's profit or to its losses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LootKind {
    Profit,
    Loss,
}

/// A valued paste of loot (or a lost ship) reported during a fleet.
///
/// Valuation happens outside the engine; `value` arrives already priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootPaste {
    pub pasted_by: ParticipantId,
    pub kind: LootKind,
    pub value: f64,
    #[serde(default)]
    pub raw: String,
}

/// One fleet's contribution to a participant's ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetPayoutRecord {
    pub fleet_id: FleetId,
    pub participant_id: ParticipantId,
    pub payout: f64,
    pub payout_complete: bool,
}

//! A participant's membership in one fleet.

use crate::models::{FleetId, Participant, ParticipantId};
use crate::role::{Role, RoleWeights};
use serde::{Deserialize, Serialize};

/// Payment modifier value meaning "use the role's default weight".
pub const DEFAULT_PAYMENT_MODIFIER: f64 = 1.0;

fn default_payment_modifier() -> f64 {
    DEFAULT_PAYMENT_MODIFIER
}

/// One participant's role, modifiers and computed payout within a fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub participant: Participant,
    pub fleet_id: FleetId,
    pub role: Role,
    #[serde(default)]
    pub ship: Option<String>,
    /// Adjustment to the member's credited site count. Negative for
    /// late arrivals.
    #[serde(default)]
    pub site_modifier: i64,
    /// Explicit payout weight. [`DEFAULT_PAYMENT_MODIFIER`] defers to the
    /// role weight table.
    #[serde(default = "default_payment_modifier")]
    pub payment_modifier: f64,
    /// Written only by the fleet's payout calculation.
    #[serde(default)]
    pub payout: f64,
}

impl Member {
    pub fn new(participant: Participant, fleet_id: FleetId, role: Role) -> Self {
        Self {
            participant,
            fleet_id,
            role,
            ship: None,
            site_modifier: 0,
            payment_modifier: DEFAULT_PAYMENT_MODIFIER,
            payout: 0.0,
        }
    }

    pub fn with_ship(mut self, ship: impl Into<String>) -> Self {
        self.ship = Some(ship.into());
        self
    }

    pub fn id(&self) -> ParticipantId {
        self.participant.id
    }

    pub fn name(&self) -> &str {
        &self.participant.name
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.role.to_string().eq_ignore_ascii_case(role)
    }

    pub fn effective_rate(&self, weights: &RoleWeights) -> f64 {
        if self.payment_modifier != DEFAULT_PAYMENT_MODIFIER {
            self.payment_modifier
        } else {
            weights.weight_of(self.role)
        }
    }

    /// Payout weight for a fleet that finished `sites_finished` sites.
    ///
    /// The site modifier is added here, unlike the credited-sites view on
    /// the fleet which subtracts it. May be negative.
    pub fn weight(&self, sites_finished: u32, weights: &RoleWeights) -> f64 {
        let credited = i64::from(sites_finished).saturating_add(self.site_modifier);
        credited as f64 * self.effective_rate(weights)
    }
}

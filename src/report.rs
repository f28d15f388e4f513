//! Report aggregate: rolls several fleets up into one payout ledger.

use crate::error::FleetError;
use crate::fleet::Fleet;
use crate::ledger::LedgerEntry;
use crate::models::{FleetId, FleetPayoutRecord, Participant, ParticipantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// A payout period covering a fixed set of fleets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub start_range: DateTime<Utc>,
    pub end_range: DateTime<Utc>,
    pub creator: Participant,
    pub fleets: Vec<Fleet>,
    /// Rebuilt from scratch by every [`Report::calculate_payouts`].
    #[serde(default)]
    pub payouts: BTreeMap<ParticipantId, LedgerEntry>,
    #[serde(default)]
    pub total_payout: f64,
    #[serde(default)]
    pub payout_complete: bool,
}

impl Report {
    pub fn new(
        id: i64,
        start_range: DateTime<Utc>,
        end_range: DateTime<Utc>,
        creator: Participant,
        fleets: Vec<Fleet>,
    ) -> Self {
        Self {
            id,
            start_range,
            end_range,
            creator,
            fleets,
            payouts: BTreeMap::new(),
            total_payout: 0.0,
            payout_complete: false,
        }
    }

    pub fn fleet_mut(&mut self, id: FleetId) -> Result<&mut Fleet, FleetError> {
        self.fleets
            .iter_mut()
            .find(|fleet| fleet.id == id)
            .ok_or(FleetError::FleetNotFound(id))
    }

    pub fn payout_for(&self, participant: ParticipantId) -> Option<&LedgerEntry> {
        self.payouts.get(&participant)
    }

    pub fn corporation_payout(&self) -> f64 {
        self.fleets.iter().map(|fleet| fleet.corporation_payout).sum()
    }

    /// Recalculate every fleet and rebuild the per-participant ledger.
    pub fn calculate_payouts(&mut self) {
        self.total_payout = 0.0;
        self.payouts.clear();

        for fleet in self.fleets.iter_mut() {
            fleet.calculate_payouts();

            for member in fleet.members() {
                let entry = self
                    .payouts
                    .entry(member.id())
                    .or_insert_with(|| LedgerEntry::new(member.participant.clone(), false));
                entry.fold(FleetPayoutRecord {
                    fleet_id: fleet.id,
                    participant_id: member.id(),
                    payout: member.payout,
                    payout_complete: fleet.payout_complete,
                });
                self.total_payout += member.payout;
            }
        }

        let complete = self.all_payouts_complete();
        info!(
            report = self.id,
            fleets = self.fleets.len(),
            participants = self.payouts.len(),
            total_payout = self.total_payout,
            complete,
            "calculated report payouts"
        );
    }

    /// Whether every ledger entry has been paid out.
    ///
    /// Once true the result is cached and never re-derived.
    pub fn all_payouts_complete(&mut self) -> bool {
        if self.payout_complete {
            return true;
        }
        self.payout_complete = self
            .payouts
            .values_mut()
            .fold(true, |complete, entry| entry.all_payouts_complete() && complete);
        self.payout_complete
    }
}

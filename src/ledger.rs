//! Per-participant payout ledger within a report.

use crate::models::{FleetPayoutRecord, Participant};
use serde::{Deserialize, Serialize};

/// Everything one participant is owed across the fleets of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub participant: Participant,
    pub total_payout: f64,
    pub payouts: Vec<FleetPayoutRecord>,
    pub payout_complete: bool,
}

impl LedgerEntry {
    pub fn new(participant: Participant, payout_complete: bool) -> Self {
        Self {
            participant,
            total_payout: 0.0,
            payouts: Vec::new(),
            payout_complete,
        }
    }

    /// Add one fleet's payout. An incomplete record marks the whole
    /// entry incomplete.
    pub fn fold(&mut self, record: FleetPayoutRecord) {
        self.total_payout += record.payout;
        if !record.payout_complete {
            self.payout_complete = false;
        }
        self.payouts.push(record);
    }

    /// Whether every folded fleet payout has been settled.
    ///
    /// Once true the answer is cached and the records are not examined
    /// again.
    pub fn all_payouts_complete(&mut self) -> bool {
        if self.payout_complete {
            return true;
        }
        self.payout_complete = self.payouts.iter().all(|record| record.payout_complete);
        self.payout_complete
    }
}

//! Batch settlement engine.
//!
//! The `engine` module settles a batch of [`Report`]s as handed over by
//! the persistence layer. Each report exclusively owns its fleets, so
//! reports are independent of one another and are processed in parallel
//! with [`rayon`]. Within a report the calculation stays sequential.

use crate::policy::PayoutPolicy;
use crate::report::Report;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Headline figures for one settled report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementSummary {
    pub report_id: i64,
    pub total_payout: f64,
    pub corporation_payout: f64,
    pub participants: usize,
    pub payout_complete: bool,
}

impl SettlementSummary {
    fn of(report: &Report) -> Self {
        Self {
            report_id: report.id,
            total_payout: report.total_payout,
            corporation_payout: report.corporation_payout(),
            participants: report.payouts.len(),
            payout_complete: report.payout_complete,
        }
    }
}

/// Input document: the reports to settle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementInput {
    pub reports: Vec<Report>,
}

/// Output document: a summary per report plus the mutated reports, ready
/// to be written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRun {
    pub summaries: Vec<SettlementSummary>,
    pub reports: Vec<Report>,
}

/// Recalculate every report and return one summary per report, in input
/// order.
pub fn settle_reports(reports: &mut [Report]) -> Vec<SettlementSummary> {
    reports
        .par_iter_mut()
        .map(|report| {
            report.calculate_payouts();
            SettlementSummary::of(report)
        })
        .collect()
}

/// Settle an input document, optionally forcing one policy onto every
/// fleet first.
pub fn run(input: SettlementInput, policy: Option<&PayoutPolicy>) -> SettlementRun {
    let mut reports = input.reports;
    if let Some(policy) = policy {
        for fleet in reports.iter_mut().flat_map(|report| report.fleets.iter_mut()) {
            fleet.policy = policy.clone();
        }
    }
    let summaries = settle_reports(&mut reports);
    let total: f64 = summaries.iter().map(|summary| summary.total_payout).sum();
    info!(reports = summaries.len(), total_payout = total, "settled reports");
    SettlementRun { summaries, reports }
}

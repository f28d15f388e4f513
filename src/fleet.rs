//! Fleet aggregate and the per-fleet payout calculation.
//!
//! A [`Fleet`] owns its [`Member`] records and the session's financial
//! totals. [`Fleet::calculate_payouts`] turns those totals into a
//! corporation cut plus one proportional payout per member.

use crate::composition::ParsedMember;
use crate::error::FleetError;
use crate::member::Member;
use crate::models::{FleetId, LootKind, LootPaste, Participant, ParticipantId};
use crate::policy::PayoutPolicy;
use crate::role::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// One fleet-running session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    pub id: FleetId,
    pub name: String,
    #[serde(default)]
    pub system: String,
    #[serde(default)]
    pub system_nickname: String,
    #[serde(default)]
    pub commander: Option<ParticipantId>,
    #[serde(default, deserialize_with = "deserialize_members")]
    members: BTreeMap<ParticipantId, Member>,
    pub start_time: DateTime<Utc>,
    /// `None` while the fleet is still running.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub profit: f64,
    #[serde(default)]
    pub losses: f64,
    #[serde(default)]
    pub sites_finished: u32,
    /// Only meaningful after [`Fleet::calculate_payouts`] has run.
    #[serde(default)]
    pub corporation_payout: f64,
    /// Raised by the settlement collaborator, never derived.
    #[serde(default)]
    pub payout_complete: bool,
    #[serde(default)]
    pub loot: Vec<LootPaste>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub policy: PayoutPolicy,
}

/// Members are keyed by participant id and names are unique ignoring
/// case; persisted documents that break either rule are rejected.
fn deserialize_members<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<ParticipantId, Member>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let members = BTreeMap::<ParticipantId, Member>::deserialize(deserializer)?;
    let mut names = HashSet::new();
    for (id, member) in &members {
        if *id != member.id() {
            return Err(D::Error::custom(format!(
                "member keyed as {id} belongs to participant {}",
                member.id()
            )));
        }
        if !names.insert(member.name().to_lowercase()) {
            return Err(D::Error::custom(FleetError::DuplicateMember(*id)));
        }
    }
    Ok(members)
}

impl Fleet {
    pub fn new(
        id: FleetId,
        name: impl Into<String>,
        system: impl Into<String>,
        system_nickname: impl Into<String>,
        policy: PayoutPolicy,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            system: system.into(),
            system_nickname: system_nickname.into(),
            commander: None,
            members: BTreeMap::new(),
            start_time: Utc::now(),
            end_time: None,
            profit: 0.0,
            losses: 0.0,
            sites_finished: 0,
            corporation_payout: 0.0,
            payout_complete: false,
            loot: Vec::new(),
            notes: String::new(),
            policy,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }

    pub fn net_profit(&self) -> f64 {
        self.profit - self.losses
    }

    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn member(&self, id: ParticipantId) -> Option<&Member> {
        self.members.get(&id)
    }

    pub fn has_member(&self, id: ParticipantId) -> bool {
        self.members.contains_key(&id)
    }

    pub fn find_member_by_name(&self, name: &str) -> Option<&Member> {
        self.members
            .values()
            .find(|member| member.name().eq_ignore_ascii_case(name))
    }

    fn member_mut(&mut self, id: ParticipantId) -> Result<&mut Member, FleetError> {
        self.members
            .get_mut(&id)
            .ok_or(FleetError::MemberNotFound(id))
    }

    pub fn add_member(&mut self, mut member: Member) -> Result<(), FleetError> {
        let id = member.id();
        if self.has_member(id) || self.find_member_by_name(member.name()).is_some() {
            return Err(FleetError::DuplicateMember(id));
        }
        member.fleet_id = self.id;
        self.members.insert(id, member);
        Ok(())
    }

    /// Remove a member. Payouts are not re-split until the next
    /// [`Fleet::calculate_payouts`].
    pub fn remove_member(&mut self, id: ParticipantId) -> Result<Member, FleetError> {
        self.members.remove(&id).ok_or(FleetError::MemberNotFound(id))
    }

    /// Record the fleet commander, adding them as a member if needed.
    ///
    /// Fails with `DuplicateMember` when a new commander's name is already
    /// taken by another member.
    pub fn set_commander(&mut self, participant: Participant) -> Result<(), FleetError> {
        let id = participant.id;
        match self.members.get_mut(&id) {
            Some(member) => member.role = Role::FleetCommander,
            None => self.add_member(Member::new(participant, self.id, Role::FleetCommander))?,
        }
        self.commander = Some(id);
        Ok(())
    }

    /// Add parsed composition rows, skipping pilots already in the fleet.
    /// Returns the number of members added.
    pub fn import_composition(&mut self, rows: Vec<ParsedMember>) -> usize {
        let mut added = 0;
        for row in rows {
            let member = Member::new(row.participant, self.id, row.role).with_ship(row.ship);
            if self.add_member(member).is_ok() {
                added += 1;
            }
        }
        debug!(fleet = %self.id, added, "imported fleet composition");
        added
    }

    pub fn set_member_site_modifier(
        &mut self,
        id: ParticipantId,
        modifier: i64,
    ) -> Result<(), FleetError> {
        self.member_mut(id)?.site_modifier = modifier;
        Ok(())
    }

    pub fn tick_member_site_modifier(&mut self, id: ParticipantId) -> Result<(), FleetError> {
        self.member_mut(id)?.site_modifier += 1;
        Ok(())
    }

    pub fn set_member_payment_modifier(
        &mut self,
        id: ParticipantId,
        modifier: f64,
    ) -> Result<(), FleetError> {
        self.member_mut(id)?.payment_modifier = modifier;
        Ok(())
    }

    pub fn get_member_site_modifier(&self, id: ParticipantId) -> Result<i64, FleetError> {
        self.members
            .get(&id)
            .map(|member| member.site_modifier)
            .ok_or(FleetError::MemberNotFound(id))
    }

    /// Sites credited to a member: the fleet total minus their modifier.
    /// Can go negative.
    pub fn get_member_sites_finished(&self, id: ParticipantId) -> Result<i64, FleetError> {
        let modifier = self.get_member_site_modifier(id)?;
        Ok(i64::from(self.sites_finished).saturating_sub(modifier))
    }

    pub fn tick_sites_finished(&mut self) {
        self.sites_finished += 1;
    }

    pub fn add_profit(&mut self, amount: f64) {
        self.profit += amount;
    }

    pub fn add_loss(&mut self, amount: f64) {
        self.losses += amount;
    }

    /// Keep a valued paste and book it as profit or loss.
    pub fn record_loot(&mut self, paste: LootPaste) {
        match paste.kind {
            LootKind::Profit => self.add_profit(paste.value),
            LootKind::Loss => self.add_loss(paste.value),
        }
        self.loot.push(paste);
    }

    pub fn set_payout_complete(&mut self, complete: bool) {
        self.payout_complete = complete;
    }

    /// Close the fleet and split its proceeds.
    ///
    /// A finished fleet cannot be finished again; corrections after the
    /// fact go through [`Fleet::calculate_payouts`] directly.
    pub fn finish_fleet(&mut self) -> Result<(), FleetError> {
        if self.is_finished() {
            return Err(FleetError::AlreadyFinished(self.id));
        }
        self.end_time = Some(Utc::now());
        info!(fleet = %self.id, name = %self.name, "fleet finished");
        self.calculate_payouts();
        Ok(())
    }

    /// Recompute the corporation cut and every member's payout.
    ///
    /// Overwrites all previous results. With no positive total weight the
    /// pool is left unallocated and every member gets `0`.
    pub fn calculate_payouts(&mut self) {
        let corp_payment = self.net_profit() * self.policy.corporation_cut;
        let pool = self.profit - corp_payment - self.losses;

        let weights = &self.policy.role_weights;
        let sites = self.sites_finished;
        let member_weights: Vec<(ParticipantId, f64)> = self
            .members
            .values()
            .map(|member| (member.id(), member.weight(sites, weights)))
            .collect();
        let total_weight: f64 = member_weights.iter().map(|(_, weight)| weight).sum();

        if total_weight > 0.0 {
            for (id, weight) in member_weights {
                if let Some(member) = self.members.get_mut(&id) {
                    member.payout = pool * (weight / total_weight);
                }
            }
        } else {
            debug!(fleet = %self.id, total_weight, "no positive payout weight, pool left unallocated");
            for member in self.members.values_mut() {
                member.payout = 0.0;
            }
        }
        self.corporation_payout = corp_payment;

        debug!(
            fleet = %self.id,
            pool,
            corporation_payout = corp_payment,
            total_weight,
            members = self.members.len(),
            "calculated fleet payouts"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    fn fleet() -> Fleet {
        Fleet::new(FleetId(1), "Sunday haul", "J123456", "Home", PayoutPolicy::default())
    }

    fn member(id: i64, name: &str, role: Role) -> Member {
        Member::new(Participant::new(id, name), FleetId(0), role)
    }

    #[test]
    fn splits_pool_by_weight() {
        let mut fleet = fleet();
        fleet.sites_finished = 5;
        fleet.add_profit(1000.0);
        fleet.add_member(member(1, "Aura", Role::Dps)).unwrap();
        fleet.add_member(member(2, "Bishop", Role::Scout)).unwrap();
        fleet
            .set_member_payment_modifier(ParticipantId(2), 5.0)
            .unwrap();

        fleet.calculate_payouts();

        assert_close(fleet.corporation_payout, 280.0);
        assert_close(fleet.member(ParticipantId(1)).unwrap().payout, 720.0 * 10.0 / 35.0);
        assert_close(fleet.member(ParticipantId(2)).unwrap().payout, 720.0 * 25.0 / 35.0);
    }

    #[test]
    fn payouts_and_cut_sum_to_net_profit() {
        let mut fleet = fleet();
        fleet.sites_finished = 7;
        fleet.add_profit(52_000_000.0);
        fleet.add_loss(4_500_000.0);
        fleet.add_member(member(1, "Aura", Role::Dps)).unwrap();
        fleet.add_member(member(2, "Bishop", Role::Logistics)).unwrap();
        fleet.add_member(member(3, "Cyra", Role::Salvage)).unwrap();
        fleet.set_member_site_modifier(ParticipantId(3), -2).unwrap();

        fleet.calculate_payouts();

        let pool: f64 = fleet.members().map(|m| m.payout).sum();
        assert_close(pool + fleet.corporation_payout, fleet.net_profit());
        assert_close(fleet.corporation_payout, 47_500_000.0 * 0.28);
    }

    #[test]
    fn zero_weight_leaves_pool_unallocated() {
        let mut fleet = fleet();
        fleet.add_profit(1000.0);
        fleet.add_loss(200.0);
        fleet.calculate_payouts();
        assert_close(fleet.corporation_payout, 800.0 * 0.28);

        fleet.add_member(member(1, "Aura", Role::Dps)).unwrap();
        fleet.add_member(member(2, "Bishop", Role::Dps)).unwrap();
        fleet.sites_finished = 2;
        fleet.set_member_site_modifier(ParticipantId(1), 2).unwrap();
        fleet.set_member_site_modifier(ParticipantId(2), -6).unwrap();
        fleet.calculate_payouts();

        assert!(fleet.members().all(|m| m.payout == 0.0));
        assert_close(fleet.corporation_payout, 800.0 * 0.28);
    }

    #[test]
    fn negative_total_weight_leaves_pool_unallocated() {
        let mut fleet = fleet();
        fleet.sites_finished = 1;
        fleet.add_profit(1000.0);
        fleet.add_member(member(1, "Aura", Role::Dps)).unwrap();
        fleet.add_member(member(2, "Bishop", Role::Scout)).unwrap();
        fleet.set_member_site_modifier(ParticipantId(1), -3).unwrap();
        fleet.set_member_site_modifier(ParticipantId(2), -4).unwrap();

        fleet.calculate_payouts();

        assert!(fleet.members().all(|m| m.payout == 0.0));
        assert_close(fleet.corporation_payout, 280.0);
    }

    #[test]
    fn negative_weight_pulls_payout_from_member() {
        let mut fleet = fleet();
        fleet.sites_finished = 4;
        fleet.add_profit(1000.0);
        fleet.add_member(member(1, "Aura", Role::None)).unwrap();
        fleet.add_member(member(2, "Bishop", Role::None)).unwrap();
        fleet.set_member_site_modifier(ParticipantId(2), -6).unwrap();

        fleet.calculate_payouts();

        let bishop = fleet.member(ParticipantId(2)).unwrap().payout;
        assert!(bishop < 0.0);
        assert_close(fleet.member(ParticipantId(1)).unwrap().payout, 720.0 * 4.0 / 2.0);
    }

    #[test]
    fn calculation_is_idempotent() {
        let mut fleet = fleet();
        fleet.sites_finished = 3;
        fleet.add_profit(999.0);
        fleet.add_member(member(1, "Aura", Role::Logistics)).unwrap();
        fleet.add_member(member(2, "Bishop", Role::Scout)).unwrap();

        fleet.calculate_payouts();
        let first = fleet.clone();
        fleet.calculate_payouts();
        assert_eq!(fleet, first);
    }

    #[test]
    fn duplicate_member_is_rejected() {
        let mut fleet = fleet();
        fleet.add_member(member(1, "Aura", Role::Dps)).unwrap();
        let before = fleet.clone();

        assert_eq!(
            fleet.add_member(member(1, "Aura", Role::Scout)),
            Err(FleetError::DuplicateMember(ParticipantId(1)))
        );
        assert_eq!(
            fleet.add_member(member(9, "AURA", Role::Scout)),
            Err(FleetError::DuplicateMember(ParticipantId(9)))
        );
        assert_eq!(fleet, before);
    }

    #[test]
    fn member_lookups_fail_for_absent_participant() {
        let mut fleet = fleet();
        let absent = ParticipantId(42);
        assert_eq!(
            fleet.get_member_sites_finished(absent),
            Err(FleetError::MemberNotFound(absent))
        );
        assert_eq!(
            fleet.set_member_site_modifier(absent, 1),
            Err(FleetError::MemberNotFound(absent))
        );
        assert_eq!(
            fleet.set_member_payment_modifier(absent, 2.0),
            Err(FleetError::MemberNotFound(absent))
        );
        assert!(matches!(
            fleet.remove_member(absent),
            Err(FleetError::MemberNotFound(_))
        ));
    }

    #[test]
    fn credited_sites_subtract_modifier() {
        let mut fleet = fleet();
        fleet.sites_finished = 10;
        fleet.add_member(member(1, "Aura", Role::Dps)).unwrap();
        fleet.set_member_site_modifier(ParticipantId(1), 3).unwrap();
        assert_eq!(fleet.get_member_sites_finished(ParticipantId(1)), Ok(7));

        fleet.set_member_site_modifier(ParticipantId(1), 12).unwrap();
        assert_eq!(fleet.get_member_sites_finished(ParticipantId(1)), Ok(-2));

        fleet.tick_member_site_modifier(ParticipantId(1)).unwrap();
        fleet.tick_sites_finished();
        assert_eq!(fleet.get_member_site_modifier(ParticipantId(1)), Ok(13));
        assert_eq!(fleet.get_member_sites_finished(ParticipantId(1)), Ok(-2));
    }

    #[test]
    fn removing_member_keeps_stale_payouts_until_recalculated() {
        let mut fleet = fleet();
        fleet.sites_finished = 1;
        fleet.add_profit(100.0);
        fleet.add_member(member(1, "Aura", Role::Dps)).unwrap();
        fleet.add_member(member(2, "Bishop", Role::Dps)).unwrap();
        fleet.calculate_payouts();

        fleet.remove_member(ParticipantId(2)).unwrap();
        assert_close(fleet.member(ParticipantId(1)).unwrap().payout, 36.0);
        fleet.calculate_payouts();
        assert_close(fleet.member(ParticipantId(1)).unwrap().payout, 72.0);
    }

    #[test]
    fn finishing_twice_is_rejected() {
        let mut fleet = fleet();
        fleet.sites_finished = 1;
        fleet.add_profit(100.0);
        fleet.add_member(member(1, "Aura", Role::Dps)).unwrap();

        fleet.finish_fleet().unwrap();
        let end_time = fleet.end_time;
        assert!(fleet.is_finished());
        assert_close(fleet.member(ParticipantId(1)).unwrap().payout, 72.0);

        assert_eq!(fleet.finish_fleet(), Err(FleetError::AlreadyFinished(FleetId(1))));
        assert_eq!(fleet.end_time, end_time);
    }

    #[test]
    fn loot_pastes_book_profit_and_loss() {
        let mut fleet = fleet();
        fleet.record_loot(LootPaste {
            pasted_by: ParticipantId(1),
            kind: LootKind::Profit,
            value: 1500.0,
            raw: "Sleeper Data Library\t10".into(),
        });
        fleet.record_loot(LootPaste {
            pasted_by: ParticipantId(1),
            kind: LootKind::Loss,
            value: 400.0,
            raw: String::new(),
        });
        assert_eq!(fleet.profit, 1500.0);
        assert_eq!(fleet.losses, 400.0);
        assert_eq!(fleet.loot.len(), 2);
        assert_eq!(fleet.net_profit(), 1100.0);
    }

    #[test]
    fn commander_joins_as_fleet_commander() {
        let mut fleet = fleet();
        fleet.add_member(member(1, "Aura", Role::Dps)).unwrap();
        fleet.set_commander(Participant::new(1, "Aura")).unwrap();
        fleet.set_commander(Participant::new(2, "Bishop")).unwrap();

        assert_eq!(fleet.commander, Some(ParticipantId(2)));
        assert_eq!(fleet.member(ParticipantId(1)).unwrap().role, Role::FleetCommander);
        assert!(fleet.member(ParticipantId(2)).unwrap().has_role("fleetcommander"));
    }

    #[test]
    fn added_member_belongs_to_fleet() {
        let mut fleet = fleet();
        fleet.add_member(member(1, "Aura", Role::Dps)).unwrap();
        assert_eq!(fleet.member(ParticipantId(1)).unwrap().fleet_id, FleetId(1));
        assert!(fleet.find_member_by_name("aura").is_some());
    }

    #[test]
    fn commander_name_collision_is_rejected() {
        let mut fleet = fleet();
        fleet.add_member(member(1, "Aura", Role::Dps)).unwrap();

        assert_eq!(
            fleet.set_commander(Participant::new(2, "AURA")),
            Err(FleetError::DuplicateMember(ParticipantId(2)))
        );
        assert_eq!(fleet.member_count(), 1);
        assert_eq!(fleet.commander, None);
        assert_eq!(fleet.find_member_by_name("aura").unwrap().id(), ParticipantId(1));
    }

    #[test]
    fn extreme_site_modifiers_saturate() {
        let mut fleet = fleet();
        fleet.sites_finished = 10;
        fleet.add_member(member(1, "Aura", Role::Dps)).unwrap();

        fleet.set_member_site_modifier(ParticipantId(1), i64::MIN).unwrap();
        assert_eq!(fleet.get_member_sites_finished(ParticipantId(1)), Ok(i64::MAX));

        fleet.set_member_site_modifier(ParticipantId(1), i64::MAX).unwrap();
        assert_eq!(fleet.get_member_sites_finished(ParticipantId(1)), Ok(10 - i64::MAX));
        fleet.calculate_payouts();
    }

    fn document(members: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": 3,
            "name": "Restored",
            "start_time": "2026-09-06T18:00:00Z",
            "members": members
        })
    }

    #[test]
    fn persisted_members_must_match_their_keys() {
        let restored: Fleet = serde_json::from_value(document(serde_json::json!({
            "1": {"participant": {"id": 1, "name": "Aura"}, "fleet_id": 3, "role": "dps"}
        })))
        .unwrap();
        assert!(restored.has_member(ParticipantId(1)));

        let mismatched = serde_json::from_value::<Fleet>(document(serde_json::json!({
            "1": {"participant": {"id": 2, "name": "Aura"}, "fleet_id": 3, "role": "dps"}
        })));
        assert!(mismatched.is_err());

        let same_name = serde_json::from_value::<Fleet>(document(serde_json::json!({
            "1": {"participant": {"id": 1, "name": "Aura"}, "fleet_id": 3, "role": "dps"},
            "2": {"participant": {"id": 2, "name": "aura"}, "fleet_id": 3, "role": "scout"}
        })));
        assert!(same_name.is_err());
    }
}

//! Case queue builder.
//!
//! Expands records that need redistribution into batched `CaseUnit`s, one
//! per (owner, tier), ordered by tier rank and then roster order. That
//! ordering is the priority contract: every MS unit, across all owners, is
//! considered before any P2.1 unit, and so on down.

use crate::{
    record::RosterRecord,
    tier::Tier,
    types::{Count, RowIndex, StaffName},
};
use serde::{Deserialize, Serialize};

/// Why a unit entered the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueReason {
    /// Owner is absent; the full tier count moves.
    Absent,
    /// Owner is present but declared a need-help amount.
    NeedHelp,
    /// Owner's notes mark a multi-day absence; P2 tiers move in full.
    ExtendedAbsence,
}

/// A batch of cases from one owner in one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseUnit {
    /// Position of the owner in the normalized record list.
    pub owner_index: usize,
    pub owner: StaffName,
    pub owner_row: RowIndex,
    pub tier: Tier,
    pub count: Count,
    pub reason: QueueReason,
}

impl CaseUnit {
    /// Residual left after `assigned` cases of this unit were placed.
    pub fn residual(&self, assigned: Count) -> CaseUnit {
        CaseUnit {
            count: self.count - assigned,
            ..self.clone()
        }
    }
}

/// Units owed by a single record, in tier order.
///
/// A present record's need-help amount is a budget spent on the most
/// urgent tiers first. P2 tiers forced out by an extended absence move in
/// full and leave the budget untouched.
pub fn units_for(owner_index: usize, record: &RosterRecord) -> Vec<CaseUnit> {
    let mut budget = (record.present && record.need_help > 0).then_some(record.need_help);
    let mut units = Vec::new();

    for tier in Tier::ALL {
        let count = record.tier_count(tier);
        if count == 0 {
            continue;
        }
        let (amount, reason) = if !record.present {
            (count, QueueReason::Absent)
        } else if record.extended_absence && tier.is_p2() {
            (count, QueueReason::ExtendedAbsence)
        } else if let Some(left) = budget.as_mut() {
            let take = count.min(*left);
            *left -= take;
            (take, QueueReason::NeedHelp)
        } else {
            continue;
        };
        if amount > 0 {
            units.push(CaseUnit {
                owner_index,
                owner: record.name.clone(),
                owner_row: record.row,
                tier,
                count: amount,
                reason,
            });
        }
    }
    units
}

/// Build the full queue. The sort is stable, so ties within a tier keep
/// roster order.
pub fn build_queue(records: &[RosterRecord]) -> Vec<CaseUnit> {
    let mut queue: Vec<CaseUnit> = records
        .iter()
        .enumerate()
        .flat_map(|(i, r)| units_for(i, r))
        .collect();
    queue.sort_by_key(|u| u.tier);

    log::info!(
        "queue: {} case units, {} cases",
        queue.len(),
        queue.iter().map(|u| u.count as u64).sum::<u64>()
    );
    queue
}

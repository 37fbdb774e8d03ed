//! Report builder: folds the engine's events into the caller-facing report
//! and checks the run's invariants before handing it over.
//!
//! Two invariants are enforced here:
//!   - Conservation: per tier, queued == assigned + unassigned.
//!   - Capacity: nobody who received cases ends above the cap.
//! A violation means the engine is wrong, so it is an `Err`, never a
//! warning.

use crate::{
    capacity::{CapacityTracker, Pool},
    error::{RosterError, RosterResult},
    event::{Assignment, RedistributionEvent, UnassignedCase},
    field_resolver::LogicalField,
    queue::CaseUnit,
    record::{ParseWarning, RosterRecord},
    snapshot::{self, LoadSnapshot},
    tier::Tier,
    types::Count,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTotals {
    pub tier: Tier,
    pub queued: u64,
    pub assigned: u64,
    pub unassigned: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSummary {
    pub records: usize,
    pub present: usize,
    pub absent: usize,
    pub helpers: usize,
    pub secondary_pool: usize,
    pub restricted: usize,
    pub extended_absence: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedistributionReport {
    pub roll_call_date: Option<NaiveDate>,
    pub cap: Count,
    /// Which uploaded header each logical field was read from.
    pub columns: Vec<(LogicalField, String)>,
    pub summary: RosterSummary,
    pub assignments: Vec<Assignment>,
    pub unassigned: Vec<UnassignedCase>,
    pub loads: Vec<LoadSnapshot>,
    pub tier_totals: Vec<TierTotals>,
    pub warnings: Vec<ParseWarning>,
}

impl RedistributionReport {
    pub fn total_assigned(&self) -> u64 {
        self.assignments.iter().map(|a| a.count as u64).sum()
    }

    pub fn total_unassigned(&self) -> u64 {
        self.unassigned.iter().map(|u| u.count as u64).sum()
    }
}

/// Everything the builder needs from one run.
pub struct RunOutput<'a> {
    pub roll_call_date: Option<NaiveDate>,
    pub columns: Vec<(LogicalField, String)>,
    pub records: &'a [RosterRecord],
    pub queue: &'a [CaseUnit],
    pub events: Vec<RedistributionEvent>,
    pub tracker: &'a CapacityTracker,
    pub warnings: Vec<ParseWarning>,
}

pub fn build(run: RunOutput<'_>) -> RosterResult<RedistributionReport> {
    let mut assignments = Vec::new();
    let mut unassigned = Vec::new();
    for event in run.events {
        match event {
            RedistributionEvent::CaseAssigned(a) => assignments.push(a),
            RedistributionEvent::CaseUnassigned(u) => unassigned.push(u),
            RedistributionEvent::UnitOpened { .. } | RedistributionEvent::UnitSettled { .. } => {}
        }
    }

    let tier_totals = check_conservation(run.queue, &assignments, &unassigned)?;
    let loads = snapshot::take(run.tracker);
    check_capacity(&loads, run.tracker.cap())?;

    let report = RedistributionReport {
        roll_call_date: run.roll_call_date,
        cap: run.tracker.cap(),
        columns: run.columns,
        summary: summarize(run.records, run.tracker),
        assignments,
        unassigned,
        loads,
        tier_totals,
        warnings: run.warnings,
    };

    log::info!(
        "report: {} assigned in {} moves, {} unassigned, {} warnings",
        report.total_assigned(),
        report.assignments.len(),
        report.total_unassigned(),
        report.warnings.len()
    );
    Ok(report)
}

/// Per-tier `queued == assigned + unassigned`. Returns the totals table
/// on success.
pub fn check_conservation(
    queue: &[CaseUnit],
    assignments: &[Assignment],
    unassigned: &[UnassignedCase],
) -> RosterResult<Vec<TierTotals>> {
    let mut totals: Vec<TierTotals> = Tier::ALL
        .iter()
        .map(|&tier| TierTotals {
            tier,
            queued: 0,
            assigned: 0,
            unassigned: 0,
        })
        .collect();
    let slot = |tier: Tier| usize::from(tier.rank()) - 1;

    for u in queue {
        totals[slot(u.tier)].queued += u.count as u64;
    }
    for a in assignments {
        totals[slot(a.tier)].assigned += a.count as u64;
    }
    for u in unassigned {
        totals[slot(u.tier)].unassigned += u.count as u64;
    }

    if let Some(t) = totals.iter().find(|t| t.queued != t.assigned + t.unassigned) {
        log::error!("report: conservation violated for {}", t.tier);
        return Err(RosterError::ConservationViolation {
            tier: t.tier,
            queued: t.queued,
            assigned: t.assigned,
            unassigned: t.unassigned,
        });
    }
    Ok(totals)
}

/// Anyone who received cases must end at or below the cap. Staff already
/// over the cap before the run are fine as long as they received nothing.
pub fn check_capacity(loads: &[LoadSnapshot], cap: Count) -> RosterResult<()> {
    match loads.iter().find(|l| l.assigned > 0 && l.final_load() > cap) {
        Some(l) => {
            log::error!("report: capacity violated for '{}'", l.name);
            Err(RosterError::CapacityViolation {
                helper: l.name.clone(),
                existing: l.pre_existing,
                assigned: l.assigned,
                cap,
            })
        }
        None => Ok(()),
    }
}

fn summarize(records: &[RosterRecord], tracker: &CapacityTracker) -> RosterSummary {
    let in_pool = |pool: Pool| tracker.staff().iter().filter(|s| s.pool == pool).count();
    let present = records.iter().filter(|r| r.present).count();
    RosterSummary {
        records: records.len(),
        present,
        absent: records.len() - present,
        helpers: in_pool(Pool::Helper),
        secondary_pool: in_pool(Pool::Secondary),
        restricted: records.iter().filter(|r| r.restricted).count(),
        extended_absence: records.iter().filter(|r| r.extended_absence).count(),
    }
}

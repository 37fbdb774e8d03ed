//! Greedy redistribution over the case queue.
//!
//! For each unit, in queue order:
//!   1. Offer it to declared helpers with remaining slots.
//!   2. Rank: same ward first (when affinity is on), then lighter current
//!      load, then larger declared capacity, then roster order.
//!   3. Give the top candidate `min(remaining, needed)`, re-rank, repeat
//!      until the unit is placed or the pool is dry.
//!   4. Residual from an unrestricted owner goes through the same loop
//!      against the secondary pool, when enabled.
//!   5. Whatever is left is recorded as unassigned and the run moves on.
//!
//! The result is a heuristic, not an optimum. It is fully deterministic:
//! every ranking key ends in roster order.

use crate::{
    capacity::{CapacityTracker, Pool},
    config::RedistributionConfig,
    event::{Assignment, Rationale, RedistributionEvent, UnassignedCase, UnitState},
    queue::CaseUnit,
    record::RosterRecord,
    types::Count,
};
use std::cmp::Reverse;

pub struct Redistributor<'a> {
    records: &'a [RosterRecord],
    config: &'a RedistributionConfig,
}

impl<'a> Redistributor<'a> {
    pub fn new(records: &'a [RosterRecord], config: &'a RedistributionConfig) -> Self {
        Self { records, config }
    }

    /// Process the whole queue against `tracker`. A shortfall never stops
    /// the run; it shows up as `CaseUnassigned`.
    pub fn run(&self, queue: &[CaseUnit], tracker: &mut CapacityTracker) -> Vec<RedistributionEvent> {
        let mut events = Vec::new();
        for unit in queue {
            self.process_unit(unit, tracker, &mut events);
        }
        events
    }

    fn process_unit(
        &self,
        unit: &CaseUnit,
        tracker: &mut CapacityTracker,
        events: &mut Vec<RedistributionEvent>,
    ) {
        events.push(RedistributionEvent::UnitOpened {
            owner: unit.owner.clone(),
            tier: unit.tier,
            count: unit.count,
            reason: unit.reason,
        });

        let mut assigned = self.fill_from_pool(unit, Pool::Helper, tracker, events);

        if assigned < unit.count && self.secondary_allowed(unit) {
            let residual = unit.residual(assigned);
            assigned += self.fill_from_pool(&residual, Pool::Secondary, tracker, events);
        }

        let residual = unit.count - assigned;
        if residual > 0 {
            log::warn!(
                "redistribution: {residual} {} case(s) from '{}' left unassigned",
                unit.tier,
                unit.owner
            );
            events.push(RedistributionEvent::CaseUnassigned(UnassignedCase {
                owner: unit.owner.clone(),
                tier: unit.tier,
                count: residual,
            }));
        }

        events.push(RedistributionEvent::UnitSettled {
            owner: unit.owner.clone(),
            tier: unit.tier,
            assigned,
            residual,
            state: UnitState::from_counts(assigned, residual),
        });
    }

    /// Restricted owners need a declared helper; the fallback pool is
    /// never used for them.
    fn secondary_allowed(&self, unit: &CaseUnit) -> bool {
        self.config.secondary_pool_enabled && !self.records[unit.owner_index].restricted
    }

    /// Place as much of `unit` as `pool` can take. Returns the count placed.
    fn fill_from_pool(
        &self,
        unit: &CaseUnit,
        pool: Pool,
        tracker: &mut CapacityTracker,
        events: &mut Vec<RedistributionEvent>,
    ) -> Count {
        let mut left = unit.count;
        while left > 0 {
            let Some(helper) = self.best_candidate(unit, pool, tracker) else {
                break;
            };
            let take = tracker.remaining(helper).min(left);
            tracker.record(helper, take);
            left -= take;

            let rationale = match pool {
                Pool::Secondary => Rationale::SecondaryPool,
                _ if self.same_ward(unit, helper, tracker) => Rationale::WardMatch,
                _ => Rationale::LoadBalance,
            };
            let to = tracker.get(helper).name.clone();
            log::debug!(
                "redistribution: {take} {} from '{}' -> '{to}' ({rationale:?})",
                unit.tier,
                unit.owner
            );
            events.push(RedistributionEvent::CaseAssigned(Assignment {
                from: unit.owner.clone(),
                to,
                tier: unit.tier,
                count: take,
                rationale,
            }));
        }
        unit.count - left
    }

    fn best_candidate(&self, unit: &CaseUnit, pool: Pool, tracker: &CapacityTracker) -> Option<usize> {
        tracker
            .open_in(pool)
            .filter(|&i| i != unit.owner_index)
            .min_by_key(|&i| {
                let staff = tracker.get(i);
                (
                    !self.same_ward(unit, i, tracker),
                    staff.current_load(),
                    Reverse(staff.declared_help),
                    staff.row,
                )
            })
    }

    fn same_ward(&self, unit: &CaseUnit, helper: usize, tracker: &CapacityTracker) -> bool {
        if !self.config.ward_affinity_enabled {
            return false;
        }
        let owner_ward = &tracker.get(unit.owner_index).ward_key;
        !owner_ward.is_empty() && *owner_ward == tracker.get(helper).ward_key
    }
}

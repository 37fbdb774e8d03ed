//! End-of-run load snapshot, one row per staff member who was eligible to
//! receive cases.

use crate::{
    capacity::{CapacityTracker, Pool},
    types::{Count, StaffName},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSnapshot {
    pub name: StaffName,
    pub pool: Pool,
    pub pre_existing: Count,
    pub assigned: Count,
    /// Slots still open at the end of the run.
    pub remaining: Count,
}

impl LoadSnapshot {
    pub fn final_load(&self) -> Count {
        self.pre_existing.saturating_add(self.assigned)
    }
}

/// Snapshot every helper and secondary-pool member, in roster order.
/// Excluded staff (absent or donating) received nothing and are omitted.
pub fn take(tracker: &CapacityTracker) -> Vec<LoadSnapshot> {
    tracker
        .staff()
        .iter()
        .enumerate()
        .filter(|(_, s)| s.pool != Pool::Excluded)
        .map(|(i, s)| LoadSnapshot {
            name: s.name.clone(),
            pool: s.pool,
            pre_existing: s.existing_load,
            assigned: s.received,
            remaining: tracker.remaining(i),
        })
        .collect()
}

//! Capacity tracker: remaining assignable slots per staff member for one run.
//!
//! One tracker is built per run from that run's records and dropped with
//! the run. The engine only ever records `min(remaining, needed)`, so a
//! record that would overdraw a slot count is a bug and panics.

use crate::{
    cell::normalize_text,
    record::RosterRecord,
    types::{Count, RowIndex, StaffName},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pool {
    /// Present and declared spare capacity.
    Helper,
    /// Present with no declared capacity; fallback only.
    Secondary,
    /// Absent, or handing off cases of their own this run.
    Excluded,
}

/// Working load for one staff member. Index-aligned with the record list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffCapacity {
    pub name: StaffName,
    pub row: RowIndex,
    /// Normalized for comparison; empty means "no ward".
    pub ward_key: String,
    pub declared_help: Count,
    pub existing_load: Count,
    pub received: Count,
    pub pool: Pool,
}

impl StaffCapacity {
    /// Total slots this member may take this run, before any assignment.
    /// Helpers are bounded by what they declared and by the cap; the
    /// secondary pool only by the cap.
    pub fn allowance(&self, cap: Count) -> Count {
        let headroom = cap.saturating_sub(self.existing_load);
        match self.pool {
            Pool::Helper => self.declared_help.min(headroom),
            Pool::Secondary => headroom,
            Pool::Excluded => 0,
        }
    }

    pub fn current_load(&self) -> Count {
        self.existing_load.saturating_add(self.received)
    }
}

pub struct CapacityTracker {
    cap: Count,
    staff: Vec<StaffCapacity>,
}

impl CapacityTracker {
    /// `donors[i]` is true when record `i` owns at least one queued unit.
    pub fn new(records: &[RosterRecord], donors: &[bool], cap: Count) -> Self {
        let staff = records
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let pool = if !r.present || donors.get(i).copied().unwrap_or(false) {
                    Pool::Excluded
                } else if r.can_help > 0 {
                    Pool::Helper
                } else {
                    Pool::Secondary
                };
                StaffCapacity {
                    name: r.name.clone(),
                    row: r.row,
                    ward_key: normalize_text(&r.ward),
                    declared_help: r.can_help,
                    existing_load: r.existing_load(),
                    received: 0,
                    pool,
                }
            })
            .collect();
        Self { cap, staff }
    }

    pub fn cap(&self) -> Count {
        self.cap
    }

    pub fn get(&self, index: usize) -> &StaffCapacity {
        &self.staff[index]
    }

    pub fn staff(&self) -> &[StaffCapacity] {
        &self.staff
    }

    pub fn remaining(&self, index: usize) -> Count {
        let s = &self.staff[index];
        s.allowance(self.cap).saturating_sub(s.received)
    }

    /// Members of `pool` that can still take at least one case.
    pub fn open_in(&self, pool: Pool) -> impl Iterator<Item = usize> + '_ {
        self.staff
            .iter()
            .enumerate()
            .filter(move |(i, s)| s.pool == pool && self.remaining(*i) > 0)
            .map(|(i, _)| i)
    }

    /// Record `amount` cases received by `index`.
    pub fn record(&mut self, index: usize, amount: Count) {
        let remaining = self.remaining(index);
        assert!(
            amount <= remaining,
            "record({amount}) exceeds remaining {remaining} for '{}'",
            self.staff[index].name
        );
        self.staff[index].received += amount;
    }
}

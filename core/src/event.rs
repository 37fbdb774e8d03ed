//! Redistribution decisions as data.
//!
//! The engine never mutates a report directly: it emits events in
//! processing order and the report builder folds them. Replaying the same
//! roster and config yields the same event sequence.

use crate::{
    queue::QueueReason,
    tier::Tier,
    types::{Count, StaffName},
};
use serde::{Deserialize, Serialize};

/// Why a helper was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rationale {
    /// Declared helper on the owner's ward.
    WardMatch,
    /// Declared helper chosen on load alone (other ward, or affinity off).
    LoadBalance,
    /// Present staff without declared capacity, used as a fallback.
    SecondaryPool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub from: StaffName,
    pub to: StaffName,
    pub tier: Tier,
    pub count: Count,
    pub rationale: Rationale,
}

/// Cases no pool could absorb. Left for manual handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignedCase {
    pub owner: StaffName,
    pub tier: Tier,
    pub count: Count,
}

/// Terminal state of a case unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    Assigned,
    /// Some cases placed; the residual ended unassigned.
    PartiallyAssigned,
    Unassigned,
}

impl UnitState {
    pub fn from_counts(assigned: Count, residual: Count) -> Self {
        match (assigned, residual) {
            (_, 0) => UnitState::Assigned,
            (0, _) => UnitState::Unassigned,
            _ => UnitState::PartiallyAssigned,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RedistributionEvent {
    UnitOpened {
        owner: StaffName,
        tier: Tier,
        count: Count,
        reason: QueueReason,
    },
    CaseAssigned(Assignment),
    CaseUnassigned(UnassignedCase),
    UnitSettled {
        owner: StaffName,
        tier: Tier,
        assigned: Count,
        residual: Count,
        state: UnitState,
    },
}

//! The normalized roster model.

use crate::field_resolver::LogicalField;
use crate::tier::Tier;
use crate::types::{Count, RowIndex, StaffName};
use serde::{Deserialize, Serialize};

/// One staff member for one roll call. Built once by the normalizer and
/// never mutated; per-run load lives in the capacity tracker instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRecord {
    pub row: RowIndex,
    pub name: StaffName,
    pub ward: String,
    pub present: bool,
    pub must_see: Count,
    pub p2_total: Count,
    pub p2_1: Count,
    pub p2_2: Count,
    pub p3: Count,
    pub trainee_led: Count,
    pub can_help: Count,
    pub need_help: Count,
    /// Trimmed, original case.
    pub notes: String,
    pub extended_absence: bool,
    pub restricted: bool,
}

impl RosterRecord {
    pub fn tier_count(&self, tier: Tier) -> Count {
        match tier {
            Tier::MustSee => self.must_see,
            Tier::P2_1 => self.p2_1,
            Tier::P2_2 => self.p2_2,
            Tier::P3 => self.p3,
            Tier::TraineeLed => self.trainee_led,
        }
    }

    /// Caseload carried into the run, before any redistribution.
    pub fn existing_load(&self) -> Count {
        self.must_see
            .saturating_add(self.p2_total)
            .saturating_add(self.p3)
            .saturating_add(self.trainee_led)
    }
}

/// A recoverable problem with one cell (or one row). The value has already
/// been defaulted; the warning exists so nothing is coerced silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    pub row: RowIndex,
    /// Staff name when known; blank-name rows carry `None`.
    pub name: Option<StaffName>,
    /// `None` for row-level problems (blank name, duplicate name).
    pub field: Option<LogicalField>,
    pub raw_value: String,
    pub message: String,
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}", self.row + 1)?;
        if let Some(name) = &self.name {
            write!(f, " ({name})")?;
        }
        if let Some(field) = &self.field {
            write!(f, " [{field}]")?;
        }
        write!(f, ": {}", self.message)?;
        if !self.raw_value.is_empty() {
            write!(f, " (got '{}')", self.raw_value)?;
        }
        Ok(())
    }
}

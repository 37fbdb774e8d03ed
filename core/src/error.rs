use crate::field_resolver::LogicalField;
use crate::tier::Tier;
use thiserror::Error;

/// One or more required logical fields could not be matched to a column.
/// Resolution is all-or-nothing, so this lists every missing field at once.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Roster is missing required columns: {}", format_fields(.missing))]
pub struct SchemaError {
    pub missing: Vec<LogicalField>,
}

fn format_fields(fields: &[LogicalField]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Error, Debug)]
pub enum RosterError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Conservation violated for {tier}: queued {queued}, assigned {assigned}, unassigned {unassigned}")]
    ConservationViolation {
        tier: Tier,
        queued: u64,
        assigned: u64,
        unassigned: u64,
    },

    #[error("Capacity violated for '{helper}': existing {existing} + assigned {assigned} exceeds cap {cap}")]
    CapacityViolation {
        helper: String,
        existing: u32,
        assigned: u32,
        cap: u32,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RosterError {
    /// True for the internal-defect variants raised by the report's
    /// invariant checks. These indicate an engine bug, not bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            RosterError::ConservationViolation { .. } | RosterError::CapacityViolation { .. }
        )
    }
}

pub type RosterResult<T> = Result<T, RosterError>;

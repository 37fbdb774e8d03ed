//! Shared primitive types used across the whole redistribution run.

/// A staff member's display name. Unique within one roster run.
pub type StaffName = String;

/// Zero-based position of a row in the uploaded roster.
/// Used as the final, stable tie-break everywhere ordering matters.
pub type RowIndex = usize;

/// A number of cases.
pub type Count = u32;

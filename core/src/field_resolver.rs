//! Field resolver: maps arbitrary uploaded column headers onto the logical
//! fields the normalizer understands.
//!
//! All header knowledge lives in one declarative table, `SYNONYMS`. Each
//! logical field lists alternatives in preference order; an alternative is a
//! set of keywords that must all appear (whole-word, case-insensitive,
//! whitespace-collapsed) in the header. Resolution is all-or-nothing for
//! required fields.

use crate::cell::{contains_phrase, normalize_text};
use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    Name,
    Ward,
    Present,
    MustSee,
    P2Composite,
    P3,
    CanHelp,
    NeedHelp,
    Notes,
    TraineeLed,
}

impl LogicalField {
    pub fn label(&self) -> &'static str {
        match self {
            LogicalField::Name => "name",
            LogicalField::Ward => "ward",
            LogicalField::Present => "present",
            LogicalField::MustSee => "MS total",
            LogicalField::P2Composite => "P2 total",
            LogicalField::P3 => "P3 total",
            LogicalField::CanHelp => "can help",
            LogicalField::NeedHelp => "need help",
            LogicalField::Notes => "notes",
            LogicalField::TraineeLed => "trainee-led",
        }
    }

    /// Trainee-led counts are optional; a roster without that column is
    /// still complete.
    pub fn is_required(&self) -> bool {
        !matches!(self, LogicalField::TraineeLed)
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolution order matters: a header claimed by an earlier field is not
/// offered to later ones, so the narrow fields go first and the broad
/// ones ("name", "ward") last.
const SYNONYMS: &[(LogicalField, &[&[&str]])] = &[
    (
        LogicalField::Notes,
        &[&["notes"], &["note"], &["comments"], &["comment"]],
    ),
    (LogicalField::TraineeLed, &[&["trainee"], &["student led"]]),
    (
        LogicalField::CanHelp,
        &[&["can help"], &["able to help"], &["help capacity"], &["spare"]],
    ),
    (
        LogicalField::NeedHelp,
        &[&["need help"], &["needs help"], &["help needed"]],
    ),
    (
        LogicalField::Present,
        &[&["present"], &["attendance"], &["in today"], &["on shift"]],
    ),
    (LogicalField::MustSee, &[&["must see"], &["ms"], &["p1"]]),
    (
        LogicalField::P2Composite,
        &[&["p2", "total"], &["p2"], &["priority 2"]],
    ),
    (LogicalField::P3, &[&["p3"], &["priority 3"]]),
    (
        LogicalField::Ward,
        &[&["ward"], &["location"], &["site"], &["unit"]],
    ),
    (
        LogicalField::Name,
        &[&["name"], &["staff"], &["therapist"], &["clinician"]],
    ),
];

/// Logical field → raw header, as produced by `resolve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMap {
    entries: Vec<(LogicalField, String)>,
}

impl FieldMap {
    pub fn get(&self, field: LogicalField) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, label)| label.as_str())
    }

    pub fn entries(&self) -> &[(LogicalField, String)] {
        &self.entries
    }
}

/// Resolve every logical field against the given raw headers.
///
/// Within a field, the earliest matching alternative wins; within an
/// alternative, the leftmost header wins. Returns a `SchemaError` naming
/// every required field left unresolved.
pub fn resolve(labels: &[String]) -> Result<FieldMap, SchemaError> {
    let normalized: Vec<String> = labels.iter().map(|l| normalize_text(l)).collect();
    let mut claimed = vec![false; labels.len()];
    let mut entries = Vec::new();
    let mut missing = Vec::new();

    for (field, alternatives) in SYNONYMS {
        let hit = alternatives.iter().find_map(|keywords| {
            (0..normalized.len()).find(|&i| {
                !claimed[i] && keywords.iter().all(|k| contains_phrase(&normalized[i], k))
            })
        });
        match hit {
            Some(i) => {
                claimed[i] = true;
                log::debug!("field '{field}' resolved to column '{}'", labels[i]);
                entries.push((*field, labels[i].clone()));
            }
            None if field.is_required() => missing.push(*field),
            None => log::debug!("optional field '{field}' not present"),
        }
    }

    if missing.is_empty() {
        Ok(FieldMap { entries })
    } else {
        missing.sort();
        Err(SchemaError { missing })
    }
}

//! Record normalizer: coerces raw cells into `RosterRecord`s.
//!
//! Nothing here fails. A cell that cannot be read is defaulted (0, present,
//! empty) and reported as a `ParseWarning` carrying row and field identity.

use crate::{
    cell::{contains_phrase, normalize_text, Cell, RawRow},
    config::RedistributionConfig,
    field_resolver::{FieldMap, LogicalField},
    record::{ParseWarning, RosterRecord},
    types::{Count, RowIndex},
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DIGITS: Regex = Regex::new(r"\d+").unwrap();
    /// Tier labels embedded in a P2 cell ("P2", "P2/1", "p2.1", "P 2-1").
    /// Their digits must not be mistaken for counts.
    static ref TIER_LABEL: Regex =
        Regex::new(r"(?i)\bp\s*[1-3](?:\s*[./_-]\s*[12])?\b").unwrap();
}

/// Output of one normalization pass.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: Vec<RosterRecord>,
    pub warnings: Vec<ParseWarning>,
}

/// P2 composite split into its sub-tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct P2Split {
    pub total: Count,
    pub p2_1: Count,
    pub p2_2: Count,
    pub anomaly: Option<P2Anomaly>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum P2Anomaly {
    /// The bracketed P2/1 count exceeded the total; clamped to the total.
    SubExceedsTotal,
    /// Only a bracketed count was given; it is taken as both total and P2/1.
    MissingTotal,
}

/// First run of ASCII digits in `text`. Runs too large for a `Count`
/// saturate rather than wrap.
pub fn first_int(text: &str) -> Option<Count> {
    DIGITS
        .find(text)
        .map(|m| m.as_str().parse::<Count>().unwrap_or(Count::MAX))
}

/// Parse `<total>(<sub> P2/1)`. Bracket style, spacing and tier labels are
/// tolerated; with no bracketed sub-count everything is P2.2.
pub fn parse_p2(text: &str) -> P2Split {
    let stripped = TIER_LABEL.replace_all(text, " ");
    let (head, bracket) = match stripped.find(['(', '[']) {
        Some(i) => (&stripped[..i], Some(&stripped[i + 1..])),
        None => (&stripped[..], None),
    };

    match (first_int(head), bracket.and_then(first_int)) {
        (Some(total), Some(sub)) => {
            let p2_1 = sub.min(total);
            P2Split {
                total,
                p2_1,
                p2_2: total - p2_1,
                anomaly: (sub > total).then_some(P2Anomaly::SubExceedsTotal),
            }
        }
        (Some(total), None) => P2Split {
            total,
            p2_1: 0,
            p2_2: total,
            anomaly: None,
        },
        (None, Some(sub)) => P2Split {
            total: sub,
            p2_1: sub,
            p2_2: 0,
            anomaly: Some(P2Anomaly::MissingTotal),
        },
        (None, None) => P2Split::default(),
    }
}

/// How a can-help / need-help cell was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityReading {
    Numeric(Count),
    Affirmative,
    Negative,
    Blank,
    Unrecognized,
}

impl CapacityReading {
    pub fn value(&self) -> Count {
        match self {
            CapacityReading::Numeric(n) => *n,
            CapacityReading::Affirmative => 1,
            _ => 0,
        }
    }
}

/// Any digits win. Otherwise a cell that is exactly a negative answer is
/// 0, and a cell containing an affirmative keyword anywhere is 1.
pub fn parse_capacity(text: &str, config: &RedistributionConfig) -> CapacityReading {
    if let Some(n) = first_int(text) {
        return CapacityReading::Numeric(n);
    }
    let text = normalize_text(text);
    let bare = text.trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());
    if bare.is_empty() {
        CapacityReading::Blank
    } else if config.negative_keywords.iter().any(|k| normalize_text(k) == bare) {
        CapacityReading::Negative
    } else if config.affirmative_keywords.iter().any(|k| contains_phrase(&text, k)) {
        CapacityReading::Affirmative
    } else {
        CapacityReading::Unrecognized
    }
}

/// Strict yes/no. Anything else is `None` and the caller defaults to
/// present: a false absence moves cases that did not need moving, a false
/// presence strands them.
pub fn parse_present(cell: &Cell) -> Option<bool> {
    match cell {
        Cell::Bool(b) => Some(*b),
        other => match other.as_text().trim().to_lowercase().as_str() {
            "yes" => Some(true),
            "no" => Some(false),
            _ => None,
        },
    }
}

/// Notes phrases match as plain substrings so "student" also catches
/// "students".
fn notes_match(notes_normalized: &str, phrases: &[String]) -> bool {
    phrases
        .iter()
        .map(|p| normalize_text(p))
        .any(|p| !p.is_empty() && notes_normalized.contains(&p))
}

pub fn normalize(
    rows: &[RawRow],
    fields: &FieldMap,
    config: &RedistributionConfig,
) -> Normalized {
    let mut out = Normalized::default();

    for (row_index, row) in rows.iter().enumerate() {
        if row.is_blank() {
            continue;
        }
        let mut ctx = RowContext {
            row_index,
            row,
            fields,
            name: None,
            warnings: &mut out.warnings,
        };

        let name = ctx.text(LogicalField::Name).trim().to_string();
        if name.is_empty() {
            ctx.row_warning("row has data but no name; skipped");
            continue;
        }
        if out.records.iter().any(|r| r.name == name) {
            ctx.name = Some(name);
            ctx.row_warning("duplicate name; first occurrence kept, this row skipped");
            continue;
        }
        ctx.name = Some(name.clone());

        let record = ctx.build(name, config);
        out.records.push(record);
    }

    for w in &out.warnings {
        log::warn!("roster: {w}");
    }
    log::info!(
        "roster: normalized {} records from {} rows ({} warnings)",
        out.records.len(),
        rows.len(),
        out.warnings.len()
    );
    out
}

struct RowContext<'a> {
    row_index: RowIndex,
    row: &'a RawRow,
    fields: &'a FieldMap,
    name: Option<String>,
    warnings: &'a mut Vec<ParseWarning>,
}

impl RowContext<'_> {
    fn cell(&self, field: LogicalField) -> Cell {
        self.fields
            .get(field)
            .and_then(|label| self.row.get(label))
            .cloned()
            .unwrap_or(Cell::Empty)
    }

    fn text(&self, field: LogicalField) -> String {
        self.cell(field).as_text().into_owned()
    }

    fn warn(&mut self, field: LogicalField, raw_value: &str, message: &str) {
        self.warnings.push(ParseWarning {
            row: self.row_index,
            name: self.name.clone(),
            field: Some(field),
            raw_value: raw_value.trim().to_string(),
            message: message.to_string(),
        });
    }

    fn row_warning(&mut self, message: &str) {
        self.warnings.push(ParseWarning {
            row: self.row_index,
            name: self.name.clone(),
            field: None,
            raw_value: String::new(),
            message: message.to_string(),
        });
    }

    fn count(&mut self, field: LogicalField) -> Count {
        let raw = self.text(field);
        match first_int(&raw) {
            Some(n) => n,
            None => {
                if !raw.trim().is_empty() {
                    self.warn(field, &raw, "no number found; defaulted to 0");
                }
                0
            }
        }
    }

    fn capacity(&mut self, field: LogicalField, config: &RedistributionConfig) -> Count {
        let raw = self.text(field);
        let reading = parse_capacity(&raw, config);
        if reading == CapacityReading::Unrecognized {
            self.warn(field, &raw, "neither a number nor a yes/no answer; defaulted to 0");
        }
        reading.value()
    }

    fn build(&mut self, name: String, config: &RedistributionConfig) -> RosterRecord {
        let ward = self.text(LogicalField::Ward).trim().to_string();

        let present_cell = self.cell(LogicalField::Present);
        let present = match parse_present(&present_cell) {
            Some(p) => p,
            None => {
                let raw = present_cell.as_text().into_owned();
                self.warn(
                    LogicalField::Present,
                    &raw,
                    "expected yes or no; treated as present",
                );
                true
            }
        };

        let must_see = self.count(LogicalField::MustSee);
        let p3 = self.count(LogicalField::P3);
        let trainee_led = self.count(LogicalField::TraineeLed);

        let p2_raw = self.text(LogicalField::P2Composite);
        let p2 = parse_p2(&p2_raw);
        match p2.anomaly {
            Some(P2Anomaly::SubExceedsTotal) => self.warn(
                LogicalField::P2Composite,
                &p2_raw,
                "P2/1 count exceeds P2 total; clamped to total",
            ),
            Some(P2Anomaly::MissingTotal) => self.warn(
                LogicalField::P2Composite,
                &p2_raw,
                "no P2 total before the bracket; bracketed count used as total and P2/1",
            ),
            None if !p2_raw.trim().is_empty() && first_int(&p2_raw).is_none() => {
                self.warn(LogicalField::P2Composite, &p2_raw, "no number found; defaulted to 0")
            }
            None => {}
        }

        let can_help = self.capacity(LogicalField::CanHelp, config);
        let need_help = self.capacity(LogicalField::NeedHelp, config);

        let notes = self.text(LogicalField::Notes).trim().to_string();
        let notes_normalized = normalize_text(&notes);

        RosterRecord {
            row: self.row_index,
            name,
            ward,
            present,
            must_see,
            p2_total: p2.total,
            p2_1: p2.p2_1,
            p2_2: p2.p2_2,
            p3,
            trainee_led,
            can_help,
            need_help,
            extended_absence: notes_match(&notes_normalized, &config.absence_phrases),
            restricted: notes_match(&notes_normalized, &config.restricted_phrases),
            notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p2_with_bracketed_sub_count() {
        let p2 = parse_p2("10 (3 P2/1)");
        assert_eq!((p2.total, p2.p2_1, p2.p2_2), (10, 3, 7));
        assert_eq!(p2.anomaly, None);
    }

    #[test]
    fn p2_plain_total_is_all_p2_2() {
        let p2 = parse_p2("10");
        assert_eq!((p2.total, p2.p2_1, p2.p2_2), (10, 0, 10));
    }

    #[test]
    fn p2_without_digits_is_zero() {
        assert_eq!(parse_p2(""), P2Split::default());
        assert_eq!(parse_p2("n/a"), P2Split::default());
    }

    #[test]
    fn p2_tolerates_labels_and_spacing() {
        let p2 = parse_p2("P2: 8 [ P2.1 = 2 ]");
        assert_eq!((p2.total, p2.p2_1, p2.p2_2), (8, 2, 6));
        let p2 = parse_p2("6(1)");
        assert_eq!((p2.total, p2.p2_1, p2.p2_2), (6, 1, 5));
    }

    #[test]
    fn p2_sub_count_above_total_is_clamped() {
        let p2 = parse_p2("4 (6 P2/1)");
        assert_eq!((p2.total, p2.p2_1, p2.p2_2), (4, 4, 0));
        assert_eq!(p2.anomaly, Some(P2Anomaly::SubExceedsTotal));
    }

    #[test]
    fn p2_bracket_only_counts_as_p2_1() {
        let p2 = parse_p2("(3 P2/1)");
        assert_eq!((p2.total, p2.p2_1, p2.p2_2), (3, 3, 0));
        assert_eq!(p2.anomaly, Some(P2Anomaly::MissingTotal));
    }

    #[test]
    fn capacity_reads_numbers_then_keywords() {
        let config = RedistributionConfig::default();
        assert_eq!(parse_capacity("2 cases", &config), CapacityReading::Numeric(2));
        assert_eq!(parse_capacity("Yes", &config), CapacityReading::Affirmative);
        assert_eq!(parse_capacity("able to", &config), CapacityReading::Affirmative);
        assert_eq!(parse_capacity("Not able.", &config), CapacityReading::Negative);
        assert_eq!(parse_capacity("can't", &config), CapacityReading::Negative);
        assert_eq!(parse_capacity("Sure, no problem", &config), CapacityReading::Affirmative);
        assert_eq!(parse_capacity("ok, none left of my own", &config), CapacityReading::Affirmative);
        assert_eq!(parse_capacity("", &config), CapacityReading::Blank);
        assert_eq!(parse_capacity("maybe later", &config), CapacityReading::Unrecognized);
    }

    #[test]
    fn present_is_strict_yes_no() {
        assert_eq!(parse_present(&Cell::from(" YES ")), Some(true));
        assert_eq!(parse_present(&Cell::from("no")), Some(false));
        assert_eq!(parse_present(&Cell::Bool(false)), Some(false));
        assert_eq!(parse_present(&Cell::from("AL")), None);
        assert_eq!(parse_present(&Cell::Empty), None);
    }

    #[test]
    fn first_int_saturates() {
        assert_eq!(first_int("abc 12 de 5"), Some(12));
        assert_eq!(first_int("none"), None);
        assert_eq!(first_int("99999999999999"), Some(Count::MAX));
    }
}

//! Raw roster input: one `RawRow` per spreadsheet row, each an ordered list
//! of `(column label, Cell)` pairs with labels exactly as uploaded.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// A single cell value. Spreadsheets hand us text, numbers, booleans or
/// nothing at all, and the normalizer treats each the same way: as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Bool(bool),
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Text form of the cell. Whole numbers render without a decimal
    /// point so `3.0` reads as `"3"`.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Text(s) => Cow::Borrowed(s.as_str()),
            Cell::Number(n) if n.fract() == 0.0 && n.is_finite() => {
                Cow::Owned(format!("{}", *n as i64))
            }
            Cell::Number(n) => Cow::Owned(n.to_string()),
            Cell::Bool(true) => Cow::Borrowed("yes"),
            Cell::Bool(false) => Cow::Borrowed("no"),
            Cell::Empty => Cow::Borrowed(""),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_text().trim().is_empty()
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<u32> for Cell {
    fn from(n: u32) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

/// One roster row. Column order is kept as uploaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, Cell)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by callers assembling rows in code.
    pub fn with(mut self, label: impl Into<String>, cell: impl Into<Cell>) -> Self {
        self.cells.push((label.into(), cell.into()));
        self
    }

    /// Cell under an exact raw label. The first occurrence wins when a
    /// label is repeated.
    pub fn get(&self, label: &str) -> Option<&Cell> {
        self.cells.iter().find(|(l, _)| l == label).map(|(_, c)| c)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(l, _)| l.as_str())
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, c)| c.is_blank())
    }
}

impl Serialize for RawRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (label, cell) in &self.cells {
            map.serialize_entry(label, cell)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RawRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = RawRow;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping column labels to cell values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawRow, A::Error> {
                let mut cells = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, cell)) = access.next_entry::<String, Cell>()? {
                    cells.push((label, cell));
                }
                Ok(RawRow { cells })
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// Union of column labels across all rows, in first-seen order.
pub fn column_labels(rows: &[RawRow]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for row in rows {
        for label in row.labels() {
            if !labels.iter().any(|l| l == label) {
                labels.push(label.to_string());
            }
        }
    }
    labels
}

/// Lower-case and collapse every run of whitespace (line breaks included)
/// to a single space.
pub fn normalize_text(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whole-word containment on already-normalized text: `phrase` must occur
/// in `text` with no alphanumeric character directly on either side.
/// "able" matches "able to help" but not "unable".
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    let phrase = normalize_text(phrase);
    if phrase.is_empty() {
        return false;
    }
    text.match_indices(phrase.as_str()).any(|(start, _)| {
        let end = start + phrase.len();
        let before_ok = text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = text[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

//! Numeric normalization of quantity columns
//!
//! Exported quantities arrive as numbers, numbers with units (`"12.5 m²"`),
//! or free text. The normalizer keeps two views of every cell: a summable
//! number and the raw text it came from.
//!
//! The number is built from the digit runs of the cell's text joined with
//! `.`. This is lossy on purpose and must stay that way:
//!
//! - `"12.5"` → `12.5`
//! - `"12.5.3"` → `0` (the joined `"12.5.3"` does not parse)
//! - `"-7"` → `7` (signs are dropped)
//! - `"12 m2"` → `12.2` (the unit's digit counts as a run)
//! - missing → `0` with raw text `"0"`

use crate::dataset::Column;
use crate::model::{Cell, QuantityField};

/// How a cell's number was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NormalizeOutcome {
    /// Digit runs were found and the joined string parsed
    Parsed,
    /// The text contained no digits; the value defaults to `0`
    NoDigits,
    /// The joined digit runs did not parse; the value defaults to `0`
    Unparseable,
}

impl NormalizeOutcome {
    /// Whether the value is a `0` default rather than a parsed number
    pub fn is_default(&self) -> bool {
        !matches!(self, NormalizeOutcome::Parsed)
    }
}

/// Both views of one quantity cell
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Number used for summing
    pub value: f64,
    /// Text used for the audit trail
    pub raw: String,
    /// Whether `value` was parsed or defaulted
    pub outcome: NormalizeOutcome,
}

/// Extract the number formed by the digit runs of `text`
pub fn extract_number(text: &str) -> (f64, NormalizeOutcome) {
    let runs: Vec<&str> = text
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .collect();

    if runs.is_empty() {
        return (0.0, NormalizeOutcome::NoDigits);
    }

    match runs.join(".").parse::<f64>() {
        Ok(value) => (value, NormalizeOutcome::Parsed),
        Err(_) => (0.0, NormalizeOutcome::Unparseable),
    }
}

/// Normalize a single cell
pub fn normalize_cell(cell: &Cell) -> Normalized {
    let raw = cell.to_text().into_owned();
    let (value, outcome) = match cell {
        // A missing cell has no digits of its own; its raw "0" is a fill value
        Cell::Missing => (0.0, NormalizeOutcome::NoDigits),
        _ => extract_number(&raw),
    };
    Normalized {
        value,
        raw,
        outcome,
    }
}

/// A normalized quantity column
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedColumn {
    /// Summable values, in row order
    pub values: Vec<f64>,
    /// Raw textual values, in row order
    pub raw: Vec<String>,
    /// Number of cells whose value defaulted to `0`
    pub defaulted: usize,
}

impl NormalizedColumn {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column has no rows
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Normalize every cell of a column
pub fn normalize_column(column: &Column) -> NormalizedColumn {
    let mut values = Vec::with_capacity(column.len());
    let mut raw = Vec::with_capacity(column.len());
    let mut defaulted = 0;

    for cell in column.cells() {
        let normalized = normalize_cell(cell);
        if normalized.outcome.is_default() {
            defaulted += 1;
        }
        values.push(normalized.value);
        raw.push(normalized.raw);
    }

    NormalizedColumn {
        values,
        raw,
        defaulted,
    }
}

/// Normalize the recognized quantity fields present in `dataset`
///
/// Fields absent from the dataset are skipped.
pub fn normalize_quantities(
    dataset: &crate::dataset::Dataset,
) -> Vec<(QuantityField, NormalizedColumn)> {
    dataset
        .quantity_fields()
        .into_iter()
        .filter_map(|field| {
            let column = dataset.column(field.column_name())?;
            let normalized = normalize_column(column);
            tracing::debug!(
                field = %field,
                rows = normalized.len(),
                defaulted = normalized.defaulted,
                "Normalized quantity column"
            );
            Some((field, normalized))
        })
        .collect()
}

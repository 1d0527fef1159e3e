//! Data structures shared by the take-off components

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Quantity columns that can be aggregated
///
/// Only these columns are normalized to numbers when a dataset is loaded;
/// every other column passes through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuantityField {
    /// Surface area
    Area,
    /// Volume
    Volume,
    /// Width
    Width,
    /// Length
    Length,
}

impl QuantityField {
    /// All recognized quantity fields, in the order they are offered to users
    pub const ALL: [QuantityField; 4] = [
        QuantityField::Area,
        QuantityField::Volume,
        QuantityField::Width,
        QuantityField::Length,
    ];

    /// Column name of this field in an exported table
    pub fn column_name(&self) -> &'static str {
        match self {
            QuantityField::Area => "Area",
            QuantityField::Volume => "Volume",
            QuantityField::Width => "Width",
            QuantityField::Length => "Length",
        }
    }

    /// Look up a field by its exact column name
    pub fn from_column_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column_name() == name)
    }
}

impl fmt::Display for QuantityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for QuantityField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_column_name(s).ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

/// Inferred type of a dataset column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ColumnKind {
    /// Every cell is present and parses as an integer
    Integer,
    /// Every present cell parses as a number (or the column is entirely empty)
    Float,
    /// At least one present cell is not a number
    Text,
}

/// One cell of a dataset
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Empty or NA cell
    Missing,
    /// Cell of an integer column
    Integer(i64),
    /// Cell of a float column
    Float(f64),
    /// Cell of a text column
    Text(String),
}

impl Cell {
    /// Whether this cell is missing
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// String value of a text cell
    ///
    /// Numeric and missing cells are not strings and return `None`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Textual form of the cell
    ///
    /// Missing cells read as `"0"`, integers in decimal, floats in their
    /// shortest round-trip form (`10.0`, `12.5`, `1e-05`, `1e+16`) and text
    /// verbatim.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Missing => Cow::Borrowed("0"),
            Cell::Integer(v) => Cow::Owned(v.to_string()),
            Cell::Float(v) => Cow::Owned(float_repr(*v)),
            Cell::Text(s) => Cow::Borrowed(s),
        }
    }
}

/// Shortest round-trip text of a float with a mandatory fractional part or a
/// signed two-digit exponent
pub(crate) fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // Debug switches to scientific notation below 1e-4 and from 1e16 upward
    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

//! Pattern matching of grouping values
//!
//! A row matches when its grouping value is a string and the expression
//! `.` + pattern matches at the start of that string. The leading `.`
//! always consumes the first character, so `"Wall"` matches `"xWall-01"`
//! but is tested against `"all-01"` for the value `"Wall-01"`. Patterns
//! written as globs (`*[wW]all*`) therefore still compile, as `.*[wW]all*`.

use regex::Regex;

use crate::dataset::Column;
use crate::error::Result;
use crate::model::Cell;

/// Compiled user pattern
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: String,
    regex: Regex,
}

impl PatternMatcher {
    /// Compile a user pattern
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPattern`] if `.` + `pattern` is not a
    /// valid regular expression.
    ///
    /// # Example
    ///
    /// ```
    /// use qto::PatternMatcher;
    ///
    /// let matcher = PatternMatcher::new("Wall").unwrap();
    /// assert!(matcher.is_match("xWall-01"));
    /// assert!(!matcher.is_match("Wall-01"));
    /// ```
    pub fn new(pattern: &str) -> Result<Self> {
        // Non-capturing group keeps alternations inside the anchored prefix
        let regex = Regex::new(&format!("^(?:.{})", pattern))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// The user pattern as given
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Test a string value
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// Test a cell; only text cells can match
    pub fn matches_cell(&self, cell: &Cell) -> bool {
        cell.as_str().is_some_and(|s| self.is_match(s))
    }

    /// Evaluate the pattern against every row of `column`
    pub fn mask(&self, column: &Column) -> MatchMask {
        MatchMask(column.cells().iter().map(|c| self.matches_cell(c)).collect())
    }
}

/// Per-row match result
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchMask(Vec<bool>);

impl MatchMask {
    /// Whether `row` matched; rows outside the mask did not
    pub fn is_matched(&self, row: usize) -> bool {
        self.0.get(row).copied().unwrap_or(false)
    }

    /// Positions of matched rows, ascending
    pub fn matched_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(row, &matched)| matched.then_some(row))
    }

    /// Number of matched rows
    pub fn matched_count(&self) -> usize {
        self.0.iter().filter(|&&m| m).count()
    }

    /// Whether no row matched
    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|&m| m)
    }

    /// Number of rows covered
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Raw boolean view
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl From<Vec<bool>> for MatchMask {
    fn from(mask: Vec<bool>) -> Self {
        MatchMask(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_character_is_consumed() {
        let m = PatternMatcher::new("Wall").unwrap();
        assert!(m.is_match("xWall-01"));
        assert!(!m.is_match("Wall-01"));
        assert!(!m.is_match(""));
        assert!(!m.is_match("x"));
    }

    #[test]
    fn test_match_is_prefix_not_full() {
        let m = PatternMatcher::new("[Ww]all").unwrap();
        assert!(m.is_match("xWall-A"));
        assert!(m.is_match("_wall and more"));
        assert!(!m.is_match("Wall-A"));
        assert!(!m.is_match("Door-A"));
        assert!(!m.is_match("Big Wall"));
    }

    #[test]
    fn test_glob_style_pattern() {
        let m = PatternMatcher::new("*[wW]all*").unwrap();
        assert!(m.is_match("Basic Wall: Generic"));
        // `l*` lets the final `l` be absent
        assert!(m.is_match("Wal"));
        assert!(!m.is_match("Door"));
    }

    #[test]
    fn test_alternation_stays_anchored() {
        let m = PatternMatcher::new("ab|cd").unwrap();
        assert!(m.is_match("xab"));
        // `cd` is an alternative to `.ab`, not a floating search
        assert!(m.is_match("cd"));
        assert!(!m.is_match("xxcd"));
    }

    #[test]
    fn test_empty_pattern_matches_any_non_empty_value() {
        let m = PatternMatcher::new("").unwrap();
        assert!(m.is_match("a"));
        assert!(!m.is_match(""));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(PatternMatcher::new("[unclosed").is_err());
    }

    #[test]
    fn test_numeric_cells_never_match() {
        let m = PatternMatcher::new("").unwrap();
        assert!(!m.matches_cell(&Cell::Integer(12)));
        assert!(!m.matches_cell(&Cell::Missing));
        assert!(m.matches_cell(&Cell::Text("12".into())));
    }

    #[test]
    fn test_mask() {
        let column = Column::from_raw("Type", &["Wall-A", "Door-A", "", "xWall"]);
        let mask = PatternMatcher::new("all").unwrap().mask(&column);
        assert_eq!(mask.as_slice(), &[true, false, false, false]);
        assert_eq!(mask.matched_rows().collect::<Vec<_>>(), vec![0]);
        assert_eq!(mask.matched_count(), 1);
        assert!(!mask.is_empty());
    }
}

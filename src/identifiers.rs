//! Element ids of matched rows
//!
//! The id set is the only thing the scene filter learns about the table.
//! Ids are compared as exact strings: `"7"` and `"07"` are different elements.

use std::collections::HashSet;

use crate::dataset::Dataset;
use crate::matcher::MatchMask;

/// Set of element ids selected by a pattern
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchedIds {
    ids: HashSet<String>,
}

impl MatchedIds {
    /// Collect the element ids of every matched row
    pub fn from_mask(dataset: &Dataset, mask: &MatchMask) -> Self {
        let ids: HashSet<String> = mask
            .matched_rows()
            .filter_map(|row| dataset.element_id(row))
            .map(str::to_string)
            .collect();
        tracing::debug!(count = ids.len(), "Collected matched element ids");
        Self { ids }
    }

    /// Whether `id` belongs to a matched element
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of distinct ids
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing matched
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate the ids in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Ids sorted lexicographically
    pub fn sorted(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.iter().collect();
        ids.sort_unstable();
        ids
    }
}

impl<S: Into<String>> FromIterator<S> for MatchedIds {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mask_uses_positions() {
        let dataset = Dataset::from_reader("Type\nWall\nDoor\nWall\n".as_bytes(), 100).unwrap();
        let mask = MatchMask::from(vec![true, false, true]);
        let ids = MatchedIds::from_mask(&dataset, &mask);
        assert_eq!(ids.sorted(), vec!["0", "2"]);
        assert!(!ids.contains("1"));
    }

    #[test]
    fn test_ids_are_exact_strings() {
        let ids: MatchedIds = ["7"].into_iter().collect();
        assert!(ids.contains("7"));
        assert!(!ids.contains("07"));
        assert!(!ids.contains("7.0"));
    }
}

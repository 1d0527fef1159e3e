//! Grouping and aggregation of matched rows

use std::collections::HashMap;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::matcher::MatchMask;
use crate::model::QuantityField;
use crate::normalize::normalize_column;

/// Aggregate of the matched rows sharing one grouping value
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Grouping column value
    pub key: String,
    /// Number of matched rows with this key
    pub element_count: usize,
    /// Sum of the normalized quantity, added in row order
    pub quantity_sum: f64,
    /// Raw quantity texts concatenated in row order, without separator
    pub raw_concat: String,
}

/// Groups produced by one aggregation, in order of first occurrence
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTable {
    group_column: String,
    field: QuantityField,
    groups: Vec<Group>,
}

impl GroupTable {
    /// Grouping column the table was built from
    pub fn group_column(&self) -> &str {
        &self.group_column
    }

    /// Aggregated quantity field
    pub fn field(&self) -> QuantityField {
        self.field
    }

    /// Groups in order of first occurrence
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Look up a group by key
    pub fn get(&self, key: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.key == key)
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Always false for a table produced by [`aggregate`]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Matched elements across all groups
    pub fn total_count(&self) -> usize {
        self.groups.iter().map(|g| g.element_count).sum()
    }

    /// Quantity across all groups
    pub fn total_quantity(&self) -> f64 {
        self.groups.iter().map(|g| g.quantity_sum).sum()
    }
}

/// Result of aggregating a match
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    /// No row matched the pattern
    NoData,
    /// At least one row matched
    Groups(GroupTable),
}

impl Aggregation {
    /// The group table, if any row matched
    pub fn table(&self) -> Option<&GroupTable> {
        match self {
            Aggregation::NoData => None,
            Aggregation::Groups(table) => Some(table),
        }
    }

    /// Whether no row matched
    pub fn is_no_data(&self) -> bool {
        matches!(self, Aggregation::NoData)
    }
}

/// Group the matched rows of `dataset` by `group_column` and aggregate `field`
///
/// # Errors
///
/// Returns [`crate::Error::MissingColumn`] if either column is absent.
pub fn aggregate(
    dataset: &Dataset,
    mask: &MatchMask,
    group_column: &str,
    field: QuantityField,
) -> Result<Aggregation> {
    let keys = dataset.require_column(group_column)?;
    let quantities = normalize_column(dataset.require_column(field.column_name())?);

    if mask.is_empty() {
        tracing::debug!(group_column, field = %field, "No rows matched");
        return Ok(Aggregation::NoData);
    }

    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for row in mask.matched_rows() {
        let Some(key) = keys.get(row) else {
            continue;
        };
        let key = key.to_text();
        let index = match positions.get(key.as_ref()) {
            Some(&index) => index,
            None => {
                positions.insert(key.to_string(), groups.len());
                groups.push(Group {
                    key: key.to_string(),
                    element_count: 0,
                    quantity_sum: 0.0,
                    raw_concat: String::new(),
                });
                groups.len() - 1
            }
        };

        let group = &mut groups[index];
        group.element_count += 1;
        group.quantity_sum += quantities.values[row];
        group.raw_concat.push_str(&quantities.raw[row]);
    }

    tracing::debug!(
        group_column,
        field = %field,
        groups = groups.len(),
        matched = mask.matched_count(),
        "Aggregated matched rows"
    );

    Ok(Aggregation::Groups(GroupTable {
        group_column: group_column.to_string(),
        field,
        groups,
    }))
}

#[cfg(feature = "serde")]
mod serialize {
    use super::{Aggregation, GroupTable};
    use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

    /// One table row keyed by the labels the take-off report uses
    struct Row<'a> {
        table: &'a GroupTable,
        index: usize,
    }

    impl Serialize for Row<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let group = &self.table.groups[self.index];
            let field = self.table.field.column_name();
            let mut map = serializer.serialize_map(Some(4))?;
            map.serialize_entry(self.table.group_column.as_str(), &group.key)?;
            map.serialize_entry(&format!("Separate {} of elements", field), &group.raw_concat)?;
            map.serialize_entry("Number of elements", &group.element_count)?;
            map.serialize_entry(&format!("Sum of the {}", field), &group.quantity_sum)?;
            map.end()
        }
    }

    struct Rows<'a>(&'a GroupTable);

    impl Serialize for Rows<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.0.groups.len()))?;
            for index in 0..self.0.groups.len() {
                seq.serialize_element(&Row {
                    table: self.0,
                    index,
                })?;
            }
            seq.end()
        }
    }

    impl Serialize for GroupTable {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(5))?;
            map.serialize_entry("group_column", &self.group_column)?;
            map.serialize_entry("field", &self.field)?;
            map.serialize_entry("rows", &Rows(self))?;
            map.serialize_entry("total_count", &self.total_count())?;
            map.serialize_entry("total_quantity", &self.total_quantity())?;
            map.end()
        }
    }

    impl Serialize for Aggregation {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Aggregation::NoData => serializer.serialize_none(),
                Aggregation::Groups(table) => serializer.serialize_some(table),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::PatternMatcher;

    fn dataset() -> Dataset {
        let csv = "Type,Area\nWall-A,10\nDoor-A,5\nWall-B,20\nWall-A,2.5\n";
        Dataset::from_reader(csv.as_bytes(), 100).unwrap()
    }

    #[test]
    fn test_groups_in_first_occurrence_order() {
        let dataset = dataset();
        let mask = PatternMatcher::new("all")
            .unwrap()
            .mask(dataset.column("Type").unwrap());
        let aggregation = aggregate(&dataset, &mask, "Type", QuantityField::Area).unwrap();
        let table = aggregation.table().unwrap();

        let keys: Vec<&str> = table.groups().iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Wall-A", "Wall-B"]);

        let wall_a = table.get("Wall-A").unwrap();
        assert_eq!(wall_a.element_count, 2);
        assert_eq!(wall_a.quantity_sum, 12.5);
        // Float column texts keep their ".0"
        assert_eq!(wall_a.raw_concat, "10.02.5");

        assert_eq!(table.total_count(), 3);
        assert_eq!(table.total_quantity(), 32.5);
    }

    #[test]
    fn test_no_match_is_no_data() {
        let dataset = dataset();
        let mask = PatternMatcher::new("Window")
            .unwrap()
            .mask(dataset.column("Type").unwrap());
        let aggregation = aggregate(&dataset, &mask, "Type", QuantityField::Area).unwrap();
        assert!(aggregation.is_no_data());
        assert!(aggregation.table().is_none());
    }

    #[test]
    fn test_missing_columns_are_errors() {
        let dataset = dataset();
        let mask = MatchMask::from(vec![true; 4]);
        assert!(aggregate(&dataset, &mask, "Level", QuantityField::Area).is_err());
        assert!(aggregate(&dataset, &mask, "Type", QuantityField::Volume).is_err());
    }
}

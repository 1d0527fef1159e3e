//! Delimited table loading
//!
//! Columns are discovered from the header row and typed per column: a column
//! is numeric only if every present cell parses as a number. Rows past the
//! configured limit are not read.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::config::TakeoffConfig;
use crate::error::{Error, Result};
use crate::model::{Cell, ColumnKind, QuantityField};

/// Cell contents read as missing values
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Header names that mark an explicit element id column
const ID_COLUMN_NAMES: &[&str] = &["Unnamed: 0", "id"];

/// A named, typed column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    cells: Vec<Cell>,
}

impl Column {
    /// Build a column from raw cell strings, inferring its type
    pub fn from_raw<S: AsRef<str>>(name: impl Into<String>, raw: &[S]) -> Self {
        let present: Vec<Option<&str>> = raw
            .iter()
            .map(|s| {
                let s = s.as_ref();
                if NA_VALUES.contains(&s) { None } else { Some(s) }
            })
            .collect();

        let all_integers = present
            .iter()
            .all(|v| v.is_some_and(|s| s.trim().parse::<i64>().is_ok()));
        let all_numbers = present
            .iter()
            .flatten()
            .all(|s| s.trim().parse::<f64>().is_ok());

        let (kind, cells) = if !present.is_empty() && all_integers {
            let cells = present
                .iter()
                .map(|v| match v.and_then(|s| s.trim().parse::<i64>().ok()) {
                    Some(n) => Cell::Integer(n),
                    None => Cell::Missing,
                })
                .collect();
            (ColumnKind::Integer, cells)
        } else if all_numbers {
            let cells = present
                .iter()
                .map(|v| match v.and_then(|s| s.trim().parse::<f64>().ok()) {
                    Some(n) => Cell::Float(n),
                    None => Cell::Missing,
                })
                .collect();
            (ColumnKind::Float, cells)
        } else {
            let cells = present
                .iter()
                .map(|v| match v {
                    Some(s) => Cell::Text((*s).to_string()),
                    None => Cell::Missing,
                })
                .collect();
            (ColumnKind::Text, cells)
        };

        Self {
            name: name.into(),
            kind,
            cells,
        }
    }

    /// Column name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inferred column type
    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    /// All cells, in row order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at `row`
    pub fn get(&self, row: usize) -> Option<&Cell> {
        self.cells.get(row)
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the column has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// An in-memory table of building elements
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    element_ids: Vec<String>,
    id_column: Option<usize>,
    rows: usize,
}

impl Dataset {
    /// Load a dataset from a path, resolved against the configured base directory
    pub fn open(path: impl AsRef<Path>, config: &TakeoffConfig) -> Result<Self> {
        let path = config.resolve(path);
        tracing::debug!(path = %path.display(), row_limit = config.row_limit(), "Loading dataset");
        let file = File::open(&path).map_err(|source| Error::DatasetOpen {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file, config.row_limit())
    }

    /// Read a comma-separated table with a header row
    ///
    /// At most `row_limit` data rows are kept. Rows with more fields than the
    /// header are skipped with a warning; shorter rows are padded with
    /// missing cells.
    pub fn from_reader<R: Read>(reader: R, row_limit: usize) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(String::from).collect();
        let mut rows = Vec::new();
        let mut skipped = 0usize;

        // The cap counts records read, including skipped ones
        for (line, record) in csv_reader.records().enumerate() {
            if line >= row_limit {
                break;
            }
            let record = record?;
            if record.len() > headers.len() {
                skipped += 1;
                tracing::warn!(
                    row = line + 1,
                    fields = record.len(),
                    expected = headers.len(),
                    "Skipping row with too many fields"
                );
                continue;
            }
            rows.push(record.iter().map(String::from).collect::<Vec<_>>());
        }

        if skipped > 0 {
            tracing::warn!(skipped, "Dataset contained malformed rows");
        }

        Ok(Self::from_records(headers, rows))
    }

    /// Build a dataset from a header row and data rows of raw strings
    ///
    /// Empty header names become `Unnamed: <position>`, repeated names get a
    /// `.1`, `.2`, ... suffix.
    pub fn from_records<H, R, S>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = Vec<S>>,
        S: AsRef<str>,
    {
        let names = normalize_headers(headers.into_iter().map(Into::into).collect());
        let rows: Vec<Vec<S>> = rows.into_iter().collect();
        let row_count = rows.len();

        let mut raw_columns: Vec<Vec<&str>> = vec![Vec::with_capacity(row_count); names.len()];
        for row in &rows {
            for (i, column) in raw_columns.iter_mut().enumerate() {
                column.push(row.get(i).map(AsRef::as_ref).unwrap_or(""));
            }
        }

        let columns: Vec<Column> = names
            .into_iter()
            .zip(raw_columns)
            .map(|(name, raw)| Column::from_raw(name, &raw))
            .collect();

        Self::from_columns(columns, row_count)
    }

    fn from_columns(columns: Vec<Column>, rows: usize) -> Self {
        let index: HashMap<String, usize> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();

        let id_column = ID_COLUMN_NAMES
            .iter()
            .find_map(|name| index.get(*name).copied());

        let element_ids = (0..rows)
            .map(|row| {
                id_column
                    .and_then(|c| columns[c].get(row))
                    .filter(|cell| !cell.is_missing())
                    .map(|cell| cell.to_text().into_owned())
                    .unwrap_or_else(|| row.to_string())
            })
            .collect();

        Self {
            columns,
            index,
            element_ids,
            id_column,
            rows,
        }
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Column names in header order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// All columns in header order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    /// Look up a column by name, failing with [`Error::MissingColumn`]
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    /// Recognized quantity fields present in this dataset
    pub fn quantity_fields(&self) -> Vec<QuantityField> {
        QuantityField::ALL
            .into_iter()
            .filter(|f| self.index.contains_key(f.column_name()))
            .collect()
    }

    /// Name of the explicit id column, if the table has one
    pub fn id_column(&self) -> Option<&str> {
        self.id_column.map(|i| self.columns[i].name.as_str())
    }

    /// Element id of `row`
    ///
    /// This is the textual id column value, or the row position when the
    /// table has no id column or the cell is missing.
    pub fn element_id(&self, row: usize) -> Option<&str> {
        self.element_ids.get(row).map(String::as_str)
    }

    /// Element ids of all rows, in row order
    pub fn element_ids(&self) -> &[String] {
        &self.element_ids
    }
}

fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.into_iter()
        .enumerate()
        .map(|(position, name)| {
            let name = name.trim_start_matches('\u{feff}').to_string();
            let name = if name.is_empty() {
                format!("Unnamed: {}", position)
            } else {
                name
            };
            let count = seen.entry(name.clone()).or_insert(0);
            let unique = if *count == 0 {
                name
            } else {
                format!("{}.{}", name, count)
            };
            *count += 1;
            unique
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_kind_inference() {
        let ints = Column::from_raw("a", &["1", "2", "3"]);
        assert_eq!(ints.kind(), ColumnKind::Integer);
        assert_eq!(ints.cells()[1], Cell::Integer(2));

        // A missing cell promotes integers to floats
        let with_gap = Column::from_raw("a", &["1", "", "3"]);
        assert_eq!(with_gap.kind(), ColumnKind::Float);
        assert_eq!(with_gap.cells()[0], Cell::Float(1.0));
        assert_eq!(with_gap.cells()[1], Cell::Missing);

        let text = Column::from_raw("a", &["12", "12 m2", "NA"]);
        assert_eq!(text.kind(), ColumnKind::Text);
        assert_eq!(text.cells()[0], Cell::Text("12".into()));
        assert_eq!(text.cells()[2], Cell::Missing);
    }

    #[test]
    fn test_header_normalization() {
        let names = normalize_headers(vec![
            "".into(),
            "Type".into(),
            "Type".into(),
            "\u{feff}X".into(),
        ]);
        assert_eq!(names, vec!["Unnamed: 0", "Type", "Type.1", "X"]);
    }

    #[test]
    fn test_row_limit_and_short_rows() {
        let csv = "Type,Area\nWall,1\nDoor\nWindow,3\n";
        let dataset = Dataset::from_reader(csv.as_bytes(), 2).unwrap();
        assert_eq!(dataset.row_count(), 2);
        let area = dataset.column("Area").unwrap();
        assert_eq!(area.cells(), &[Cell::Float(1.0), Cell::Missing]);
    }

    #[test]
    fn test_rows_with_extra_fields_are_skipped() {
        let csv = "Type,Area\nWall,1\nDoor,2,extra\nWindow,3\n";
        let dataset = Dataset::from_reader(csv.as_bytes(), 100).unwrap();
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(
            dataset.column("Type").unwrap().cells()[1],
            Cell::Text("Window".into())
        );
    }

    #[test]
    fn test_skipped_rows_count_toward_row_limit() {
        let csv = "Type,Area\nWall,1\nDoor,2,extra\nWindow,3\n";
        let dataset = Dataset::from_reader(csv.as_bytes(), 2).unwrap();
        assert_eq!(dataset.row_count(), 1);
        assert_eq!(dataset.column("Type").unwrap().cells(), &[Cell::Text("Wall".into())]);
    }

    #[test]
    fn test_element_ids_from_index_column() {
        let csv = ",Type\n7,Wall\n9,Door\n";
        let dataset = Dataset::from_reader(csv.as_bytes(), 100).unwrap();
        assert_eq!(dataset.id_column(), Some("Unnamed: 0"));
        assert_eq!(dataset.element_ids(), &["7".to_string(), "9".to_string()]);
    }

    #[test]
    fn test_element_ids_fall_back_to_position() {
        let csv = "Type\nWall\nDoor\n";
        let dataset = Dataset::from_reader(csv.as_bytes(), 100).unwrap();
        assert_eq!(dataset.id_column(), None);
        assert_eq!(dataset.element_id(1), Some("1"));
        assert_eq!(dataset.element_id(2), None);
    }

    #[test]
    fn test_quantity_fields_and_missing_column() {
        let csv = "Type,Volume,Area\nWall,1,2\n";
        let dataset = Dataset::from_reader(csv.as_bytes(), 100).unwrap();
        assert_eq!(
            dataset.quantity_fields(),
            vec![QuantityField::Area, QuantityField::Volume]
        );
        let err = dataset.require_column("Length").unwrap_err();
        assert!(matches!(err, Error::MissingColumn(name) if name == "Length"));
    }
}

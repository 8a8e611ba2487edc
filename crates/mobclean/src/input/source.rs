//! Data source abstraction and metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Markers that spreadsheet exports commonly use for a missing cell.
const NULL_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file (just the name for in-memory uploads).
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, xlsx, ...).
    pub format: String,
    /// Worksheet the data came from, for workbook formats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was read.
    pub read_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been read.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            sheet: None,
            row_count,
            column_count,
            read_at: Utc::now(),
        }
    }

    /// Record the worksheet the table was read from.
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }
}

/// Tabular data with every cell coerced to text or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data (row-major order). `None` marks an absent cell.
    pub rows: Vec<Vec<Option<String>>>,
}

impl DataTable {
    /// Create a new data table.
    ///
    /// Rows are padded with absent cells or truncated to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();

        Self { headers, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(|cell| cell.as_deref()))
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|cell| cell.as_deref())
    }

    /// View a row as an ordered column name to value mapping.
    pub fn row_map(&self, row: usize) -> Option<IndexMap<&str, Option<&str>>> {
        let cells = self.rows.get(row)?;
        Some(
            self.headers
                .iter()
                .zip(cells)
                .map(|(h, cell)| (h.as_str(), cell.as_deref()))
                .collect(),
        )
    }

    /// All rows as ordered mappings, for JSON output.
    pub fn to_records(&self) -> Vec<IndexMap<&str, Option<&str>>> {
        (0..self.row_count())
            .filter_map(|i| self.row_map(i))
            .collect()
    }

    /// A copy holding only the first `n` rows.
    pub fn head(&self, n: usize) -> DataTable {
        DataTable {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Check if a value represents a missing/null value.
    ///
    /// Markers match exactly; whitespace-only text is kept as written.
    pub fn is_null_value(value: &str) -> bool {
        value.is_empty() || NULL_MARKERS.contains(&value)
    }

    /// Coerce raw cell text to the optional-text model.
    pub fn coerce_cell(value: &str) -> Option<String> {
        if Self::is_null_value(value) {
            None
        } else {
            Some(value.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataTable {
        DataTable::new(
            vec!["name".into(), "phone".into()],
            vec![
                vec![Some("Alice".into()), Some("01712345678".into())],
                vec![Some("Bob".into())],
            ],
        )
    }

    #[test]
    fn test_new_pads_short_rows() {
        let table = sample();
        assert_eq!(table.rows[1], vec![Some("Bob".to_string()), None]);
        assert_eq!(table.get(1, 1), None);
    }

    #[test]
    fn test_column_by_name() {
        let table = sample();
        assert_eq!(
            table.column_by_name("phone"),
            Some(vec![Some("01712345678"), None])
        );
        assert!(table.column_by_name("email").is_none());
    }

    #[test]
    fn test_row_map_preserves_column_order() {
        let table = sample();
        let row = table.row_map(0).unwrap();
        let keys: Vec<_> = row.keys().copied().collect();
        assert_eq!(keys, vec!["name", "phone"]);
        assert_eq!(row["phone"], Some("01712345678"));
    }

    #[test]
    fn test_is_null_value() {
        assert!(DataTable::is_null_value(""));
        assert!(DataTable::is_null_value("NA"));
        assert!(DataTable::is_null_value("N/A"));
        assert!(DataTable::is_null_value("null"));
        assert!(DataTable::is_null_value("NaN"));
        assert!(DataTable::is_null_value("#N/A"));
        assert!(!DataTable::is_null_value("0"));
        assert!(!DataTable::is_null_value("01712345678"));
        assert!(!DataTable::is_null_value("-"));
    }

    #[test]
    fn test_whitespace_cell_kept_as_written() {
        assert!(!DataTable::is_null_value("   "));
        assert!(!DataTable::is_null_value(" NA "));
        assert_eq!(DataTable::coerce_cell("  "), Some("  ".to_string()));
    }
}

//! Error types for the mobclean library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mobclean operations.
#[derive(Debug, Error)]
pub enum CleanerError {
    /// The requested contact column does not exist in the input table.
    #[error("Column '{column}' not found (available: {})", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error reading an Excel/ODS workbook.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// Error writing the output workbook.
    #[error("Workbook write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no data to process.
    #[error("Empty data: {0}")]
    EmptyData(String),
}

impl CleanerError {
    /// Wrap an IO error with the path it happened on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CleanerError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for mobclean operations.
pub type Result<T> = std::result::Result<T, CleanerError>;

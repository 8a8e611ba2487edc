//! Serialization of pipeline output to `.xlsx` and JSON.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use serde::Serialize;
use tracing::debug;

use crate::error::{CleanerError, Result};
use crate::input::DataTable;
use crate::pipeline::{PipelineOutput, ProcessSummary};

/// Suffix added to the input file stem for the output artifact.
pub const PROCESSED_SUFFIX: &str = "_processed";

/// MIME type of the `.xlsx` artifact.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Output file name for an input file: `<stem>_processed.<extension>`.
pub fn processed_file_name(input_name: &str, extension: &str) -> String {
    let stem = Path::new(input_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "contacts".to_string());
    format!("{}{}.{}", stem, PROCESSED_SUFFIX, extension)
}

/// Writes the four output tables as sheets of one workbook.
pub struct WorkbookWriter {
    header_format: Format,
}

impl WorkbookWriter {
    /// Create a writer with a bold header row.
    pub fn new() -> Self {
        Self {
            header_format: Format::new().set_bold(),
        }
    }

    /// Write the workbook to `path`.
    pub fn write(&self, output: &PipelineOutput, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_buffer(output)?;
        fs::write(path, bytes).map_err(|e| CleanerError::io(path, e))?;
        debug!(path = %path.display(), "wrote output workbook");
        Ok(())
    }

    /// Render the workbook into memory.
    pub fn to_buffer(&self, output: &PipelineOutput) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();

        for (name, table) in output.sheets() {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(name)?;
            self.write_table(worksheet, table)?;
        }

        Ok(workbook.save_to_buffer()?)
    }

    fn write_table(&self, worksheet: &mut Worksheet, table: &DataTable) -> Result<()> {
        for (col, header) in table.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, column_number(col)?, header, &self.header_format)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let row_num = u32::try_from(row_idx + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
            for (col, cell) in row.iter().enumerate() {
                // Absent and empty cells stay blank.
                if let Some(value) = cell.as_deref().filter(|v| !v.is_empty()) {
                    worksheet.write_string(row_num, column_number(col)?, value)?;
                }
            }
        }

        worksheet.set_freeze_panes(1, 0)?;
        worksheet.autofit();
        Ok(())
    }
}

impl Default for WorkbookWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn column_number(col: usize) -> std::result::Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}

/// JSON rendering of a pipeline run, sheets keyed by name in sheet order.
#[derive(Serialize)]
struct JsonReport<'a> {
    column: &'a str,
    summary: &'a ProcessSummary,
    sheets: IndexMap<&'static str, Vec<IndexMap<&'a str, Option<&'a str>>>>,
}

/// Render pipeline output as pretty-printed JSON.
pub fn to_json(output: &PipelineOutput) -> Result<String> {
    let report = JsonReport {
        column: &output.column,
        summary: &output.summary,
        sheets: output
            .sheets()
            .into_iter()
            .map(|(name, table)| (name, table.to_records()))
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Write pipeline output as JSON to `path`.
pub fn write_json(output: &PipelineOutput, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = to_json(output)?;
    fs::write(path, json).map_err(|e| CleanerError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;

    fn sample_output() -> PipelineOutput {
        let table = DataTable::new(
            vec!["name".into(), "phone".into()],
            vec![
                vec![Some("Alice".into()), Some("01712345678".into())],
                vec![Some("Bob".into()), Some("123".into())],
                vec![Some("Carol".into()), None],
            ],
        );
        Pipeline::new().run(&table, "phone").unwrap()
    }

    #[test]
    fn test_processed_file_name() {
        assert_eq!(processed_file_name("contacts.xlsx", "xlsx"), "contacts_processed.xlsx");
        assert_eq!(processed_file_name("dir/list.csv", "xlsx"), "list_processed.xlsx");
        assert_eq!(processed_file_name("list.v2.xlsx", "json"), "list.v2_processed.json");
        assert_eq!(processed_file_name("", "xlsx"), "contacts_processed.xlsx");
    }

    #[test]
    fn test_to_buffer_produces_zip() {
        let bytes = WorkbookWriter::new().to_buffer(&sample_output()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_json_report_sheet_order() {
        let json = to_json(&sample_output()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["column"], "phone");
        assert_eq!(value["summary"]["rows_with_valid"], 1);
        assert_eq!(value["sheets"]["Valid Sorted"][0]["Valid_Contacts"], "8801712345678");
        assert_eq!(value["sheets"]["Invalid Sorted"][0]["name"], "Bob");
        assert!(value["sheets"]["Original"][2]["phone"].is_null());

        let original = json.find("\"Original\"").unwrap();
        let translated = json.find("\"Translated\"").unwrap();
        let valid = json.find("\"Valid Sorted\"").unwrap();
        let invalid = json.find("\"Invalid Sorted\"").unwrap();
        assert!(original < translated && translated < valid && valid < invalid);
    }
}

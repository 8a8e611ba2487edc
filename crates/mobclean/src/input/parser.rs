//! Spreadsheet and CSV/TSV parser.
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) are read through
//! calamine; delimited text goes through the csv crate with delimiter
//! auto-detection. Either way every cell leaves here as text or absent.

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, ExcelDateTime, Reader};
use chrono::NaiveTime;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{DataTable, SourceMetadata};
use crate::error::{CleanerError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Prefix of the names given to blank header cells.
const UNNAMED_PREFIX: &str = "Unnamed: ";

/// File formats the parser understands, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Delimited text (csv, tsv, txt); the delimiter is detected.
    Delimited,
    Xlsx,
    Xlsm,
    Xlsb,
    Xls,
    Ods,
}

impl InputFormat {
    /// Detect the format from a file name's extension.
    pub fn from_name(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" | "tsv" | "txt" => Ok(InputFormat::Delimited),
            "xlsx" => Ok(InputFormat::Xlsx),
            "xlsm" => Ok(InputFormat::Xlsm),
            "xlsb" => Ok(InputFormat::Xlsb),
            "xls" => Ok(InputFormat::Xls),
            "ods" => Ok(InputFormat::Ods),
            "" => Err(CleanerError::UnsupportedFormat(format!(
                "'{}' has no file extension",
                name
            ))),
            other => Err(CleanerError::UnsupportedFormat(format!(
                ".{} (expected xlsx, xlsm, xlsb, xls, ods, csv or tsv)",
                other
            ))),
        }
    }

    /// Whether the format is a workbook read through calamine.
    pub fn is_workbook(self) -> bool {
        !matches!(self, InputFormat::Delimited)
    }

    fn label(self) -> &'static str {
        match self {
            InputFormat::Delimited => "delimited",
            InputFormat::Xlsx => "xlsx",
            InputFormat::Xlsm => "xlsm",
            InputFormat::Xlsb => "xlsb",
            InputFormat::Xls => "xls",
            InputFormat::Ods => "ods",
        }
    }
}

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter for text files (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character for text files.
    pub quote: u8,
    /// Worksheet to read (None = first sheet).
    pub sheet: Option<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
            sheet: None,
        }
    }
}

/// Parses tabular data files.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the data table and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|e| CleanerError::io(path, e))?;
        let name = path.to_string_lossy();

        let (table, mut metadata) = self.parse_bytes(&name, &contents)?;
        metadata.path = path.to_path_buf();
        Ok((table, metadata))
    }

    /// Parse in-memory file contents, using `file_name` to pick the format.
    pub fn parse_bytes(&self, file_name: &str, contents: &[u8]) -> Result<(DataTable, SourceMetadata)> {
        let format = InputFormat::from_name(file_name)?;
        let hash = content_hash(contents);

        let (table, format_label, sheet) = if format.is_workbook() {
            let (table, sheet) = self.parse_workbook(contents)?;
            (table, format.label().to_string(), Some(sheet))
        } else {
            let delimiter = match self.config.delimiter {
                Some(d) => d,
                None => detect_delimiter(contents)?,
            };
            let table = self.parse_delimited(contents, delimiter)?;
            (table, delimited_label(delimiter).to_string(), None)
        };

        debug!(
            file = file_name,
            format = %format_label,
            rows = table.row_count(),
            columns = table.column_count(),
            "parsed input table"
        );

        let mut metadata = SourceMetadata::new(
            Path::new(file_name).to_path_buf(),
            hash,
            contents.len() as u64,
            format_label,
            table.row_count(),
            table.column_count(),
        );
        if let Some(sheet) = sheet {
            metadata = metadata.with_sheet(sheet);
        }

        Ok((table, metadata))
    }

    /// Read one worksheet of a workbook. Returns the table and the sheet name.
    fn parse_workbook(&self, contents: &[u8]) -> Result<(DataTable, String)> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(contents.to_vec()))?;

        let sheet = match &self.config.sheet {
            Some(name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| CleanerError::EmptyData("Workbook has no sheets".to_string()))?,
        };

        let range = workbook.worksheet_range(&sheet)?;
        let mut rows = range
            .rows()
            .skip_while(|row| row.iter().all(|cell| cell_to_text(cell).is_none()));

        let mut headers = if self.config.has_header {
            let header_row = rows
                .next()
                .ok_or_else(|| CleanerError::EmptyData(format!("Sheet '{}' is empty", sheet)))?;
            header_names(header_row.iter().map(cell_to_text))
        } else {
            generated_headers(range.width())
        };

        let limit = self.config.max_rows.unwrap_or(usize::MAX);
        let data: Vec<Vec<Option<String>>> = rows
            .take(limit)
            .map(|row| row.iter().map(cell_to_text).collect())
            .collect();

        drop_empty_unnamed_tail(&mut headers, &data);
        if headers.is_empty() {
            return Err(CleanerError::EmptyData("No columns found".to_string()));
        }
        if data.is_empty() {
            return Err(CleanerError::EmptyData("No data rows found".to_string()));
        }

        Ok((DataTable::new(headers, data), sheet))
    }

    /// Parse delimited text.
    fn parse_delimited(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        // Byte records: a cell in a legacy encoding must not fail the file.
        let mut records = Vec::new();
        for (row_idx, result) in reader.byte_records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }
            records.push(result?);
        }

        let mut headers = if self.config.has_header {
            header_names(reader.byte_headers()?.iter().map(field_to_text))
        } else {
            let width = records.iter().map(|r| r.len()).max().unwrap_or(0);
            generated_headers(width)
        };

        let rows: Vec<Vec<Option<String>>> = records
            .iter()
            .map(|record| record.iter().map(field_to_text).collect())
            .collect();

        drop_empty_unnamed_tail(&mut headers, &rows);
        if headers.is_empty() {
            return Err(CleanerError::EmptyData("No columns found".to_string()));
        }
        if rows.is_empty() {
            return Err(CleanerError::EmptyData("No data rows found".to_string()));
        }

        Ok(DataTable::new(headers, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// SHA-256 of the raw file contents, as `sha256:<hex>`.
pub(crate) fn content_hash(contents: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    format!("sha256:{:x}", hasher.finalize())
}

fn delimited_label(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}

/// Coerce a workbook cell to text. Errors and blanks become absent.
fn cell_to_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => DataTable::coerce_cell(s),
        Data::Int(i) => Some(i.to_string()),
        // Numeric cells holding whole numbers must not pick up a ".0" suffix.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(excel_datetime_text(dt)),
        Data::DateTimeIso(s) | Data::DurationIso(s) => DataTable::coerce_cell(s),
    }
}

/// Display text of a date or duration cell.
///
/// Dates at midnight print as `YYYY-MM-DD`, other instants with the time.
/// Durations print as `H:MM:SS`. Serials chrono cannot represent keep the
/// raw number.
fn excel_datetime_text(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        if let Some(duration) = dt.as_duration() {
            let secs = duration.num_seconds();
            let sign = if secs < 0 { "-" } else { "" };
            let secs = secs.abs();
            return format!("{}{}:{:02}:{:02}", sign, secs / 3600, secs / 60 % 60, secs % 60);
        }
    } else if let Some(datetime) = dt.as_datetime() {
        if datetime.time() == NaiveTime::MIN {
            return datetime.format("%Y-%m-%d").to_string();
        }
        return datetime.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    dt.as_f64().to_string()
}

/// Decode a delimited field; bytes that are not UTF-8 become U+FFFD.
fn field_to_text(field: &[u8]) -> Option<String> {
    DataTable::coerce_cell(&String::from_utf8_lossy(field))
}

/// Turn raw header cells into unique column names.
///
/// Blank headers become `Unnamed: <index>` and repeats get a `.N` suffix.
fn header_names(cells: impl Iterator<Item = Option<String>>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::new();

    for (idx, cell) in cells.enumerate() {
        let base = cell
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("{}{}", UNNAMED_PREFIX, idx));

        let count = seen.entry(base.clone()).or_insert(0);
        let name = if *count == 0 {
            base
        } else {
            format!("{}.{}", base, count)
        };
        *count += 1;
        headers.push(name);
    }

    headers
}

/// Drop trailing blank-header columns that hold no data.
///
/// Spreadsheets often carry formatted but empty columns past the last real
/// one. A blank-header column with any value in it is kept.
fn drop_empty_unnamed_tail(headers: &mut Vec<String>, rows: &[Vec<Option<String>>]) {
    while let Some(last) = headers.last() {
        let idx = headers.len() - 1;
        let unnamed = last.starts_with(UNNAMED_PREFIX);
        let empty = rows
            .iter()
            .all(|row| row.get(idx).is_none_or(|cell| cell.is_none()));
        if !(unnamed && empty) {
            break;
        }
        headers.pop();
    }
}

fn generated_headers(width: usize) -> Vec<String> {
    (0..width).map(|i| format!("column_{}", i + 1)).collect()
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let lines: Vec<String> = bytes
        .split(|&b| b == b'\n')
        .take(10)
        .map(|l| String::from_utf8_lossy(l).trim_end_matches('\r').to_string())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(CleanerError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tabs get a small bonus.
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::ExcelDateTimeType;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_ignores_quoted_commas() {
        // Contact fields often hold comma-separated numbers inside quotes.
        let data = b"name\tphone\nA\t\"017, 018\"\nB\t\"019, 016\"";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let data = b"name,phone,city\nAlice,01712345678,Dhaka\nBob,,Khulna";
        let table = parser.parse_delimited(data, b',').unwrap();

        assert_eq!(table.headers, vec!["name", "phone", "city"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 1), Some("01712345678"));
        assert_eq!(table.get(1, 1), None);
    }

    #[test]
    fn test_parse_csv_keeps_quoted_multi_value_field() {
        let parser = Parser::new();
        let data = b"name,phone\nAlice,\"01712345678, 01812345678\"";
        let table = parser.parse_delimited(data, b',').unwrap();

        assert_eq!(table.get(0, 1), Some("01712345678, 01812345678"));
    }

    #[test]
    fn test_parse_csv_without_header() {
        let parser = Parser::with_config(ParserConfig {
            has_header: false,
            ..ParserConfig::default()
        });
        let table = parser.parse_delimited(b"a,017\nb,018", b',').unwrap();

        assert_eq!(table.headers, vec!["column_1", "column_2"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_parse_csv_max_rows() {
        let parser = Parser::with_config(ParserConfig {
            max_rows: Some(1),
            ..ParserConfig::default()
        });
        let table = parser.parse_delimited(b"p\n1\n2\n3", b',').unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_parse_header_only_is_empty_data() {
        let parser = Parser::new();
        let err = parser.parse_delimited(b"name,phone\n", b',').unwrap_err();
        assert!(matches!(err, CleanerError::EmptyData(_)));
    }

    #[test]
    fn test_input_format_from_name() {
        assert_eq!(InputFormat::from_name("a.XLSX").unwrap(), InputFormat::Xlsx);
        assert_eq!(InputFormat::from_name("dir/a.csv").unwrap(), InputFormat::Delimited);
        assert_eq!(InputFormat::from_name("a.ods").unwrap(), InputFormat::Ods);
        assert!(matches!(
            InputFormat::from_name("a.pdf"),
            Err(CleanerError::UnsupportedFormat(_))
        ));
        assert!(InputFormat::from_name("noext").is_err());
    }

    #[test]
    fn test_header_names_unique_and_unnamed() {
        let headers = header_names(
            vec![
                Some("phone".to_string()),
                None,
                Some("phone".to_string()),
                Some(" name ".to_string()),
                None,
            ]
            .into_iter(),
        );
        assert_eq!(
            headers,
            vec!["phone", "Unnamed: 1", "phone.1", "name", "Unnamed: 4"]
        );
    }

    #[test]
    fn test_unnamed_column_with_data_is_kept() {
        let parser = Parser::new();
        let table = parser
            .parse_delimited(b"name,mobile,\nAsha,01712345678,vip note\n", b',')
            .unwrap();

        assert_eq!(table.headers, vec!["name", "mobile", "Unnamed: 2"]);
        assert_eq!(table.get(0, 2), Some("vip note"));
    }

    #[test]
    fn test_empty_unnamed_tail_is_dropped() {
        let parser = Parser::new();
        let table = parser
            .parse_delimited(b"name,mobile,,\nAsha,01712345678,,\n", b',')
            .unwrap();

        assert_eq!(table.headers, vec!["name", "mobile"]);
        assert_eq!(table.rows[0].len(), 2);
    }

    #[test]
    fn test_non_utf8_cell_does_not_fail_file() {
        let table = Parser::new()
            .parse_bytes(
                "contacts.csv",
                b"name,mobile\nRen\xE9,01712345678\nAsha,01812345678\n",
            )
            .unwrap()
            .0;

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 0), Some("Ren\u{FFFD}"));
        assert_eq!(table.get(0, 1), Some("01712345678"));
        assert_eq!(table.get(1, 0), Some("Asha"));
    }

    #[test]
    fn test_detect_delimiter_with_non_utf8_line() {
        let data = b"name;mobile\nRen\xE9;01712345678\n";
        assert_eq!(detect_delimiter(data).unwrap(), b';');
    }

    #[test]
    fn test_cell_to_text() {
        assert_eq!(cell_to_text(&Data::Empty), None);
        assert_eq!(cell_to_text(&Data::Float(1712345678.0)), Some("1712345678".into()));
        assert_eq!(cell_to_text(&Data::Float(1.5)), Some("1.5".into()));
        assert_eq!(cell_to_text(&Data::Int(42)), Some("42".into()));
        assert_eq!(cell_to_text(&Data::String("NA".into())), None);
        assert_eq!(
            cell_to_text(&Data::String("০১৭".into())),
            Some("০১৭".into())
        );
        assert_eq!(cell_to_text(&Data::Bool(true)), Some("true".into()));
    }

    #[test]
    fn test_cell_to_text_dates() {
        let date = ExcelDateTime::new(45123.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(cell_to_text(&Data::DateTime(date)), Some("2023-07-16".into()));

        let noon = ExcelDateTime::new(45123.5, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            cell_to_text(&Data::DateTime(noon)),
            Some("2023-07-16 12:00:00".into())
        );

        let duration = ExcelDateTime::new(1.5, ExcelDateTimeType::TimeDelta, false);
        assert_eq!(cell_to_text(&Data::DateTime(duration)), Some("36:00:00".into()));

        assert_eq!(
            cell_to_text(&Data::DateTimeIso("2023-07-16T08:30:00".into())),
            Some("2023-07-16T08:30:00".into())
        );
    }

    #[test]
    fn test_content_hash_format() {
        let hash = content_hash(b"abc");
        assert!(hash.starts_with("sha256:"));
        assert_eq!(hash.len(), "sha256:".len() + 64);
    }
}

//! Table pipeline: classify every row, annotate, partition and sort.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{CleanerError, Result};
use crate::input::DataTable;
use crate::normalize::{classify_field, RowOutcome};

use super::progress::ProgressReporter;
use super::result::{PipelineOutput, ProcessSummary};

/// Column holding the sorted valid numbers of a row.
pub const VALID_COLUMN: &str = "Valid_Contacts";
/// Column holding the sorted invalid numbers of a row.
pub const INVALID_COLUMN: &str = "Invalid_Contacts";
/// Optional column holding valid then invalid numbers.
pub const TRANSLATED_COLUMN: &str = "Translated_Contacts";

/// Separator used when joining a row's numbers into one cell.
const JOIN_SEPARATOR: &str = ", ";

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Rows classified between progress callbacks.
    pub batch_size: usize,
    /// Whether to add the combined `Translated_Contacts` column.
    pub translated_column: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            translated_column: false,
        }
    }
}

/// Positions of the summary columns in the annotated table.
struct AnnotationColumns {
    translated: Option<usize>,
    valid: usize,
    invalid: usize,
}

/// Runs the contact normalization pipeline over a table.
pub struct Pipeline {
    config: PipelineConfig,
    progress: Option<Arc<dyn ProgressReporter>>,
}

impl Pipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    /// Attach a progress reporter called after every batch.
    pub fn with_progress(mut self, reporter: impl ProgressReporter + 'static) -> Self {
        self.progress = Some(Arc::new(reporter));
        self
    }

    /// Get the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process `table`, reading contacts from `column`.
    pub fn run(&self, table: &DataTable, column: &str) -> Result<PipelineOutput> {
        let column_idx = table
            .column_index(column)
            .ok_or_else(|| CleanerError::MissingColumn {
                column: column.to_string(),
                available: table.headers.clone(),
            })?;

        let outcomes = self.classify_rows(table, column_idx);
        let annotated = self.annotate(table, &outcomes);

        let valid = sorted_subset(&annotated, &outcomes, RowOutcome::has_valid, VALID_COLUMN);
        let invalid = sorted_subset(
            &annotated,
            &outcomes,
            RowOutcome::is_invalid_only,
            INVALID_COLUMN,
        );

        let summary = ProcessSummary::from_outcomes(&outcomes);
        info!(
            column,
            rows = summary.total_rows,
            valid_rows = summary.rows_with_valid,
            invalid_rows = summary.rows_invalid_only,
            empty_rows = summary.rows_without_contacts,
            "contact pipeline finished"
        );

        Ok(PipelineOutput {
            column: column.to_string(),
            original: table.clone(),
            annotated,
            valid,
            invalid,
            outcomes,
            summary,
        })
    }

    /// Classify the contact cell of every row, in row order.
    fn classify_rows(&self, table: &DataTable, column_idx: usize) -> Vec<RowOutcome> {
        let total = table.row_count();
        let batch_size = self.config.batch_size.max(1);
        let mut outcomes = Vec::with_capacity(total);

        for batch in table.rows.chunks(batch_size) {
            let start = outcomes.len();
            outcomes.extend(
                batch
                    .iter()
                    .map(|row| classify_field(row.get(column_idx).and_then(|c| c.as_deref()))),
            );

            debug!(
                "Processing rows {} to {} of {}",
                start + 1,
                outcomes.len(),
                total
            );
            if let Some(ref reporter) = self.progress {
                reporter.on_batch(outcomes.len(), total);
            }
        }

        outcomes
    }

    /// Build the annotated table: input columns plus the contact summaries.
    fn annotate(&self, table: &DataTable, outcomes: &[RowOutcome]) -> DataTable {
        let mut headers = table.headers.clone();
        let columns = AnnotationColumns {
            translated: self
                .config
                .translated_column
                .then(|| ensure_column(&mut headers, TRANSLATED_COLUMN)),
            valid: ensure_column(&mut headers, VALID_COLUMN),
            invalid: ensure_column(&mut headers, INVALID_COLUMN),
        };

        let rows = table
            .rows
            .iter()
            .zip(outcomes)
            .map(|(row, outcome)| {
                let mut row = row.clone();
                row.resize(headers.len(), None);

                if let Some(idx) = columns.translated {
                    let combined: Vec<&str> = outcome
                        .valid
                        .iter()
                        .chain(&outcome.invalid)
                        .map(String::as_str)
                        .collect();
                    row[idx] = Some(combined.join(JOIN_SEPARATOR));
                }
                row[columns.valid] = Some(outcome.valid.join(JOIN_SEPARATOR));
                row[columns.invalid] = Some(outcome.invalid.join(JOIN_SEPARATOR));
                row
            })
            .collect();

        DataTable::new(headers, rows)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of `name` in `headers`, appending it when missing.
fn ensure_column(headers: &mut Vec<String>, name: &str) -> usize {
    match headers.iter().position(|h| h == name) {
        Some(idx) => idx,
        None => {
            headers.push(name.to_string());
            headers.len() - 1
        }
    }
}

/// Rows of `annotated` whose outcome matches `keep`, stably sorted by `sort_column`.
fn sorted_subset(
    annotated: &DataTable,
    outcomes: &[RowOutcome],
    keep: impl Fn(&RowOutcome) -> bool,
    sort_column: &str,
) -> DataTable {
    let key_idx = annotated.column_index(sort_column);
    let mut rows: Vec<&Vec<Option<String>>> = annotated
        .rows
        .iter()
        .zip(outcomes)
        .filter(|(_, outcome)| keep(*outcome))
        .map(|(row, _)| row)
        .collect();

    // `sort_by` is stable, so equal keys keep their annotated-table order.
    rows.sort_by(|a, b| sort_key(a, key_idx).cmp(sort_key(b, key_idx)));

    DataTable {
        headers: annotated.headers.clone(),
        rows: rows.into_iter().cloned().collect(),
    }
}

fn sort_key(row: &[Option<String>], idx: Option<usize>) -> &str {
    idx.and_then(|idx| row.get(idx))
        .and_then(|cell| cell.as_deref())
        .unwrap_or("")
}

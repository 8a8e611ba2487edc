//! Pipeline output tables and summary.

use serde::{Deserialize, Serialize};

use crate::input::DataTable;
use crate::normalize::RowOutcome;

/// Sheet name for the unmodified input.
pub const ORIGINAL_SHEET: &str = "Original";
/// Sheet name for the annotated table.
pub const TRANSLATED_SHEET: &str = "Translated";
/// Sheet name for rows with at least one valid number.
pub const VALID_SHEET: &str = "Valid Sorted";
/// Sheet name for rows with only invalid numbers.
pub const INVALID_SHEET: &str = "Invalid Sorted";

/// Counts describing one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSummary {
    /// Rows in the input table.
    pub total_rows: usize,
    /// Rows with at least one valid number.
    pub rows_with_valid: usize,
    /// Rows with invalid numbers only.
    pub rows_invalid_only: usize,
    /// Rows whose contact field yielded no numbers.
    pub rows_without_contacts: usize,
    /// Valid numbers across all rows (after per-row de-duplication).
    pub valid_numbers: usize,
    /// Invalid numbers across all rows (after per-row de-duplication).
    pub invalid_numbers: usize,
    /// Tokens dropped because they held no digits.
    pub dropped_tokens: usize,
}

impl ProcessSummary {
    pub(crate) fn from_outcomes(outcomes: &[RowOutcome]) -> Self {
        let mut summary = ProcessSummary {
            total_rows: outcomes.len(),
            ..Default::default()
        };

        for outcome in outcomes {
            if outcome.has_valid() {
                summary.rows_with_valid += 1;
            } else if outcome.is_invalid_only() {
                summary.rows_invalid_only += 1;
            } else {
                summary.rows_without_contacts += 1;
            }
            summary.valid_numbers += outcome.valid.len();
            summary.invalid_numbers += outcome.invalid.len();
            summary.dropped_tokens += outcome.dropped;
        }

        summary
    }
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    /// The contact column that was processed.
    pub column: String,
    /// The input table, unmodified.
    pub original: DataTable,
    /// Input plus the contact summary columns, same rows and order.
    pub annotated: DataTable,
    /// Annotated rows with a valid number, sorted by `Valid_Contacts`.
    pub valid: DataTable,
    /// Annotated rows with only invalid numbers, sorted by `Invalid_Contacts`.
    pub invalid: DataTable,
    /// Per-row classification, aligned with `annotated`.
    pub outcomes: Vec<RowOutcome>,
    /// Aggregate counts.
    pub summary: ProcessSummary,
}

impl PipelineOutput {
    /// The four output tables paired with their sheet names, in sheet order.
    pub fn sheets(&self) -> [(&'static str, &DataTable); 4] {
        [
            (ORIGINAL_SHEET, &self.original),
            (TRANSLATED_SHEET, &self.annotated),
            (VALID_SHEET, &self.valid),
            (INVALID_SHEET, &self.invalid),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(valid: &[&str], invalid: &[&str], dropped: usize) -> RowOutcome {
        RowOutcome {
            valid: valid.iter().map(|s| s.to_string()).collect(),
            invalid: invalid.iter().map(|s| s.to_string()).collect(),
            tokens: valid.len() + invalid.len() + dropped,
            dropped,
        }
    }

    #[test]
    fn test_summary_counts() {
        let outcomes = vec![
            outcome(&["8801712345678"], &["123"], 0),
            outcome(&[], &["0171234567"], 1),
            outcome(&[], &[], 0),
            outcome(&["8801812345678", "8801912345678"], &[], 0),
        ];
        let summary = ProcessSummary::from_outcomes(&outcomes);

        assert_eq!(summary.total_rows, 4);
        assert_eq!(summary.rows_with_valid, 2);
        assert_eq!(summary.rows_invalid_only, 1);
        assert_eq!(summary.rows_without_contacts, 1);
        assert_eq!(summary.valid_numbers, 3);
        assert_eq!(summary.invalid_numbers, 2);
        assert_eq!(summary.dropped_tokens, 1);
    }
}

//! mobclean: normalize, validate and partition mobile numbers in contact spreadsheets.
//!
//! A contact column may hold several numbers per cell, separated by `,` or
//! `/`, written with Bengali or Latin digits and any mix of symbols. mobclean
//! reduces each entry to digits, validates it against the national mobile
//! format (`01XXXXXXXXX` or `8801XXXXXXXXX`), reports valid numbers in their
//! 13-digit `880…` form, and splits the table into valid and invalid subsets.
//!
//! # Core Principles
//!
//! - **Non-destructive**: the original table is emitted unchanged next to the annotated one
//! - **Deterministic**: numbers are deduplicated and sorted, subsets are stably sorted
//! - **Forgiving**: unreadable cells count as empty and never fail a run
//!
//! # Example
//!
//! ```no_run
//! use mobclean::{Cleaner, WorkbookWriter};
//!
//! let cleaner = Cleaner::new();
//! let result = cleaner.process("contacts.xlsx", "Mobile").unwrap();
//!
//! println!("Valid rows: {}", result.output.summary.rows_with_valid);
//! WorkbookWriter::new()
//!     .write(&result.output, "contacts_processed.xlsx")
//!     .unwrap();
//! ```

pub mod error;
pub mod input;
pub mod normalize;
pub mod output;
pub mod pipeline;

mod cleaner;

pub use crate::cleaner::{Cleaner, CleanerConfig, ProcessResult};
pub use error::{CleanerError, Result};
pub use input::{DataTable, InputFormat, Parser, ParserConfig, SourceMetadata};
pub use normalize::{classify, classify_field, normalize_digits, split_contacts, Classification, RowOutcome};
pub use output::{processed_file_name, WorkbookWriter};
pub use pipeline::{
    Pipeline, PipelineConfig, PipelineOutput, ProcessSummary, ProgressReporter, INVALID_COLUMN,
    TRANSLATED_COLUMN, VALID_COLUMN,
};
